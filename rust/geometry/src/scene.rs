// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scene model import
//!
//! Loads prop models (furnaces, lamps, boxes) from a JSON scene description:
//! a flat list of meshes plus a node tree in which every node carries an
//! optional local transform. Flattening walks the tree and bakes the
//! accumulated parent-to-global transform into one merged mesh.
//!
//! Models are validated completely before anything is installed in the
//! registry, so a failed load never leaves a partial model behind.

use crate::error::{Error, Result};
use crate::mesh::Mesh;
use nalgebra::Matrix4;
use rustc_hash::FxHashMap;
use serde::Deserialize;
use std::path::Path;

/// Raw mesh as stored in a scene file
#[derive(Debug, Clone, Deserialize)]
pub struct SceneMesh {
    pub positions: Vec<f32>,
    #[serde(default)]
    pub normals: Vec<f32>,
    pub indices: Vec<u32>,
    /// Material file path, resolved through the [`MaterialRegistry`]
    #[serde(default)]
    pub material: Option<String>,
}

/// Node of the scene tree
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneNode {
    #[serde(default)]
    pub name: String,
    /// Column-major local transform; identity when absent
    #[serde(default)]
    pub transform: Option<[f64; 16]>,
    /// Indices into [`SceneModel::meshes`]
    #[serde(default)]
    pub meshes: Vec<usize>,
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn local_transform(&self) -> Matrix4<f64> {
        self.transform
            .map(|m| Matrix4::from_column_slice(&m))
            .unwrap_or_else(Matrix4::identity)
    }
}

/// A parsed scene: meshes plus the node tree referencing them
#[derive(Debug, Clone, Deserialize)]
pub struct SceneModel {
    pub meshes: Vec<SceneMesh>,
    pub root: SceneNode,
}

impl SceneModel {
    /// Parse and validate a scene description
    pub fn from_json_str(json: &str) -> Result<Self> {
        let model: SceneModel = serde_json::from_str(json)?;
        model.validate()?;
        Ok(model)
    }

    /// Check mesh buffers and node references
    pub fn validate(&self) -> Result<()> {
        for (i, mesh) in self.meshes.iter().enumerate() {
            if mesh.positions.len() % 3 != 0 {
                return Err(Error::InvalidMesh(format!(
                    "mesh {} has {} position floats, not a multiple of 3",
                    i,
                    mesh.positions.len()
                )));
            }
            if !mesh.normals.is_empty() && mesh.normals.len() != mesh.positions.len() {
                return Err(Error::InvalidMesh(format!(
                    "mesh {} has {} normal floats for {} position floats",
                    i,
                    mesh.normals.len(),
                    mesh.positions.len()
                )));
            }
            if mesh.indices.len() % 3 != 0 {
                return Err(Error::InvalidMesh(format!(
                    "mesh {} has {} indices, not whole triangles",
                    i,
                    mesh.indices.len()
                )));
            }
            let vertex_count = mesh.positions.len() / 3;
            if let Some(&bad) = mesh.indices.iter().find(|&&ix| ix as usize >= vertex_count) {
                return Err(Error::InvalidMesh(format!(
                    "mesh {} index {} out of range ({} vertices)",
                    i, bad, vertex_count
                )));
            }
        }
        self.validate_node(&self.root)
    }

    fn validate_node(&self, node: &SceneNode) -> Result<()> {
        if let Some(&bad) = node.meshes.iter().find(|&&m| m >= self.meshes.len()) {
            return Err(Error::InvalidScene(format!(
                "node '{}' references mesh {} of {}",
                node.name,
                bad,
                self.meshes.len()
            )));
        }
        node.children.iter().try_for_each(|c| self.validate_node(c))
    }

    /// Bake the node tree into a single mesh in model space
    pub fn flatten(&self) -> Mesh {
        let mut out = Mesh::new();
        self.flatten_node(&self.root, &Matrix4::identity(), &mut out);
        out
    }

    fn flatten_node(&self, node: &SceneNode, parent: &Matrix4<f64>, out: &mut Mesh) {
        let global = parent * node.local_transform();

        for &mesh_ix in &node.meshes {
            let src = &self.meshes[mesh_ix];
            let start = out.vertex_count();
            let normals = if src.normals.is_empty() {
                vec![0.0; src.positions.len()]
            } else {
                src.normals.clone()
            };
            out.merge(&Mesh {
                positions: src.positions.clone(),
                normals,
                indices: src.indices.clone(),
            });
            out.transform_from(start, &global);
        }
        for child in &node.children {
            self.flatten_node(child, &global, out);
        }
    }

    /// Material paths in first-use order, without duplicates
    pub fn material_paths(&self) -> Vec<&str> {
        let mut paths: Vec<&str> = Vec::new();
        for m in self.meshes.iter().filter_map(|m| m.material.as_deref()) {
            if !paths.contains(&m) {
                paths.push(m);
            }
        }
        paths
    }
}

/// Handle of a registered material
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialId(pub u32);

/// Materials keyed by file path
#[derive(Debug, Default)]
pub struct MaterialRegistry {
    ids: FxHashMap<String, MaterialId>,
    paths: Vec<String>,
}

impl MaterialRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `path`, registering it on first use
    pub fn get_or_insert(&mut self, path: &str) -> MaterialId {
        if let Some(&id) = self.ids.get(path) {
            return id;
        }
        let id = MaterialId(self.paths.len() as u32);
        self.ids.insert(path.to_string(), id);
        self.paths.push(path.to_string());
        id
    }

    pub fn get(&self, path: &str) -> Option<MaterialId> {
        self.ids.get(path).copied()
    }

    pub fn path(&self, id: MaterialId) -> Option<&str> {
        self.paths.get(id.0 as usize).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// A flattened model ready for instancing
#[derive(Debug, Clone)]
pub struct LoadedModel {
    pub mesh: Mesh,
    pub materials: Vec<MaterialId>,
}

/// Loaded models keyed by file path
#[derive(Debug, Default)]
pub struct ModelRegistry {
    models: FxHashMap<String, LoadedModel>,
    pub materials: MaterialRegistry,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load, validate and install the model at `path`
    ///
    /// Already loaded paths are returned as-is. Nothing is registered unless
    /// the whole model is valid.
    pub fn load_model(&mut self, path: impl AsRef<Path>) -> Result<&LoadedModel> {
        let key = path.as_ref().to_string_lossy().into_owned();

        if !self.models.contains_key(&key) {
            let json = std::fs::read_to_string(path.as_ref()).map_err(|source| Error::Io {
                path: key.clone(),
                source,
            })?;
            let model = SceneModel::from_json_str(&json)?;
            let mesh = model.flatten();
            if mesh.is_empty() {
                return Err(Error::InvalidMesh(format!("{} contains no geometry", key)));
            }
            let materials = model
                .material_paths()
                .into_iter()
                .map(|m| self.materials.get_or_insert(m))
                .collect();
            tracing::debug!(
                path = %key,
                vertices = mesh.vertex_count(),
                triangles = mesh.triangle_count(),
                "loaded model"
            );
            self.models.insert(key.clone(), LoadedModel { mesh, materials });
        }
        Ok(&self.models[&key])
    }

    /// Load a model, logging the diagnostic on failure
    pub fn try_load_model(&mut self, path: impl AsRef<Path>) -> bool {
        match self.load_model(path.as_ref()) {
            Ok(_) => true,
            Err(e) => {
                tracing::error!(path = %path.as_ref().display(), error = %e, "model import failed");
                false
            }
        }
    }

    pub fn get(&self, path: &str) -> Option<&LoadedModel> {
        self.models.get(path)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
