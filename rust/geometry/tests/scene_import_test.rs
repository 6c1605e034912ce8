// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use rafter_geometry::{Error, ModelRegistry};
use std::path::PathBuf;

fn model_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("models")
        .join(name)
}

#[test]
fn test_nested_transforms_are_baked() {
    let mut registry = ModelRegistry::new();
    let model = registry.load_model(model_path("furnace.json")).unwrap();

    assert_eq!(model.mesh.vertex_count(), 11);
    assert_eq!(model.mesh.triangle_count(), 5);
    assert_eq!(model.materials.len(), 2);

    let bounds = model.mesh.bounds().unwrap();
    assert_relative_eq!(bounds.hi.x, 0.5, epsilon = 1e-6);
    // Cap sits two half-scaled unit lifts above the base
    assert_relative_eq!(bounds.hi.z, 1.0, epsilon = 1e-6);

    // Uniform scale keeps unit normals
    assert_relative_eq!(model.mesh.normals[2], 1.0, epsilon = 1e-6);
}

#[test]
fn test_repeat_load_reuses_model() {
    let mut registry = ModelRegistry::new();
    let path = model_path("furnace.json");
    assert!(registry.try_load_model(&path));
    assert!(registry.try_load_model(&path));
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.materials.len(), 2);
    assert!(registry.get(&path.to_string_lossy()).is_some());
}

#[test]
fn test_invalid_model_leaves_registry_untouched() {
    let mut registry = ModelRegistry::new();
    let result = registry.load_model(model_path("broken.json"));
    assert!(matches!(result, Err(Error::InvalidMesh(_))));

    assert!(registry.is_empty());
    assert!(registry.materials.get("textures/never_registered.png").is_none());
    assert!(!registry.try_load_model(model_path("missing.json")));
}
