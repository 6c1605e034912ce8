// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Attic generation parameters.
//!
//! Every length is a factor of the building's floor spacing (floor-to-floor
//! height), so one config serves buildings of any scale.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "RAFTER_CONFIG";

/// Proportional constants for attic generation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AtticConfig {
    /// Thickness of the top floor's ceiling slab.
    pub ceiling_thickness: f64,
    /// Hatch half extent along its long axis.
    pub hatch_half_length: f64,
    /// Hatch half extent across its long axis.
    pub hatch_half_width: f64,
    /// Smallest horizontal part size that can host a hatch.
    pub min_part_size: f64,
    /// Extra inset of the hatch valid area, as a fraction of the hatch half extents.
    pub hatch_clearance: f64,
    /// A room hosts a hatch when each side is at least this many hatch half extents.
    pub hatch_room_fit: f64,
    /// Hallway hatch offset along the hallway, as a fraction of its length.
    pub hallway_offset_along: f64,
    /// Hallway hatch offset across the hallway, as a fraction of its width.
    pub hallway_offset_across: f64,
    /// Horizontal growth of the hatch avoid zone on every side.
    pub avoid_expand: f64,
    /// Further growth of the avoid zone on the ladder side.
    pub avoid_ladder_extend: f64,
    /// Growth of the avoid zone upward into the attic.
    pub avoid_height: f64,

    /// Rafter and post cross-section size.
    pub beam_depth: f64,
    /// Beams per floor spacing of surface width.
    pub beam_density: f64,
    /// Smallest ridge rise that gets collar ties.
    pub min_collar_rise: f64,
    /// Height of the collar ties as a fraction of the ridge rise.
    pub collar_height: f64,

    /// Half size of an attic light.
    pub light_radius: f64,
    /// Split into two lights when the footprint skew exceeds this fraction of the attic height.
    pub light_split_threshold: f64,
    /// Lateral nudge applied to light probes.
    pub probe_nudge: f64,
    /// Inward shrink of the chimney per horizontal side, as a fraction of its size.
    pub chimney_shrink: f64,
    /// Exclusion padding around posts, in beam depths.
    pub post_padding: f64,
    /// Headroom margin for `cube_in_attic`, in beam depths.
    pub roof_margin: f64,

    /// Inset of the furnace placement area from the part.
    pub furnace_inset: f64,
    pub furnace_attempts: u32,
    pub furnace_half_depth: f64,
    pub furnace_half_width: f64,
    pub furnace_height: f64,

    pub max_boxes: u32,
    pub box_attempts: u32,
    pub box_min_half_size: f64,
    pub box_max_half_size: f64,
    pub box_min_height: f64,
    pub box_max_height: f64,

    pub max_lamps: u32,
    pub lamp_attempts: u32,
    pub lamp_half_size: f64,
    pub lamp_height: f64,

    /// Ladder depth as a fraction of the opened door length.
    pub ladder_depth_scale: f64,
    pub ladder_steps: u32,
    /// Swing of the opened door away from its frame, in degrees.
    pub door_open_angle: f64,
}

impl Default for AtticConfig {
    fn default() -> Self {
        Self {
            ceiling_thickness: 0.1,
            hatch_half_length: 0.3,
            hatch_half_width: 0.2,
            min_part_size: 2.75,
            hatch_clearance: 0.2,
            hatch_room_fit: 2.5,
            hallway_offset_along: 0.1,
            hallway_offset_across: 0.2,
            avoid_expand: 0.25,
            avoid_ladder_extend: 0.5,
            avoid_height: 0.5,

            beam_depth: 0.08,
            beam_density: 3.0,
            min_collar_rise: 0.5,
            collar_height: 0.6,

            light_radius: 0.05,
            light_split_threshold: 0.25,
            probe_nudge: 0.01,
            chimney_shrink: 0.05,
            post_padding: 1.0,
            roof_margin: 2.5,

            furnace_inset: 0.75,
            furnace_attempts: 100,
            furnace_half_depth: 0.15,
            furnace_half_width: 0.2,
            furnace_height: 0.4,

            max_boxes: 24,
            box_attempts: 20,
            box_min_half_size: 0.05,
            box_max_half_size: 0.12,
            box_min_height: 0.06,
            box_max_height: 0.2,

            max_lamps: 2,
            lamp_attempts: 20,
            lamp_half_size: 0.06,
            lamp_height: 0.3,

            ladder_depth_scale: 0.3,
            ladder_steps: 10,
            door_open_angle: 10.0,
        }
    }
}

impl AtticConfig {
    /// Parse a config from JSON; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: AtticConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Load the file named by `RAFTER_CONFIG`, falling back to defaults.
    pub fn from_env() -> Self {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::from_file(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path, error = %e, "using default attic config");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Reject values that would make placement meaningless.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("ceiling_thickness", self.ceiling_thickness),
            ("hatch_half_length", self.hatch_half_length),
            ("hatch_half_width", self.hatch_half_width),
            ("min_part_size", self.min_part_size),
            ("hatch_room_fit", self.hatch_room_fit),
            ("beam_depth", self.beam_depth),
            ("beam_density", self.beam_density),
            ("light_radius", self.light_radius),
            ("furnace_half_depth", self.furnace_half_depth),
            ("furnace_half_width", self.furnace_half_width),
            ("furnace_height", self.furnace_height),
            ("box_min_half_size", self.box_min_half_size),
            ("box_min_height", self.box_min_height),
            ("lamp_half_size", self.lamp_half_size),
            ("lamp_height", self.lamp_height),
            ("ladder_depth_scale", self.ladder_depth_scale),
        ];
        if let Some((name, value)) = positive.iter().find(|(_, v)| !(*v > 0.0)) {
            return Err(Error::InvalidConfig(format!(
                "{} must be positive, got {}",
                name, value
            )));
        }
        if self.hatch_half_width > self.hatch_half_length {
            return Err(Error::InvalidConfig(
                "hatch_half_width exceeds hatch_half_length".into(),
            ));
        }
        if self.box_max_half_size < self.box_min_half_size
            || self.box_max_height < self.box_min_height
        {
            return Err(Error::InvalidConfig("box size range is inverted".into()));
        }
        if !(0.0..1.0).contains(&self.collar_height) {
            return Err(Error::InvalidConfig(format!(
                "collar_height must be in [0, 1), got {}",
                self.collar_height
            )));
        }
        if self.ladder_steps == 0 {
            return Err(Error::InvalidConfig("ladder_steps must be at least 1".into()));
        }
        Ok(())
    }

    /// Whether a room of plan size `dx` by `dy` fits a hatch.
    ///
    /// The hatch runs along the longer side, so the longer side is checked
    /// against the half length and the shorter one against the half width.
    pub fn room_fits_hatch(&self, dx: f64, dy: f64, floor_spacing: f64) -> bool {
        let scale = self.hatch_room_fit * floor_spacing;
        dx.max(dy) >= scale * self.hatch_half_length && dx.min(dy) >= scale * self.hatch_half_width
    }
}
