//! Tunable gameplay constants.

use bevy::prelude::*;

/// Gameplay constants read by the plugins at startup.
#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub default_starting_health: i32,
    pub default_respawn_delay_secs: f32,
    pub demo_targets: usize,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            default_starting_health: 1,
            default_respawn_delay_secs: 3.0,
            demo_targets: 3,
        }
    }
}
