//! Feature plugins.

use bevy::prelude::*;

pub mod core;
pub mod health;
pub mod physics;

// Render + input only
pub mod demo;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    health::plugin(app);
}

/// Register plugins that need a window, renderer, and input.
pub fn register_render(app: &mut App) {
    demo::plugin(app);
}

