//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `damageable::game::configure_headless` to install gameplay plugins.

#![allow(dead_code)]

use std::time::Duration;

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

pub fn app_headless() -> App {
    let mut app = App::new();

    // Core ECS + states; AssetPlugin + ScenePlugin so physics finds SceneSpawner.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    damageable::game::configure_headless(&mut app);

    // `App::run` normally does this; plugins (e.g. avian) register resources in `finish`.
    app.finish();
    app.cleanup();
    app
}

/// Headless app whose clock advances by `step` every `update()`.
pub fn app_headless_stepped(step: Duration) -> App {
    let mut app = app_headless();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));
    app
}
