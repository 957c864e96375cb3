mod common;

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use damageable::common::state::GameState;
use damageable::common::tunables::Tunables;
use damageable::plugins::health::{DamageRequest, Destroyed, Respawned, Retired};

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }

    assert_eq!(
        *app.world().resource::<State<GameState>>().get(),
        GameState::InGame
    );
}

#[test]
fn health_plugin_is_wired() {
    let mut app = common::app_headless();
    app.update();

    let world = app.world();
    assert!(world.get_resource::<Tunables>().is_some());
    assert!(world.get_resource::<Messages<DamageRequest>>().is_some());
    assert!(world.get_resource::<Messages<Destroyed>>().is_some());
    assert!(world.get_resource::<Messages<Respawned>>().is_some());
    assert!(world.get_resource::<Messages<Retired>>().is_some());
}
