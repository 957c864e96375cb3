//! Test helpers.
//!
//! `RunSystemOnce` executes a system against a bare `World` without a schedule.
//! Systems that use `Commands` only enqueue work, so we flush afterwards to make
//! despawns and inserts visible to assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Replace the world's generic clock with one that just advanced by `secs`.
pub fn set_time_delta(world: &mut World, secs: f32) {
    let mut t = Time::<()>::default();
    t.advance_by(Duration::from_secs_f32(secs));
    world.insert_resource(t);
}
