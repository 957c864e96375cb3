//! Health plugin: damageable entities that can be hurt, die, and respawn.
//!
//! # Data flow
//! ```text
//!   FixedPostUpdate
//!     avian CollisionStart ──> contact_damage_from_collisions ──> DamageRequest
//!
//!   Update (chained)
//!     initialize_damageables   Added<Damageable>: reset health, register with aggregator
//!     apply_damage_requests    DamageRequest ──> Damageable
//!     tick_respawn_timers      Time ──> Respawning timers ──> Damageable
//!
//!   PostUpdate (chained)
//!     report_transitions       recorded transitions ──> Destroyed / Respawned / Retired,
//!                              PendingDespawn, HealthAggregator
//!     forget_despawned_members RemovedComponents<Damageable> ──> HealthAggregator
//!     despawn_pending          PendingDespawn ──> despawn
//! ```
//!
//! Any other system may also call `Damageable` methods directly through a
//! query. Each `Damageable` records its own transitions, so reporting and
//! removal do not depend on who drove it.

pub mod components;
pub mod contact;
pub mod listeners;
pub mod messages;
pub mod systems;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::prelude::*;

use crate::common::state::GameState;

pub use components::{
    DamageForm, Damageable, DamageableConfig, Death, HealthAggregator, LifeState, Transition,
};
pub use contact::ContactDamage;
pub use listeners::{ListenerId, Listeners};
pub use messages::{Damage, DamageRequest, Destroyed, Respawned, Retired};

pub fn plugin(app: &mut App) {
    app.add_message::<DamageRequest>()
        .add_message::<Destroyed>()
        .add_message::<Respawned>()
        .add_message::<Retired>();

    app.add_systems(
        FixedPostUpdate,
        contact::contact_damage_from_collisions
            .after(CollisionEventSystems)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        Update,
        (
            systems::initialize_damageables,
            systems::apply_damage_requests,
            systems::tick_respawn_timers,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        (
            systems::report_transitions,
            systems::forget_despawned_members,
            systems::despawn_pending,
        )
            .chain(),
    );
}
