//! Buffered health messages.
//!
//! Producers (contact resolution, input, scripted kills) write `DamageRequest`
//! intent; `apply_damage_requests` consumes it. Lifecycle messages
//! (`Destroyed`, `Respawned`, `Retired`) are written by `report_transitions`
//! for every transition, however the `Damageable` was driven.

use bevy::prelude::*;

use super::components::{DamageForm, Death};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Damage {
    /// Filtered through the target's weakness.
    Typed { amount: u32, form: DamageForm },
    /// Applied as-is.
    Raw { amount: u32 },
    /// Force-kill.
    Kill,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct DamageRequest {
    pub target: Entity,
    pub damage: Damage,
}

impl DamageRequest {
    pub fn typed(target: Entity, amount: u32, form: DamageForm) -> Self {
        Self { target, damage: Damage::Typed { amount, form } }
    }

    pub fn raw(target: Entity, amount: u32) -> Self {
        Self { target, damage: Damage::Raw { amount } }
    }

    pub fn kill(target: Entity) -> Self {
        Self { target, damage: Damage::Kill }
    }
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Destroyed {
    pub entity: Entity,
    pub death: Death,
}

#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Respawned {
    pub entity: Entity,
}

/// Permanently removed through `Damageable::remove` rather than by dying.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retired {
    pub entity: Entity,
    pub was_down: bool,
}
