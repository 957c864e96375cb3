//! Contact damage: hazards and projectiles hurt what they touch.
//!
//! Reads avian `CollisionStart` messages and turns them into `DamageRequest`s.
//! Either side of a contact may carry `ContactDamage`; the other side must
//! resolve to a `Damageable` (on the collider itself or on its rigid body).

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::components::{DamageForm, Damageable};
use super::messages::{Damage, DamageRequest};

/// Hurts damageables on first contact.
///
/// Requires `CollisionEventsEnabled`: avian only reports `CollisionStart` for
/// colliders that opt in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
#[require(CollisionEventsEnabled)]
pub struct ContactDamage {
    pub amount: u32,
    /// `None` deals raw damage, bypassing weaknesses.
    pub form: Option<DamageForm>,
}

impl ContactDamage {
    pub fn raw(amount: u32) -> Self {
        Self { amount, form: None }
    }

    pub fn typed(amount: u32, form: DamageForm) -> Self {
        Self { amount, form: Some(form) }
    }

    #[inline]
    pub fn damage(self) -> Damage {
        match self.form {
            Some(form) => Damage::Typed { amount: self.amount, form },
            None => Damage::Raw { amount: self.amount },
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ContactSide {
    collider: Entity,
    body: Option<Entity>,
}

impl ContactSide {
    /// Collider first, then its body.
    #[inline]
    fn candidates(self) -> impl Iterator<Item = Entity> {
        std::iter::once(self.collider).chain(self.body)
    }
}

#[inline]
fn sides(ev: &CollisionStart) -> (ContactSide, ContactSide) {
    (
        ContactSide { collider: ev.collider1, body: ev.body1 },
        ContactSide { collider: ev.collider2, body: ev.body2 },
    )
}

pub fn contact_damage_from_collisions(
    mut started: MessageReader<CollisionStart>,
    q_contact: Query<&ContactDamage>,
    q_damageable: Query<(), With<Damageable>>,
    mut requests: MessageWriter<DamageRequest>,
    // Per-frame dedupe of (hazard, target) pairs
    mut seen: Local<HashSet<(Entity, Entity)>>,
) {
    seen.clear();

    for ev in started.read() {
        let (a, b) = sides(ev);

        for (hazard_side, target_side) in [(a, b), (b, a)] {
            let Some((hazard, contact)) = hazard_side
                .candidates()
                .find_map(|e| q_contact.get(e).ok().map(|c| (e, *c)))
            else {
                continue;
            };
            let Some(target) = target_side.candidates().find(|e| q_damageable.contains(*e)) else {
                continue;
            };

            // Self-contact through a shared body.
            if hazard == target || !seen.insert((hazard, target)) {
                continue;
            }

            requests.write(DamageRequest { target, damage: contact.damage() });
        }
    }
}
