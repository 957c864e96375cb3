//! Health systems.
//!
//! Update (chained): initialize -> apply requests -> tick respawns.
//! PostUpdate (chained): report transitions -> forget despawned members -> despawn.
//!
//! Reporting reads the transitions each `Damageable` recorded itself, so a
//! system that calls `die()` or `remove()` directly gets the same despawn,
//! messages, and aggregator bookkeeping as the request path.

use bevy::prelude::*;

use super::components::{Damageable, Death, HealthAggregator, PendingDespawn, Transition};
use super::messages::{Damage, DamageRequest, Destroyed, Respawned, Retired};

/// Spawn-time setup for newly added damageables.
///
/// The aggregator reference is injected at construction and checked only here.
/// A missing or dangling reference is logged and dropped; the damageable works
/// the same without it.
pub fn initialize_damageables(
    mut q: Query<(Entity, &mut Damageable, Option<&Name>), Added<Damageable>>,
    mut q_agg: Query<&mut HealthAggregator>,
) {
    for (e, mut dmg, name) in &mut q {
        dmg.initialize();

        let registered = dmg
            .aggregator()
            .and_then(|agg| q_agg.get_mut(agg).ok())
            .map(|mut agg| agg.register_member(e))
            .is_some();

        if !registered {
            dmg.clear_aggregator();
            match name {
                Some(name) => warn!("{name} found no health aggregator on its root entity"),
                None => warn!("{e} found no health aggregator on its root entity"),
            }
        }
    }
}

/// Consume damage intent.
pub fn apply_damage_requests(mut requests: MessageReader<DamageRequest>, mut q: Query<&mut Damageable>) {
    for req in requests.read() {
        let Ok(mut dmg) = q.get_mut(req.target) else {
            continue;
        };

        match req.damage {
            Damage::Typed { amount, form } => dmg.apply_typed_damage(amount, form),
            Damage::Raw { amount } => dmg.apply_raw_damage(amount),
            Damage::Kill => dmg.die(),
        };
    }
}

/// Drive pending respawns with (virtual) game time.
pub fn tick_respawn_timers(time: Res<Time>, mut q: Query<&mut Damageable>) {
    let delta = time.delta();
    for mut dmg in &mut q {
        dmg.tick_respawn(delta);
    }
}

/// Turn recorded transitions into messages, despawn marks, and aggregator updates.
pub fn report_transitions(
    mut commands: Commands,
    mut q: Query<(Entity, &mut Damageable), Changed<Damageable>>,
    mut q_agg: Query<(&mut HealthAggregator, Option<&Name>)>,
    mut destroyed: MessageWriter<Destroyed>,
    mut respawned: MessageWriter<Respawned>,
    mut retired: MessageWriter<Retired>,
) {
    for (e, mut dmg) in &mut q {
        let transitions = dmg.bypass_change_detection().take_transitions();
        if transitions.is_empty() {
            continue;
        }

        let mut group = dmg
            .aggregator()
            .and_then(|agg_e| q_agg.get_mut(agg_e).ok().map(|a| (agg_e, a)));

        for t in transitions {
            match t {
                Transition::Died(death) => {
                    debug!("{e} died: {death:?}");
                    if death == Death::Removed {
                        commands.entity(e).try_insert(PendingDespawn);
                    }
                    destroyed.write(Destroyed { entity: e, death });

                    if let Some((agg_e, (agg, name))) = group.as_mut() {
                        if agg.record_death(e, death) {
                            let label = name.map_or_else(|| agg_e.to_string(), |n| n.to_string());
                            info!("all {} members of {label} are down", agg.members());
                        }
                    }
                }
                Transition::Respawned => {
                    debug!("{e} respawned with {} health", dmg.current_health());
                    respawned.write(Respawned { entity: e });
                    if let Some((_, (agg, _))) = group.as_mut() {
                        agg.record_respawn(e);
                    }
                }
                Transition::Retired { was_down } => {
                    debug!("{e} retired");
                    commands.entity(e).try_insert(PendingDespawn);
                    retired.write(Retired { entity: e, was_down });
                    if let Some((_, (agg, _))) = group.as_mut() {
                        agg.forget(e);
                    }
                }
            }
        }
    }
}

/// Members despawned by any code leave every aggregator that knew them.
pub fn forget_despawned_members(
    mut removed: RemovedComponents<Damageable>,
    mut q_agg: Query<&mut HealthAggregator>,
) {
    for e in removed.read() {
        for mut agg in &mut q_agg {
            if agg.contains(e) {
                agg.forget(e);
            }
        }
    }
}

/// Despawn entities marked for removal.
///
/// Centralizing despawn in one system keeps structural changes predictable.
pub fn despawn_pending(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
