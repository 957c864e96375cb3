//! Health components: the `Damageable` state machine and its optional aggregator.

use std::time::Duration;

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use super::listeners::Listeners;
use crate::common::tunables::Tunables;

/// Classification of an incoming hit, also used as an entity's weakness.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DamageForm {
    #[default]
    NoType,
    Blunt,
    Slash,
}

/// What happened to an entity after its health ran out.
///
/// Exactly one of these follows every death. The choice is made from the
/// configuration at the moment of death.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Death {
    /// The entity is gone for good and will be despawned.
    Removed,
    /// The entity comes back after `respawn_delay`.
    RespawnScheduled,
    /// The entity stays down until something calls [`Damageable::respawn`].
    Inert,
}

/// A lifecycle change recorded by `Damageable`, whoever triggered it.
///
/// Drained by `report_transitions`, which turns them into messages,
/// despawns, and aggregator updates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Died(Death),
    Respawned,
    /// `remove()` outside of a death. `was_down` is true from `Destroyed`/`Respawning`.
    Retired { was_down: bool },
}

/// Runtime lifecycle of a damageable.
///
/// The pending respawn lives inside `Respawning`, so leaving that state (or
/// dropping the component with its entity) cancels it.
#[derive(Debug, Clone)]
pub enum LifeState {
    Alive,
    Destroyed,
    Respawning(Timer),
    Removed,
}

/// Authoring-time settings for a [`Damageable`].
#[derive(Debug, Clone, PartialEq)]
pub struct DamageableConfig {
    pub starting_health: i32,
    pub weakness: DamageForm,
    pub destroy_on_death: bool,
    pub respawn_enabled: bool,
    pub respawn_delay_secs: f32,
}

impl Default for DamageableConfig {
    fn default() -> Self {
        Self {
            starting_health: 1,
            weakness: DamageForm::NoType,
            destroy_on_death: false,
            respawn_enabled: false,
            respawn_delay_secs: 3.0,
        }
    }
}

impl From<&Tunables> for DamageableConfig {
    fn from(tunables: &Tunables) -> Self {
        Self {
            starting_health: tunables.default_starting_health,
            respawn_delay_secs: tunables.default_respawn_delay_secs,
            ..default()
        }
    }
}

/// Health and damage response for a single entity.
///
/// Damage is ignored unless the entity is [`LifeState::Alive`]. When health
/// drops to zero or below the entity dies: health is forced to 0, the
/// `on_destroyed` listeners run, and then it is removed, scheduled for
/// respawn, or left inert.
#[derive(Component, Debug)]
pub struct Damageable {
    current_health: i32,
    starting_health: i32,
    weakness: DamageForm,
    destroy_on_death: bool,
    respawn_enabled: bool,
    respawn_delay: Duration,
    life: LifeState,
    aggregator: Option<Entity>,
    on_destroyed: Listeners,
    on_respawn: Listeners,
    transitions: Vec<Transition>,
}

impl Damageable {
    /// A damageable with `starting_health` (clamped to at least 1) and otherwise
    /// default settings.
    pub fn new(starting_health: i32) -> Self {
        Self::from_config(&DamageableConfig {
            starting_health,
            ..default()
        })
    }

    pub fn from_config(config: &DamageableConfig) -> Self {
        let starting_health = config.starting_health.max(1);
        Self {
            current_health: starting_health,
            starting_health,
            weakness: config.weakness,
            destroy_on_death: config.destroy_on_death,
            respawn_enabled: config.respawn_enabled,
            respawn_delay: delay_from_secs(config.respawn_delay_secs),
            life: LifeState::Alive,
            aggregator: None,
            on_destroyed: Listeners::default(),
            on_respawn: Listeners::default(),
            transitions: Vec::new(),
        }
    }

    pub fn with_weakness(mut self, weakness: DamageForm) -> Self {
        self.weakness = weakness;
        self
    }

    pub fn with_destroy_on_death(mut self, destroy_on_death: bool) -> Self {
        self.destroy_on_death = destroy_on_death;
        self
    }

    /// Enable respawning after `delay_secs` (negative delays clamp to zero).
    pub fn with_respawn(mut self, delay_secs: f32) -> Self {
        self.respawn_enabled = true;
        self.respawn_delay = delay_from_secs(delay_secs);
        self
    }

    /// Inject the health aggregator living on this entity's root.
    pub fn with_aggregator(mut self, aggregator: Entity) -> Self {
        self.aggregator = Some(aggregator);
        self
    }

    #[inline]
    pub fn current_health(&self) -> i32 {
        self.current_health
    }

    #[inline]
    pub fn starting_health(&self) -> i32 {
        self.starting_health
    }

    #[inline]
    pub fn weakness(&self) -> DamageForm {
        self.weakness
    }

    #[inline]
    pub fn destroy_on_death(&self) -> bool {
        self.destroy_on_death
    }

    #[inline]
    pub fn respawn_enabled(&self) -> bool {
        self.respawn_enabled
    }

    #[inline]
    pub fn respawn_delay(&self) -> Duration {
        self.respawn_delay
    }

    #[inline]
    pub fn life(&self) -> &LifeState {
        &self.life
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        matches!(self.life, LifeState::Alive)
    }

    /// True from death until respawn, and forever once removed.
    #[inline]
    pub fn is_destroyed(&self) -> bool {
        !self.is_alive()
    }

    #[inline]
    pub fn aggregator(&self) -> Option<Entity> {
        self.aggregator
    }

    pub fn on_destroyed(&mut self) -> &mut Listeners {
        &mut self.on_destroyed
    }

    pub fn on_respawn(&mut self) -> &mut Listeners {
        &mut self.on_respawn
    }

    /// Only affects deaths that happen after the call.
    pub fn set_destroy_on_death(&mut self, value: bool) {
        self.destroy_on_death = value;
    }

    /// Spawn-time reset. A no-op once the entity has died.
    pub fn initialize(&mut self) {
        if self.is_alive() {
            self.current_health = self.starting_health;
        }
    }

    pub(crate) fn clear_aggregator(&mut self) {
        self.aggregator = None;
    }

    /// Transitions since the last call, oldest first.
    pub fn take_transitions(&mut self) -> Vec<Transition> {
        std::mem::take(&mut self.transitions)
    }

    /// Damage after weakness mitigation: everything when the form matches the
    /// weakness or no weakness is configured, nothing otherwise.
    #[inline]
    pub fn effective_damage(&self, amount: u32, form: DamageForm) -> u32 {
        if self.weakness == DamageForm::NoType || form == self.weakness {
            amount
        } else {
            0
        }
    }

    pub fn apply_typed_damage(&mut self, amount: u32, form: DamageForm) -> Option<Death> {
        if !self.is_alive() {
            return None;
        }
        let applied = self.effective_damage(amount, form);
        self.subtract(applied)
    }

    /// Unmitigated damage (impacts, environment).
    pub fn apply_raw_damage(&mut self, amount: u32) -> Option<Death> {
        if !self.is_alive() {
            return None;
        }
        self.subtract(amount)
    }

    fn subtract(&mut self, amount: u32) -> Option<Death> {
        self.current_health = self.current_health.saturating_sub_unsigned(amount);
        if self.current_health <= 0 {
            self.die()
        } else {
            None
        }
    }

    /// Kill the entity regardless of its health.
    ///
    /// Returns `None` if it was already down.
    pub fn die(&mut self) -> Option<Death> {
        if !self.is_alive() {
            return None;
        }

        self.current_health = 0;
        self.life = LifeState::Destroyed;
        self.on_destroyed.notify();

        let death = if self.destroy_on_death {
            self.life = LifeState::Removed;
            Death::Removed
        } else if self.respawn_enabled {
            self.life = LifeState::Respawning(Timer::new(self.respawn_delay, TimerMode::Once));
            Death::RespawnScheduled
        } else {
            Death::Inert
        };
        self.transitions.push(Transition::Died(death));
        Some(death)
    }

    /// Advance a pending respawn. Returns `true` on the tick that respawns.
    pub fn tick_respawn(&mut self, delta: Duration) -> bool {
        let LifeState::Respawning(timer) = &mut self.life else {
            return false;
        };

        timer.tick(delta);
        if !timer.is_finished() {
            return false;
        }
        self.respawn()
    }

    /// Restore starting health and bring the entity back.
    ///
    /// Works from `Destroyed` (manual reset) and `Respawning`. Returns `false`
    /// when alive or removed.
    pub fn respawn(&mut self) -> bool {
        if matches!(self.life, LifeState::Alive | LifeState::Removed) {
            return false;
        }

        self.current_health = self.starting_health;
        self.life = LifeState::Alive;
        self.on_respawn.notify();
        self.transitions.push(Transition::Respawned);
        true
    }

    /// Permanently retire the entity, dropping any pending respawn.
    ///
    /// The entity is despawned like a `destroy_on_death` death, but without
    /// running the `on_destroyed` listeners. Returns `true` if a respawn was
    /// cancelled.
    pub fn remove(&mut self) -> bool {
        let (was_down, cancelled) = match self.life {
            LifeState::Removed => return false,
            LifeState::Alive => (false, false),
            LifeState::Destroyed => (true, false),
            LifeState::Respawning(_) => (true, true),
        };
        self.life = LifeState::Removed;
        self.transitions.push(Transition::Retired { was_down });
        cancelled
    }
}

#[inline]
fn delay_from_secs(secs: f32) -> Duration {
    // `from_secs_f32` panics on negative or NaN input.
    if secs.is_finite() && secs > 0.0 {
        Duration::from_secs_f32(secs)
    } else {
        Duration::ZERO
    }
}

/// Marker: entity should be removed from the world.
///
/// Set for every damageable that reaches `LifeState::Removed`; despawned in
/// `PostUpdate`.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

/// Bookkeeping for a group of damageables sharing a root entity.
///
/// Members opt in by injecting the root entity via
/// [`Damageable::with_aggregator`]; registration happens once at
/// initialization. Membership is tracked per entity, so repeated reports
/// and members despawned by other code cannot skew the counts.
#[derive(Component, Debug, Default, Clone)]
pub struct HealthAggregator {
    members: HashSet<Entity>,
    down: HashSet<Entity>,
    deaths: u64,
    respawns: u64,
}

impl HealthAggregator {
    #[inline]
    pub fn members(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn down(&self) -> usize {
        self.down.len()
    }

    #[inline]
    pub fn deaths(&self) -> u64 {
        self.deaths
    }

    #[inline]
    pub fn respawns(&self) -> u64 {
        self.respawns
    }

    #[inline]
    pub fn contains(&self, member: Entity) -> bool {
        self.members.contains(&member)
    }

    pub fn register_member(&mut self, member: Entity) {
        self.members.insert(member);
    }

    /// Returns `true` if every remaining member is now down.
    pub fn record_death(&mut self, member: Entity, death: Death) -> bool {
        self.deaths += 1;
        match death {
            // Removed members leave the group instead of counting as down.
            Death::Removed => {
                self.forget(member);
            }
            Death::RespawnScheduled | Death::Inert => {
                if self.members.contains(&member) {
                    self.down.insert(member);
                }
            }
        }
        self.all_down()
    }

    pub fn record_respawn(&mut self, member: Entity) {
        self.respawns += 1;
        self.down.remove(&member);
    }

    /// Drop a member that was retired or despawned. Returns `true` if it was known.
    pub fn forget(&mut self, member: Entity) -> bool {
        self.down.remove(&member);
        self.members.remove(&member)
    }

    #[inline]
    pub fn all_down(&self) -> bool {
        !self.members.is_empty() && self.down.len() >= self.members.len()
    }
}
