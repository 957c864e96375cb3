//! Demo plugin: a rack of training targets you can hit from the keyboard.
//!
//! Keys (every target is hit at once):
//! - `1` blunt hit, `2` slash hit, `3` raw hit, `K` kill.
//! - `R` drops a rock on every standing target; it hits through contact damage.
//!
//! Targets cycle through weaknesses. All but the last respawn; the last one is
//! removed for good when it dies. The demo hides destroyed targets until they
//! come back.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::health::{
    ContactDamage, DamageForm, DamageRequest, Damageable, DamageableConfig, HealthAggregator,
};

const HIT: u32 = 1;
const SPACING: f32 = 160.0;
const RADIUS: f32 = 24.0;
const ROCK_RADIUS: f32 = 8.0;
const ROCK_DROP: f32 = 120.0;
const ROCK_SPEED: f32 = 300.0;
const ROCK_LIFETIME_SECS: f32 = 2.0;

#[derive(Component, Debug, Clone, Copy)]
pub struct DemoTarget;

/// A falling hazard; despawned when its timer runs out.
#[derive(Component, Debug)]
pub struct Rock(Timer);

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), (spawn_camera, spawn_targets));
    app.add_systems(
        Update,
        (hit_targets_from_keys, drop_rocks, expire_rocks).run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        PostUpdate,
        sync_target_visibility.run_if(in_state(GameState::InGame)),
    );
}

#[inline]
fn weakness_for(i: usize) -> DamageForm {
    match i % 3 {
        0 => DamageForm::NoType,
        1 => DamageForm::Blunt,
        _ => DamageForm::Slash,
    }
}

#[inline]
fn color_for(weakness: DamageForm) -> Color {
    match weakness {
        DamageForm::NoType => Color::srgb(0.7, 0.7, 0.72),
        DamageForm::Blunt => Color::srgb(0.95, 0.55, 0.2),
        DamageForm::Slash => Color::srgb(0.25, 0.8, 0.75),
    }
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((Name::new("DemoCamera"), Camera2d, DespawnOnExit(GameState::InGame)));
}

/// Spawn the rack (aggregator root) and its targets.
fn spawn_targets(mut commands: Commands, tunables: Res<Tunables>) {
    let rack = commands
        .spawn((
            Name::new("TargetRack"),
            HealthAggregator::default(),
            Transform::default(),
            Visibility::default(),
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    let n = tunables.demo_targets;
    let left = -SPACING * (n.saturating_sub(1)) as f32 * 0.5;
    let layers = CollisionLayers::new(Layer::Target, [Layer::Hazard]);

    for i in 0..n {
        let weakness = weakness_for(i);
        let last = i + 1 == n;
        let defaults = DamageableConfig::from(&*tunables);
        let config = DamageableConfig {
            starting_health: defaults.starting_health.max(3),
            weakness,
            destroy_on_death: last,
            respawn_enabled: true,
            ..defaults
        };

        let label = format!("Target{i}");
        let mut dmg = Damageable::from_config(&config).with_aggregator(rack);
        let on_down = label.clone();
        dmg.on_destroyed().subscribe(move || info!("{on_down} destroyed"));
        let on_up = label.clone();
        dmg.on_respawn().subscribe(move || info!("{on_up} respawned"));

        commands.spawn((
            Name::new(label),
            DemoTarget,
            dmg,
            Sprite {
                color: color_for(weakness),
                custom_size: Some(Vec2::splat(RADIUS * 2.0)),
                ..default()
            },
            Transform::from_xyz(left + SPACING * i as f32, 0.0, 1.0),
            RigidBody::Static,
            Collider::circle(RADIUS),
            layers,
            ChildOf(rack),
        ));
    }
}

fn hit_targets_from_keys(
    keys: Res<ButtonInput<KeyCode>>,
    q: Query<Entity, With<DemoTarget>>,
    mut requests: MessageWriter<DamageRequest>,
) {
    let make: fn(Entity) -> DamageRequest = if keys.just_pressed(KeyCode::Digit1) {
        |e| DamageRequest::typed(e, HIT, DamageForm::Blunt)
    } else if keys.just_pressed(KeyCode::Digit2) {
        |e| DamageRequest::typed(e, HIT, DamageForm::Slash)
    } else if keys.just_pressed(KeyCode::Digit3) {
        |e| DamageRequest::raw(e, HIT)
    } else if keys.just_pressed(KeyCode::KeyK) {
        DamageRequest::kill
    } else {
        return;
    };

    requests.write_batch(q.iter().map(make));
}

fn drop_rocks(
    mut commands: Commands,
    keys: Res<ButtonInput<KeyCode>>,
    q: Query<(&Damageable, &GlobalTransform), With<DemoTarget>>,
) {
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }

    let layers = CollisionLayers::new(Layer::Hazard, [Layer::Target]);
    for (dmg, at) in &q {
        if dmg.is_destroyed() {
            continue;
        }
        let origin = at.translation().truncate() + Vec2::Y * ROCK_DROP;
        commands.spawn((
            Name::new("Rock"),
            Rock(Timer::from_seconds(ROCK_LIFETIME_SECS, TimerMode::Once)),
            ContactDamage::raw(HIT),
            Sprite {
                color: Color::srgb(0.45, 0.4, 0.35),
                custom_size: Some(Vec2::splat(ROCK_RADIUS * 2.0)),
                ..default()
            },
            Transform::from_translation(origin.extend(2.0)),
            RigidBody::Dynamic,
            Collider::circle(ROCK_RADIUS),
            LinearVelocity(Vec2::NEG_Y * ROCK_SPEED),
            layers,
            DespawnOnExit(GameState::InGame),
        ));
    }
}

fn expire_rocks(mut commands: Commands, time: Res<Time>, mut q: Query<(Entity, &mut Rock)>) {
    for (e, mut rock) in &mut q {
        if rock.0.tick(time.delta()).is_finished() {
            commands.entity(e).despawn();
        }
    }
}

/// Hide destroyed targets until they respawn.
fn sync_target_visibility(
    mut q: Query<(&Damageable, &mut Visibility), (With<DemoTarget>, Changed<Damageable>)>,
) {
    for (dmg, mut vis) in &mut q {
        *vis = if dmg.is_destroyed() {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }
}

#[cfg(test)]
mod tests;
