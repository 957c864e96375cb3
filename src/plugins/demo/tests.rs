use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::health::{Damage, DamageForm, DamageRequest, Damageable, HealthAggregator};

use super::{DemoTarget, Rock};
use crate::common::test_utils::set_time_delta;
use crate::plugins::health::ContactDamage;

fn world_with_tunables(targets: usize) -> World {
    let mut world = World::new();
    world.insert_resource(Tunables { demo_targets: targets, ..default() });
    world
}

#[test]
fn spawns_targets_under_an_aggregating_rack() {
    let mut world = world_with_tunables(4);
    run_system_once(&mut world, super::spawn_targets);

    let rack = world
        .query_filtered::<Entity, With<HealthAggregator>>()
        .single(&world)
        .expect("one rack");

    let targets: Vec<_> = world
        .query_filtered::<(&Damageable, &ChildOf), With<DemoTarget>>()
        .iter(&world)
        .map(|(dmg, parent)| {
            assert_eq!(parent.parent(), rack);
            assert_eq!(dmg.aggregator(), Some(rack));
            (dmg.weakness(), dmg.destroy_on_death())
        })
        .collect();

    assert_eq!(targets.len(), 4);
    assert_eq!(targets.iter().filter(|(_, removable)| *removable).count(), 1);
    assert!(targets.iter().any(|(w, _)| *w == DamageForm::Slash));
}

#[test]
fn number_key_hits_every_target() {
    let mut world = World::new();
    world.init_resource::<Messages<DamageRequest>>();
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::Digit2);
    world.insert_resource(keys);

    let a = world.spawn(DemoTarget).id();
    let b = world.spawn(DemoTarget).id();

    run_system_once(&mut world, super::hit_targets_from_keys);

    let mut reqs: Vec<_> = world.resource_mut::<Messages<DamageRequest>>().drain().collect();
    reqs.sort_by_key(|r| r.target);
    assert_eq!(reqs.len(), 2);
    let mut expected = [a, b];
    expected.sort();
    for (req, e) in reqs.iter().zip(expected) {
        assert_eq!(req.target, e);
        assert_eq!(req.damage, Damage::Typed { amount: 1, form: DamageForm::Slash });
    }
}

#[test]
fn no_key_no_requests() {
    let mut world = World::new();
    world.init_resource::<Messages<DamageRequest>>();
    world.init_resource::<ButtonInput<KeyCode>>();
    world.spawn(DemoTarget);

    run_system_once(&mut world, super::hit_targets_from_keys);

    assert!(world.resource_mut::<Messages<DamageRequest>>().drain().next().is_none());
}

#[test]
fn destroyed_targets_are_hidden_until_respawn() {
    let mut world = World::new();
    let e = world
        .spawn((DemoTarget, Damageable::new(1).with_respawn(1.0), Visibility::Inherited))
        .id();

    world.get_mut::<Damageable>(e).unwrap().die();
    run_system_once(&mut world, super::sync_target_visibility);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Hidden);

    world.get_mut::<Damageable>(e).unwrap().respawn();
    run_system_once(&mut world, super::sync_target_visibility);
    assert_eq!(*world.get::<Visibility>(e).unwrap(), Visibility::Inherited);
}

#[test]
fn rock_key_drops_a_hazard_on_each_standing_target() {
    let mut world = World::new();
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(KeyCode::KeyR);
    world.insert_resource(keys);

    world.spawn((DemoTarget, Damageable::new(3), GlobalTransform::default()));
    let down = world
        .spawn((DemoTarget, Damageable::new(3).with_respawn(1.0), GlobalTransform::default()))
        .id();
    world.get_mut::<Damageable>(down).unwrap().die();

    run_system_once(&mut world, super::drop_rocks);

    let rocks: Vec<_> = world
        .query_filtered::<&ContactDamage, With<Rock>>()
        .iter(&world)
        .map(|c| c.damage())
        .collect();
    assert_eq!(rocks, vec![Damage::Raw { amount: 1 }]);
}

#[test]
fn rocks_expire() {
    let mut world = World::new();
    let rock = world
        .spawn(Rock(Timer::from_seconds(2.0, TimerMode::Once)))
        .id();

    set_time_delta(&mut world, 1.0);
    run_system_once(&mut world, super::expire_rocks);
    assert!(world.get_entity(rock).is_ok());

    set_time_delta(&mut world, 1.5);
    run_system_once(&mut world, super::expire_rocks);
    assert!(world.get_entity(rock).is_err());
}
