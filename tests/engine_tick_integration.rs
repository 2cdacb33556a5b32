//! Engine tick integration tests for movement, TTL, timers and terrain contact.

use bevy_ecs::prelude::*;
use glam::Vec2;
use std::sync::{Arc, Mutex};

use platformer_core::components::boxcollider::BoxCollider;
use platformer_core::components::mapposition::MapPosition;
use platformer_core::components::player::BodyContact;
use platformer_core::components::rigidbody::{BodyKind, RigidBody};
use platformer_core::components::timer::Timer;
use platformer_core::components::ttl::Ttl;
use platformer_core::events::bus::EventBus;
use platformer_core::events::gameevent::{EventKind, GameEvent};
use platformer_core::events::timer::TimerEvent;
use platformer_core::resources::terrain::TerrainMap;
use platformer_core::resources::worldtime::WorldTime;
use platformer_core::systems::movement::movement_system;
use platformer_core::systems::terrain::terrain_contact_system;
use platformer_core::systems::timer::{GAME_OVER_SIGNAL, game_over_observer, update_timers};
use platformer_core::systems::ttl::ttl_system;

const EPSILON: f32 = 1e-4;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn make_world(delta: f32) -> World {
    let mut world = World::new();
    world.insert_resource(WorldTime {
        elapsed: 0.0,
        delta,
        time_scale: 1.0,
        frame_count: 0,
    });
    world
}

fn tick_movement(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(movement_system);
    schedule.run(world);
}

fn tick_ttl(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(ttl_system);
    schedule.run(world);
}

fn tick_timers(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(update_timers);
    schedule.run(world);
}

fn tick_terrain(world: &mut World) {
    let mut schedule = Schedule::default();
    schedule.add_systems(terrain_contact_system);
    schedule.run(world);
}

// =============================================================================
// Movement
// =============================================================================

#[test]
fn movement_integrates_velocity() {
    let mut world = make_world(0.5);
    let mut body = RigidBody::with_kind(BodyKind::Kinematic);
    body.velocity = Vec2::new(10.0, -4.0);
    let e = world.spawn((MapPosition::new(0.0, 0.0), body)).id();

    tick_movement(&mut world);

    let pos = world.get::<MapPosition>(e).unwrap();
    assert!(approx_eq(pos.pos.x, 5.0));
    assert!(approx_eq(pos.pos.y, -2.0));
}

#[test]
fn movement_applies_gravity_and_caps_fall_speed() {
    let mut world = make_world(1.0);
    let mut body = RigidBody::with_kind(BodyKind::Dynamic);
    body.add_force("gravity", Vec2::new(0.0, 980.0));
    body.max_fall_speed = Some(300.0);
    let e = world.spawn((MapPosition::new(0.0, 0.0), body)).id();

    tick_movement(&mut world);

    let body = world.get::<RigidBody>(e).unwrap();
    assert!(approx_eq(body.velocity.y, 300.0));
    assert!(approx_eq(world.get::<MapPosition>(e).unwrap().pos.y, 300.0));
}

#[test]
fn movement_skips_frozen_bodies() {
    let mut world = make_world(1.0);
    let mut body = RigidBody::with_kind(BodyKind::Dynamic);
    body.add_force("gravity", Vec2::new(0.0, 980.0));
    body.freeze();
    let e = world.spawn((MapPosition::new(3.0, 4.0), body)).id();

    tick_movement(&mut world);

    assert_eq!(world.get::<MapPosition>(e).unwrap().pos, Vec2::new(3.0, 4.0));
    assert_eq!(world.get::<RigidBody>(e).unwrap().velocity, Vec2::ZERO);
}

// =============================================================================
// TTL
// =============================================================================

#[test]
fn ttl_despawns_when_expired() {
    let mut world = make_world(0.4);
    let short = world.spawn(Ttl::new(0.5)).id();
    let long = world.spawn(Ttl::new(2.0)).id();

    tick_ttl(&mut world);
    assert!(world.get_entity(short).is_ok());

    tick_ttl(&mut world);
    assert!(world.get_entity(short).is_err());
    assert!(world.get_entity(long).is_ok());
}

// =============================================================================
// Timers
// =============================================================================

#[test]
fn timer_fires_once_and_is_removed() {
    let mut world = make_world(0.5);
    let fired = Arc::new(Mutex::new(Vec::new()));
    let sink = fired.clone();
    world.add_observer(move |trigger: On<TimerEvent>| {
        sink.lock().unwrap().push(trigger.event().signal.clone());
    });
    world.flush();
    let e = world.spawn(Timer::new(1.0, "ding")).id();

    tick_timers(&mut world);
    assert!(fired.lock().unwrap().is_empty());

    tick_timers(&mut world);
    assert_eq!(*fired.lock().unwrap(), vec!["ding".to_string()]);
    assert!(world.get::<Timer>(e).is_none());

    tick_timers(&mut world);
    assert_eq!(fired.lock().unwrap().len(), 1);
}

#[test]
fn game_over_timer_publishes_game_over() {
    let mut world = make_world(1.0);
    let bus = EventBus::new();
    world.insert_resource(bus.clone());
    world.add_observer(game_over_observer);
    world.flush();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    bus.on(EventKind::GameOver, move |e| {
        sink.lock().unwrap().push(e.clone());
        Ok(())
    });

    world.spawn(Timer::new(0.5, "something_else"));
    world.spawn(Timer::new(0.5, GAME_OVER_SIGNAL));
    tick_timers(&mut world);

    assert_eq!(
        *seen.lock().unwrap(),
        vec![GameEvent::GameOver {
            reason: Some("player_died".to_string())
        }]
    );
}

// =============================================================================
// Terrain contact
// =============================================================================

#[test]
fn terrain_contact_reports_walls_and_stops_horizontal_push() {
    let mut world = make_world(0.016);
    world.insert_resource(TerrainMap::with_tiles(16.0, [(3, 0)]));
    let mut body = RigidBody::with_kind(BodyKind::Dynamic);
    body.velocity = Vec2::new(120.0, 0.0);
    let e = world
        .spawn((
            MapPosition::new(32.0, 0.0),
            body,
            BoxCollider::new(16.0, 16.0),
            BodyContact::default(),
        ))
        .id();

    tick_terrain(&mut world);

    let contact = world.get::<BodyContact>(e).unwrap();
    assert!(contact.wall_right);
    assert!(!contact.wall_left);
    assert!(!contact.grounded);
    assert_eq!(world.get::<RigidBody>(e).unwrap().velocity.x, 0.0);
}

#[test]
fn terrain_contact_clears_flags_when_airborne() {
    let mut world = make_world(0.016);
    world.insert_resource(TerrainMap::with_tiles(16.0, [(0, 5)]));
    let e = world
        .spawn((
            MapPosition::new(0.0, 0.0),
            RigidBody::with_kind(BodyKind::Dynamic),
            BoxCollider::new(16.0, 16.0),
            BodyContact {
                grounded: true,
                wall_left: true,
                wall_right: true,
            },
        ))
        .id();

    tick_terrain(&mut world);

    assert_eq!(*world.get::<BodyContact>(e).unwrap(), BodyContact::default());
}
