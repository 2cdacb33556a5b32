//! Session setup and level lifecycle.
//!
//! A session is one `World` holding the per-session resources (bus,
//! registry, clock, config, terrain, score) and the observers that react to
//! host overlap events. Levels are spawned into it from [`LevelData`]:
//!
//! 1. [`setup_session`] once
//! 2. [`load_level`] for each level (and [`restart_level`] after game over)
//! 3. every frame: [`step`] with the frame delta
//!
//! Loading a level clears the [`EntityRegistry`] and despawns every level
//! object not marked [`Persistent`], so no identity leaks from one level into
//! the next.

use bevy_ecs::prelude::*;
use bevy_ecs::system::RunSystemOnce;
use glam::Vec2;
use log::{info, warn};

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::persistent::Persistent;
use crate::components::pickup::{Goal, Hazard, Item};
use crate::components::player::{BodyContact, PlayerController, PlayerInput};
use crate::components::rigidbody::{BodyKind, RigidBody};
use crate::components::scale::Scale;
use crate::components::trigger::Trigger;
use crate::events::bus::EventBus;
use crate::events::gameevent::GameEvent;
use crate::level::{self, LevelData, LevelObject, PropertyError};
use crate::resources::gameconfig::GameConfig;
use crate::resources::registry::EntityRegistry;
use crate::resources::score::Score;
use crate::resources::terrain::TerrainMap;
use crate::resources::worldtime::WorldTime;
use crate::systems::movement::movement_system;
use crate::systems::player::{
    goal_contact_observer, hazard_contact_observer, item_contact_observer,
    player_controller_system,
};
use crate::systems::terrain::terrain_contact_system;
use crate::systems::time::update_world_time;
use crate::systems::timer::{game_over_observer, update_timers};
use crate::systems::trigger::{reset_triggers, trigger_overlap_observer, trigger_task_system};
use crate::systems::ttl::ttl_system;

/// Name of the acceleration force players fall with.
pub const GRAVITY_FORCE: &str = "gravity";

/// What [`load_level`] did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelSummary {
    pub spawned: usize,
    pub skipped: usize,
    pub player: Option<Entity>,
}

/// Insert the session resources and observers. Returns the bus handle.
pub fn setup_session(world: &mut World, config: GameConfig) -> EventBus {
    let bus = EventBus::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(bus.clone());
    world.insert_resource(EntityRegistry::new());
    world.insert_resource(TerrainMap::default());
    world.insert_resource(Score::default());
    world.insert_resource(config);

    world.add_observer(trigger_overlap_observer);
    world.add_observer(hazard_contact_observer);
    world.add_observer(item_contact_observer);
    world.add_observer(goal_contact_observer);
    world.add_observer(game_over_observer);

    bus
}

/// Per-frame schedule. The host runs it once per frame after
/// [`update_world_time`].
///
/// Terrain contact resolves after movement, so the controller reads the
/// flags of the position it ended the previous frame at.
pub fn build_update_schedule() -> Schedule {
    let mut update = Schedule::default();
    update.add_systems(
        (
            player_controller_system,
            trigger_task_system,
            movement_system,
            terrain_contact_system,
            ttl_system,
            update_timers,
        )
            .chain(),
    );
    update
}

/// Advance the session by one frame of `dt` seconds.
pub fn step(world: &mut World, schedule: &mut Schedule, dt: f32) {
    update_world_time(world, dt);
    schedule.run(world);
}

/// Replace the current level with `level`.
///
/// Objects whose properties fail to parse are logged and skipped; the rest
/// of the level still loads.
pub fn load_level(world: &mut World, level: &LevelData) -> LevelSummary {
    world.resource_mut::<EntityRegistry>().clear();

    let stale: Vec<Entity> = world
        .query_filtered::<Entity, (With<MapPosition>, Without<Persistent>)>()
        .iter(world)
        .collect();
    for entity in &stale {
        world.despawn(*entity);
    }

    world.insert_resource(TerrainMap::with_tiles(
        level.tile_size,
        level.solid_tiles.iter().copied(),
    ));
    world.insert_resource(Score::default());

    let config = world.get_resource::<GameConfig>().cloned().unwrap_or_default();
    let mut summary = LevelSummary::default();
    for obj in &level.objects {
        match spawn_object(world, obj, &config) {
            Ok(Some(entity)) => {
                summary.spawned += 1;
                if obj.kind == "player" {
                    summary.player = Some(entity);
                }
            }
            Ok(None) => summary.skipped += 1,
            Err(e) => {
                warn!(
                    "Skipping {} '{}' ({}): {}",
                    obj.kind,
                    obj.name.as_deref().unwrap_or(""),
                    obj.uuid,
                    e
                );
                summary.skipped += 1;
            }
        }
    }

    info!(
        "Loaded level '{}': {} objects, {} skipped, {} solid tiles",
        level.name,
        summary.spawned,
        summary.skipped,
        level.solid_tiles.len()
    );
    if let Some(bus) = world.get_resource::<EventBus>() {
        bus.emit(GameEvent::GameStart);
    }
    summary
}

/// Start `level` over: triggers reset, objects respawned, score cleared.
pub fn restart_level(world: &mut World, level: &LevelData) -> LevelSummary {
    if let Err(e) = world.run_system_once(reset_triggers) {
        warn!("Trigger reset failed: {}", e);
    }
    load_level(world, level)
}

/// Spawn one level object and register it. `Ok(None)` for unknown kinds.
pub fn spawn_object(
    world: &mut World,
    obj: &LevelObject,
    config: &GameConfig,
) -> Result<Option<Entity>, PropertyError> {
    let base = (
        MapPosition::new(obj.x, obj.y),
        BoxCollider::new(obj.width, obj.height),
        Scale::default(),
    );

    let entity = match obj.kind.as_str() {
        "player" => {
            let settings = level::parse_player(&obj.properties)?;
            let mut tuning = config.player.clone();
            if let Some(max_health) = settings.max_health {
                tuning.max_health = max_health;
            }
            let mut body = RigidBody::with_kind(BodyKind::Dynamic);
            body.add_force(GRAVITY_FORCE, Vec2::new(0.0, config.gravity));
            body.max_fall_speed = Some(config.max_fall_speed);
            world
                .spawn((
                    base,
                    body,
                    PlayerController::new(tuning),
                    PlayerInput::default(),
                    BodyContact::default(),
                ))
                .id()
        }
        "trigger" => {
            let trigger = Trigger::new(level::parse_trigger(&obj.properties)?);
            world.spawn((base, trigger)).id()
        }
        "platform" => {
            let body = level::parse_body(&obj.properties)?;
            let mut rb = RigidBody::with_kind(body.kind);
            if body.kind == BodyKind::Dynamic {
                rb.add_force(GRAVITY_FORCE, Vec2::new(0.0, config.gravity));
                rb.max_fall_speed = Some(config.max_fall_speed);
            }
            world.spawn((base, rb)).id()
        }
        "hazard" => {
            let damage = level::parse_hazard_damage(&obj.properties)?;
            world.spawn((base, Hazard { damage })).id()
        }
        "goal" => world.spawn((base, Goal::default())).id(),
        "item" => {
            let item = level::parse_item(&obj.properties)?;
            world
                .spawn((
                    base,
                    Item {
                        item_type: item.item_type,
                        value: item.value,
                    },
                ))
                .id()
        }
        "decoration" => world.spawn(base).id(),
        other => {
            warn!("Unknown object kind '{}' ({})", other, obj.uuid);
            return Ok(None);
        }
    };

    world.resource_mut::<EntityRegistry>().register(
        &obj.uuid,
        entity,
        obj.kind.clone(),
        obj.name.clone(),
    );
    Ok(Some(entity))
}
