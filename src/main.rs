//! Headless platformer runner.
//!
//! Loads a level, plays a scripted input sequence through the core for a
//! number of fixed-size frames and logs every published event. Stands in
//! for the real host: it derives contact flags from the terrain map and
//! detects overlaps with simple box tests.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --level levels/demo.json --frames 900
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{debug, error, info, trace};
use rustc_hash::FxHashSet;

use platformer_core::components::boxcollider::BoxCollider;
use platformer_core::components::mapposition::MapPosition;
use platformer_core::components::pickup::{Goal, Hazard, Item};
use platformer_core::components::player::{PlayerController, PlayerInput};
use platformer_core::components::trigger::Trigger;
use platformer_core::events::bus::EventBus;
use platformer_core::events::contact::{GoalContact, HazardContact, ItemContact, TriggerOverlap};
use platformer_core::events::gameevent::{EventKind, GameEvent};
use platformer_core::game::{build_update_schedule, load_level, setup_session, step};
use platformer_core::level::LevelData;
use platformer_core::resources::gameconfig::GameConfig;
use platformer_core::resources::score::Score;

const DEMO_LEVEL: &str = include_str!("../levels/demo.json");

/// Headless runner for the platformer core
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Level JSON file. Defaults to the config's level, then the built-in demo.
    #[arg(long, value_name = "PATH")]
    level: Option<PathBuf>,

    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of frames to simulate.
    #[arg(long, default_value_t = 900)]
    frames: u32,

    /// Frame delta in seconds. Overrides the config's fixed timestep.
    #[arg(long)]
    dt: Option<f32>,

    /// Write the effective configuration to `--config` and exit.
    #[arg(long)]
    write_config: bool,
}

/// Scripted input for frame `frame` (60 frames per second of script).
fn scripted_input(frame: u32) -> PlayerInput {
    let mut input = PlayerInput {
        right: frame < 700,
        ..Default::default()
    };
    match frame {
        40 | 52 | 300 => input.jump_pressed = true,
        150..=200 => {
            input.right = false;
            input.charge_held = true;
        }
        201 => {
            input.right = false;
            input.charge_released = true;
        }
        _ => {}
    }
    if frame % 90 == 0 {
        input.fire_pressed = true;
    }
    input
}

#[derive(Default)]
struct Overlaps {
    touching: FxHashSet<Entity>,
}

/// Fire contact events for objects the player started overlapping this frame.
fn detect_overlaps(world: &mut World, player: Entity, overlaps: &mut Overlaps) {
    let Some((player_pos, player_box)) = world
        .get::<MapPosition>(player)
        .zip(world.get::<BoxCollider>(player))
        .map(|(p, b)| (p.pos, *b))
    else {
        return;
    };

    let mut now = FxHashSet::default();
    let mut query = world.query::<(
        Entity,
        &MapPosition,
        &BoxCollider,
        Has<Trigger>,
        Option<&Hazard>,
        Has<Item>,
        Has<Goal>,
    )>();
    let mut hits = Vec::new();
    for (entity, pos, collider, is_trigger, hazard, is_item, is_goal) in query.iter(world) {
        if entity == player || !player_box.overlaps(player_pos, collider, pos.pos) {
            continue;
        }
        now.insert(entity);
        if !overlaps.touching.contains(&entity) {
            hits.push((entity, is_trigger, hazard.map(|h| h.damage), is_item, is_goal));
        }
    }

    for (entity, is_trigger, damage, is_item, is_goal) in hits {
        if is_trigger {
            world.trigger(TriggerOverlap {
                trigger: entity,
                other: player,
            });
        }
        if let Some(amount) = damage {
            world.trigger(HazardContact { player, amount });
        }
        if is_item {
            world.trigger(ItemContact {
                player,
                item: entity,
            });
        }
        if is_goal {
            world.trigger(GoalContact {
                player,
                goal: entity,
            });
        }
    }
    world.flush();
    overlaps.touching = now;
}

fn log_all_events(bus: &EventBus) {
    for kind in EventKind::ALL {
        bus.on(kind, move |event| {
            match event {
                GameEvent::PlayerMove { .. } | GameEvent::PlayerIdle => {
                    trace!("{}: {:?}", kind.name(), event)
                }
                _ => debug!("{}: {:?}", kind.name(), event),
            }
            Ok(())
        });
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        info!("Using default configuration ({})", e);
    }
    if let Some(dt) = cli.dt {
        config.fixed_timestep = dt.max(f32::EPSILON);
    }

    if cli.write_config {
        if let Err(e) = config.save_to_file() {
            error!("{}", e);
            std::process::exit(1);
        }
        return;
    }

    let level_path = cli.level.clone().or_else(|| config.level_path.clone());
    let level = match &level_path {
        Some(path) => LevelData::load_from_file(path),
        None => LevelData::from_json(DEMO_LEVEL),
    };
    let level = match level {
        Ok(level) => level,
        Err(e) => {
            error!("Failed to load level {:?}: {}", level_path, e);
            std::process::exit(1);
        }
    };

    let dt = config.fixed_timestep;
    let mut world = World::new();
    let bus = setup_session(&mut world, config);
    log_all_events(&bus);

    let finished = Arc::new(AtomicBool::new(false));
    for kind in [EventKind::GameOver, EventKind::GameVictory] {
        let finished = finished.clone();
        bus.once(kind, move |event| {
            info!("Session finished: {:?}", event);
            finished.store(true, Ordering::SeqCst);
            Ok(())
        });
    }

    let summary = load_level(&mut world, &level);
    let Some(player) = summary.player else {
        error!("Level '{}' has no player", level.name);
        std::process::exit(1);
    };

    let mut schedule = build_update_schedule();
    let mut overlaps = Overlaps::default();
    let mut frame = 0;
    while frame < cli.frames && !finished.load(Ordering::SeqCst) {
        if let Some(mut input) = world.get_mut::<PlayerInput>(player) {
            *input = scripted_input(frame);
        }
        step(&mut world, &mut schedule, dt);
        detect_overlaps(&mut world, player, &mut overlaps);
        world.clear_trackers();
        frame += 1;
    }

    let health = world
        .get::<PlayerController>(player)
        .map(|c| c.health)
        .unwrap_or_default();
    let score = *world.resource::<Score>();
    info!(
        "Ran {} frames: health {}, score {} ({} items)",
        frame, health, score.points, score.items_collected
    );
}
