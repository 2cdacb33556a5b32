//! Player systems and contact observers.
//!
//! - [`player_controller_system`] runs one [`PlayerController::tick`] per
//!   player per frame, checks for terrain embedding and spawns projectiles
//! - [`hazard_contact_observer`] applies damage and schedules game over on
//!   death
//! - [`item_contact_observer`] / [`goal_contact_observer`] handle pickups
//!   and the level exit
//!
//! All domain notifications go out through the [`EventBus`] resource.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::pickup::{Goal, Item, Projectile};
use crate::components::player::{BodyContact, DamageOutcome, PlayerController, PlayerInput};
use crate::components::rigidbody::{BodyKind, RigidBody};
use crate::components::timer::Timer;
use crate::components::ttl::Ttl;
use crate::events::bus::EventBus;
use crate::events::contact::{GoalContact, HazardContact, ItemContact};
use crate::events::gameevent::GameEvent;
use crate::resources::registry::EntityRegistry;
use crate::resources::score::Score;
use crate::resources::terrain::TerrainMap;
use crate::resources::worldtime::WorldTime;
use crate::systems::timer::GAME_OVER_SIGNAL;

const PROJECTILE_SIZE: f32 = 4.0;

#[allow(clippy::type_complexity)]
pub fn player_controller_system(
    time: Res<WorldTime>,
    bus: Res<EventBus>,
    terrain: Option<Res<TerrainMap>>,
    mut players: Query<(
        Entity,
        &mut PlayerController,
        &mut PlayerInput,
        &BodyContact,
        &mut RigidBody,
        &MapPosition,
        Option<&BoxCollider>,
    )>,
    mut commands: Commands,
) {
    for (entity, mut ctrl, mut input, contact, mut body, position, collider) in players.iter_mut()
    {
        if let (false, Some(terrain), Some(collider)) = (ctrl.dead, terrain.as_deref(), collider) {
            if ctrl.stuck_check_due(time.delta) {
                let (min, max) = collider.aabb(position.pos);
                ctrl.set_stuck(terrain.overlaps_solid(min, max));
            }
        }

        let shot = ctrl.tick(
            entity,
            &input,
            contact,
            &mut body,
            time.delta,
            time.elapsed,
            &bus,
        );
        input.clear_edges();

        if let Some(shot) = shot {
            debug!("Projectile fired at {:?}", shot.velocity);
            let mut projectile_body = RigidBody::with_kind(BodyKind::Dynamic);
            projectile_body.velocity = shot.velocity;
            commands.spawn((
                Projectile { owner: entity },
                MapPosition { pos: position.pos },
                projectile_body,
                BoxCollider::centered(PROJECTILE_SIZE, PROJECTILE_SIZE),
                Ttl::new(shot.lifetime),
            ));
        }
    }
}

pub fn hazard_contact_observer(
    trigger: On<HazardContact>,
    bus: Res<EventBus>,
    mut players: Query<(&mut PlayerController, &mut RigidBody, Option<&BodyContact>)>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let Ok((mut ctrl, mut body, contact)) = players.get_mut(event.player) else {
        return;
    };
    let grounded = contact.is_some_and(|c| c.grounded);
    if ctrl.take_damage(event.amount, grounded, &mut body, &bus) == DamageOutcome::Died {
        commands
            .entity(event.player)
            .insert(Timer::new(ctrl.tuning.game_over_delay, GAME_OVER_SIGNAL));
    }
}

/// Apply `item` to the player and score. Returns false if the player is dead.
pub fn collect_item(
    ctrl: &mut PlayerController,
    score: &mut Score,
    item: &Item,
    bus: &EventBus,
) -> bool {
    if ctrl.dead {
        return false;
    }
    if item.item_type == "health" {
        ctrl.heal(item.value);
    } else {
        score.add(item.value);
    }
    bus.emit(GameEvent::ItemCollect {
        item_type: item.item_type.clone(),
        value: item.value,
    });
    bus.emit(GameEvent::sound("collect"));
    true
}

pub fn item_contact_observer(
    trigger: On<ItemContact>,
    bus: Res<EventBus>,
    items: Query<&Item>,
    mut players: Query<&mut PlayerController>,
    mut score: ResMut<Score>,
    mut registry: ResMut<EntityRegistry>,
    mut commands: Commands,
) {
    let event = trigger.event();
    let (Ok(item), Ok(mut ctrl)) = (items.get(event.item), players.get_mut(event.player)) else {
        return;
    };
    if !collect_item(&mut ctrl, &mut score, item, &bus) {
        return;
    }
    if let Some(id) = registry.get_id_for(event.item).cloned() {
        registry.unregister(id.as_str());
    }
    commands.entity(event.item).try_despawn();
}

pub fn goal_contact_observer(
    trigger: On<GoalContact>,
    bus: Res<EventBus>,
    players: Query<&PlayerController>,
    mut goals: Query<&mut Goal>,
    score: Res<Score>,
) {
    let event = trigger.event();
    let Ok(ctrl) = players.get(event.player) else {
        return;
    };
    let Ok(mut goal) = goals.get_mut(event.goal) else {
        return;
    };
    if ctrl.dead || goal.reached {
        return;
    }
    goal.reached = true;
    info!("Goal reached with {} points", score.points);
    bus.emit(GameEvent::GoalReached);
    bus.emit(GameEvent::GameVictory {
        score: Some(score.points),
    });
}

/// Bring a player back to life at `position` and cancel a pending game over.
pub fn respawn_player(world: &mut World, player: Entity, position: Vec2) -> bool {
    let Some(bus) = world.get_resource::<EventBus>().cloned() else {
        return false;
    };
    let Ok(mut entity) = world.get_entity_mut(player) else {
        return false;
    };
    entity.remove::<Timer>();
    let Some(mut body) = entity.get::<RigidBody>().cloned() else {
        return false;
    };
    let Some(mut ctrl) = entity.get_mut::<PlayerController>() else {
        return false;
    };
    ctrl.respawn(&mut body, position, &bus);
    entity.insert((body, MapPosition { pos: position }, PlayerInput::default()));
    true
}
