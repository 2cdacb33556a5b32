//! Trigger activation and task execution.
//!
//! # System Flow
//!
//! 1. The host triggers [`TriggerOverlap`] when something enters a zone.
//!    [`trigger_overlap_observer`] ignores anything but players, resolves the
//!    target by UUID and, if it is alive and active, flips the trigger to
//!    `Triggered` and inserts a [`TriggerTask`] on the zone entity
//! 2. [`trigger_task_system`] counts the task's delay down, then captures
//!    the target's original values (first run only), plans the phases and
//!    steps one phase per frame
//! 3. When the last phase completes the task is removed; repeatable
//!    triggers return to `Idle`
//!
//! The target is re-checked every frame. If it has been despawned or
//! marked [`Inactive`] the task is dropped with a warning: a repeatable
//! trigger goes back to `Idle`, a one-shot trigger stays `Triggered`.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info, warn};

use crate::components::inactive::Inactive;
use crate::components::mapposition::MapPosition;
use crate::components::player::PlayerController;
use crate::components::rigidbody::RigidBody;
use crate::components::scale::Scale;
use crate::components::trigger::{
    CapturedState, TaskPhase, Trigger, TriggerState, TriggerTask, plan_phases,
};
use crate::events::contact::TriggerOverlap;
use crate::resources::registry::EntityRegistry;
use crate::resources::worldtime::WorldTime;
use crate::systems::tween;

pub fn trigger_overlap_observer(
    trigger: On<TriggerOverlap>,
    players: Query<(), With<PlayerController>>,
    mut triggers: Query<(&mut Trigger, Has<TriggerTask>)>,
    targets: Query<Has<Inactive>>,
    registry: Res<EntityRegistry>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if !players.contains(event.other) {
        return;
    }
    let Ok((mut zone, running)) = triggers.get_mut(event.trigger) else {
        return;
    };

    if zone.is_triggered() && (!zone.config.repeat || running) {
        return;
    }

    let uuid = zone.config.target_uuid.clone();
    let Some(entry) = registry.get(&uuid) else {
        warn!("Trigger {:?}: target {} is not registered", event.trigger, uuid);
        return;
    };
    match targets.get(entry.entity) {
        Ok(false) => {}
        Ok(true) => {
            warn!("Trigger {:?}: target {} is inactive", event.trigger, uuid);
            return;
        }
        Err(_) => {
            warn!("Trigger {:?}: target {} no longer exists", event.trigger, uuid);
            return;
        }
    }

    zone.state = TriggerState::Triggered;
    info!(
        "Trigger {:?} activated: {} on {} after {}s",
        event.trigger,
        zone.config.action.name(),
        uuid,
        zone.config.delay
    );
    commands
        .entity(event.trigger)
        .insert(TriggerTask::new(entry.entity, zone.config.delay));
}

fn abort(commands: &mut Commands, entity: Entity, zone: &mut Trigger, reason: &str) {
    warn!(
        "Trigger {:?} aborted: target {} {}",
        entity, zone.config.target_uuid, reason
    );
    commands.entity(entity).remove::<TriggerTask>();
    if zone.config.repeat {
        zone.state = TriggerState::Idle;
    }
}

/// Advance `phase` by `dt`. Returns `Ok(true)` once the phase is complete.
fn step_phase(
    phase: &mut TaskPhase,
    dt: f32,
    position: &mut MapPosition,
    body: Option<&mut RigidBody>,
    scale: Option<&mut Scale>,
) -> Result<bool, &'static str> {
    match phase {
        TaskPhase::Position(tw) => {
            position.pos = tween::step(tw, dt);
            Ok(!tw.playing)
        }
        TaskPhase::Scale(tw) => {
            let scale = scale.ok_or("has no scale")?;
            scale.scale = tween::step(tw, dt);
            Ok(!tw.playing)
        }
        TaskPhase::Drive {
            velocity,
            remaining,
        } => {
            let body = body.ok_or("has no body")?;
            body.velocity = *velocity;
            *remaining -= dt;
            Ok(*remaining <= 0.0)
        }
        TaskPhase::RestoreVelocity(velocity) => {
            let body = body.ok_or("has no body")?;
            body.velocity = *velocity;
            Ok(true)
        }
        TaskPhase::Hold { remaining } => {
            *remaining -= dt;
            Ok(*remaining <= 0.0)
        }
    }
}

#[allow(clippy::type_complexity)]
pub fn trigger_task_system(
    time: Res<WorldTime>,
    mut tasks: Query<(Entity, &mut Trigger, &mut TriggerTask)>,
    mut targets: Query<
        (
            &mut MapPosition,
            Option<&mut RigidBody>,
            Option<&mut Scale>,
            Has<Inactive>,
        ),
        Without<Trigger>,
    >,
    mut commands: Commands,
) {
    let dt = time.delta;
    for (entity, mut zone, mut task) in tasks.iter_mut() {
        if !task.started && task.delay_remaining > 0.0 {
            task.delay_remaining -= dt;
            continue;
        }

        let Ok((mut position, mut body, mut scale, inactive)) = targets.get_mut(task.target)
        else {
            abort(&mut commands, entity, &mut zone, "no longer exists");
            continue;
        };
        if inactive {
            abort(&mut commands, entity, &mut zone, "is inactive");
            continue;
        }

        if !task.started {
            let current_scale = scale.as_ref().map_or(Vec2::ONE, |s| s.scale);
            let captured = *zone.captured.get_or_insert(CapturedState {
                position: position.pos,
                velocity: body.as_ref().map_or(Vec2::ZERO, |b| b.velocity),
                scale: current_scale,
            });
            let dynamic = body.as_ref().is_some_and(|b| b.is_dynamic());
            task.phases = plan_phases(
                &zone.config,
                &captured,
                position.pos,
                current_scale,
                dynamic,
            );
            task.started = true;
            debug!(
                "Trigger {:?} started {} phase(s)",
                entity,
                task.phases.len()
            );
        }

        let Some(phase) = task.phases.front_mut() else {
            commands.entity(entity).remove::<TriggerTask>();
            continue;
        };
        match step_phase(
            phase,
            dt,
            &mut position,
            body.as_deref_mut(),
            scale.as_deref_mut(),
        ) {
            Ok(true) => {
                task.phases.pop_front();
            }
            Ok(false) => {}
            Err(reason) => {
                abort(&mut commands, entity, &mut zone, reason);
                continue;
            }
        }

        if task.phases.is_empty() {
            commands.entity(entity).remove::<TriggerTask>();
            if zone.config.repeat {
                zone.state = TriggerState::Idle;
            }
            debug!("Trigger {:?} finished", entity);
        }
    }
}

/// Force every trigger back to `Idle` and cancel pending tasks.
pub fn reset_triggers(mut triggers: Query<(Entity, &mut Trigger)>, mut commands: Commands) {
    for (entity, mut zone) in triggers.iter_mut() {
        zone.reset();
        commands.entity(entity).remove::<TriggerTask>();
    }
}
