//! Overlap notifications fed in by the host physics.
//!
//! The core does no collision detection. When the host sees the player
//! overlap something interesting it triggers one of these events on the
//! `World`; observers in [`crate::systems`] react:
//!
//! - [`TriggerOverlap`] – activates a trigger zone
//!   ([`crate::systems::trigger::trigger_overlap_observer`])
//! - [`HazardContact`] – damages the player
//!   ([`crate::systems::player::hazard_contact_observer`])
//! - [`ItemContact`] – collects an item
//!   ([`crate::systems::player::item_contact_observer`])
//! - [`GoalContact`] – finishes the level
//!   ([`crate::systems::player::goal_contact_observer`])
//!
//! No ordering guarantees are provided between the two participants.
use bevy_ecs::prelude::*;

/// An entity entered a trigger zone.
#[derive(Event, Debug, Clone, Copy)]
pub struct TriggerOverlap {
    pub trigger: Entity,
    pub other: Entity,
}

/// The player touched something that hurts.
#[derive(Event, Debug, Clone, Copy)]
pub struct HazardContact {
    pub player: Entity,
    pub amount: i32,
}

/// The player touched a collectible.
#[derive(Event, Debug, Clone, Copy)]
pub struct ItemContact {
    pub player: Entity,
    pub item: Entity,
}

/// The player reached the level goal.
#[derive(Event, Debug, Clone, Copy)]
pub struct GoalContact {
    pub player: Entity,
    pub goal: Entity,
}
