//! Level object markers the player interacts with.
//!
//! These carry the data the contact observers in
//! [`crate::systems::player`] need: what a hazard costs, what an item is
//! worth, and which projectile came from where.

use bevy_ecs::prelude::{Component, Entity};

/// Damages the player on contact.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hazard {
    pub damage: i32,
}

/// Collectible. Items of type `"health"` heal by `value`; everything else
/// adds `value` to the score.
#[derive(Component, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub item_type: String,
    pub value: i32,
}

/// Level exit. `reached` latches so victory is announced once.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Goal {
    pub reached: bool,
}

/// Shot fired by the player.
#[derive(Component, Clone, Copy, Debug)]
pub struct Projectile {
    pub owner: Entity,
}
