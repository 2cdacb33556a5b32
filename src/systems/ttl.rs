//! Despawns entities whose [`Ttl`] ran out this frame.

use bevy_ecs::prelude::*;
use log::trace;

use crate::components::ttl::Ttl;
use crate::resources::worldtime::WorldTime;

pub fn ttl_system(
    time: Res<WorldTime>,
    mut lifetimes: Query<(Entity, &mut Ttl)>,
    mut commands: Commands,
) {
    for (entity, mut ttl) in lifetimes.iter_mut() {
        if ttl.consume(time.delta) {
            trace!("{:?} expired", entity);
            commands.entity(entity).try_despawn();
        }
    }
}
