//! Contact probe against the [`TerrainMap`].
//!
//! Produces the per-tick [`BodyContact`] flags a physics engine would
//! report, using thin probe strips around each collider. Bodies falling into
//! the floor or pushing into a wall are snapped back to the tile edge and
//! have that velocity component cleared. Only meant for the headless runner
//! and tests; a real host writes `BodyContact` itself.

use bevy_ecs::prelude::*;
use glam::Vec2;

use crate::components::boxcollider::BoxCollider;
use crate::components::mapposition::MapPosition;
use crate::components::player::BodyContact;
use crate::components::rigidbody::RigidBody;
use crate::resources::terrain::TerrainMap;

const PROBE: f32 = 1.0;

/// Fresh contact flags for a box `[min, max]`.
pub fn probe_contacts(terrain: &TerrainMap, min: Vec2, max: Vec2) -> BodyContact {
    BodyContact {
        grounded: terrain.overlaps_solid(Vec2::new(min.x, max.y), Vec2::new(max.x, max.y + PROBE)),
        wall_left: terrain.overlaps_solid(Vec2::new(min.x - PROBE, min.y), Vec2::new(min.x, max.y)),
        wall_right: terrain.overlaps_solid(Vec2::new(max.x, min.y), Vec2::new(max.x + PROBE, max.y)),
    }
}

pub fn terrain_contact_system(
    terrain: Res<TerrainMap>,
    mut query: Query<(
        &mut MapPosition,
        &mut RigidBody,
        &BoxCollider,
        &mut BodyContact,
    )>,
) {
    let ts = terrain.tile_size;
    for (mut position, mut body, collider, mut contact) in query.iter_mut() {
        if body.frozen {
            continue;
        }
        let (min, max) = collider.aabb(position.pos);
        let mut flags = probe_contacts(&terrain, min, max);

        // Embedded less than a tile into the floor: push up onto it.
        let floor_top = (max.y / ts).floor() * ts;
        if body.velocity.y >= 0.0
            && max.y > floor_top
            && terrain.overlaps_solid(Vec2::new(min.x, floor_top), max)
            && !terrain.overlaps_solid(min, Vec2::new(max.x, floor_top))
        {
            position.pos.y -= max.y - floor_top;
            flags.grounded = true;
        }
        if flags.grounded && body.velocity.y > 0.0 {
            body.velocity.y = 0.0;
        }
        if (flags.wall_left && body.velocity.x < 0.0) || (flags.wall_right && body.velocity.x > 0.0)
        {
            body.velocity.x = 0.0;
        }
        *contact = flags;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_grounded_on_floor() {
        let terrain = TerrainMap::with_tiles(16.0, [(0, 2), (1, 2)]);
        let c = probe_contacts(&terrain, Vec2::new(4.0, 16.0), Vec2::new(20.0, 32.0));
        assert!(c.grounded);
        assert!(!c.wall_left && !c.wall_right);
    }

    #[test]
    fn test_probe_walls() {
        let terrain = TerrainMap::with_tiles(16.0, [(0, 1), (3, 1)]);
        let c = probe_contacts(&terrain, Vec2::new(16.0, 16.0), Vec2::new(48.0, 31.0));
        assert!(c.wall_left);
        assert!(c.wall_right);
        assert!(!c.grounded);
    }

    #[test]
    fn test_contact_system_snaps_onto_floor() {
        let mut world = World::new();
        world.insert_resource(TerrainMap::with_tiles(16.0, [(0, 2)]));
        let mut body = RigidBody::new();
        body.velocity.y = 300.0;
        let e = world
            .spawn((
                MapPosition::new(0.0, 20.0),
                body,
                BoxCollider::new(16.0, 16.0),
                BodyContact::default(),
            ))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(terrain_contact_system);
        schedule.run(&mut world);

        let pos = world.get::<MapPosition>(e).unwrap();
        assert!((pos.pos.y - 16.0).abs() < 1e-4);
        assert!(world.get::<BodyContact>(e).unwrap().grounded);
        assert_eq!(world.get::<RigidBody>(e).unwrap().velocity.y, 0.0);
    }
}
