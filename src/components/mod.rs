//! ECS components for entities.
//!
//! Submodules overview:
//! - [`boxcollider`] – axis-aligned box extents used for terrain checks
//! - [`inactive`] – marker for objects triggers must not act on
//! - [`mapposition`] – world-space position (pivot) for an entity
//! - [`persistent`] – marker for entities that survive level loads
//! - [`pickup`] – hazards, items, the goal and projectiles
//! - [`player`] – the player state machine, its input and contact flags
//! - [`rigidbody`] – velocity, body kind and named acceleration forces
//! - [`scale`] – 2D scale factor
//! - [`timer`] – one-shot countdown that triggers an event when finished
//! - [`trigger`] – trigger zones and their scheduled tasks
//! - [`ttl`] – time-to-live for automatic despawning
//! - [`tween`] – interpolation data for position and scale

pub mod boxcollider;
pub mod inactive;
pub mod mapposition;
pub mod persistent;
pub mod pickup;
pub mod player;
pub mod rigidbody;
pub mod scale;
pub mod timer;
pub mod trigger;
pub mod ttl;
pub mod tween;
