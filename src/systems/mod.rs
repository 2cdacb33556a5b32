//! Core systems and observers.
//!
//! Submodules overview
//! - [`movement`] – integrate positions from rigid body velocities and time
//! - [`player`] – player controller tick and contact observers
//! - [`terrain`] – contact flags and floor snapping against the terrain map
//! - [`time`] – update simulation time and delta
//! - [`timer`] – one-shot timers and the game-over observer
//! - [`trigger`] – trigger activation and task execution
//! - [`ttl`] – despawn entities whose time ran out
//! - [`tween`] – easing and interpolation helpers

pub mod movement;
pub mod player;
pub mod terrain;
pub mod time;
pub mod timer;
pub mod trigger;
pub mod ttl;
pub mod tween;
