//! Platformer core library.
//!
//! Entity coordination for a 2D side-scrolling platformer: a typed event
//! bus, a stable-identity registry, the player state machine and scripted
//! trigger zones, running on a `bevy_ecs` world driven by the host.
//!
//! - [`components`] – ECS components (player, triggers, bodies, tweens, etc.)
//! - [`events`] – the event bus, domain events and host overlap events
//! - [`resources`] – per-session resources (registry, clock, config, terrain)
//! - [`systems`] – per-frame systems and observers
//! - [`level`] – level data model and property parser
//! - [`game`] – session setup and level lifecycle

pub mod components;
pub mod events;
pub mod game;
pub mod level;
pub mod resources;
pub mod systems;
