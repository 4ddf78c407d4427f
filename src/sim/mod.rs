//! Deterministic movement resolution
//!
//! One resolver pass per entity per simulation tick. This module must stay
//! pure and deterministic:
//! - Fixed timestep only
//! - Fixed-point arithmetic only
//! - Terrain is read, never written
//! - The only mutated state is the entity being resolved
//!
//! Entities plug in through the [`Mover`] trait; the world plugs in through
//! [`crate::terrain::TerrainSampler`]. Resolution order across entities is
//! the caller's responsibility (registration order, kept stable for
//! replays).

pub mod contact;
pub mod resolver;

pub use contact::{Contacts, MoveEvents, MoveOutcome, Mover};
pub use resolver::MoveResolver;
