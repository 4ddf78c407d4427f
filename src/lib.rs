//! Gridstep - deterministic tile-grid collision core for 2D platformers
//!
//! Core modules:
//! - `fixed`: Q16.16 fixed-point scalar (all physics state, no floats)
//! - `geom`: vectors, boxes and slope triangles over the fixed scalar
//! - `terrain`: per-tile collision flags, their decoded semantics, and the
//!   world sampling boundary
//! - `sim`: the per-tick movement resolver (sweeps, contacts, events)
//! - `ballistic`: launch-velocity solver for arcing projectiles
//! - `fsm`: explicit state-machine table for entity behavior
//!
//! The crate never touches rendering, audio or level files. The world layer
//! supplies terrain through [`terrain::TerrainSampler`] and entities plug in
//! through [`sim::Mover`]; everything here is synchronous, single-threaded
//! and bit-reproducible across runs and platforms.
//!
//! Coordinates are screen-style: X grows rightward, Y grows downward, so
//! gravity is a positive Y acceleration and "up" is negative Y.

pub mod ballistic;
pub mod fixed;
pub mod fsm;
pub mod geom;
pub mod sim;
pub mod terrain;

pub use fixed::Fx;
pub use geom::{Bounds, Direction, RightTriangle, Vec2};
pub use terrain::{CollisionFlags, TerrainConfig, TerrainKind, TerrainSampler};

/// Engine tuning constants
pub mod consts {
    use crate::fixed::Fx;

    /// Side length of one collision cell, in pixels
    pub const TILE_SIZE: Fx = Fx::from_int(16);

    /// Downward acceleration applied to airborne entities, per tick
    pub const GRAVITY: Fx = Fx::from_f32(0.25);
    /// Gravity while submerged
    pub const UNDERWATER_GRAVITY: Fx = Fx::from_f32(33.0 / 256.0);

    /// Fastest allowed fall speed
    pub const TERMINAL_SPEED: Fx = Fx::from_f32(5.75);
    /// Fastest allowed fall speed while submerged
    pub const UNDERWATER_TERMINAL_SPEED: Fx = Fx::from_f32(737.0 / 256.0);

    /// Lateral speed a conveyor surface imparts, per tick
    pub const CONVEYOR_SPEED: Fx = Fx::ONE;

    /// How far below its feet a grounded entity searches for support
    /// before it is considered airborne (half a tile)
    pub const SNAP_DISTANCE: Fx = Fx::from_int(8);
}
