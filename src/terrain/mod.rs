//! Terrain semantics and the world sampling boundary
//!
//! - `flags`: the compact per-cell bitfield and its predicate layer
//! - `kind`: the decoded sum-type view and the legacy encode/decode boundary
//! - `sampler`: the read-only world query trait, resolver configuration,
//!   and a dense in-memory grid for tests and simple worlds

pub mod flags;
pub mod kind;
pub mod sampler;

pub use flags::CollisionFlags;
pub use kind::{HDir, SlopeRamp, TerrainKind};
pub use sampler::{GridMap, OobPolicy, TerrainConfig, TerrainSampler};
