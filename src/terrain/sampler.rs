//! World sampling boundary
//!
//! The resolver never owns terrain; it queries it through
//! [`TerrainSampler`], a read-only, deterministic view the world layer
//! implements. [`TerrainConfig`] carries the per-world tuning the resolver
//! needs (tile size, conveyor speed, boundary policy), supplied once at
//! initialization. [`GridMap`] is the bundled dense-grid implementation,
//! enough for tests and simple worlds; loading real level data into one is
//! the world layer's business.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::fixed::Fx;
use crate::geom::{RightTriangle, Vec2};
use crate::terrain::{CollisionFlags, TerrainKind};

/// What lies beyond the world's edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OobPolicy {
    /// Out-of-bounds reads as open space (the default)
    #[default]
    Open,
    /// Out-of-bounds reads as solid block
    Solid,
}

/// Per-world resolver configuration, supplied by the world layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainConfig {
    /// Collision cell side length
    pub tile_size: Fx,
    /// Lateral push a conveyor imparts per tick
    pub conveyor_speed: Fx,
    /// How far below its feet a grounded entity is snapped back onto
    /// support (slope descent adherence)
    pub snap_distance: Fx,
    pub oob: OobPolicy,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            tile_size: consts::TILE_SIZE,
            conveyor_speed: consts::CONVEYOR_SPEED,
            snap_distance: consts::SNAP_DISTANCE,
            oob: OobPolicy::Open,
        }
    }
}

/// Read-only terrain query. Implementations must be deterministic for
/// identical world state - the resolver's reproducibility depends on it.
pub trait TerrainSampler {
    /// Collision flags of the cell containing `pos`
    fn sample(&self, pos: Vec2) -> CollisionFlags;

    /// World-space solid triangle of the slope cell containing `pos`,
    /// if that cell is a slope
    fn slope_at(&self, pos: Vec2) -> Option<RightTriangle>;

    /// Whether `pos` lies inside the world. Positions outside resolve
    /// through [`OobPolicy`] instead of this sampler's cells.
    fn in_bounds(&self, _pos: Vec2) -> bool {
        true
    }
}

/// Dense column-major grid of terrain cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridMap {
    cols: usize,
    rows: usize,
    tile: Fx,
    cells: Vec<TerrainKind>,
}

impl GridMap {
    /// Empty world of `cols` x `rows` cells with `tile`-sized cells
    pub fn new(cols: usize, rows: usize, tile: Fx) -> Self {
        assert!(cols > 0 && rows > 0, "empty grid");
        assert!(tile > Fx::ZERO, "tile size must be positive");
        Self {
            cols,
            rows,
            tile,
            cells: vec![TerrainKind::Empty; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn tile(&self) -> Fx {
        self.tile
    }

    pub fn set(&mut self, col: usize, row: usize, kind: TerrainKind) {
        assert!(col < self.cols && row < self.rows, "cell out of range");
        self.cells[row * self.cols + col] = kind;
    }

    pub fn get(&self, col: usize, row: usize) -> TerrainKind {
        self.cells[row * self.cols + col]
    }

    /// Fill a solid horizontal run of cells, a common fixture shape
    pub fn fill_row(&mut self, row: usize, col_from: usize, col_to: usize, kind: TerrainKind) {
        for col in col_from..=col_to {
            self.set(col, row, kind);
        }
    }

    /// Cell indices of the cell containing `pos`, if inside the grid
    fn cell_index(&self, pos: Vec2) -> Option<(usize, usize)> {
        let col = pos.x.raw().div_euclid(self.tile.raw());
        let row = pos.y.raw().div_euclid(self.tile.raw());
        if col < 0 || row < 0 || col as usize >= self.cols || row as usize >= self.rows {
            return None;
        }
        Some((col as usize, row as usize))
    }

    fn kind_at(&self, pos: Vec2) -> TerrainKind {
        self.cell_index(pos)
            .map(|(c, r)| self.get(c, r))
            .unwrap_or(TerrainKind::Empty)
    }
}

impl TerrainSampler for GridMap {
    fn sample(&self, pos: Vec2) -> CollisionFlags {
        self.kind_at(pos).encode()
    }

    fn slope_at(&self, pos: Vec2) -> Option<RightTriangle> {
        let (col, row) = self.cell_index(pos)?;
        match self.get(col, row) {
            TerrainKind::Slope { ramp, .. } => {
                let origin = Vec2::new(
                    self.tile * (col as i32),
                    self.tile * (row as i32),
                );
                Some(ramp.triangle(origin, self.tile))
            }
            _ => None,
        }
    }

    fn in_bounds(&self, pos: Vec2) -> bool {
        self.cell_index(pos).is_some()
    }
}
