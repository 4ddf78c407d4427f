//! Decoded terrain semantics
//!
//! [`TerrainKind`] is the sum-type view of a cell: one variant per base
//! category with its modifiers spelled out, instead of overloaded shift
//! bits. World data still travels as the compact [`CollisionFlags`]
//! bitfield, so `encode`/`decode` translate at that boundary; the flag
//! predicates remain the authority on what each bit pattern means.

use serde::{Deserialize, Serialize};

use crate::consts::TILE_SIZE;
use crate::fixed::Fx;
use crate::geom::{RightTriangle, Vec2};
use crate::terrain::CollisionFlags;

/// Horizontal direction, for conveyor push
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HDir {
    Left,
    Right,
}

/// Ramp geometry of a slope cell: surface heights at the cell's left and
/// right edges, measured downward from the cell top.
///
/// `(16, 8)` with 16px tiles is a half-steep ramp rising rightward (the
/// surface sits at the cell floor on the left, mid-cell on the right);
/// `(0, 16)` is a full diagonal falling rightward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlopeRamp {
    pub left: Fx,
    pub right: Fx,
}

impl SlopeRamp {
    pub const fn new(left: Fx, right: Fx) -> Self {
        Self { left, right }
    }

    /// Full-tile diagonal rising toward the right edge
    pub const RISE_RIGHT: Self = Self::new(TILE_SIZE, Fx::ZERO);
    /// Full-tile diagonal falling toward the right edge
    pub const FALL_RIGHT: Self = Self::new(Fx::ZERO, TILE_SIZE);

    /// True when the surface climbs from left to right (smaller y is higher)
    #[inline]
    pub fn ascends_rightward(&self) -> bool {
        self.left > self.right
    }

    /// World-space solid triangle for a cell whose top-left corner is
    /// `cell_origin`. The right-angle vertex sits at the bottom corner on
    /// the ramp's low side, so the solid wedge fills under the surface.
    pub fn triangle(&self, cell_origin: Vec2, tile: Fx) -> RightTriangle {
        debug_assert!(self.left != self.right, "flat ramp is not a slope");
        if self.left < self.right {
            RightTriangle::new(
                cell_origin + Vec2::new(Fx::ZERO, self.right),
                tile,
                self.left - self.right,
            )
        } else {
            RightTriangle::new(
                cell_origin + Vec2::new(tile, self.left),
                -tile,
                self.right - self.left,
            )
        }
    }
}

/// One cell's collision semantics, fully decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TerrainKind {
    #[default]
    Empty,
    Block {
        unclimbable: bool,
        slippery: bool,
        conveyor: Option<HDir>,
    },
    Spike {
        lethal: bool,
        unclimbable: bool,
    },
    Slope {
        ramp: SlopeRamp,
        slippery: bool,
        conveyor: Option<HDir>,
    },
    Ladder {
        top: bool,
    },
    Water {
        surface: bool,
    },
}

impl TerrainKind {
    /// Compact bitfield form, the shape level data stores.
    ///
    /// Ramp geometry does not survive the trip - the bitfield has no room
    /// for it; the world layer keeps heights next to the cell.
    pub fn encode(&self) -> CollisionFlags {
        use CollisionFlags as F;
        match *self {
            TerrainKind::Empty => F::NONE,
            TerrainKind::Block {
                unclimbable,
                slippery,
                conveyor,
            } => {
                let mut f = F::BLOCK;
                if unclimbable {
                    f |= F::SHIFT2;
                }
                if slippery {
                    f |= F::SHIFT3;
                }
                if let Some(dir) = conveyor {
                    f |= F::SHIFT4;
                    if dir == HDir::Left {
                        f |= F::SHIFT1;
                    }
                }
                f
            }
            TerrainKind::Spike {
                lethal,
                unclimbable,
            } => {
                let mut f = F::SPIKE;
                if !lethal {
                    f |= F::SHIFT1;
                }
                if unclimbable {
                    f |= F::SHIFT2;
                }
                f
            }
            TerrainKind::Slope {
                slippery, conveyor, ..
            } => {
                let mut f = F::SLOPE;
                if slippery {
                    f |= F::SHIFT3;
                }
                if let Some(dir) = conveyor {
                    f |= F::SHIFT4;
                    if dir == HDir::Left {
                        f |= F::SHIFT1;
                    }
                }
                f
            }
            TerrainKind::Ladder { top } => {
                if top {
                    F::TOP_LADDER
                } else {
                    F::LADDER
                }
            }
            TerrainKind::Water { surface } => {
                if surface {
                    F::WATER_SURFACE
                } else {
                    F::WATER
                }
            }
        }
    }

    /// Decode a bitfield into its nearest defined semantic. Total: any bit
    /// pattern yields a variant, with spikes taking precedence over blocks
    /// and slopes when categories are combined, and modifier-only patterns
    /// falling back to `Empty`.
    ///
    /// Decoded slopes get a full-tile ramp (oriented by the conveyor
    /// direction when one is present) since the bitfield carries no
    /// geometry.
    pub fn decode(flags: CollisionFlags) -> Self {
        let conveyor = if flags.is_left_conveyor() {
            Some(HDir::Left)
        } else if flags.is_right_conveyor() {
            Some(HDir::Right)
        } else {
            None
        };

        if flags.is_spike() {
            TerrainKind::Spike {
                lethal: flags.is_lethal_spike(),
                unclimbable: flags.contains(CollisionFlags::SHIFT2),
            }
        } else if flags.is_block() {
            TerrainKind::Block {
                unclimbable: flags.contains(CollisionFlags::SHIFT2),
                slippery: flags.is_slippery(),
                conveyor,
            }
        } else if flags.is_slope() {
            // Left-pushing conveyor ramps ascend rightward in the legacy
            // tile set; mirror for right-pushing.
            let ramp = match conveyor {
                Some(HDir::Left) => SlopeRamp::RISE_RIGHT,
                _ => SlopeRamp::FALL_RIGHT,
            };
            TerrainKind::Slope {
                ramp,
                slippery: flags.is_slippery(),
                conveyor,
            }
        } else if flags.is_ladder() {
            TerrainKind::Ladder {
                top: flags.is_top_ladder(),
            }
        } else if flags.is_water() {
            TerrainKind::Water {
                surface: flags.is_water_surface(),
            }
        } else {
            TerrainKind::Empty
        }
    }

    /// Convenience constructor: a plain solid block
    pub const fn solid() -> Self {
        TerrainKind::Block {
            unclimbable: false,
            slippery: false,
            conveyor: None,
        }
    }

    /// Convenience constructor: a plain slope with the given ramp
    pub const fn slope(ramp: SlopeRamp) -> Self {
        TerrainKind::Slope {
            ramp,
            slippery: false,
            conveyor: None,
        }
    }
}
