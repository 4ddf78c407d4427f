//! Per-tile collision flag bitfield
//!
//! One `CollisionFlags` value describes one terrain cell. Five base bits name
//! the cell category (block, spike, slope, ladder, water) and four shift bits
//! modify it - with meanings that depend on which base bits are set:
//!
//! | base          | SHIFT1            | SHIFT2        | SHIFT3    | SHIFT4    |
//! |---------------|-------------------|---------------|-----------|-----------|
//! | SPIKE         | non-lethal        | unclimbable   | -         | -         |
//! | BLOCK         | conveyor leftward | unclimbable   | slippery  | conveyor  |
//! | SLOPE         | conveyor leftward | -             | slippery  | conveyor  |
//! | LADDER        | top cell          | -             | -         | -         |
//! | WATER         | surface cell      | -             | -         | -         |
//!
//! The predicate methods below are the single source of truth for reading a
//! flags value; nothing else in the crate inspects raw bits. Every predicate
//! is total over the full bit range - unknown combinations simply decode to
//! "no special behavior", never a panic.
//!
//! The bit layout matches the legacy level data byte-for-byte, so flags
//! decoded from existing maps mean exactly what they always meant.

use serde::{Deserialize, Serialize};

use crate::geom::Direction;

/// Collision semantics of one terrain cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollisionFlags(pub u16);

impl CollisionFlags {
    /// Open, non-colliding space
    pub const NONE: Self = Self(0);

    // Base category bits
    pub const BLOCK: Self = Self(1);
    pub const SPIKE: Self = Self(1 << 1);
    pub const SLOPE: Self = Self(1 << 2);
    pub const LADDER: Self = Self(1 << 3);
    pub const WATER: Self = Self(1 << 4);

    // Context-dependent modifier bits
    pub const SHIFT1: Self = Self(1 << 5);
    pub const SHIFT2: Self = Self(1 << 6);
    pub const SHIFT3: Self = Self(1 << 7);
    pub const SHIFT4: Self = Self(1 << 8);

    // Named combinations
    pub const LETHAL_SPIKE: Self = Self::SPIKE;
    pub const NON_LETHAL_SPIKE: Self = Self(Self::SPIKE.0 | Self::SHIFT1.0);
    pub const UNCLIMBABLE_BLOCK: Self = Self(Self::BLOCK.0 | Self::SHIFT2.0);
    pub const UNCLIMBABLE_SPIKE: Self = Self(Self::SPIKE.0 | Self::SHIFT2.0);
    pub const SLIPPERY: Self = Self(Self::BLOCK.0 | Self::SHIFT3.0);
    /// The full conveyor signature; a value "is a conveyor" when it carries
    /// all three of these bits
    pub const CONVEYOR: Self = Self(Self::BLOCK.0 | Self::SLOPE.0 | Self::SHIFT4.0);
    pub const BLOCK_CONVEYOR: Self = Self(Self::BLOCK.0 | Self::SHIFT4.0);
    pub const LEFT_BLOCK_CONVEYOR: Self = Self(Self::BLOCK_CONVEYOR.0 | Self::SHIFT1.0);
    pub const RIGHT_BLOCK_CONVEYOR: Self = Self::BLOCK_CONVEYOR;
    pub const SLOPE_CONVEYOR: Self = Self(Self::SLOPE.0 | Self::SHIFT4.0);
    pub const LEFT_SLOPE_CONVEYOR: Self = Self(Self::SLOPE_CONVEYOR.0 | Self::SHIFT1.0);
    pub const RIGHT_SLOPE_CONVEYOR: Self = Self::SLOPE_CONVEYOR;
    pub const TOP_LADDER: Self = Self(Self::LADDER.0 | Self::SHIFT1.0);
    pub const WATER_SURFACE: Self = Self(Self::WATER.0 | Self::SHIFT1.0);

    /// All bits that carry meaning; anything above is ignored by decode
    pub const ALL: Self = Self(0x1FF);

    #[inline]
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when all of `other`'s bits are set
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any of `other`'s bits are set
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Just the modifier bits
    #[inline]
    pub const fn shift_modifiers(self) -> Self {
        Self(self.0 & (Self::SHIFT1.0 | Self::SHIFT2.0 | Self::SHIFT3.0 | Self::SHIFT4.0))
    }

    #[inline]
    pub const fn is_block(self) -> bool {
        self.contains(Self::BLOCK)
    }

    #[inline]
    pub const fn is_spike(self) -> bool {
        self.contains(Self::SPIKE)
    }

    #[inline]
    pub const fn is_slope(self) -> bool {
        self.contains(Self::SLOPE)
    }

    #[inline]
    pub const fn is_ladder(self) -> bool {
        self.contains(Self::LADDER)
    }

    #[inline]
    pub const fn is_water(self) -> bool {
        self.contains(Self::WATER)
    }

    /// Spike that harms on contact (SHIFT1 clear)
    #[inline]
    pub const fn is_lethal_spike(self) -> bool {
        self.contains(Self::SPIKE) && !self.contains(Self::SHIFT1)
    }

    /// Spike that merely blocks (SHIFT1 set)
    #[inline]
    pub const fn is_non_lethal_spike(self) -> bool {
        self.contains(Self::SPIKE) && self.contains(Self::SHIFT1)
    }

    /// Wall an entity may cling to: any block, spike or conveyor
    /// without SHIFT2
    #[inline]
    pub const fn is_climbable(self) -> bool {
        (self.contains(Self::BLOCK) || self.contains(Self::SPIKE) || self.contains(Self::CONVEYOR))
            && !self.contains(Self::SHIFT2)
    }

    #[inline]
    pub const fn is_unclimbable(self) -> bool {
        (self.contains(Self::BLOCK) || self.contains(Self::SPIKE) || self.contains(Self::CONVEYOR))
            && self.contains(Self::SHIFT2)
    }

    /// Low-friction floor or ramp
    #[inline]
    pub const fn is_slippery(self) -> bool {
        (self.contains(Self::BLOCK) || self.contains(Self::SLOPE)) && self.contains(Self::SHIFT3)
    }

    /// Conveyor pushing leftward
    #[inline]
    pub const fn is_left_conveyor(self) -> bool {
        (self.contains(Self::BLOCK) || self.contains(Self::SLOPE))
            && self.contains(Self::SHIFT4)
            && self.contains(Self::SHIFT1)
    }

    /// Conveyor pushing rightward
    #[inline]
    pub const fn is_right_conveyor(self) -> bool {
        (self.contains(Self::BLOCK) || self.contains(Self::SLOPE))
            && self.contains(Self::SHIFT4)
            && !self.contains(Self::SHIFT1)
    }

    /// Left-pushing conveyor ramp. Plain slopes carry their direction in
    /// their triangle geometry, not in the flags.
    #[inline]
    pub const fn is_left_slope(self) -> bool {
        self.contains(Self::SLOPE) && self.contains(Self::SHIFT4) && self.contains(Self::SHIFT1)
    }

    /// Right-pushing conveyor ramp
    #[inline]
    pub const fn is_right_slope(self) -> bool {
        self.contains(Self::SLOPE) && self.contains(Self::SHIFT4) && !self.contains(Self::SHIFT1)
    }

    /// Ladder cell an entity can stand on top of
    #[inline]
    pub const fn is_top_ladder(self) -> bool {
        self.contains(Self::LADDER) && self.contains(Self::SHIFT1)
    }

    /// Interior or bottom ladder cell
    #[inline]
    pub const fn is_bottom_ladder(self) -> bool {
        self.contains(Self::LADDER) && !self.contains(Self::SHIFT1)
    }

    #[inline]
    pub const fn is_underwater(self) -> bool {
        self.contains(Self::WATER) && !self.contains(Self::SHIFT1)
    }

    #[inline]
    pub const fn is_water_surface(self) -> bool {
        self.contains(Self::WATER) && self.contains(Self::SHIFT1)
    }

    /// The blocking policy used by the resolver for every probe: whether a
    /// cell with these flags stops motion toward `direction`.
    ///
    /// Blocks, spikes and conveyors stop motion from every side. Slopes stop
    /// horizontal motion (the resolver swaps the wall clamp for a surface
    /// walk when the entity is grounded) and downward motion. A top-ladder
    /// cell stops only downward motion - it is a platform from above and
    /// open from every other side.
    pub const fn can_block_the_move(self, direction: Direction) -> bool {
        !self.is_empty()
            && (self.contains(Self::BLOCK)
                || self.contains(Self::SPIKE)
                || self.contains(Self::CONVEYOR)
                || (direction.intersects(Direction::HORIZONTAL) && self.is_slope())
                || (direction.intersects(Direction::DOWN)
                    && (self.is_top_ladder() || self.is_slope())))
    }
}

impl std::ops::BitOr for CollisionFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for CollisionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl std::ops::BitAnd for CollisionFlags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}
