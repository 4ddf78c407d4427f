//! Geometry primitives over the fixed-point scalar
//!
//! Immutable value types: [`Vec2`], the origin-relative [`Bounds`] box, and
//! the [`RightTriangle`] used for sub-tile slope surfaces. Plus [`Direction`],
//! the side bitfield shared by flag queries and the resolver.

pub mod bounds;
pub mod slope;
pub mod vector;

pub use bounds::Bounds;
pub use slope::RightTriangle;
pub use vector::Vec2;

use serde::{Deserialize, Serialize};

/// Bitfield of movement/contact sides.
///
/// Queries like [`crate::CollisionFlags::can_block_the_move`] accept any
/// combination; `BOTH` asks about every side at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Direction(pub u8);

impl Direction {
    pub const NONE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const UP: Self = Self(1 << 1);
    pub const RIGHT: Self = Self(1 << 2);
    pub const DOWN: Self = Self(1 << 3);
    pub const HORIZONTAL: Self = Self(Self::LEFT.0 | Self::RIGHT.0);
    pub const VERTICAL: Self = Self(Self::UP.0 | Self::DOWN.0);
    pub const BOTH: Self = Self(Self::HORIZONTAL.0 | Self::VERTICAL.0);

    /// True when any of `other`'s sides are present
    #[inline]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// True when all of `other`'s sides are present
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for Direction {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
