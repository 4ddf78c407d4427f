//! Axis-aligned box: an origin point plus corner offsets
//!
//! A [`Bounds`] tracks an entity anchor (its origin) separately from the box
//! extent around it, so moving an entity moves the origin and the corners
//! follow. Edge membership is half-open: the left and top edges belong to the
//! box, the right and bottom edges do not, which keeps two boxes resting
//! flush against each other from overlapping.

use serde::{Deserialize, Serialize};

use crate::fixed::Fx;
use crate::geom::Vec2;

/// Axis-aligned box defined by an origin and min/max corner offsets
/// relative to that origin. `mins <= maxs` component-wise, always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Bounds {
    origin: Vec2,
    mins: Vec2,
    maxs: Vec2,
}

impl Bounds {
    pub fn new(origin: Vec2, mins: Vec2, maxs: Vec2) -> Self {
        debug_assert!(mins.x <= maxs.x && mins.y <= maxs.y, "inverted bounds");
        Self { origin, mins, maxs }
    }

    /// Box from its left-top corner and a size; origin sits at the corner
    pub fn from_rect(left: Fx, top: Fx, width: Fx, height: Fx) -> Self {
        Self::new(
            Vec2::new(left, top),
            Vec2::ZERO,
            Vec2::new(width, height),
        )
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    #[inline]
    pub fn mins(&self) -> Vec2 {
        self.mins
    }

    #[inline]
    pub fn maxs(&self) -> Vec2 {
        self.maxs
    }

    #[inline]
    pub fn left(&self) -> Fx {
        self.origin.x + self.mins.x
    }

    #[inline]
    pub fn right(&self) -> Fx {
        self.origin.x + self.maxs.x
    }

    #[inline]
    pub fn top(&self) -> Fx {
        self.origin.y + self.mins.y
    }

    #[inline]
    pub fn bottom(&self) -> Fx {
        self.origin.y + self.maxs.y
    }

    #[inline]
    pub fn width(&self) -> Fx {
        self.maxs.x - self.mins.x
    }

    #[inline]
    pub fn height(&self) -> Fx {
        self.maxs.y - self.mins.y
    }

    /// Horizontal midpoint, the anchor column for slope adherence
    #[inline]
    pub fn center_x(&self) -> Fx {
        self.left() + (self.width() / Fx::from_int(2))
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.top() + self.height() / Fx::from_int(2))
    }

    /// Zero width or height; such a box cannot be swept
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == Fx::ZERO || self.height() == Fx::ZERO
    }

    #[must_use]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            origin: self.origin + delta,
            mins: self.mins,
            maxs: self.maxs,
        }
    }

    /// Half-open overlap test: shared edges do not count as overlap
    pub fn overlaps(&self, other: &Self) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// Half-open point membership: left/top edges in, right/bottom edges out
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }
}
