//! 2D vector over the fixed-point scalar

use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::fixed::Fx;

/// 2D fixed-point vector. Y grows downward.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: Fx,
    pub y: Fx,
}

impl Vec2 {
    pub const ZERO: Self = Self::new(Fx::ZERO, Fx::ZERO);
    pub const LEFT: Self = Self::new(Fx::from_int(-1), Fx::ZERO);
    pub const RIGHT: Self = Self::new(Fx::ONE, Fx::ZERO);
    pub const UP: Self = Self::new(Fx::ZERO, Fx::from_int(-1));
    pub const DOWN: Self = Self::new(Fx::ZERO, Fx::ONE);

    #[inline]
    pub const fn new(x: Fx, y: Fx) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn from_ints(x: i32, y: i32) -> Self {
        Self::new(Fx::from_int(x), Fx::from_int(y))
    }

    #[inline]
    pub fn dot(self, other: Self) -> Fx {
        self.x * other.x + self.y * other.y
    }

    /// Keep only the horizontal component
    #[inline]
    pub fn x_only(self) -> Self {
        Self::new(self.x, Fx::ZERO)
    }

    /// Keep only the vertical component
    #[inline]
    pub fn y_only(self) -> Self {
        Self::new(Fx::ZERO, self.y)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self == Self::ZERO
    }
}

impl Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.x -= rhs.x;
        self.y -= rhs.y;
    }
}

impl Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<Fx> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Fx) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Mul<Vec2> for Fx {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: Vec2) -> Vec2 {
        rhs * self
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}
