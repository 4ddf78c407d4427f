//! Contact state, surface events and the entity-side contract
//!
//! The resolver reports its results three ways: [`Contacts`] (which flags
//! touch each side of the box after the move), [`MoveEvents`] (what happened
//! during the move), and the [`Mover`] event sinks (edge-triggered callbacks
//! for entities that prefer reacting over polling).

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::fixed::Fx;
use crate::geom::{Bounds, Direction, RightTriangle, Vec2};
use crate::terrain::CollisionFlags;

/// Flag masks touching each side of a resolved box, plus the cells the box
/// interior overlaps. A side's mask is `NONE` when nothing touches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Contacts {
    pub left: CollisionFlags,
    pub up: CollisionFlags,
    pub right: CollisionFlags,
    pub down: CollisionFlags,
    pub inner: CollisionFlags,
}

impl Contacts {
    #[inline]
    pub fn blocked_left(&self) -> bool {
        self.left.can_block_the_move(Direction::LEFT)
    }

    #[inline]
    pub fn blocked_right(&self) -> bool {
        self.right.can_block_the_move(Direction::RIGHT)
    }

    #[inline]
    pub fn blocked_up(&self) -> bool {
        self.up.can_block_the_move(Direction::UP)
    }

    /// Standing on something: a block, slope, spike, conveyor or
    /// top-ladder platform under the feet
    #[inline]
    pub fn landed(&self) -> bool {
        self.down.can_block_the_move(Direction::DOWN)
    }

    /// Standing on a ramp surface rather than a flat floor
    #[inline]
    pub fn landed_on_slope(&self) -> bool {
        self.down.is_slope() && !self.down.is_block()
    }

    #[inline]
    pub fn underwater(&self) -> bool {
        self.inner.is_water()
    }

    #[inline]
    pub fn touching_water_surface(&self) -> bool {
        self.inner.is_water_surface()
    }

    /// Spike flags touching any side, `NONE` when clear
    pub fn touching_spikes(&self) -> CollisionFlags {
        let mut spikes = CollisionFlags::NONE;
        for side in [self.left, self.up, self.right, self.down, self.inner] {
            if side.is_spike() {
                spikes |= side;
            }
        }
        spikes
    }
}

/// What happened during one resolver pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveEvents(pub u16);

impl MoveEvents {
    pub const NONE: Self = Self(0);
    /// Supported from below after this move
    pub const LANDED: Self = Self(1);
    pub const BLOCKED_LEFT: Self = Self(1 << 1);
    pub const BLOCKED_RIGHT: Self = Self(1 << 2);
    pub const BLOCKED_UP: Self = Self(1 << 3);
    /// Box overlaps water cells
    pub const IN_WATER: Self = Self(1 << 4);
    /// Box overlaps a water-surface cell
    pub const WATER_SURFACE: Self = Self(1 << 5);
    /// Climb point (the box center) overlaps a ladder cell
    pub const ON_LADDER: Self = Self(1 << 6);
    /// The overlapped ladder cell is a top cell
    pub const TOP_LADDER: Self = Self(1 << 7);
    /// A conveyor surface pushed the entity this tick
    pub const CONVEYED: Self = Self(1 << 8);
    /// Standing on a low-friction surface
    pub const SLIPPERY: Self = Self(1 << 9);
    /// Touched spike terrain; see [`MoveOutcome::hazard`]
    pub const HAZARD: Self = Self(1 << 10);

    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl std::ops::BitOr for MoveEvents {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Result of one resolver pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// Displacement actually applied (origin delta)
    pub delta: Vec2,
    /// Collision box at its resolved position
    pub bounds: Bounds,
    pub contacts: Contacts,
    pub events: MoveEvents,
    /// Spike flags behind a HAZARD event; lethality policy is the entity's
    pub hazard: CollisionFlags,
    /// Horizontal push applied by conveyor surfaces this tick
    pub conveyor_push: Fx,
    /// Ramp the entity is standing on, when landed on a slope
    pub landed_slope: Option<RightTriangle>,
}

impl MoveOutcome {
    #[inline]
    pub fn landed(&self) -> bool {
        self.contacts.landed()
    }
}

/// The entity side of the resolver contract.
///
/// The resolver reads the collision box, velocity and gravity, then writes
/// back the clamped velocity and the resolved displacement. Event sinks
/// default to no-ops; `on_landed`/`on_blocked_*`/`on_entered_water` fire on
/// the rising edge only, `on_hazard`/`on_conveyed`/`on_ladder` fire every
/// tick their condition holds.
pub trait Mover {
    /// Current collision box in world space. Must not be degenerate.
    fn collision_box(&self) -> Bounds;

    /// Damage-sensitive box; defaults to the collision box
    fn hitbox(&self) -> Bounds {
        self.collision_box()
    }

    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, v: Vec2);

    /// Move the entity's origin by the resolved displacement
    fn apply_displacement(&mut self, delta: Vec2);

    /// Downward acceleration while airborne; zero disables gravity
    fn gravity(&self) -> Fx;

    /// Fall speed cap
    fn terminal_speed(&self) -> Fx {
        consts::TERMINAL_SPEED
    }

    fn on_landed(&mut self) {}
    fn on_blocked_left(&mut self) {}
    fn on_blocked_right(&mut self) {}
    fn on_blocked_up(&mut self) {}
    fn on_entered_water(&mut self) {}
    fn on_hazard(&mut self, _flags: CollisionFlags) {}
    fn on_conveyed(&mut self, _push: Vec2) {}
    fn on_ladder(&mut self, _top: bool) {}
}
