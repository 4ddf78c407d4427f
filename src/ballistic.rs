//! Ballistic launch-velocity solver
//!
//! Enemies that throw arcing projectiles at a moving target need the initial
//! velocity vector that makes a fixed launch speed hit a given point under
//! constant gravity. With `dx`, `dy` the target offset, launch speed `v` and
//! gravity `g`, eliminating flight time from the motion equations leaves a
//! quadratic in the launch angle's tangent:
//!
//! ```text
//! g*dx^2*tan^2(theta) + 2*v^2*dx*tan(theta) + g*dx^2 - 2*v^2*dy = 0
//! ```
//!
//! The steeper root is taken (the flatter one describes the low, descending
//! arc). Launches always arc upward: `sin(theta)` is negative in this
//! engine's y-down convention.

use crate::fixed::{FRAC_BITS, Fx};
use crate::geom::Vec2;

/// Solver output. `reachable: false` is a value, not an error: the carried
/// velocity is the closest-approach (vertex) trajectory and callers may
/// fire along it as a best effort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Launch {
    pub reachable: bool,
    pub velocity: Vec2,
}

/// Compute the launch velocity for a projectile thrown from `origin` at
/// `target` with scalar speed `speed` under downward gravity `gravity`.
///
/// Pure and deterministic; safe to call from any entity logic. `speed` and
/// `gravity` must be positive.
pub fn aim(origin: Vec2, target: Vec2, speed: Fx, gravity: Fx) -> Launch {
    debug_assert!(speed > Fx::ZERO, "launch speed must be positive");
    debug_assert!(gravity > Fx::ZERO, "gravity must be positive");

    let dx = target.x - origin.x;
    let dy = target.y - origin.y;

    // A zero horizontal offset degenerates the quadratic; the throw is
    // straight up (cos = 0, sin = -1)
    if dx == Fx::ZERO {
        return Launch {
            reachable: true,
            velocity: Vec2::new(Fx::ZERO, -speed),
        };
    }

    // With alpha = v / (g*dx), the discriminant of the quadratic is
    // v^2 + 2*g*dy - 1/alpha^2
    let inv_alpha = gravity * dx / speed;
    if inv_alpha == Fx::ZERO {
        // g*dx underflowed: sub-epsilon horizontal offset, throw straight up
        return Launch {
            reachable: true,
            velocity: Vec2::new(Fx::ZERO, -speed),
        };
    }
    let two = Fx::from_int(2);
    let disc = speed * speed + two * gravity * dy - inv_alpha * inv_alpha;

    let (reachable, disc) = if disc < Fx::ZERO {
        // Target out of range at this speed; clamping to the vertex yields
        // the trajectory that comes closest
        log::debug!("ballistic target out of range (disc {disc}), clamping");
        (false, Fx::ZERO)
    } else {
        (true, disc)
    };

    // tan(theta) = alpha * (-v - sqrt(disc)), the steeper root. Kept in the
    // wide raw domain: a near-vertical throw has a tangent far outside the
    // Q16.16 square range.
    let num = -speed - disc.sqrt();
    let tan_wide = ((num.raw() as i64) << FRAC_BITS) / (inv_alpha.raw() as i64);
    let t = tan_wide.clamp(-(1i64 << 31), 1i64 << 31);

    // Recover the angle's cosine and sine from sec^2 = 1 + tan^2 and
    // sin^2 + cos^2 = 1. cos carries dx's sign; sin is always negative
    // (upward).
    let hyp = ((1i64 << (2 * FRAC_BITS)) + t * t).isqrt();
    let cos_mag = Fx::from_raw(((1i64 << (2 * FRAC_BITS)) / hyp) as i32);
    let cos = if dx > Fx::ZERO { cos_mag } else { -cos_mag };
    let sin = -(Fx::ONE - cos * cos).max(Fx::ZERO).sqrt();

    Launch {
        reachable,
        velocity: Vec2::new(speed * cos, speed * sin),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEED: Fx = Fx::from_int(5);
    const GRAVITY: Fx = Fx::from_f32(0.25);

    /// Step the projectile under the same gravity until it crosses the
    /// target's column, returning the y reached there.
    fn fly_to_column(mut pos: Vec2, mut vel: Vec2, gravity: Fx, target_x: Fx) -> Vec2 {
        for _ in 0..10_000 {
            vel.y += gravity;
            pos += vel;
            let crossed = if vel.x >= Fx::ZERO {
                pos.x >= target_x
            } else {
                pos.x <= target_x
            };
            if crossed {
                return pos;
            }
        }
        panic!("projectile never reached the target column");
    }

    #[test]
    fn test_hits_target_below() {
        let origin = Vec2::ZERO;
        let target = Vec2::from_ints(100, 50);
        let launch = aim(origin, target, SPEED, GRAVITY);

        assert!(launch.reachable);
        // Launches arc upward first
        assert!(launch.velocity.y < Fx::ZERO);
        assert!(launch.velocity.x > Fx::ZERO);

        // Simulated flight passes within a tile unit of the target
        let at = fly_to_column(origin, launch.velocity, GRAVITY, target.x);
        let miss = (at.y - target.y).abs();
        assert!(miss < Fx::from_int(16), "missed by {miss}");
    }

    #[test]
    fn test_hits_target_to_the_left() {
        let origin = Vec2::from_ints(200, 0);
        let target = Vec2::from_ints(120, 40);
        let launch = aim(origin, target, SPEED, GRAVITY);

        assert!(launch.reachable);
        assert!(launch.velocity.x < Fx::ZERO, "throw goes leftward");
        assert!(launch.velocity.y < Fx::ZERO);

        let at = fly_to_column(origin, launch.velocity, GRAVITY, target.x);
        let miss = (at.y - target.y).abs();
        assert!(miss < Fx::from_int(16), "missed by {miss}");
    }

    #[test]
    fn test_speed_magnitude_preserved() {
        let launch = aim(Vec2::ZERO, Vec2::from_ints(60, 30), SPEED, GRAVITY);
        let v = launch.velocity;
        let mag_sq = v.x * v.x + v.y * v.y;
        let err = (mag_sq - SPEED * SPEED).abs();
        assert!(err < Fx::from_f32(0.1), "|v|^2 off by {err}");
    }

    #[test]
    fn test_vertical_throw_degenerate_case() {
        let launch = aim(Vec2::ZERO, Vec2::from_ints(0, -80), SPEED, GRAVITY);
        assert!(launch.reachable);
        // cos = 0, sin = -1 exactly
        assert_eq!(launch.velocity, Vec2::new(Fx::ZERO, -SPEED));
    }

    #[test]
    fn test_unreachable_target_clamps_to_vertex() {
        // 50 units of climb at 100 units of range exceeds the apex bound
        // v^2/2g = 50 for any non-vertical throw
        let target = Vec2::from_ints(100, -50);
        let launch = aim(Vec2::ZERO, target, SPEED, GRAVITY);

        assert!(!launch.reachable);
        // Clamped discriminant means tan = -v/inv_alpha = -1 here, a 45
        // degree throw
        let v = launch.velocity;
        assert!((v.x - Fx::from_f32(3.5355)).abs() < Fx::from_f32(0.01));
        assert!((v.y + Fx::from_f32(3.5355)).abs() < Fx::from_f32(0.01));
    }

    #[test]
    fn test_unreachable_is_deterministic() {
        let target = Vec2::from_ints(400, -300);
        let a = aim(Vec2::ZERO, target, SPEED, GRAVITY);
        let b = aim(Vec2::ZERO, target, SPEED, GRAVITY);
        assert!(!a.reachable);
        assert_eq!(a, b, "pure function: identical inputs, identical output");
    }

    #[test]
    fn test_steep_root_selected() {
        // Both roots hit the target; the solver must pick the steeper arc.
        // For a short, low throw the flat root would be nearly horizontal.
        let launch = aim(Vec2::ZERO, Vec2::from_ints(20, 10), SPEED, GRAVITY);
        assert!(launch.reachable);
        // Steep: more vertical than horizontal speed
        assert!(launch.velocity.y.abs() > launch.velocity.x.abs());
    }
}
