//! Tile-sweep movement resolution
//!
//! The tricky part of the crate: turning a requested displacement into an
//! actual one against flag-classified tiles, with slopes, conveyors,
//! one-way ladder tops and spikes all behaving like the classic platformers
//! this engine family imitates.
//!
//! Resolution is two ordered sweeps. Horizontal first: either a wall clamp
//! at the first blocking tile column, or - for a grounded entity over a
//! ramp - a walk along the ramp's exact hypotenuse line. Vertical second,
//! on the horizontally-corrected box: a row sweep that clamps onto floors,
//! ramp surfaces and platform tops, or against ceilings. Everything is
//! fixed-point; resolving the same inputs twice gives the same bits.
//!
//! A box rests on a ramp at its contact corner: the resting height is the
//! highest surface point under the box's horizontal extent, so the box
//! never sinks into the solid wedge however wide it is.

use crate::fixed::Fx;
use crate::geom::{Bounds, Direction, RightTriangle, Vec2};
use crate::sim::contact::{Contacts, MoveEvents, MoveOutcome, Mover};
use crate::terrain::{CollisionFlags, OobPolicy, TerrainConfig, TerrainSampler};

/// Result of a horizontal column sweep
struct HSweep {
    /// Displacement that can be applied before the first blocker
    allowed: Fx,
    /// Flags of the blocking column, `NONE` when the path is clear
    blocked: CollisionFlags,
    /// The blocking column contained only ramp cells
    slope_only: bool,
    /// Ramp geometry of the blocking column, when it had any
    slope: Option<RightTriangle>,
}

impl HSweep {
    fn clear(dx: Fx) -> Self {
        Self {
            allowed: dx,
            blocked: CollisionFlags::NONE,
            slope_only: false,
            slope: None,
        }
    }
}

/// Result of a vertical row sweep
struct VSweep {
    allowed: Fx,
    blocked: CollisionFlags,
    /// A downward sweep ended on support
    landed: bool,
    /// The support was a ramp surface
    slope: Option<RightTriangle>,
}

impl VSweep {
    fn clear(dy: Fx) -> Self {
        Self {
            allowed: dy,
            blocked: CollisionFlags::NONE,
            landed: false,
            slope: None,
        }
    }
}

/// Resting height of a box over a ramp: the highest surface point (smallest
/// y) under the box's horizontal extent. The hypotenuse is a line, so the
/// extreme sits at one of the clamped endpoints.
fn stance_y(tri: &RightTriangle, left: Fx, right: Fx) -> Fx {
    tri.surface_y_at(left).min(tri.surface_y_at(right))
}

/// Resolves entity movement against sampled terrain.
///
/// Holds explicit references to the world and its configuration; there is
/// no ambient engine state. One `resolve` call per entity per tick.
pub struct MoveResolver<'a, S: TerrainSampler> {
    world: &'a S,
    cfg: TerrainConfig,
}

impl<'a, S: TerrainSampler> MoveResolver<'a, S> {
    pub fn new(world: &'a S, cfg: TerrainConfig) -> Self {
        assert!(cfg.tile_size > Fx::ZERO, "tile size must be positive");
        Self { world, cfg }
    }

    pub fn config(&self) -> &TerrainConfig {
        &self.cfg
    }

    /// One full tick for one entity: integrate gravity, resolve the
    /// displacement, write back velocity and position, dispatch events.
    pub fn resolve(&self, mover: &mut impl Mover) -> MoveOutcome {
        let start = mover.collision_box();
        assert!(!start.is_degenerate(), "degenerate collision box");

        let prev = self.contacts_at(&start);
        let gravity = mover.gravity();
        let mut vel = mover.velocity();
        let was_landed = prev.landed() && vel.y >= Fx::ZERO;

        if !was_landed && gravity != Fx::ZERO {
            vel.y = (vel.y + gravity).min(mover.terminal_speed());
        } else if was_landed && vel.y > Fx::ZERO {
            vel.y = Fx::ZERO;
        }

        let outcome = self.resolve_displacement(start, vel, &prev);

        if outcome.contacts.landed() && vel.y > Fx::ZERO {
            vel.y = Fx::ZERO;
        }
        if outcome.events.contains(MoveEvents::BLOCKED_UP) && vel.y < Fx::ZERO {
            vel.y = Fx::ZERO;
        }
        mover.set_velocity(vel);
        mover.apply_displacement(outcome.delta);

        // Edge-triggered sinks compare against the pre-move contact state
        if outcome.contacts.landed() && !prev.landed() {
            mover.on_landed();
        }
        if outcome.contacts.blocked_left() && !prev.blocked_left() {
            mover.on_blocked_left();
        }
        if outcome.contacts.blocked_right() && !prev.blocked_right() {
            mover.on_blocked_right();
        }
        if outcome.contacts.blocked_up() && !prev.blocked_up() {
            mover.on_blocked_up();
        }
        let in_water = outcome.contacts.underwater() || outcome.contacts.touching_water_surface();
        let was_in_water = prev.underwater() || prev.touching_water_surface();
        if in_water && !was_in_water {
            mover.on_entered_water();
        }
        if !outcome.hazard.is_empty() {
            log::debug!("hazard contact: {:?}", outcome.hazard);
            mover.on_hazard(outcome.hazard);
        }
        if outcome.events.contains(MoveEvents::CONVEYED) {
            mover.on_conveyed(Vec2::new(outcome.conveyor_push, Fx::ZERO));
        }
        if outcome.events.contains(MoveEvents::ON_LADDER) {
            mover.on_ladder(outcome.events.contains(MoveEvents::TOP_LADDER));
        }

        outcome
    }

    /// The two-sweep core: horizontal then vertical, no entity involved.
    /// `prev` is the contact state at `start` (supplies groundedness and
    /// the conveyor underfoot).
    pub fn resolve_displacement(&self, start: Bounds, delta: Vec2, prev: &Contacts) -> MoveOutcome {
        assert!(!start.is_degenerate(), "degenerate collision box");

        let grounded = prev.landed();
        let mut events = MoveEvents::NONE;
        let mut hazard = CollisionFlags::NONE;

        // Conveyors push whether or not the entity moves on its own
        let mut push = Fx::ZERO;
        if grounded {
            if prev.down.is_left_conveyor() {
                push = -self.cfg.conveyor_speed;
            } else if prev.down.is_right_conveyor() {
                push = self.cfg.conveyor_speed;
            }
        }
        if push != Fx::ZERO {
            events.insert(MoveEvents::CONVEYED);
        }
        let dx = delta.x + push;

        let mut bounds = start;
        let mut landed_slope: Option<RightTriangle> = None;

        if dx != Fx::ZERO {
            let support_slope = if grounded {
                self.support_slope(&bounds)
            } else {
                None
            };

            if let Some(tri) = support_slope {
                // Already on a ramp: follow its surface
                let (nb, h) = self.walk_slope(&bounds, &tri, dx);
                bounds = nb;
                self.note_wall_hit(&h, dx, &mut events, &mut hazard);
            } else {
                let h = self.sweep_horizontal(&bounds, dx, false);
                let ramp_foot = grounded && h.slope_only && h.slope.is_some();
                if !h.blocked.is_empty() && ramp_foot {
                    // Grounded against the foot of a ramp: step onto it and
                    // walk the remaining distance along its surface
                    bounds = bounds.translated(Vec2::new(h.allowed, Fx::ZERO));
                    let tri = h.slope.expect("ramp_foot implies slope");
                    let (nb, h2) = self.walk_slope(&bounds, &tri, dx - h.allowed);
                    bounds = nb;
                    self.note_wall_hit(&h2, dx, &mut events, &mut hazard);
                } else {
                    bounds = bounds.translated(Vec2::new(h.allowed, Fx::ZERO));
                    self.note_wall_hit(&h, dx, &mut events, &mut hazard);
                }
            }
        }

        let dy = delta.y;
        let mut landed_now = false;
        if dy > Fx::ZERO {
            let v = self.sweep_down(&bounds, dy);
            bounds = bounds.translated(Vec2::new(Fx::ZERO, v.allowed));
            if v.landed {
                landed_now = true;
                if v.blocked.is_spike() {
                    events.insert(MoveEvents::HAZARD);
                    hazard |= v.blocked;
                }
                landed_slope = v.slope;
            }
        } else if dy < Fx::ZERO {
            let v = self.sweep_up(&bounds, dy);
            bounds = bounds.translated(Vec2::new(Fx::ZERO, v.allowed));
            if !v.blocked.is_empty() {
                events.insert(MoveEvents::BLOCKED_UP);
                if v.blocked.is_spike() {
                    events.insert(MoveEvents::HAZARD);
                    hazard |= v.blocked;
                }
            }
        }

        // A grounded entity that did not move vertically keeps contact with
        // descending ground within the snap range (ramp and ledge descent)
        if grounded && dy == Fx::ZERO && !landed_now {
            let s = self.sweep_down(&bounds, self.cfg.snap_distance);
            if s.landed {
                bounds = bounds.translated(Vec2::new(Fx::ZERO, s.allowed));
                landed_slope = s.slope;
            }
        }

        let contacts = self.contacts_at(&bounds);

        if contacts.landed() {
            events.insert(MoveEvents::LANDED);
        }
        if contacts.underwater() || contacts.touching_water_surface() {
            events.insert(MoveEvents::IN_WATER);
        }
        if contacts.touching_water_surface() {
            events.insert(MoveEvents::WATER_SURFACE);
        }
        let climb = self.flags_at(bounds.center());
        if climb.is_ladder() {
            events.insert(MoveEvents::ON_LADDER);
            if climb.is_top_ladder() {
                events.insert(MoveEvents::TOP_LADDER);
            }
        }
        if contacts.down.is_slippery() {
            events.insert(MoveEvents::SLIPPERY);
        }
        let spikes = contacts.touching_spikes();
        if !spikes.is_empty() {
            events.insert(MoveEvents::HAZARD);
            hazard |= spikes;
        }
        if landed_slope.is_none() && contacts.landed_on_slope() {
            landed_slope = self.support_slope(&bounds);
        }

        MoveOutcome {
            delta: bounds.origin() - start.origin(),
            bounds,
            contacts,
            events,
            hazard,
            conveyor_push: push,
            landed_slope,
        }
    }

    /// Flag masks touching each side of a box at rest
    pub fn contacts_at(&self, b: &Bounds) -> Contacts {
        let eps = Fx::EPSILON;
        Contacts {
            left: self.union_column(b.left() - eps, b.top(), b.bottom()),
            right: self.union_column(b.right(), b.top(), b.bottom()),
            up: self.union_row(b.top() - eps, b.left(), b.right()),
            down: self.support_flags(b),
            inner: self.union_interior(b),
        }
    }

    fn note_wall_hit(
        &self,
        h: &HSweep,
        dx: Fx,
        events: &mut MoveEvents,
        hazard: &mut CollisionFlags,
    ) {
        if h.blocked.is_empty() {
            return;
        }
        events.insert(if dx > Fx::ZERO {
            MoveEvents::BLOCKED_RIGHT
        } else {
            MoveEvents::BLOCKED_LEFT
        });
        if h.blocked.is_spike() {
            events.insert(MoveEvents::HAZARD);
            *hazard |= h.blocked;
        }
    }

    /// Terrain flags at a position, with the out-of-world policy applied
    fn flags_at(&self, pos: Vec2) -> CollisionFlags {
        if self.world.in_bounds(pos) {
            self.world.sample(pos)
        } else {
            match self.cfg.oob {
                OobPolicy::Open => CollisionFlags::NONE,
                OobPolicy::Solid => CollisionFlags::BLOCK,
            }
        }
    }

    /// Union of cell flags in the column at `x` across rows `[top, bottom)`
    fn union_column(&self, x: Fx, top: Fx, bottom: Fx) -> CollisionFlags {
        let t = self.cfg.tile_size;
        let mut flags = CollisionFlags::NONE;
        let mut y = top.floor_to(t);
        while y < bottom {
            flags |= self.flags_at(Vec2::new(x, y));
            y += t;
        }
        flags
    }

    /// Union of cell flags in the row at `y` across columns `[left, right)`
    fn union_row(&self, y: Fx, left: Fx, right: Fx) -> CollisionFlags {
        let t = self.cfg.tile_size;
        let mut flags = CollisionFlags::NONE;
        let mut x = left.floor_to(t);
        while x < right {
            flags |= self.flags_at(Vec2::new(x, y));
            x += t;
        }
        flags
    }

    fn union_interior(&self, b: &Bounds) -> CollisionFlags {
        let t = self.cfg.tile_size;
        let mut flags = CollisionFlags::NONE;
        let mut y = b.top().floor_to(t);
        while y < b.bottom() {
            flags |= self.union_row(y, b.left(), b.right());
            y += t;
        }
        flags
    }

    /// A cell is a bare ramp when its only solid aspect is the slope bit:
    /// blocks and spikes always clamp as walls, even on ramp-flagged cells
    fn is_bare_ramp(f: CollisionFlags) -> bool {
        f.is_slope() && !f.is_block() && !f.is_spike()
    }

    /// Flags supporting the bottom edge. Ramp cells count only when the
    /// box actually stands on their surface, not while falling through
    /// their open upper half.
    fn support_flags(&self, b: &Bounds) -> CollisionFlags {
        let t = self.cfg.tile_size;
        let bottom = b.bottom();
        let mut flags = CollisionFlags::NONE;
        let mut x = b.left().floor_to(t);
        while x < b.right() {
            let pos = Vec2::new(x, bottom);
            let f = self.flags_at(pos);
            if Self::is_bare_ramp(f) {
                if let Some(tri) = self.world.slope_at(pos) {
                    let surf = stance_y(&tri, b.left(), b.right());
                    if bottom + Fx::EPSILON > surf {
                        flags |= f;
                    }
                }
            } else {
                flags |= f;
            }
            x += t;
        }
        flags
    }

    /// Ramp the box is standing on, if any
    fn support_slope(&self, b: &Bounds) -> Option<RightTriangle> {
        let t = self.cfg.tile_size;
        let bottom = b.bottom();
        let mut x = b.left().floor_to(t);
        while x < b.right() {
            let pos = Vec2::new(x, bottom);
            if Self::is_bare_ramp(self.flags_at(pos)) {
                if let Some(tri) = self.world.slope_at(pos) {
                    if bottom + Fx::EPSILON > stance_y(&tri, b.left(), b.right()) {
                        return Some(tri);
                    }
                }
            }
            x += t;
        }
        None
    }

    /// Column-by-column sweep along the leading horizontal edge.
    /// `ignore_ramps` drops bare ramp cells from consideration, used while
    /// walking along a ramp surface.
    fn sweep_horizontal(&self, b: &Bounds, dx: Fx, ignore_ramps: bool) -> HSweep {
        debug_assert!(dx != Fx::ZERO);
        let t = self.cfg.tile_size;
        let (dir, edge) = if dx > Fx::ZERO {
            (Direction::RIGHT, b.right())
        } else {
            (Direction::LEFT, b.left())
        };
        let target = edge + dx;

        if dx > Fx::ZERO {
            let mut boundary = edge.ceil_to(t);
            while boundary < target {
                if let Some(hit) = self.column_blocking(boundary, b, dir, ignore_ramps) {
                    return HSweep {
                        allowed: boundary - edge,
                        ..hit
                    };
                }
                boundary += t;
            }
        } else {
            let mut boundary = edge.floor_to(t);
            while boundary > target {
                if let Some(hit) = self.column_blocking(boundary - t, b, dir, ignore_ramps) {
                    return HSweep {
                        allowed: boundary - edge,
                        ..hit
                    };
                }
                boundary -= t;
            }
        }
        HSweep::clear(dx)
    }

    /// Blocking content of one tile column across the box's vertical extent
    fn column_blocking(
        &self,
        x: Fx,
        b: &Bounds,
        dir: Direction,
        ignore_ramps: bool,
    ) -> Option<HSweep> {
        let t = self.cfg.tile_size;
        let mut blocked = CollisionFlags::NONE;
        let mut slope_only = true;
        let mut slope = None;
        let mut y = b.top().floor_to(t);
        while y < b.bottom() {
            let pos = Vec2::new(x, y);
            let f = self.flags_at(pos);
            if f.can_block_the_move(dir) {
                if Self::is_bare_ramp(f) {
                    if !ignore_ramps {
                        blocked |= f;
                        if slope.is_none() {
                            slope = self.world.slope_at(pos);
                        }
                    }
                } else {
                    blocked |= f;
                    slope_only = false;
                }
            }
            y += t;
        }
        if blocked.is_empty() {
            None
        } else {
            Some(HSweep {
                allowed: Fx::ZERO,
                blocked,
                slope_only,
                slope,
            })
        }
    }

    /// Follow a ramp surface for `dx`, clamping against walls (ramp cells
    /// excluded) and resting the box on the surface under its new extent.
    fn walk_slope(&self, b: &Bounds, tri: &RightTriangle, dx: Fx) -> (Bounds, HSweep) {
        if dx == Fx::ZERO {
            return (*b, HSweep::clear(dx));
        }
        let h = self.sweep_horizontal(b, dx, true);
        let moved = b.translated(Vec2::new(h.allowed, Fx::ZERO));
        let surf = stance_y(tri, moved.left(), moved.right());
        let moved = moved.translated(Vec2::new(Fx::ZERO, surf - moved.bottom()));
        (moved, h)
    }

    /// Downward row sweep: clamp onto the first floor, ramp surface or
    /// platform top within `dy`.
    fn sweep_down(&self, b: &Bounds, dy: Fx) -> VSweep {
        debug_assert!(dy > Fx::ZERO);
        let t = self.cfg.tile_size;
        let bottom = b.bottom();
        let target = bottom + dy;

        // The bottom edge may already be inside a ramp cell's open upper
        // half (mid-cell stance); its surface is the nearest candidate.
        let row0 = bottom.floor_to(t);
        if row0 < bottom {
            if let Some(hit) = self.row_ramp_contact(row0, b, bottom, target) {
                return hit;
            }
        }

        let mut boundary = bottom.ceil_to(t);
        while boundary < target {
            if let Some(hit) = self.row_landing(boundary, b, bottom, target) {
                return hit;
            }
            boundary += t;
        }
        VSweep::clear(dy)
    }

    /// Ramp-surface contact within the row the bottom edge currently
    /// occupies
    fn row_ramp_contact(&self, row_y: Fx, b: &Bounds, bottom: Fx, target: Fx) -> Option<VSweep> {
        let t = self.cfg.tile_size;
        let mut best: Option<(Fx, CollisionFlags, RightTriangle)> = None;
        let mut x = b.left().floor_to(t);
        while x < b.right() {
            let pos = Vec2::new(x, row_y);
            let f = self.flags_at(pos);
            if Self::is_bare_ramp(f) {
                if let Some(tri) = self.world.slope_at(pos) {
                    let surf = stance_y(&tri, b.left(), b.right());
                    if surf + Fx::EPSILON > bottom && surf <= target {
                        match best {
                            Some((s, _, _)) if s <= surf => {}
                            _ => best = Some((surf, f, tri)),
                        }
                    }
                }
            }
            x += t;
        }
        best.map(|(surf, f, tri)| VSweep {
            allowed: surf - bottom,
            blocked: f,
            landed: true,
            slope: Some(tri),
        })
    }

    /// Landing candidates in the row entered at `boundary`
    fn row_landing(&self, boundary: Fx, b: &Bounds, bottom: Fx, target: Fx) -> Option<VSweep> {
        let t = self.cfg.tile_size;
        let mut clamp: Option<Fx> = None;
        let mut blocked = CollisionFlags::NONE;
        let mut slope: Option<RightTriangle> = None;
        let mut x = b.left().floor_to(t);
        while x < b.right() {
            let pos = Vec2::new(x, boundary);
            let f = self.flags_at(pos);
            if Self::is_bare_ramp(f) {
                if let Some(tri) = self.world.slope_at(pos) {
                    let surf = stance_y(&tri, b.left(), b.right());
                    if surf <= target {
                        match clamp {
                            Some(c) if c <= surf => {}
                            _ => {
                                clamp = Some(surf);
                                slope = Some(tri);
                            }
                        }
                        blocked |= f;
                    }
                }
            } else if f.can_block_the_move(Direction::DOWN) {
                match clamp {
                    Some(c) if c <= boundary => {}
                    _ => {
                        clamp = Some(boundary);
                        slope = None;
                    }
                }
                blocked |= f;
            }
            x += t;
        }
        clamp.map(|c| VSweep {
            allowed: (c - bottom).max(Fx::ZERO),
            blocked,
            landed: true,
            slope,
        })
    }

    /// Upward row sweep: clamp against ceilings and the underside of
    /// non-top ladder cells.
    fn sweep_up(&self, b: &Bounds, dy: Fx) -> VSweep {
        debug_assert!(dy < Fx::ZERO);
        let t = self.cfg.tile_size;
        let top = b.top();
        let target = top + dy;

        let mut boundary = top.floor_to(t);
        while boundary > target {
            let row_y = boundary - t;
            let mut blocked = CollisionFlags::NONE;
            let mut x = b.left().floor_to(t);
            while x < b.right() {
                let f = self.flags_at(Vec2::new(x, row_y));
                if f.can_block_the_move(Direction::UP) || f.is_bottom_ladder() {
                    blocked |= f;
                }
                x += t;
            }
            if !blocked.is_empty() {
                return VSweep {
                    allowed: boundary - top,
                    blocked,
                    landed: false,
                    slope: None,
                };
            }
            boundary -= t;
        }
        VSweep::clear(dy)
    }
}
