//! Explicit entity state machines
//!
//! Entity behavior (patrol, attack, stagger, ...) is a set of states with
//! per-state enter/tick/exit handlers. The table is explicit data: an entity
//! registers handlers per state value and transitions only by assignment
//! through [`StateMachine::set_state`]. No reflection, no dispatch by
//! naming convention; what runs each tick is visible in the table.
//!
//! Handlers are plain function pointers over a context type `C` (usually
//! the entity's own state struct), which keeps machines `Clone` and free of
//! allocation per tick. The machine counts ticks spent in the current
//! state, the usual timebase for animation-length behaviors.

/// Handlers for one state. Any of the three may be omitted.
pub struct StateHandlers<C> {
    pub on_enter: Option<fn(&mut C)>,
    /// Called each tick with the number of ticks already spent in the
    /// state (0 on the first tick after entry)
    pub on_tick: Option<fn(&mut C, u64)>,
    pub on_exit: Option<fn(&mut C)>,
}

impl<C> StateHandlers<C> {
    pub const fn empty() -> Self {
        Self {
            on_enter: None,
            on_tick: None,
            on_exit: None,
        }
    }

    pub const fn ticking(on_tick: fn(&mut C, u64)) -> Self {
        Self {
            on_enter: None,
            on_tick: Some(on_tick),
            on_exit: None,
        }
    }
}

impl<C> Clone for StateHandlers<C> {
    fn clone(&self) -> Self {
        Self {
            on_enter: self.on_enter,
            on_tick: self.on_tick,
            on_exit: self.on_exit,
        }
    }
}

/// State table plus current state for one entity instance.
///
/// `S` is the entity's state enum. Registration order is preserved and
/// lookups are linear: state sets are small and determinism matters more
/// than lookup speed.
pub struct StateMachine<S, C> {
    states: Vec<(S, StateHandlers<C>)>,
    current: Option<S>,
    ticks_in_state: u64,
}

impl<S: Copy + PartialEq, C> StateMachine<S, C> {
    pub fn new() -> Self {
        Self {
            states: Vec::new(),
            current: None,
            ticks_in_state: 0,
        }
    }

    /// Register handlers for a state. Re-registering a state replaces its
    /// handlers.
    pub fn register(&mut self, state: S, handlers: StateHandlers<C>) {
        if let Some(slot) = self.states.iter_mut().find(|(s, _)| *s == state) {
            slot.1 = handlers;
        } else {
            self.states.push((state, handlers));
        }
    }

    pub fn state(&self) -> Option<S> {
        self.current
    }

    /// Ticks spent in the current state so far
    pub fn ticks_in_state(&self) -> u64 {
        self.ticks_in_state
    }

    fn handlers(&self, state: S) -> Option<&StateHandlers<C>> {
        self.states.iter().find(|(s, _)| *s == state).map(|(_, h)| h)
    }

    /// Transition: exit the current state, enter the new one, reset the
    /// tick counter. Re-entering the current state runs exit and enter
    /// again (timer restart).
    pub fn set_state(&mut self, ctx: &mut C, state: S) {
        if let Some(cur) = self.current {
            if let Some(h) = self.handlers(cur) {
                if let Some(exit) = h.on_exit {
                    exit(ctx);
                }
            }
        }
        self.current = Some(state);
        self.ticks_in_state = 0;
        if let Some(h) = self.handlers(state) {
            if let Some(enter) = h.on_enter {
                enter(ctx);
            }
        }
    }

    /// Run the current state's tick handler and advance the counter
    pub fn tick(&mut self, ctx: &mut C) {
        let Some(cur) = self.current else {
            return;
        };
        let ticks = self.ticks_in_state;
        if let Some(h) = self.handlers(cur) {
            if let Some(on_tick) = h.on_tick {
                on_tick(ctx, ticks);
            }
        }
        self.ticks_in_state = ticks + 1;
    }
}

impl<S: Copy + PartialEq, C> Default for StateMachine<S, C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Idle,
        Attack,
    }

    #[derive(Default)]
    struct Ctx {
        entered_attack: u32,
        exited_idle: u32,
        ticks_seen: Vec<u64>,
    }

    fn machine() -> StateMachine<Phase, Ctx> {
        let mut m = StateMachine::new();
        m.register(
            Phase::Idle,
            StateHandlers {
                on_enter: None,
                on_tick: Some(|c: &mut Ctx, t| c.ticks_seen.push(t)),
                on_exit: Some(|c: &mut Ctx| c.exited_idle += 1),
            },
        );
        m.register(
            Phase::Attack,
            StateHandlers {
                on_enter: Some(|c: &mut Ctx| c.entered_attack += 1),
                on_tick: None,
                on_exit: None,
            },
        );
        m
    }

    #[test]
    fn test_transitions_run_exit_then_enter() {
        let mut m = machine();
        let mut ctx = Ctx::default();

        m.set_state(&mut ctx, Phase::Idle);
        assert_eq!(m.state(), Some(Phase::Idle));
        m.set_state(&mut ctx, Phase::Attack);
        assert_eq!(ctx.exited_idle, 1);
        assert_eq!(ctx.entered_attack, 1);
        assert_eq!(m.state(), Some(Phase::Attack));
    }

    #[test]
    fn test_tick_counter_resets_on_entry() {
        let mut m = machine();
        let mut ctx = Ctx::default();

        m.set_state(&mut ctx, Phase::Idle);
        for _ in 0..3 {
            m.tick(&mut ctx);
        }
        assert_eq!(ctx.ticks_seen, vec![0, 1, 2]);
        assert_eq!(m.ticks_in_state(), 3);

        // Re-entering restarts the timebase
        m.set_state(&mut ctx, Phase::Idle);
        assert_eq!(m.ticks_in_state(), 0);
        assert_eq!(ctx.exited_idle, 1);
        m.tick(&mut ctx);
        assert_eq!(*ctx.ticks_seen.last().unwrap(), 0);
    }

    #[test]
    fn test_unregistered_state_ticks_are_noops() {
        let mut m: StateMachine<Phase, Ctx> = StateMachine::new();
        let mut ctx = Ctx::default();
        // No handlers registered at all: nothing runs, nothing panics
        m.set_state(&mut ctx, Phase::Attack);
        m.tick(&mut ctx);
        assert_eq!(m.ticks_in_state(), 1);
        assert_eq!(ctx.entered_attack, 0);
    }

    #[test]
    fn test_reregistration_replaces_handlers() {
        let mut m = machine();
        let mut ctx = Ctx::default();
        m.register(Phase::Idle, StateHandlers::empty());
        m.set_state(&mut ctx, Phase::Idle);
        m.tick(&mut ctx);
        assert!(ctx.ticks_seen.is_empty());
    }
}
