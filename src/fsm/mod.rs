//! Function-pointer finite state machine engine for the control loop.
//!
//! Classic embedded FSM pattern: a fixed table of state descriptors with
//! plain `fn` pointers — no closures, no dynamic dispatch, no heap.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  StateTable                                                 │
//! │  ┌──────────────┬───────────┬──────────┬──────────────────┐ │
//! │  │ StateId      │ on_enter  │ on_exit  │ on_update        │ │
//! │  ├──────────────┼───────────┼──────────┼──────────────────┤ │
//! │  │ Initializing │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option<>│ │
//! │  │ Sampling     │ …         │ …        │ …                │ │
//! │  │ …            │           │          │                  │ │
//! │  └──────────────┴───────────┴──────────┴──────────────────┘ │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each `tick()` calls `on_update` for the **current** state. `Some(next)`
//! triggers `on_exit` → pointer update → `on_enter`. The states here are
//! the *phases* of one control cycle; the service walks the machine
//! through Sampling → Deciding → Actuating → Reporting (or Sampling →
//! Faulted → Reporting) once per scheduled tick.

pub mod context;
pub mod states;

use context::LoopContext;
use log::info;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Phases of the control loop.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    Initializing = 0,
    Sampling = 1,
    Deciding = 2,
    Actuating = 3,
    Reporting = 4,
    Faulted = 5,
    Terminated = 6,
}

impl StateId {
    /// Total number of states — sizes the table array.
    pub const COUNT: usize = 7;

    /// Convert a raw index back to `StateId`. Panics on out-of-range in
    /// debug builds; returns `Terminated` in release (halts safely).
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Initializing,
            1 => Self::Sampling,
            2 => Self::Deciding,
            3 => Self::Actuating,
            4 => Self::Reporting,
            5 => Self::Faulted,
            6 => Self::Terminated,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Terminated
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut LoopContext);

/// Signature for the per-tick update handler.
/// Returns `Some(next)` to trigger a transition, or `None` to stay.
pub type StateUpdateFn = fn(&mut LoopContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
pub struct StateDescriptor {
    pub id: StateId,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and threads a mutable [`LoopContext`] through
/// every handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Monotonically increasing step counter.
    step_count: u64,
    /// Step at which the current state was entered.
    state_entry_step: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
            step_count: 0,
            state_entry_step: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state.
    /// Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut LoopContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one step: run `on_update` for the current
    /// state and execute the transition it requests, if any.
    pub fn tick(&mut self, ctx: &mut LoopContext) {
        self.step_count += 1;
        ctx.steps_in_state = self.step_count - self.state_entry_step;
        ctx.total_steps = self.step_count;

        let next = (self.table[self.current].on_update)(ctx);

        if let Some(next_id) = next {
            self.transition(next_id, ctx);
        }
    }

    /// Force an immediate transition, bypassing `on_update` — used for
    /// externally driven jumps such as shutdown to `Terminated`.
    pub fn force_transition(&mut self, next: StateId, ctx: &mut LoopContext) {
        if next as usize != self.current {
            self.transition(next, ctx);
        }
    }

    /// The current state's identity.
    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    /// How many steps the FSM has spent in the current state.
    pub fn steps_in_current_state(&self) -> u64 {
        self.step_count - self.state_entry_step
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut LoopContext) {
        let next_idx = next_id as usize;

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        self.state_entry_step = self.step_count;
        ctx.steps_in_state = 0;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
