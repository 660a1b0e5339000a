//! Concrete phase handler functions and table builder.
//!
//! Each phase is defined by plain `fn` pointers — no closures, no
//! dynamic dispatch, no heap.
//!
//! ```text
//!  INITIALIZING ──▶ SAMPLING ──[sample ok]──▶ DECIDING ──▶ ACTUATING
//!                      │  ▲                                    │
//!               [read failed]                                  │
//!                      ▼  └────────── REPORTING ◀──────────────┘
//!                  FAULTED ──────────────┘
//!
//!  Any state ──[shutdown]──▶ TERMINATED (forced, terminal)
//! ```
//!
//! Handlers are pure with respect to hardware: the deciding phase writes
//! the valve command into the context, and the service performs the
//! actual port calls when the walk reaches the actuating and reporting
//! phases.

use log::{info, warn};

use super::context::LoopContext;
use super::{StateDescriptor, StateId};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table. Called once at startup.
pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        StateDescriptor {
            id: StateId::Initializing,
            name: "Initializing",
            on_enter: Some(initializing_enter),
            on_exit: None,
            on_update: initializing_update,
        },
        StateDescriptor {
            id: StateId::Sampling,
            name: "Sampling",
            on_enter: None,
            on_exit: None,
            on_update: sampling_update,
        },
        StateDescriptor {
            id: StateId::Deciding,
            name: "Deciding",
            on_enter: None,
            on_exit: None,
            on_update: deciding_update,
        },
        StateDescriptor {
            id: StateId::Actuating,
            name: "Actuating",
            on_enter: None,
            on_exit: None,
            on_update: actuating_update,
        },
        StateDescriptor {
            id: StateId::Reporting,
            name: "Reporting",
            on_enter: None,
            on_exit: None,
            on_update: reporting_update,
        },
        StateDescriptor {
            id: StateId::Faulted,
            name: "Faulted",
            on_enter: Some(faulted_enter),
            on_exit: None,
            on_update: faulted_update,
        },
        StateDescriptor {
            id: StateId::Terminated,
            name: "Terminated",
            on_enter: Some(terminated_enter),
            on_exit: None,
            on_update: terminated_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  INITIALIZING — transport and actuator bound, policy loaded
// ═══════════════════════════════════════════════════════════════════════════

fn initializing_enter(ctx: &mut LoopContext) {
    info!(
        "INIT: thresholds {:.1}..{:.1} %RH, valve {:?}",
        ctx.controller.policy().start(),
        ctx.controller.policy().stop(),
        ctx.valve()
    );
}

fn initializing_update(_ctx: &mut LoopContext) -> Option<StateId> {
    Some(StateId::Sampling)
}

// ═══════════════════════════════════════════════════════════════════════════
//  SAMPLING — the service has just performed the bus transaction
// ═══════════════════════════════════════════════════════════════════════════

fn sampling_update(ctx: &mut LoopContext) -> Option<StateId> {
    if ctx.sample.is_some() {
        Some(StateId::Deciding)
    } else {
        Some(StateId::Faulted)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
//  DECIDING — dead-band transition function
// ═══════════════════════════════════════════════════════════════════════════

fn deciding_update(ctx: &mut LoopContext) -> Option<StateId> {
    let Some(sample) = ctx.sample else {
        return Some(StateId::Faulted);
    };
    let target = ctx.controller.decide(sample.humidity_pct);
    ctx.command.target = Some(target);
    Some(StateId::Actuating)
}

// ═══════════════════════════════════════════════════════════════════════════
//  ACTUATING — the service drives the valve port while parked here
// ═══════════════════════════════════════════════════════════════════════════

fn actuating_update(_ctx: &mut LoopContext) -> Option<StateId> {
    Some(StateId::Reporting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  REPORTING — telemetry published; cycle parks for the next tick
// ═══════════════════════════════════════════════════════════════════════════

fn reporting_update(_ctx: &mut LoopContext) -> Option<StateId> {
    Some(StateId::Sampling)
}

// ═══════════════════════════════════════════════════════════════════════════
//  FAULTED — no trustworthy sample; hold the valve, report the fault
// ═══════════════════════════════════════════════════════════════════════════

fn faulted_enter(ctx: &mut LoopContext) {
    // Never actuate on stale or fabricated data.
    ctx.command.target = None;
    match ctx.last_fault {
        Some(fault) => warn!("FAULT | {fault} — holding valve {:?}", ctx.valve()),
        None => warn!("FAULT | no sample — holding valve {:?}", ctx.valve()),
    }
}

fn faulted_update(_ctx: &mut LoopContext) -> Option<StateId> {
    Some(StateId::Reporting)
}

// ═══════════════════════════════════════════════════════════════════════════
//  TERMINATED — external shutdown; reached only by force_transition
// ═══════════════════════════════════════════════════════════════════════════

fn terminated_enter(ctx: &mut LoopContext) {
    ctx.command.target = None;
    info!("TERMINATED: control loop stopped after {} steps", ctx.total_steps);
}

fn terminated_update(_ctx: &mut LoopContext) -> Option<StateId> {
    None
}
