//! Runtime symbol providers for third-party crates on ESP-IDF.
//!
//! `critical-section` 1.x and `embassy-time` expect the platform to
//! export their driver symbols. On ESP-IDF (std pthreads over FreeRTOS)
//! a process-wide mutex with per-thread reentrancy tracking implements
//! the critical section, and the high-resolution timer backs the time
//! driver. Host targets get these from the crates' `std` features
//! instead, so this whole module is compiled out there.
#![cfg(target_os = "espidf")]

use core::cell::RefCell;
use core::time::Duration;
use std::sync::{Mutex, MutexGuard};

static CS_LOCK: Mutex<()> = Mutex::new(());

/// Per-thread critical-section bookkeeping: nesting depth plus the held
/// guard (present only while depth > 0).
struct CsState {
    depth: u8,
    guard: Option<MutexGuard<'static, ()>>,
}

thread_local! {
    static CS_STATE: RefCell<CsState> = const {
        RefCell::new(CsState { depth: 0, guard: None })
    };
}

/// Runtime-backed critical-section acquire used by `critical-section` 1.x.
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_acquire() -> u8 {
    CS_STATE.with(|state| {
        let mut state = state.borrow_mut();
        if state.depth == 0 {
            let guard = CS_LOCK.lock().expect("critical-section mutex poisoned");
            state.guard = Some(guard);
        }
        state.depth = state.depth.saturating_add(1);
        state.depth
    })
}

/// Runtime-backed critical-section release used by `critical-section` 1.x.
#[unsafe(no_mangle)]
pub extern "C" fn _critical_section_1_0_release(_restore: u8) {
    CS_STATE.with(|state| {
        let mut state = state.borrow_mut();
        if state.depth == 0 {
            return;
        }
        state.depth -= 1;
        if state.depth == 0 {
            state.guard = None;
        }
    });
}

/// embassy-time clock: microseconds from the ESP high-resolution timer.
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_now() -> u64 {
    unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
}

/// embassy-time wake scheduler: park a helper thread until the deadline,
/// then fire the waker.
#[unsafe(no_mangle)]
pub extern "C" fn _embassy_time_schedule_wake(at: u64, waker: *mut core::ffi::c_void) {
    if waker.is_null() {
        return;
    }

    // SAFETY: embassy-time hands us a valid pointer to a `Waker` for the
    // duration of the registration. Clone immediately and move the clone.
    let waker = unsafe { (&*(waker as *const core::task::Waker)).clone() };
    std::thread::spawn(move || {
        let now = _embassy_time_now();
        if at > now {
            std::thread::sleep(Duration::from_micros(at - now));
        }
        waker.wake();
    });
}
