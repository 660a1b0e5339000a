//! Control-loop runner.
//!
//! Drives the strictly sequential tick → sleep cycle forever. The sleep
//! is a *cancellable* timer: it races the cycle timer against a shutdown
//! signal, so termination is honoured mid-sleep rather than at the next
//! cycle boundary. On shutdown the service parks the phase machine in
//! `Terminated` and drives the valve to its safe state; the caller's
//! scope then drops the hardware handles.
//!
//! No work-stealing, no overlapping iterations: one bed, one task.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};
use futures_lite::future;

use crate::app::ports::{EventSink, SensorPort, ValvePort};
use crate::app::service::AppService;

/// Fired once to stop the loop; safe to signal from any thread or ISR
/// shim.
pub type ShutdownSignal = Signal<CriticalSectionRawMutex, ()>;

enum Wake {
    Shutdown,
    Tick,
}

/// Run cycles until `shutdown` fires.
///
/// `housekeep` runs once per cycle after the tick (watchdog feed, WiFi
/// poll) without coupling the runner to those adapters.
pub async fn run(
    service: &mut AppService,
    hw: &mut (impl SensorPort + ValvePort),
    sink: &mut impl EventSink,
    cycle_secs: u64,
    shutdown: &ShutdownSignal,
    mut housekeep: impl FnMut(),
) {
    loop {
        service.tick(hw, sink);
        housekeep();

        // Shutdown is polled first so a pending signal wins the race
        // even against an already-elapsed timer.
        let wake = future::or(
            async {
                shutdown.wait().await;
                Wake::Shutdown
            },
            async {
                Timer::after(Duration::from_secs(cycle_secs)).await;
                Wake::Tick
            },
        )
        .await;

        if matches!(wake, Wake::Shutdown) {
            break;
        }
    }
    service.shutdown(hw, sink);
}

/// Block the current thread on the control loop.
pub fn block_on_loop(
    service: &mut AppService,
    hw: &mut (impl SensorPort + ValvePort),
    sink: &mut impl EventSink,
    cycle_secs: u64,
    shutdown: &ShutdownSignal,
    housekeep: impl FnMut(),
) {
    let executor: edge_executor::LocalExecutor<'_, 2> = edge_executor::LocalExecutor::new();
    let task = executor.spawn(run(service, hw, sink, cycle_secs, shutdown, housekeep));
    futures_lite::future::block_on(executor.run(task));
}
