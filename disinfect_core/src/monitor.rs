//! Background monitor: ticks the device at a fixed cadence.
//!
//! The monitor owns one thread. It completes expired runs, enforces the tank
//! guard and drives the idle auto-start. A tick that panics is logged and the
//! loop carries on; the thread ends only when the `Monitor` is stopped or dropped.

use std::panic::{self, AssertUnwindSafe};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel as xch;

use crate::device::TickOutcome;
use crate::service::DeviceService;

pub struct Monitor {
    stop_tx: Option<xch::Sender<()>>,
    join_handle: Option<JoinHandle<()>>,
}

impl Monitor {
    pub fn spawn(service: DeviceService, period: Duration) -> Self {
        Self::spawn_with(period, move || service.tick())
    }

    /// Spawn with an arbitrary tick function. Used by tests to inject faults.
    pub fn spawn_with<F>(period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> TickOutcome + Send + 'static,
    {
        let (stop_tx, stop_rx) = xch::bounded::<()>(1);
        let period = period.max(Duration::from_millis(1));

        let join_handle = std::thread::Builder::new()
            .name("disinfect-monitor".into())
            .spawn(move || {
                tracing::debug!(period_ms = period.as_millis(), "monitor started");
                loop {
                    match stop_rx.recv_timeout(period) {
                        Err(xch::RecvTimeoutError::Timeout) => {}
                        Ok(()) | Err(xch::RecvTimeoutError::Disconnected) => break,
                    }
                    match panic::catch_unwind(AssertUnwindSafe(&mut tick)) {
                        Ok(TickOutcome::Idle) => {}
                        Ok(outcome) => tracing::debug!(?outcome, "monitor tick"),
                        Err(_) => tracing::error!("monitor tick panicked; continuing"),
                    }
                }
                tracing::trace!("monitor thread exiting cleanly");
            });

        let join_handle = match join_handle {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::error!(error = %e, "failed to spawn monitor thread");
                None
            }
        };

        Self {
            stop_tx: Some(stop_tx),
            join_handle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        // Dropping the sender also wakes the thread.
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.try_send(());
        }
        if let Some(handle) = self.join_handle.take() {
            if let Err(e) = handle.join() {
                tracing::warn!(?e, "monitor thread panicked during shutdown");
            }
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
