//! Real-time tick scheduling.
//!
//! The driver owns a background thread that calls `Governor::tick` once per
//! tick period. Deadlines are absolute (`start + n * period`) so sleep jitter
//! does not accumulate; after an overrun the schedule re-anchors to now.
//!
//! Stopping never interrupts a tick: the stop signal is only observed while
//! waiting for the next deadline.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use cc_core::to_duration;
use tracing::{info, warn};

use crate::error::{SimError, SimResult};
use crate::governor::Governor;

/// Handle to a running tick thread.
pub struct TickDriver {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<u64>>,
    period: Duration,
}

impl TickDriver {
    /// Start ticking `governor` at its configured `dt`.
    pub fn spawn(governor: Governor) -> SimResult<Self> {
        let period = to_duration(governor.params().period())?;
        Self::spawn_with_period(governor, period)
    }

    /// Start ticking at an explicit wall-clock period.
    ///
    /// Useful for running a session faster or slower than real time; the
    /// simulation still advances by `dt` per tick.
    pub fn spawn_with_period(governor: Governor, period: Duration) -> SimResult<Self> {
        if period.is_zero() {
            return Err(SimError::InvalidArg {
                what: "tick period must be non-zero",
            });
        }
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("cc-tick-driver".to_string())
            .spawn(move || {
                info!(period_ms = period.as_secs_f64() * 1e3, "tick driver started");
                let mut ticks: u64 = 0;
                let mut deadline = Instant::now() + period;
                loop {
                    let wait = deadline.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                        Err(RecvTimeoutError::Timeout) => {}
                    }

                    governor.tick();
                    ticks += 1;

                    deadline += period;
                    let now = Instant::now();
                    if deadline < now {
                        warn!(
                            behind_ms = (now - deadline).as_secs_f64() * 1e3,
                            "tick overran its period, re-anchoring schedule"
                        );
                        deadline = now;
                    }
                }
                info!(ticks, "tick driver stopped");
                ticks
            })
            .map_err(SimError::Spawn)?;

        Ok(Self {
            stop_tx: Some(stop_tx),
            handle: Some(handle),
            period,
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Signal the thread, wait for it and return how many ticks it ran.
    pub fn stop(mut self) -> SimResult<u64> {
        self.shutdown()
    }

    fn shutdown(&mut self) -> SimResult<u64> {
        if let Some(tx) = self.stop_tx.take() {
            // The thread may already be gone; a closed channel stops it too.
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| SimError::DriverPanicked),
            None => Ok(0),
        }
    }
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        if let Err(e) = self.shutdown() {
            warn!(error = %e, "tick driver did not shut down cleanly");
        }
    }
}
