//! Per-tick sample history.
//!
//! The log is append-only between clears. Samples are never modified once
//! appended, so a reader that records `(epoch, len)` and later asks for
//! everything past `len` receives exactly the new samples, or learns from the
//! epoch that the log was cleared in between.

use cc_core::Real;
use serde::{Deserialize, Serialize};

/// Everything the governor computed in one non-paused tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HistorySample {
    /// Simulation clock after the tick (seconds).
    pub time: Real,
    pub error: Real,
    pub p_term: Real,
    pub i_term: Real,
    pub d_term: Real,
    /// Slew-limited throttle actually applied.
    pub throttle: Real,
    /// Speed at the end of the tick.
    pub speed: Real,
    /// Desired speed in cruise, initial speed in manual.
    pub input_speed: Real,
    /// Sum of perturbations applied at the start of the tick.
    pub perturbation_magnitude: Real,
}

/// Tail of the log past a reader's cursor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySlice {
    /// Epoch the samples belong to.
    pub epoch: u64,
    /// Index of `samples[0]` within the log.
    pub start: usize,
    /// True when the reader's epoch was stale and the slice restarts at 0.
    pub reset: bool,
    pub samples: Vec<HistorySample>,
}

impl HistorySlice {
    /// Cursor to pass on the next pull.
    pub fn next_cursor(&self) -> (u64, usize) {
        (self.epoch, self.start + self.samples.len())
    }
}

/// Ordered time series of samples for the current control episode.
#[derive(Debug, Clone, Default)]
pub struct HistoryLog {
    samples: Vec<HistorySample>,
    epoch: u64,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, sample: HistorySample) {
        debug_assert!(
            self.samples
                .last()
                .is_none_or(|last| sample.time > last.time),
            "history time must be strictly increasing"
        );
        self.samples.push(sample);
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Incremented on every clear.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn latest(&self) -> Option<&HistorySample> {
        self.samples.last()
    }

    /// Owned copy of every sample so far.
    pub fn snapshot(&self) -> Vec<HistorySample> {
        self.samples.clone()
    }

    /// Samples appended after `from` in `epoch`.
    ///
    /// A stale epoch (the log was cleared since the reader's last pull) or a
    /// cursor past the end yields the whole current log with `reset` set.
    pub fn since(&self, epoch: u64, from: usize) -> HistorySlice {
        if epoch == self.epoch && from <= self.samples.len() {
            HistorySlice {
                epoch: self.epoch,
                start: from,
                reset: false,
                samples: self.samples[from..].to_vec(),
            }
        } else {
            HistorySlice {
                epoch: self.epoch,
                start: 0,
                reset: true,
                samples: self.samples.clone(),
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: Real) -> HistorySample {
        HistorySample {
            time,
            speed: time * 10.0,
            ..HistorySample::default()
        }
    }

    #[test]
    fn append_preserves_order() {
        let mut log = HistoryLog::new();
        log.append(sample(0.1));
        log.append(sample(0.2));
        log.append(sample(0.3));

        let times: Vec<_> = log.snapshot().iter().map(|s| s.time).collect();
        assert_eq!(times, vec![0.1, 0.2, 0.3]);
        assert_eq!(log.latest().map(|s| s.time), Some(0.3));
    }

    #[test]
    fn snapshot_is_detached_from_later_appends() {
        let mut log = HistoryLog::new();
        log.append(sample(0.1));
        let snap = log.snapshot();
        log.append(sample(0.2));
        assert_eq!(snap.len(), 1);
        assert_eq!(log.len(), 2);
    }

    #[test]
    fn clear_bumps_epoch() {
        let mut log = HistoryLog::new();
        log.append(sample(0.1));
        assert_eq!(log.epoch(), 0);
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.epoch(), 1);
    }

    #[test]
    fn since_returns_only_new_samples() {
        let mut log = HistoryLog::new();
        log.append(sample(0.1));
        log.append(sample(0.2));
        let first = log.since(0, 0);
        assert_eq!(first.samples.len(), 2);
        assert!(!first.reset);

        log.append(sample(0.3));
        let (epoch, from) = first.next_cursor();
        let second = log.since(epoch, from);
        assert_eq!(second.start, 2);
        assert_eq!(second.samples.len(), 1);
        assert_eq!(second.samples[0].time, 0.3);
    }

    #[test]
    fn since_with_stale_epoch_restarts() {
        let mut log = HistoryLog::new();
        log.append(sample(0.1));
        let cursor = log.since(0, 0).next_cursor();

        log.clear();
        log.append(sample(0.1));
        let slice = log.since(cursor.0, cursor.1);
        assert!(slice.reset);
        assert_eq!(slice.start, 0);
        assert_eq!(slice.epoch, 1);
        assert_eq!(slice.samples.len(), 1);
    }
}
