//! Pending speed-drop requests.
//!
//! Each magnitude is a level flag, not a counter: requesting a magnitude that
//! is already pending changes nothing. The engine drains every pending flag in
//! the same tick and applies the sum.
//!
//! Configured buttons are permanent slots. Any other magnitude is held only
//! until the next drain, and at most `MAX_AD_HOC_PENDING` of them at a time.

use cc_core::{Real, Tolerances, ensure_positive, nearly_equal};

use crate::error::SimResult;

/// Perturbation buttons offered by default (speed units).
pub const DEFAULT_MAGNITUDES: [Real; 3] = [2.0, 5.0, 10.0];

/// Distinct unconfigured magnitudes that may be pending at once.
pub const MAX_AD_HOC_PENDING: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq)]
struct PerturbationSlot {
    magnitude: Real,
    requested: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PerturbationQueue {
    slots: Vec<PerturbationSlot>,
    ad_hoc: Vec<Real>,
}

impl Default for PerturbationQueue {
    fn default() -> Self {
        Self {
            slots: DEFAULT_MAGNITUDES
                .iter()
                .map(|&magnitude| PerturbationSlot {
                    magnitude,
                    requested: false,
                })
                .collect(),
            ad_hoc: Vec::new(),
        }
    }
}

impl PerturbationQueue {
    /// Queue with one slot per configured magnitude. Duplicates collapse.
    ///
    /// # Errors
    ///
    /// Returns error if any magnitude is non-finite or not positive.
    pub fn with_magnitudes(magnitudes: &[Real]) -> SimResult<Self> {
        let mut queue = Self {
            slots: Vec::new(),
            ad_hoc: Vec::new(),
        };
        for &m in magnitudes {
            let m = ensure_positive(m, "perturbation magnitude")?;
            if queue.find(m).is_none() {
                queue.slots.push(PerturbationSlot {
                    magnitude: m,
                    requested: false,
                });
            }
        }
        Ok(queue)
    }

    fn find(&self, magnitude: Real) -> Option<usize> {
        let tol = Tolerances::default();
        self.slots
            .iter()
            .position(|slot| nearly_equal(slot.magnitude, magnitude, tol))
    }

    fn find_ad_hoc(&self, magnitude: Real) -> Option<usize> {
        let tol = Tolerances::default();
        self.ad_hoc
            .iter()
            .position(|&m| nearly_equal(m, magnitude, tol))
    }

    /// Raise the flag for `magnitude`.
    ///
    /// Returns `false` (and leaves the queue unchanged) for magnitudes that
    /// are non-finite or not positive, and for a new unconfigured magnitude
    /// once `MAX_AD_HOC_PENDING` are already waiting.
    pub fn request(&mut self, magnitude: Real) -> bool {
        if !magnitude.is_finite() || magnitude <= 0.0 {
            return false;
        }
        if let Some(idx) = self.find(magnitude) {
            self.slots[idx].requested = true;
            return true;
        }
        if self.find_ad_hoc(magnitude).is_some() {
            return true;
        }
        if self.ad_hoc.len() >= MAX_AD_HOC_PENDING {
            return false;
        }
        self.ad_hoc.push(magnitude);
        true
    }

    pub fn is_pending(&self, magnitude: Real) -> bool {
        self.find(magnitude)
            .is_some_and(|idx| self.slots[idx].requested)
            || self.find_ad_hoc(magnitude).is_some()
    }

    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.requested).count() + self.ad_hoc.len()
    }

    /// Configured magnitudes in insertion order.
    pub fn magnitudes(&self) -> Vec<Real> {
        self.slots.iter().map(|slot| slot.magnitude).collect()
    }

    /// Lower every raised flag and return the pending magnitudes, configured
    /// buttons first.
    pub fn drain(&mut self) -> Vec<Real> {
        let mut pending: Vec<Real> = self
            .slots
            .iter_mut()
            .filter(|slot| slot.requested)
            .map(|slot| {
                slot.requested = false;
                slot.magnitude
            })
            .collect();
        pending.append(&mut self.ad_hoc);
        pending
    }

    /// Drop all pending requests without applying them.
    pub fn clear(&mut self) {
        for slot in &mut self.slots {
            slot.requested = false;
        }
        self.ad_hoc.clear();
    }
}
