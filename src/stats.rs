//! Streaming summary statistics over a chain's step records.

use ndarray::prelude::*;
use std::collections::VecDeque;

use crate::core::StepRecord;

/// Window length for the running acceptance-rate estimate.
const ACCEPT_WINDOW: usize = 100;

/// Incrementally tracks the realized chain: per-axis running mean and
/// mean-square plus a sliding-window acceptance rate.
///
/// Feed it each [`StepRecord`] as it is produced; it never stores the
/// history itself, so tracking a long run stays O(1) in memory.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainTracker {
    n: u64,
    mean: Array1<f64>,    // [x, y]
    mean_sq: Array1<f64>, // [x, y]
    accept_queue: VecDeque<bool>,
    accepted_in_window: usize,
}

/// Point-in-time snapshot of a [`ChainTracker`].
#[derive(Debug, Clone, PartialEq)]
pub struct ChainStats {
    pub n: u64,
    pub p_accept: f64,
    pub mean: Array1<f64>,
    pub sm2: Array1<f64>,
}

impl ChainTracker {
    pub fn new() -> Self {
        Self {
            n: 0,
            mean: Array1::zeros(2),
            mean_sq: Array1::zeros(2),
            accept_queue: VecDeque::with_capacity(ACCEPT_WINDOW + 1),
            accepted_in_window: 0,
        }
    }

    /// Folds one record into the running statistics.
    pub fn step(&mut self, rec: &StepRecord) {
        self.n += 1;

        self.accept_queue.push_back(rec.accepted);
        if rec.accepted {
            self.accepted_in_window += 1;
        }
        if self.accept_queue.len() > ACCEPT_WINDOW && self.accept_queue.pop_front() == Some(true) {
            self.accepted_in_window -= 1;
        }

        let pos = rec.realized();
        let x_arr = array![pos.x, pos.y];
        let n = self.n as f64;
        self.mean = (self.mean.clone() * (n - 1.0) + &x_arr) / n;
        if self.n == 1 {
            self.mean_sq = x_arr.pow2();
        } else {
            self.mean_sq = (self.mean_sq.clone() * (n - 1.0) + x_arr.pow2()) / n;
        }
    }

    /// Acceptance rate over the last [`ACCEPT_WINDOW`] records.
    pub fn p_accept(&self) -> f64 {
        if self.accept_queue.is_empty() {
            return 0.0;
        }
        self.accepted_in_window as f64 / self.accept_queue.len() as f64
    }

    /// Unbiased per-axis sample variance of the realized positions.
    pub fn sm2(&self) -> Array1<f64> {
        let n = self.n as f64;
        (self.mean_sq.clone() - self.mean.pow2()) * n / (n - 1.0)
    }

    pub fn stats(&self) -> ChainStats {
        ChainStats {
            n: self.n,
            p_accept: self.p_accept(),
            mean: self.mean.clone(),
            sm2: self.sm2(),
        }
    }
}

impl Default for ChainTracker {
    fn default() -> Self {
        Self::new()
    }
}
