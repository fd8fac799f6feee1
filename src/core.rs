use indicatif::ProgressBar;
use std::ops::Add;
use thiserror::Error;

use crate::stats::ChainTracker;

/// A position in the 2D sample space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// One unit of chain history: a proposed move and its outcome.
///
/// `trajectory` is populated only by the HMC sampler and holds the full
/// leapfrog path, with `trajectory[0] == start` and the last element equal
/// to `proposal`.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub start: Point,
    pub proposal: Point,
    pub accepted: bool,
    pub trajectory: Option<Vec<Point>>,
}

impl StepRecord {
    /// The chain position after this step: the proposal if it was
    /// accepted, the start position otherwise.
    pub fn realized(&self) -> Point {
        if self.accepted {
            self.proposal
        } else {
            self.start
        }
    }
}

/// Ordered, append-only sequence of step records produced by one run.
pub type History = Vec<StepRecord>;

/// Precondition violations detected before any sampling loop starts.
#[derive(Debug, Error, PartialEq)]
pub enum ParameterError {
    #[error("standard deviation must be positive, got {0}")]
    NonPositiveStdDev(f64),
    #[error("correlation must lie strictly inside (-1, 1), got {0}")]
    SingularCorrelation(f64),
    #[error("leapfrog step size must be positive, got {0}")]
    NonPositiveStepSize(f64),
    #[error("step count must be positive")]
    ZeroSteps,
}

/// The Metropolis accept test shared by the MH and HMC samplers.
///
/// `u` is a uniform draw in `[0, 1)`, so comparing against the unclamped
/// ratio is equivalent to comparing against `min(1, ratio)`. The direct
/// comparison also pins down the degenerate cases: an overflowed
/// (infinite) ratio always accepts, while an underflowed (zero) or NaN
/// ratio never does.
pub(crate) fn metropolis_accept(u: f64, ratio: f64) -> bool {
    u < ratio
}

/// A single Markov transition kernel over [`Point`] states.
///
/// One sweep appends the records it produced to `history` and returns the
/// new chain position. MH and HMC append one record per sweep; Gibbs
/// appends two, one per conditional draw.
pub trait Sampler {
    fn sweep(&mut self, current: Point, history: &mut History) -> Point;

    /// Number of records a single sweep appends.
    fn records_per_sweep(&self) -> usize {
        1
    }
}

/// Runs `n_steps` sweeps of `sampler` from `start` and returns the full
/// history. Fails fast on a zero step count; no partial history is ever
/// returned.
pub fn run_sampler<S: Sampler>(
    sampler: &mut S,
    start: Point,
    n_steps: usize,
) -> Result<History, ParameterError> {
    if n_steps == 0 {
        return Err(ParameterError::ZeroSteps);
    }
    let mut history = Vec::with_capacity(n_steps * sampler.records_per_sweep());
    let mut current = start;
    for _ in 0..n_steps {
        current = sampler.sweep(current, &mut history);
    }
    Ok(history)
}

/// Like [`run_sampler`], but updates `pb` once per sweep with a running
/// acceptance estimate.
pub fn run_sampler_with_progress<S: Sampler>(
    sampler: &mut S,
    start: Point,
    n_steps: usize,
    pb: &ProgressBar,
) -> Result<History, ParameterError> {
    if n_steps == 0 {
        return Err(ParameterError::ZeroSteps);
    }
    let mut history = Vec::with_capacity(n_steps * sampler.records_per_sweep());
    let mut current = start;
    let mut tracker = ChainTracker::new();

    pb.set_length(n_steps as u64);
    for _ in 0..n_steps {
        let recorded = history.len();
        current = sampler.sweep(current, &mut history);
        for rec in &history[recorded..] {
            tracker.step(rec);
        }
        pb.inc(1);
        pb.set_message(format!("p(accept)\u{2248}{:.2}", tracker.p_accept()));
    }
    pb.finish_with_message("Done!");
    Ok(history)
}

/// Folds a history into the realized chain of positions.
///
/// `chain_path[0]` is the start point; entry `i + 1` is the proposal of
/// record `i` if it was accepted, or a repeat of entry `i` otherwise. The
/// result has length `history.len() + 1`.
pub fn chain_path(start: Point, history: &[StepRecord]) -> Vec<Point> {
    let mut path = Vec::with_capacity(history.len() + 1);
    let mut last = start;
    path.push(last);
    for rec in history {
        if rec.accepted {
            last = rec.proposal;
        }
        path.push(last);
    }
    path
}
