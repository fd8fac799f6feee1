/*!
# Simulation Sessions

A [`Session`] bundles everything one sampling run produces: the algorithm
and target it was configured with, the recorded [`History`], and the
realized chain path, derived once after the run completes and cached for
playback. Rendering and control code receive a `Session` by reference
instead of reading chain state from ambient scope, and playback slices the
cached path instead of re-deriving it per frame.

Algorithm selection is a sum type dispatched once per session, not a flag
checked per step.

# Example

```rust
use mcmc_trace::core::Point;
use mcmc_trace::distributions::BivariateGaussian;
use mcmc_trace::session::{Algorithm, Session};

let target = BivariateGaussian::new(Point::new(5.0, 5.0), Point::new(2.0, 3.0), 0.8)?;
let session = Session::run(
    target,
    Algorithm::MetropolisHastings { proposal_std_dev: 3.0 },
    Point::new(-2.0, 12.0),
    500,
    42,
)?;
assert_eq!(session.chain_path().len(), session.history().len() + 1);
# Ok::<(), mcmc_trace::core::ParameterError>(())
```
*/

use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use crate::core::{
    chain_path, run_sampler, run_sampler_with_progress, History, ParameterError, Point, StepRecord,
};
use crate::distributions::BivariateGaussian;
use crate::gibbs::GibbsSampler;
use crate::hmc::Hmc;
use crate::metropolis_hastings::MetropolisHastings;

/// Which sampler to run, with its tuning parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Algorithm {
    MetropolisHastings { proposal_std_dev: f64 },
    Gibbs,
    Hmc { n_leapfrog: usize, step_size: f64 },
}

/// Axis-aligned plotting domain, pass-through configuration for the
/// rendering collaborator's coordinate mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainBounds {
    pub min: f64,
    pub max: f64,
}

/// The deployment constants of the original visualization: target mean
/// (5, 5), standard deviations (2, 3), correlation 0.8, start point
/// (-2, 12), and plotting domain [-5, 15].
pub fn classic_target() -> BivariateGaussian {
    BivariateGaussian::new(Point::new(5.0, 5.0), Point::new(2.0, 3.0), 0.8)
        .expect("classic parameters are valid")
}

pub const CLASSIC_START: Point = Point::new(-2.0, 12.0);
pub const CLASSIC_DOMAIN: DomainBounds = DomainBounds {
    min: -5.0,
    max: 15.0,
};

/// One completed sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    target: BivariateGaussian,
    algorithm: Algorithm,
    start: Point,
    history: History,
    chain_path: Vec<Point>,
}

impl Session {
    /// Runs `n_steps` sweeps of the chosen algorithm from `start` with
    /// the given seed, then derives and caches the chain path.
    ///
    /// All parameter validation happens before the sampling loop starts;
    /// on error no partial history exists.
    pub fn run(
        target: BivariateGaussian,
        algorithm: Algorithm,
        start: Point,
        n_steps: usize,
        seed: u64,
    ) -> Result<Self, ParameterError> {
        let history = match algorithm {
            Algorithm::MetropolisHastings { proposal_std_dev } => {
                let mut sampler =
                    MetropolisHastings::new(target, proposal_std_dev)?.set_seed(seed);
                run_sampler(&mut sampler, start, n_steps)?
            }
            Algorithm::Gibbs => {
                let mut sampler = GibbsSampler::new(target).set_seed(seed);
                run_sampler(&mut sampler, start, n_steps)?
            }
            Algorithm::Hmc {
                n_leapfrog,
                step_size,
            } => {
                let mut sampler = Hmc::new(target, n_leapfrog, step_size)?.set_seed(seed);
                run_sampler(&mut sampler, start, n_steps)?
            }
        };
        Ok(Self::from_history(target, algorithm, start, history))
    }

    /// Like [`Session::run`], but renders a progress bar with a running
    /// acceptance estimate while sampling.
    pub fn run_with_progress(
        target: BivariateGaussian,
        algorithm: Algorithm,
        start: Point,
        n_steps: usize,
        seed: u64,
    ) -> Result<Self, ParameterError> {
        let pb = ProgressBar::new(n_steps as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{prefix:8} {bar:40.white} ETA {eta:3} | {msg}")
                .expect("valid progress template")
                .progress_chars("=>-"),
        );
        let history = match algorithm {
            Algorithm::MetropolisHastings { proposal_std_dev } => {
                pb.set_prefix("MH");
                let mut sampler =
                    MetropolisHastings::new(target, proposal_std_dev)?.set_seed(seed);
                run_sampler_with_progress(&mut sampler, start, n_steps, &pb)?
            }
            Algorithm::Gibbs => {
                pb.set_prefix("Gibbs");
                let mut sampler = GibbsSampler::new(target).set_seed(seed);
                run_sampler_with_progress(&mut sampler, start, n_steps, &pb)?
            }
            Algorithm::Hmc {
                n_leapfrog,
                step_size,
            } => {
                pb.set_prefix("HMC");
                let mut sampler = Hmc::new(target, n_leapfrog, step_size)?.set_seed(seed);
                run_sampler_with_progress(&mut sampler, start, n_steps, &pb)?
            }
        };
        Ok(Self::from_history(target, algorithm, start, history))
    }

    fn from_history(
        target: BivariateGaussian,
        algorithm: Algorithm,
        start: Point,
        history: History,
    ) -> Self {
        let chain_path = chain_path(start, &history);
        Self {
            target,
            algorithm,
            start,
            history,
            chain_path,
        }
    }

    pub fn target(&self) -> &BivariateGaussian {
        &self.target
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn history(&self) -> &[StepRecord] {
        &self.history
    }

    pub fn chain_path(&self) -> &[Point] {
        &self.chain_path
    }

    /// Number of playback frames, one per recorded step.
    pub fn n_frames(&self) -> usize {
        self.history.len()
    }

    /// The record animated at `frame`, if any.
    pub fn record(&self, frame: usize) -> Option<&StepRecord> {
        self.history.get(frame)
    }

    /// The chain path realized up to and including `frame` records.
    /// Clamped to the full path for out-of-range frames.
    pub fn path_through(&self, frame: usize) -> &[Point] {
        let end = (frame + 1).min(self.chain_path.len() - 1);
        &self.chain_path[..=end]
    }

    /// Fraction of recorded steps that were accepted.
    pub fn acceptance_rate(&self) -> f64 {
        self.history.iter().filter(|rec| rec.accepted).count() as f64 / self.history.len() as f64
    }
}

/// Runs `n_sessions` independent sessions of the same configuration in
/// parallel. Session `i` is seeded `seed + i`, so the result is identical
/// to running them serially with those seeds.
pub fn run_parallel(
    target: BivariateGaussian,
    algorithm: Algorithm,
    start: Point,
    n_steps: usize,
    n_sessions: usize,
    seed: u64,
) -> Result<Vec<Session>, ParameterError> {
    (0..n_sessions)
        .into_par_iter()
        .map(|i| Session::run(target, algorithm, start, n_steps, seed + i as u64))
        .collect()
}
