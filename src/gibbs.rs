//! Gibbs sampler for the bivariate Gaussian target.
//!
//! Each sweep draws the two coordinates in turn from their exact
//! conditional normal distributions, so there is no accept/reject test:
//! every record has `accepted == true`, and one sweep appends two records
//! (first the x update, then the y update).

use crate::core::{History, Point, Sampler, StepRecord};
use crate::distributions::BivariateGaussian;
use crate::rng::SampleRng;

pub struct GibbsSampler {
    /// The target whose conditionals are sampled.
    pub target: BivariateGaussian,

    /// RNG for this chain.
    rng: SampleRng,
}

impl GibbsSampler {
    /// Creates a sampler with an entropy-derived seed. Unlike the other
    /// two algorithms there are no tunable parameters to validate.
    pub fn new(target: BivariateGaussian) -> Self {
        Self {
            target,
            rng: SampleRng::from_entropy(),
        }
    }

    /// Reseeds the sampler's RNG for reproducible runs.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SampleRng::seeded(seed);
        self
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }
}

impl Sampler for GibbsSampler {
    /// One full sweep: draw x | y, record it, then draw y | x', record it.
    fn sweep(&mut self, current: Point, history: &mut History) -> Point {
        let (mean_x, std_dev_x) = self.target.conditional_x_given_y(current.y);
        let new_x = mean_x + self.rng.standard_normal() * std_dev_x;
        let intermediate = Point::new(new_x, current.y);
        history.push(StepRecord {
            start: current,
            proposal: intermediate,
            accepted: true,
            trajectory: None,
        });

        let (mean_y, std_dev_y) = self.target.conditional_y_given_x(new_x);
        let new_y = mean_y + self.rng.standard_normal() * std_dev_y;
        let next = Point::new(new_x, new_y);
        history.push(StepRecord {
            start: intermediate,
            proposal: next,
            accepted: true,
            trajectory: None,
        });

        next
    }

    fn records_per_sweep(&self) -> usize {
        2
    }
}
