/*!
The fixed bivariate Gaussian target distribution.

A [`BivariateGaussian`] is parameterized by its mean, per-axis standard
deviations, and correlation, and exposes exactly what the samplers need:
the fully normalized log-density, its closed-form gradient (for HMC), and
the two conditional-normal decompositions (for Gibbs). Construction is
validated; a correlation of exactly ±1 or a non-positive standard
deviation yields a singular covariance and is rejected up front.

# Examples

```rust
use mcmc_trace::core::Point;
use mcmc_trace::distributions::BivariateGaussian;

let target = BivariateGaussian::new(
    Point::new(5.0, 5.0),
    Point::new(2.0, 3.0),
    0.8,
)?;
let lp = target.log_density(5.0, 5.0);
assert!(lp.is_finite());
# Ok::<(), mcmc_trace::core::ParameterError>(())
```
*/

use crate::core::{ParameterError, Point};
use std::f64::consts::PI;

/// A bivariate Gaussian with mean `(mu_x, mu_y)`, standard deviations
/// `(sigma_x, sigma_y)`, and correlation `rho`.
///
/// The fields are private so a value of this type is always a
/// well-defined (non-singular) density.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BivariateGaussian {
    mean: Point,
    std_dev: Point,
    correlation: f64,
}

impl BivariateGaussian {
    /// Validates the parameters and constructs the target.
    ///
    /// Both standard deviations must be strictly positive and the
    /// correlation must lie strictly inside `(-1, 1)`.
    pub fn new(mean: Point, std_dev: Point, correlation: f64) -> Result<Self, ParameterError> {
        if !(std_dev.x > 0.0) {
            return Err(ParameterError::NonPositiveStdDev(std_dev.x));
        }
        if !(std_dev.y > 0.0) {
            return Err(ParameterError::NonPositiveStdDev(std_dev.y));
        }
        if !(correlation > -1.0 && correlation < 1.0) {
            return Err(ParameterError::SingularCorrelation(correlation));
        }
        Ok(Self {
            mean,
            std_dev,
            correlation,
        })
    }

    pub fn mean(&self) -> Point {
        self.mean
    }

    pub fn std_dev(&self) -> Point {
        self.std_dev
    }

    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    /// The fully normalized log-density at `(x, y)`.
    ///
    /// Finite for every finite input because the correlation is strictly
    /// inside `(-1, 1)`.
    pub fn log_density(&self, x: f64, y: f64) -> f64 {
        let (s_x, s_y) = (self.std_dev.x, self.std_dev.y);
        let rho = self.correlation;
        let dx = (x - self.mean.x) / s_x;
        let dy = (y - self.mean.y) / s_y;
        let z = dx * dx - 2.0 * rho * dx * dy + dy * dy;
        let log_denom = (2.0 * PI * s_x * s_y * (1.0 - rho * rho).sqrt()).ln();
        -log_denom - z / (2.0 * (1.0 - rho * rho))
    }

    /// The gradient of [`Self::log_density`] at `q`, in closed form.
    /// Used only by the HMC sampler.
    pub fn grad_log_density(&self, q: Point) -> Point {
        let (s_x, s_y) = (self.std_dev.x, self.std_dev.y);
        let rho = self.correlation;
        let (dx, dy) = (q.x - self.mean.x, q.y - self.mean.y);

        let common_factor = -1.0 / (1.0 - rho * rho);
        Point::new(
            common_factor * (dx / (s_x * s_x) - rho * dy / (s_x * s_y)),
            common_factor * (dy / (s_y * s_y) - rho * dx / (s_x * s_y)),
        )
    }

    /// Mean and standard deviation of `x` conditional on `y`.
    pub fn conditional_x_given_y(&self, y: f64) -> (f64, f64) {
        let rho = self.correlation;
        let mean = self.mean.x + rho * (self.std_dev.x / self.std_dev.y) * (y - self.mean.y);
        let std_dev = self.std_dev.x * (1.0 - rho * rho).sqrt();
        (mean, std_dev)
    }

    /// Mean and standard deviation of `y` conditional on `x`.
    pub fn conditional_y_given_x(&self, x: f64) -> (f64, f64) {
        let rho = self.correlation;
        let mean = self.mean.y + rho * (self.std_dev.y / self.std_dev.x) * (x - self.mean.x);
        let std_dev = self.std_dev.y * (1.0 - rho * rho).sqrt();
        (mean, std_dev)
    }
}

/// Univariate normal density. Shares the engine's numeric contract but is
/// consumed by the marginal-curve plotting downstream, not the samplers.
pub fn normal_pdf(x: f64, mean: f64, std_dev: f64) -> f64 {
    (-0.5 * ((x - mean) / std_dev).powi(2)).exp() / (std_dev * (2.0 * PI).sqrt())
}
