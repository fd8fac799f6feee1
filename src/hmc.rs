/*!
# Hamiltonian Monte Carlo Sampler

HMC treats the sample point as a position `q` with potential energy
`U(q) = -log_density(q)`, pairs it with a freshly resampled auxiliary
momentum `p` with kinetic energy `K(p) = |p|^2 / 2`, and simulates the
resulting Hamiltonian dynamics with a leapfrog integrator to generate a
distant proposal. A Metropolis correction on the total energy
`H = U + K` then accepts or rejects the endpoint.

The leapfrog scheme (half momentum step, alternating full position and
momentum steps, closing half momentum step) is symmetric and
time-reversible, which is what makes the Metropolis correction valid and
keeps `H` nearly conserved for small step sizes.

Every [`StepRecord`] this sampler produces carries the full integration
path in `trajectory`: `n_leapfrog + 1` positions beginning at the start
point and ending at the proposal.

# Example

```rust
use mcmc_trace::core::{run_sampler, Point};
use mcmc_trace::distributions::BivariateGaussian;
use mcmc_trace::hmc::Hmc;

let target = BivariateGaussian::new(Point::new(5.0, 5.0), Point::new(2.0, 3.0), 0.8)?;
let mut hmc = Hmc::new(target, 20, 0.1)?.set_seed(42);
let history = run_sampler(&mut hmc, Point::new(-2.0, 12.0), 100)?;
assert!(history.iter().all(|rec| rec.trajectory.as_ref().unwrap().len() == 21));
# Ok::<(), mcmc_trace::core::ParameterError>(())
```
*/

use crate::core::{metropolis_accept, History, ParameterError, Point, Sampler, StepRecord};
use crate::distributions::BivariateGaussian;
use crate::rng::SampleRng;

/// The potential/kinetic energy pair for the bivariate Gaussian target,
/// with unit mass matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hamiltonian {
    target: BivariateGaussian,
}

impl Hamiltonian {
    pub fn new(target: BivariateGaussian) -> Self {
        Self { target }
    }

    /// `U(q) = -log_density(q)`.
    pub fn potential(&self, q: Point) -> f64 {
        -self.target.log_density(q.x, q.y)
    }

    /// `K(p) = (p_x^2 + p_y^2) / 2`.
    pub fn kinetic(&self, p: Point) -> f64 {
        0.5 * (p.x * p.x + p.y * p.y)
    }

    /// Total energy `H(q, p) = U(q) + K(p)`.
    pub fn total(&self, q: Point, p: Point) -> f64 {
        self.potential(q) + self.kinetic(p)
    }
}

/// A Hamiltonian Monte Carlo chain over the bivariate Gaussian target.
#[derive(Debug, Clone)]
pub struct Hmc {
    /// The target distribution to sample from.
    pub target: BivariateGaussian,
    /// Number of leapfrog steps per update.
    pub n_leapfrog: usize,
    /// Leapfrog integrator step size.
    pub step_size: f64,
    hamiltonian: Hamiltonian,
    rng: SampleRng,
}

impl Hmc {
    /// Creates a sampler with an entropy-derived seed.
    ///
    /// Fails if `n_leapfrog` is zero or `step_size` is not strictly
    /// positive.
    pub fn new(
        target: BivariateGaussian,
        n_leapfrog: usize,
        step_size: f64,
    ) -> Result<Self, ParameterError> {
        if n_leapfrog == 0 {
            return Err(ParameterError::ZeroSteps);
        }
        if !(step_size > 0.0) {
            return Err(ParameterError::NonPositiveStepSize(step_size));
        }
        Ok(Self {
            target,
            n_leapfrog,
            step_size,
            hamiltonian: Hamiltonian::new(target),
            rng: SampleRng::from_entropy(),
        })
    }

    /// Reseeds the sampler's RNG for reproducible runs.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.rng = SampleRng::seeded(seed);
        self
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Leapfrog integration of `n_leapfrog` steps from `(q, p)`.
    ///
    /// Returns the final position and momentum together with the visited
    /// positions, starting at the initial `q` (so `n_leapfrog + 1`
    /// entries). The momentum updates use the gradient of the
    /// log-density, which is the negative potential gradient.
    fn leapfrog(&self, mut q: Point, mut p: Point) -> (Point, Point, Vec<Point>) {
        let eps = self.step_size;
        let mut trajectory = Vec::with_capacity(self.n_leapfrog + 1);
        trajectory.push(q);

        let mut grad = self.target.grad_log_density(q);
        p.x += 0.5 * eps * grad.x;
        p.y += 0.5 * eps * grad.y;

        for step in 0..self.n_leapfrog {
            q.x += eps * p.x;
            q.y += eps * p.y;
            trajectory.push(q);
            if step + 1 < self.n_leapfrog {
                grad = self.target.grad_log_density(q);
                p.x += eps * grad.x;
                p.y += eps * grad.y;
            }
        }

        grad = self.target.grad_log_density(q);
        p.x += 0.5 * eps * grad.x;
        p.y += 0.5 * eps * grad.y;

        (q, p, trajectory)
    }
}

impl Sampler for Hmc {
    /// One HMC update: resample momentum, integrate, accept or reject on
    /// the energy difference.
    ///
    /// Momentum is resampled fresh on every sweep regardless of the
    /// previous outcome; it is not part of the persistent chain state.
    fn sweep(&mut self, current: Point, history: &mut History) -> Point {
        let current_p = Point::new(self.rng.standard_normal(), self.rng.standard_normal());
        let (q, p, trajectory) = self.leapfrog(current, current_p);

        let current_h = self.hamiltonian.total(current, current_p);
        let proposal_h = self.hamiltonian.total(q, p);
        // No min(1, ..) clamp needed: the uniform draw is always < 1.
        let acceptance_ratio = (current_h - proposal_h).exp();
        let accepted = metropolis_accept(self.rng.uniform(), acceptance_ratio);

        history.push(StepRecord {
            start: current,
            proposal: q,
            accepted,
            trajectory: Some(trajectory),
        });
        if accepted {
            q
        } else {
            current
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{chain_path, run_sampler};
    use approx::assert_abs_diff_eq;

    fn classic() -> BivariateGaussian {
        BivariateGaussian::new(Point::new(5.0, 5.0), Point::new(2.0, 3.0), 0.8).unwrap()
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            Hmc::new(classic(), 0, 0.1).unwrap_err(),
            ParameterError::ZeroSteps
        );
        assert_eq!(
            Hmc::new(classic(), 10, 0.0).unwrap_err(),
            ParameterError::NonPositiveStepSize(0.0)
        );
        assert!(Hmc::new(classic(), 10, -0.5).is_err());
    }

    #[test]
    fn test_trajectory_shape_and_endpoints() {
        let mut hmc = Hmc::new(classic(), 15, 0.1).unwrap().set_seed(42);
        let start = Point::new(-2.0, 12.0);
        let history = run_sampler(&mut hmc, start, 50).unwrap();
        assert_eq!(history.len(), 50);

        for rec in &history {
            let traj = rec.trajectory.as_ref().expect("HMC records a trajectory");
            assert_eq!(traj.len(), 16);
            assert_eq!(traj[0], rec.start);
            assert_eq!(*traj.last().unwrap(), rec.proposal);
        }
    }

    #[test]
    fn test_leapfrog_nearly_conserves_energy() {
        let hmc = Hmc::new(classic(), 20, 0.01).unwrap();
        let ham = Hamiltonian::new(classic());
        let mut rng = SampleRng::seeded(42);
        for _ in 0..50 {
            let q0 = Point::new(
                5.0 + rng.standard_normal() * 2.0,
                5.0 + rng.standard_normal() * 3.0,
            );
            let p0 = Point::new(rng.standard_normal(), rng.standard_normal());
            let (q1, p1, _) = hmc.leapfrog(q0, p0);
            let drift = (ham.total(q1, p1) - ham.total(q0, p0)).abs();
            assert!(drift < 1e-3, "energy drift {drift} too large at eps=0.01");
        }
    }

    #[test]
    fn test_leapfrog_is_time_reversible() {
        // Integrating forward and then backward (with negated momentum)
        // must return to the starting state up to roundoff.
        let hmc = Hmc::new(classic(), 30, 0.1).unwrap();
        let q0 = Point::new(1.5, 9.0);
        let p0 = Point::new(0.7, -1.2);
        let (q1, p1, _) = hmc.leapfrog(q0, p0);
        let (q2, p2, _) = hmc.leapfrog(q1, Point::new(-p1.x, -p1.y));
        assert_abs_diff_eq!(q2.x, q0.x, epsilon = 1e-9);
        assert_abs_diff_eq!(q2.y, q0.y, epsilon = 1e-9);
        assert_abs_diff_eq!(-p2.x, p0.x, epsilon = 1e-9);
        assert_abs_diff_eq!(-p2.y, p0.y, epsilon = 1e-9);
    }

    #[test]
    fn test_small_step_size_accepts_almost_always() {
        // With eps = 0.01 the energy error is tiny, so the Metropolis
        // correction should accept nearly every proposal.
        let mut hmc = Hmc::new(classic(), 20, 0.01).unwrap().set_seed(42);
        let history = run_sampler(&mut hmc, classic().mean(), 1_000).unwrap();
        let rate = history.iter().filter(|r| r.accepted).count() as f64 / 1_000.0;
        assert!(rate > 0.99, "acceptance rate {rate} too low for eps=0.01");
    }

    #[test]
    fn test_zero_steps_fails_fast() {
        let mut hmc = Hmc::new(classic(), 10, 0.1).unwrap().set_seed(1);
        assert_eq!(
            run_sampler(&mut hmc, Point::new(0.0, 0.0), 0).unwrap_err(),
            ParameterError::ZeroSteps
        );
    }

    #[test]
    fn test_long_run_moments_converge() {
        let target = classic();
        let mut hmc = Hmc::new(target, 10, 0.25).unwrap().set_seed(42);
        let start = Point::new(-2.0, 12.0);
        let history = run_sampler(&mut hmc, start, 20_000).unwrap();
        let path = chain_path(start, &history);

        let kept = &path[500..];
        let n = kept.len() as f64;
        let mean_x = kept.iter().map(|p| p.x).sum::<f64>() / n;
        let mean_y = kept.iter().map(|p| p.y).sum::<f64>() / n;
        let var_x = kept.iter().map(|p| (p.x - mean_x).powi(2)).sum::<f64>() / (n - 1.0);
        let var_y = kept.iter().map(|p| (p.y - mean_y).powi(2)).sum::<f64>() / (n - 1.0);

        assert_abs_diff_eq!(mean_x, 5.0, epsilon = 0.2);
        assert_abs_diff_eq!(mean_y, 5.0, epsilon = 0.2);
        assert_abs_diff_eq!(var_x.sqrt(), 2.0, epsilon = 0.2);
        assert_abs_diff_eq!(var_y.sqrt(), 3.0, epsilon = 0.25);
    }
}
