//! Runs all three samplers on the classic bivariate Gaussian target and
//! prints summary statistics of each run.

use std::error::Error;

use mcmc_trace::session::{classic_target, Algorithm, Session, CLASSIC_START};
use mcmc_trace::stats::ChainTracker;

fn main() -> Result<(), Box<dyn Error>> {
    const N_STEPS: usize = 10_000;
    const SEED: u64 = 42;

    let target = classic_target();
    let algorithms = [
        Algorithm::MetropolisHastings {
            proposal_std_dev: 3.0,
        },
        Algorithm::Gibbs,
        Algorithm::Hmc {
            n_leapfrog: 20,
            step_size: 0.1,
        },
    ];

    for algorithm in algorithms {
        let session = Session::run_with_progress(target, algorithm, CLASSIC_START, N_STEPS, SEED)?;

        let mut tracker = ChainTracker::new();
        for rec in session.history() {
            tracker.step(rec);
        }
        let stats = tracker.stats();

        println!(
            "{algorithm:?}: {} records, acceptance rate {:.2}",
            session.history().len(),
            session.acceptance_rate()
        );
        println!(
            "  sample mean ({:.2}, {:.2}), sample std dev ({:.2}, {:.2})",
            stats.mean[0],
            stats.mean[1],
            stats.sm2[0].sqrt(),
            stats.sm2[1].sqrt()
        );
    }

    #[cfg(feature = "csv")]
    {
        let session = Session::run(
            target,
            Algorithm::Hmc {
                n_leapfrog: 20,
                step_size: 0.1,
            },
            CLASSIC_START,
            N_STEPS,
            SEED,
        )?;
        mcmc_trace::io::csv::save_history_csv(session.history(), "history.csv")?;
        mcmc_trace::io::csv::save_chain_path_csv(session.chain_path(), "chain_path.csv")?;
        println!("Saved history.csv and chain_path.csv");
    }

    Ok(())
}
