/*!
# CSV Export for Histories and Chain Paths

Saves a run's step records or its realized chain path to CSV for external
plotting. Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;

use csv::Writer;

use crate::core::{Point, StepRecord};

/// Saves a history as CSV with one row per step record.
///
/// Columns: `step`, `start_x`, `start_y`, `proposal_x`, `proposal_y`,
/// `accepted`. HMC trajectories are not included here; see
/// [`save_trajectories_csv`].
pub fn save_history_csv(history: &[StepRecord], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record([
        "step",
        "start_x",
        "start_y",
        "proposal_x",
        "proposal_y",
        "accepted",
    ])?;
    for (step, rec) in history.iter().enumerate() {
        wtr.write_record([
            step.to_string(),
            rec.start.x.to_string(),
            rec.start.y.to_string(),
            rec.proposal.x.to_string(),
            rec.proposal.y.to_string(),
            rec.accepted.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Saves a chain path as CSV with columns `step`, `x`, `y`.
pub fn save_chain_path_csv(path: &[Point], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["step", "x", "y"])?;
    for (step, point) in path.iter().enumerate() {
        wtr.write_record([step.to_string(), point.x.to_string(), point.y.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Saves the leapfrog trajectories of an HMC history as CSV with columns
/// `step`, `leapfrog`, `x`, `y`. Records without a trajectory (MH/Gibbs)
/// contribute no rows.
pub fn save_trajectories_csv(history: &[StepRecord], filename: &str) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);
    wtr.write_record(["step", "leapfrog", "x", "y"])?;
    for (step, rec) in history.iter().enumerate() {
        if let Some(trajectory) = &rec.trajectory {
            for (i, q) in trajectory.iter().enumerate() {
                wtr.write_record([
                    step.to_string(),
                    i.to_string(),
                    q.x.to_string(),
                    q.y.to_string(),
                ])?;
            }
        }
    }
    wtr.flush()?;
    Ok(())
}
