mod error;
mod preferences;
mod report;
mod solver;
mod types;

pub use error::{Error, Result};
pub use report::{read_report, write_report};
pub use types::{Assignment, Division, GroupAssignment, Preferences, Settings};

use std::path::Path;

/// Load preferences from `input`, solve the assignment and write the report
/// to `output`.
pub fn run(input: &Path, output: &Path, settings: &Settings) -> Result<Assignment> {
    let preferences = Preferences::load(input)?;
    let assignment = preferences.solve(settings)?;
    assignment.save(output)?;
    Ok(assignment)
}
