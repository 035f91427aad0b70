use anyhow::{Context, Result};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use regpot_core::models::{Peak, Region};
use regpot_targets::{AssignedPeak, MatchDiagnostics, Target, associated_peaks, targets_from_assigned};

use crate::utils::{load_config, read_json, write_output};

/// Binding and expression evidence of one factor.
#[derive(Deserialize)]
pub struct TargetsInput {
    pub peaks: Vec<Peak>,
    pub regions: Vec<Region>,
}

#[derive(Serialize)]
struct TargetsOutput {
    assigned_peaks: Vec<AssignedPeak>,
    targets: Vec<Target>,
    diagnostics: MatchDiagnostics,
}

pub fn run_targets(matches: &ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    let config = load_config(matches.get_one::<String>("config"))?;
    let input: TargetsInput = read_json(input_path)?;

    let assigned_peaks = associated_peaks(&input.peaks, &input.regions, &config)
        .context("Failed to assign peaks to regions")?;
    let table = targets_from_assigned(&assigned_peaks, &input.regions, &config)
        .context("Failed to rank targets")?;

    let output = TargetsOutput {
        assigned_peaks,
        targets: table.targets,
        diagnostics: table.diagnostics,
    };

    write_output(&output, matches.get_one::<String>("output"))
}
