use anyhow::{Context, Result};
use clap::ArgMatches;
use log::warn;
use serde::{Deserialize, Serialize};

use regpot_core::models::{Peak, Region};
use regpot_targets::{
    FactorInput, FactorRegions, LabelScheme, MatchDiagnostics, PredictionTest, Target, combine,
    test_predictions,
};

use crate::utils::{load_config, read_json, write_output};

#[derive(Deserialize)]
struct CombineInput {
    factor_a: FactorInput,
    factor_b: FactorInput,
}

#[derive(Serialize)]
struct CombineOutput {
    shared_peaks: Vec<Peak>,
    regions: Vec<Region>,
    targets: Vec<Target>,
    diagnostics: MatchDiagnostics,
    /// Missing when the shared targets cannot be split into three groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    test: Option<PredictionTest>,
}

pub fn run_combine(matches: &ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    let fc_key = matches
        .get_one::<String>("fc")
        .context("--fc is required")?;
    let config = load_config(matches.get_one::<String>("config"))?;
    let input: CombineInput = read_json(input_path)?;

    let (a, b) = (&input.factor_a, &input.factor_b);
    let combination = combine(
        &a.peaks,
        &b.peaks,
        FactorRegions {
            name: &a.name,
            regions: &a.regions,
        },
        FactorRegions {
            name: &b.name,
            regions: &b.regions,
        },
        fc_key,
        &config,
    )
    .with_context(|| format!("Failed to combine {} and {}", a.name, b.name))?;

    let test = match test_predictions(
        &combination.table,
        LabelScheme::Interaction,
        config.alternative,
    ) {
        Ok(test) => Some(test),
        Err(e) => {
            warn!("Skipping interaction test: {}", e);
            None
        }
    };

    let output = CombineOutput {
        shared_peaks: combination.shared_peaks,
        regions: combination.regions,
        targets: combination.table.targets,
        diagnostics: combination.table.diagnostics,
        test,
    };

    write_output(&output, matches.get_one::<String>("output"))
}
