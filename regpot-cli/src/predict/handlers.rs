use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;
use serde::{Deserialize, Serialize};

use regpot_targets::{
    EcdfCurve, FactorInput, FactorPrediction, LabelScheme, MatchDiagnostics, PredictionTest,
    Target, direct_targets, ecdf_curves, predict_factors, test_predictions,
};

use crate::targets::handlers::TargetsInput;
use crate::utils::{load_config, read_json, write_output};

#[derive(Deserialize)]
#[serde(untagged)]
enum PredictInput {
    Factors(Vec<FactorInput>),
    Single(TargetsInput),
}

#[derive(Serialize)]
struct PredictOutput {
    targets: Vec<Target>,
    diagnostics: MatchDiagnostics,
    test: PredictionTest,
    curves: Vec<EcdfCurve>,
}

/// Per-factor outcome of a multi-factor run; exactly one of the two is set.
#[derive(Serialize)]
struct FactorReport {
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prediction: Option<FactorPrediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run_predict(matches: &ArgMatches) -> Result<()> {
    let input_path = matches
        .get_one::<String>("input")
        .context("--input is required")?;
    let output_path = matches.get_one::<String>("output");
    let config = load_config(matches.get_one::<String>("config"))?;

    match read_json::<PredictInput>(input_path)? {
        PredictInput::Single(input) => {
            let table = direct_targets(&input.peaks, &input.regions, &config)
                .context("Failed to rank targets")?;
            let test = test_predictions(&table, LabelScheme::Regulation, config.alternative)
                .context("Failed to test predictions")?;
            let curves = ecdf_curves(&table, &test.labels)?;

            let output = PredictOutput {
                targets: table.targets,
                diagnostics: table.diagnostics,
                test,
                curves,
            };
            write_output(&output, output_path)
        }
        PredictInput::Factors(inputs) => {
            let results = predict_factors(&inputs, &config);

            let reports: Vec<FactorReport> = inputs
                .iter()
                .zip(results)
                .map(|(input, result)| match result {
                    Ok(prediction) => FactorReport {
                        name: input.name.clone(),
                        prediction: Some(prediction),
                        error: None,
                    },
                    Err(e) => FactorReport {
                        name: input.name.clone(),
                        prediction: None,
                        error: Some(e.to_string()),
                    },
                })
                .collect();

            let failed = reports.iter().filter(|r| r.error.is_some()).count();
            info!("{} factors tested, {} failed", reports.len(), failed);

            write_output(&reports, output_path)
        }
    }
}
