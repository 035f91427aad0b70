use std::collections::BTreeMap;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use regpot_core::models::{Peak, Region};

use crate::config::EngineConfig;
use crate::ecdf::{Ecdf, EcdfPoint};
use crate::errors::{RegPotError, Result};
use crate::groups::{GroupLabel, LabelScheme, classify};
use crate::ks::{Alternative, KsResult, ks_test};
use crate::scoring::{TargetTable, direct_targets};

/// KS comparison of one group's score ranks against a reference group.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub group: GroupLabel,
    pub reference: GroupLabel,
    pub result: KsResult,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct PredictionTest {
    pub scheme: LabelScheme,
    /// One label per target, in table order.
    pub labels: Vec<GroupLabel>,
    pub comparisons: Vec<GroupComparison>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct EcdfCurve {
    pub label: GroupLabel,
    pub points: Vec<EcdfPoint>,
}

fn group_ranks(table: &TargetTable, labels: &[GroupLabel]) -> BTreeMap<GroupLabel, Vec<f64>> {
    let mut groups: BTreeMap<GroupLabel, Vec<f64>> = BTreeMap::new();
    for (target, label) in table.targets.iter().zip(labels) {
        groups
            .entry(*label)
            .or_default()
            .push(target.score_rank as f64);
    }
    groups
}

///
/// Test whether binding strength is associated with a direction of regulation.
///
/// Targets are split into three groups by their `stat`. The score ranks of the
/// top and of the bottom group are each compared with those of the middle
/// group. With [Alternative::Greater], a small p-value says the group's ranks
/// are smaller (its targets are more strongly bound) than the middle group's.
///
pub fn test_predictions(
    table: &TargetTable,
    scheme: LabelScheme,
    alternative: Alternative,
) -> Result<PredictionTest> {
    let labels = classify(&table.stats(), scheme)?;
    let groups = group_ranks(table, &labels);

    let reference = scheme.middle();
    let reference_ranks = groups.get(&reference).map(Vec::as_slice).unwrap_or(&[]);

    let mut comparisons = Vec::with_capacity(2);
    for group in [scheme.top(), scheme.bottom()] {
        let ranks = groups.get(&group).map(Vec::as_slice).unwrap_or(&[]);
        if ranks.is_empty() || reference_ranks.is_empty() {
            return Err(RegPotError::InsufficientData(format!(
                "cannot compare {} ({} targets) with {} ({} targets)",
                group,
                ranks.len(),
                reference,
                reference_ranks.len()
            )));
        }
        let result = ks_test(ranks, reference_ranks, alternative)?;
        info!(
            "{} vs {}: D = {:.4}, p = {:.4e} ({} vs {} targets)",
            group,
            reference,
            result.statistic,
            result.p_value,
            ranks.len(),
            reference_ranks.len()
        );
        comparisons.push(GroupComparison {
            group,
            reference,
            result,
        });
    }

    Ok(PredictionTest {
        scheme,
        labels,
        comparisons,
    })
}

/// Score-rank ECDF of each labelled group, bottom group first.
pub fn ecdf_curves(table: &TargetTable, labels: &[GroupLabel]) -> Result<Vec<EcdfCurve>> {
    if labels.len() != table.len() {
        return Err(RegPotError::InvalidInput(format!(
            "{} labels for {} targets",
            labels.len(),
            table.len()
        )));
    }

    group_ranks(table, labels)
        .into_iter()
        .map(|(label, ranks)| {
            Ok(EcdfCurve {
                label,
                points: Ecdf::new(&ranks)?.curve(),
            })
        })
        .collect()
}

/// One factor's binding and expression evidence.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FactorInput {
    pub name: String,
    pub peaks: Vec<Peak>,
    pub regions: Vec<Region>,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct FactorPrediction {
    pub name: String,
    pub table: TargetTable,
    pub test: PredictionTest,
    pub curves: Vec<EcdfCurve>,
}

/// Direct targets, the regulation test and the ECDF curves for one factor.
pub fn predict_factor(input: &FactorInput, config: &EngineConfig) -> Result<FactorPrediction> {
    let table = direct_targets(&input.peaks, &input.regions, config)?;
    let test = test_predictions(&table, LabelScheme::Regulation, config.alternative)?;
    let curves = ecdf_curves(&table, &test.labels)?;

    Ok(FactorPrediction {
        name: input.name.clone(),
        table,
        test,
        curves,
    })
}

/// Run [predict_factor] for independent factors in parallel. Results keep the
/// input order; one failing factor does not affect the others.
pub fn predict_factors(
    inputs: &[FactorInput],
    config: &EngineConfig,
) -> Vec<Result<FactorPrediction>> {
    inputs
        .par_iter()
        .map(|input| {
            predict_factor(input, config).inspect_err(|e| warn!("{}: {}", input.name, e))
        })
        .collect()
}
