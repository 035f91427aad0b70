use std::fs::read_to_string;
use std::path::Path;

use pretty_assertions::assert_eq;
use rstest::*;

use regpot_core::models::{GenomicInterval, Peak, Region, Strand};
use regpot_targets::{
    Alternative, EngineConfig, FactorInput, FactorRegions, GroupLabel, KsMethod, LabelScheme,
    associated_peaks, classify, combine, direct_targets, predict_factor, test_predictions,
};

#[fixture]
fn path_to_config() -> &'static str {
    "tests/data/engine.toml"
}

#[fixture]
fn yy1() -> FactorInput {
    let raw = read_to_string("tests/data/yy1.json").unwrap();
    serde_json::from_str(&raw).unwrap()
}

#[fixture]
fn yy2() -> FactorInput {
    let raw = read_to_string("tests/data/yy2.json").unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn peak(chr: &str, start: u32, end: u32, signal: f64) -> Peak {
    Peak::new(GenomicInterval::new(chr, start, end, Strand::Unknown).unwrap(), signal).unwrap()
}

fn region(chr: &str, start: u32, end: u32, id: &str, gene: &str) -> Region {
    Region::new(GenomicInterval::new(chr, start, end, Strand::Positive).unwrap(), id, gene)
}

mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    fn test_peak_on_anchor_scores_its_signal() {
        let peaks = vec![peak("chr1", 1000, 1000, 10.0)];
        let regions = vec![region("chr1", 1000, 2000, "T1", "G1").with_statistic("fc", 1.0)];

        let assigned = associated_peaks(&peaks, &regions, &EngineConfig::default()).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].distance, 0.0);
        assert_eq!(assigned[0].peak_score, 10.0);
    }

    #[rstest]
    fn test_gene_score_comes_from_its_best_region() {
        let peaks = vec![peak("chr1", 5000, 5000, 10.0)];
        let regions = vec![
            region("chr1", 1000, 9000, "T1", "G1").with_statistic("fc", 1.0),
            region("chr1", 5000, 9000, "T2", "G1").with_statistic("fc", 1.0),
        ];

        let table = direct_targets(&peaks, &regions, &EngineConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.targets[0].region_id, "T2");
        assert_eq!(table.targets[0].score, 10.0);
    }

    #[rstest]
    fn test_region_outside_window_does_not_contribute() {
        // T1's anchor is 295kb from the peak, beyond the 100kb default window
        let peaks = vec![peak("chr1", 5000, 5000, 10.0)];
        let regions = vec![
            region("chr1", 300_000, 309_000, "T1", "G1").with_statistic("fc", 1.0),
            region("chr1", 5000, 9000, "T2", "G1").with_statistic("fc", 1.0),
        ];

        let assigned = associated_peaks(&peaks, &regions, &EngineConfig::default()).unwrap();
        assert_eq!(assigned.len(), 1);
        assert_eq!(assigned[0].region_index, 1);

        let table = direct_targets(&peaks, &regions, &EngineConfig::default()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.targets[0].region_id, "T2");
        assert_eq!(table.targets[0].score, 10.0);
        assert_eq!(table.targets[0].n_peaks, 1);
    }

    #[rstest]
    fn test_invalid_peak_records_are_rejected_on_load() {
        let raw = r#"{
            "name": "bad",
            "peaks": [{"chr": "chr1", "start": 2000, "end": 1000, "signal": -5.0}],
            "regions": [{"chr": "chr1", "start": 1500, "end": 2500, "strand": "+",
                         "region_id": "T1", "gene_id": "G1", "statistics": {"fc": 1.0}}]
        }"#;
        assert!(serde_json::from_str::<FactorInput>(raw).is_err());

        let negative = raw.replace(r#""start": 2000, "end": 1000"#, r#""start": 1000, "end": 2000"#);
        assert!(serde_json::from_str::<FactorInput>(&negative).is_err());

        let valid = negative.replace("-5.0", "5.0");
        let input: FactorInput = serde_json::from_str(&valid).unwrap();
        assert_eq!(input.peaks[0].signal, 5.0);
    }

    #[rstest]
    fn test_empty_peaks_give_empty_results() {
        let regions = vec![region("chr1", 1000, 2000, "T1", "G1").with_statistic("fc", 1.0)];
        let config = EngineConfig::default();

        assert_eq!(associated_peaks(&[], &regions, &config).unwrap().len(), 0);
        assert_eq!(direct_targets(&[], &regions, &config).unwrap().len(), 0);
    }

    #[rstest]
    fn test_config_from_file(path_to_config: &str) {
        let config = EngineConfig::try_from(Path::new(path_to_config)).unwrap();
        assert_eq!(config.window(), 50_000);
        assert_eq!(config.alternative, Alternative::Greater);
    }

    #[rstest]
    fn test_single_factor_pipeline(yy1: FactorInput, path_to_config: &str) {
        let config = EngineConfig::try_from(Path::new(path_to_config)).unwrap();
        let prediction = predict_factor(&yy1, &config).unwrap();
        let table = &prediction.table;

        assert_eq!(table.len(), 9);
        assert_eq!(table.diagnostics.assigned_peaks, 9);
        assert_eq!(table.diagnostics.unmatched_expression, 1);

        // score_rank is a permutation of 1..N
        let mut score_ranks: Vec<usize> = table.targets.iter().map(|t| t.score_rank).collect();
        score_ranks.sort_unstable();
        assert_eq!(score_ranks, (1..=9).collect::<Vec<usize>>());

        let ids: Vec<&str> = table.targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["G1", "G2", "G3", "G4", "G5", "G6", "G7", "G8", "G9"]
        );

        let up = &prediction.test.comparisons[0];
        assert_eq!(up.group, GroupLabel::Up);
        assert_eq!(up.result.method, KsMethod::Exact);
        assert_eq!(up.result.statistic, 1.0);
        assert!(up.result.p_value < 0.1);

        for curve in &prediction.curves {
            assert!(curve.points.windows(2).all(|w| w[0].y <= w[1].y));
            assert_eq!(curve.points.last().map(|p| p.y), Some(1.0));
        }
    }

    #[rstest]
    fn test_two_factor_pipeline(yy1: FactorInput, yy2: FactorInput, path_to_config: &str) {
        let config = EngineConfig::try_from(Path::new(path_to_config)).unwrap();
        let combination = combine(
            &yy1.peaks,
            &yy2.peaks,
            FactorRegions {
                name: &yy1.name,
                regions: &yy1.regions,
            },
            FactorRegions {
                name: &yy2.name,
                regions: &yy2.regions,
            },
            "fc",
            &config,
        )
        .unwrap();

        assert_eq!(combination.shared_peaks.len(), 3);
        assert_eq!(combination.regions.len(), 3);

        let table = &combination.table;
        let ids: Vec<&str> = table.targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["G3", "G1", "G2"]);
        assert_eq!(table.targets[0].stat, 0.0);
        assert_eq!(table.targets[1].stat, 9.0);
        assert!((table.targets[2].stat + 8.7).abs() < 1e-9);

        let labels = classify(&table.stats(), LabelScheme::Interaction).unwrap();
        assert_eq!(
            labels,
            vec![
                GroupLabel::Neutral,
                GroupLabel::Cooperative,
                GroupLabel::Competitive
            ]
        );

        let test = test_predictions(table, LabelScheme::Interaction, config.alternative).unwrap();
        assert_eq!(test.comparisons.len(), 2);
        assert_eq!(test.comparisons[0].group, GroupLabel::Cooperative);
    }

    #[rstest]
    fn test_opposite_fold_changes_split_into_interaction_groups() {
        let labels = classify(&[2.0 * 3.0, 2.0 * -3.0, 0.0], LabelScheme::Interaction).unwrap();
        assert_eq!(labels[0], GroupLabel::Cooperative);
        assert_eq!(labels[1], GroupLabel::Competitive);
    }
}
