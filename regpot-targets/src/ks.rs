//! Two-sample Kolmogorov–Smirnov test.
//!
//! Directions follow the usual convention for ECDF comparisons: `Greater` asks
//! whether the ECDF of the first sample lies above the second somewhere (the first
//! sample tends to hold *smaller* values), `Less` the reverse. Because a lower
//! `score_rank` means stronger binding, `Greater` on score ranks reads as "the
//! first group is more strongly bound".

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::errors::{RegPotError, Result};

/// Below this many `m * n` lattice cells, p-values are computed exactly.
pub const EXACT_CELL_LIMIT: usize = 10_000;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Alternative {
    TwoSided,
    #[default]
    Greater,
    Less,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum KsMethod {
    Exact,
    Asymptotic,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct KsResult {
    pub statistic: f64,
    pub p_value: f64,
    pub group_sizes: (usize, usize),
    pub alternative: Alternative,
    pub method: KsMethod,
}

/// Signed ECDF gaps of two sorted samples: `(sup(F_a - F_b), sup(F_b - F_a))`,
/// each floored at zero. Tied values are consumed together before comparing.
fn ecdf_gaps(a: &[f64], b: &[f64]) -> (f64, f64) {
    let (m, n) = (a.len() as f64, b.len() as f64);
    let (mut i, mut j) = (0usize, 0usize);
    let mut d_plus: f64 = 0.0;
    let mut d_minus: f64 = 0.0;

    while i < a.len() || j < b.len() {
        let x = match (a.get(i), b.get(j)) {
            (Some(&va), Some(&vb)) => va.min(vb),
            (Some(&va), None) => va,
            (None, Some(&vb)) => vb,
            (None, None) => break,
        };
        while i < a.len() && a[i] <= x {
            i += 1;
        }
        while j < b.len() && b[j] <= x {
            j += 1;
        }
        let gap = i as f64 / m - j as f64 / n;
        d_plus = d_plus.max(gap);
        d_minus = d_minus.max(-gap);
    }

    (d_plus, d_minus)
}

fn has_ties(a: &[f64], b: &[f64]) -> bool {
    let mut pooled: Vec<f64> = a.iter().chain(b.iter()).copied().collect();
    pooled.sort_by(f64::total_cmp);
    pooled.windows(2).any(|w| w[0] == w[1])
}

/// `P(D < statistic)` under the null by counting monotone lattice paths from
/// `(0, 0)` to `(m, n)` that never reach the statistic. `i` counts steps of the
/// first sample, `j` of the second. Values are kept normalised by
/// `C(i + n, n)` row by row so nothing overflows.
fn exact_null_cdf(statistic: f64, m: usize, n: usize, two_sided: bool) -> f64 {
    let (md, nd) = (m as f64, n as f64);
    // D * m * n is an integer; shifting by half a step keeps the comparison exact
    let q = (0.5 + (statistic * md * nd - 1e-7).floor()) / (md * nd);
    let outside = |i: usize, j: usize| {
        let gap = i as f64 / md - j as f64 / nd;
        if two_sided { gap.abs() > q } else { gap > q }
    };

    let mut u: Vec<f64> = (0..=n)
        .map(|j| if outside(0, j) { 0.0 } else { 1.0 })
        .collect();

    for i in 1..=m {
        let w = i as f64 / (i + n) as f64;
        u[0] = if outside(i, 0) { 0.0 } else { w * u[0] };
        for j in 1..=n {
            u[j] = if outside(i, j) {
                0.0
            } else {
                w * u[j] + u[j - 1]
            };
        }
    }

    u[n]
}

/// Upper tail of the limiting Kolmogorov distribution, `P(K > x)`.
fn kolmogorov_upper_tail(x: f64) -> f64 {
    if x <= 0.0 {
        return 1.0;
    }
    if x < 1.0 {
        // small-x form converges where the alternating series does not
        let z = -(PI * PI) / (8.0 * x * x);
        let w = x.ln();
        let s: f64 = (1..20)
            .step_by(2)
            .map(|k| ((k * k) as f64 * z - w).exp())
            .sum();
        1.0 - (2.0 * PI).sqrt() * s
    } else {
        let z = -2.0 * x * x;
        let mut sign = 1.0;
        let mut total = 0.0;
        for k in 1..=100 {
            let term = sign * ((k * k) as f64 * z).exp();
            total += term;
            if term.abs() < 1e-12 {
                break;
            }
            sign = -sign;
        }
        2.0 * total
    }
}

/// Two-sample Kolmogorov–Smirnov test of `a` against `b`.
///
/// The p-value is exact when `m * n` is below [EXACT_CELL_LIMIT] and the pooled
/// sample has no ties, asymptotic otherwise. Empty samples are an error: a KS
/// test on nothing has no meaning.
pub fn ks_test(a: &[f64], b: &[f64], alternative: Alternative) -> Result<KsResult> {
    if a.is_empty() || b.is_empty() {
        return Err(RegPotError::InsufficientData(format!(
            "KS test needs two non-empty samples, got sizes ({}, {})",
            a.len(),
            b.len()
        )));
    }
    if a.iter().chain(b.iter()).any(|v| !v.is_finite()) {
        return Err(RegPotError::InvalidInput(
            "KS test samples must be finite".to_string(),
        ));
    }

    let mut a_sorted = a.to_vec();
    let mut b_sorted = b.to_vec();
    a_sorted.sort_by(f64::total_cmp);
    b_sorted.sort_by(f64::total_cmp);

    let (d_plus, d_minus) = ecdf_gaps(&a_sorted, &b_sorted);
    let statistic = match alternative {
        Alternative::TwoSided => d_plus.max(d_minus),
        Alternative::Greater => d_plus,
        Alternative::Less => d_minus,
    };

    let (m, n) = (a.len(), b.len());
    let exact = m * n < EXACT_CELL_LIMIT && !has_ties(&a_sorted, &b_sorted);

    let p_value = if exact {
        let below = match alternative {
            Alternative::TwoSided => exact_null_cdf(statistic, m, n, true),
            Alternative::Greater => exact_null_cdf(statistic, m, n, false),
            // D-(a, b) is D+(b, a)
            Alternative::Less => exact_null_cdf(statistic, n, m, false),
        };
        1.0 - below
    } else {
        let en = (m * n) as f64 / (m + n) as f64;
        match alternative {
            Alternative::TwoSided => kolmogorov_upper_tail(en.sqrt() * statistic),
            Alternative::Greater | Alternative::Less => (-2.0 * en * statistic * statistic).exp(),
        }
    };

    Ok(KsResult {
        statistic,
        p_value: p_value.clamp(0.0, 1.0),
        group_sizes: (m, n),
        alternative,
        method: if exact {
            KsMethod::Exact
        } else {
            KsMethod::Asymptotic
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::*;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[rstest]
    fn test_identical_samples() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = ks_test(&a, &a, Alternative::TwoSided).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);
        // ties between the two copies force the asymptotic branch
        assert_eq!(result.method, KsMethod::Asymptotic);
    }

    #[rstest]
    fn test_fully_separated_samples_exact() {
        // choose(6, 3) = 20 orderings; a-before-b and b-before-a are the extremes
        let a = vec![1.0, 2.0, 3.0];
        let b = vec![4.0, 5.0, 6.0];

        let two_sided = ks_test(&a, &b, Alternative::TwoSided).unwrap();
        assert_eq!(two_sided.statistic, 1.0);
        assert_eq!(two_sided.method, KsMethod::Exact);
        assert!(close(two_sided.p_value, 0.1, 1e-9));

        let greater = ks_test(&a, &b, Alternative::Greater).unwrap();
        assert_eq!(greater.statistic, 1.0);
        assert!(close(greater.p_value, 0.05, 1e-9));

        let less = ks_test(&a, &b, Alternative::Less).unwrap();
        assert_eq!(less.statistic, 0.0);
        assert_eq!(less.p_value, 1.0);
    }

    #[rstest]
    fn test_exact_one_sided_small_case() {
        // a = {1, 3}, b = {2, 4}: D+ = 1/2, reached by 4 of the 6 orderings
        let result = ks_test(&[1.0, 3.0], &[2.0, 4.0], Alternative::Greater).unwrap();
        assert_eq!(result.statistic, 0.5);
        assert!(close(result.p_value, 2.0 / 3.0, 1e-9));
    }

    #[rstest]
    fn test_directional_symmetry() {
        let mut rng = StdRng::seed_from_u64(42);
        let a: Vec<f64> = (0..40).map(|_| rng.random_range(0.0..1.0)).collect();
        let b: Vec<f64> = (0..55).map(|_| rng.random_range(0.2..1.2)).collect();

        let ab = ks_test(&a, &b, Alternative::Greater).unwrap();
        let ba = ks_test(&b, &a, Alternative::Less).unwrap();
        assert_eq!(ab.statistic, ba.statistic);
        assert!(close(ab.p_value, ba.p_value, 1e-12));

        let two = ks_test(&a, &b, Alternative::TwoSided).unwrap();
        assert!(two.statistic >= ab.statistic);
    }

    #[rstest]
    fn test_shifted_sample_is_significant() {
        let a: Vec<f64> = (0..200).map(|x| x as f64).collect();
        let b: Vec<f64> = (0..200).map(|x| x as f64 + 100.5).collect();

        let result = ks_test(&a, &b, Alternative::Greater).unwrap();
        assert_eq!(result.method, KsMethod::Asymptotic);
        assert!(close(result.statistic, 0.505, 1e-9));
        assert!(result.p_value < 1e-10);

        let opposite = ks_test(&a, &b, Alternative::Less).unwrap();
        assert_eq!(opposite.statistic, 0.0);
        assert_eq!(opposite.p_value, 1.0);
    }

    #[rstest]
    fn test_ties_are_consumed_together() {
        let a = vec![1.0, 1.0, 2.0];
        let b = vec![1.0, 2.0, 2.0];
        let result = ks_test(&a, &b, Alternative::TwoSided).unwrap();
        assert!(close(result.statistic, 1.0 / 3.0, 1e-12));
    }

    #[rstest]
    fn test_kolmogorov_tail_is_continuous() {
        let left = kolmogorov_upper_tail(1.0 - 1e-9);
        let right = kolmogorov_upper_tail(1.0);
        assert!(close(left, right, 1e-6));
        assert!(close(kolmogorov_upper_tail(1.3581), 0.05, 1e-3));
    }

    #[rstest]
    fn test_empty_sample_is_an_error() {
        let result = ks_test(&[], &[1.0], Alternative::TwoSided);
        assert!(matches!(result, Err(RegPotError::InsufficientData(_))));
    }

    #[rstest]
    fn test_non_finite_is_an_error() {
        let result = ks_test(&[f64::NAN], &[1.0], Alternative::TwoSided);
        assert!(matches!(result, Err(RegPotError::InvalidInput(_))));
    }
}
