use serde::{Deserialize, Serialize};

use crate::errors::{RegPotError, Result};

///
/// Empirical cumulative distribution function of a sample.
///
/// `eval(x)` is the fraction of sample values `<= x`: non-decreasing,
/// right-continuous, 0 below the minimum and 1 from the maximum on.
///
#[derive(Debug, Clone, PartialEq)]
pub struct Ecdf {
    sorted: Vec<f64>,
}

/// One step of an ECDF: at `x` the function jumps to `y`.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
pub struct EcdfPoint {
    pub x: f64,
    pub y: f64,
}

impl Ecdf {
    pub fn new(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(RegPotError::InsufficientData(
                "cannot build an ECDF from an empty sample".to_string(),
            ));
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RegPotError::InvalidInput(
                "ECDF values must be finite".to_string(),
            ));
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Ok(Ecdf { sorted })
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn eval(&self, x: f64) -> f64 {
        let at_or_below = self.sorted.partition_point(|&v| v <= x);
        at_or_below as f64 / self.sorted.len() as f64
    }

    /// The jump points of the step function, one per distinct value.
    pub fn curve(&self) -> Vec<EcdfPoint> {
        let n = self.sorted.len() as f64;
        let mut points: Vec<EcdfPoint> = Vec::new();
        for (i, &x) in self.sorted.iter().enumerate() {
            let y = (i + 1) as f64 / n;
            match points.last_mut() {
                Some(last) if last.x == x => last.y = y,
                _ => points.push(EcdfPoint { x, y }),
            }
        }
        points
    }
}
