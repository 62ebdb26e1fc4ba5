//! Descriptive statistics for replicate measurements.

use serde::{Deserialize, Serialize};

use crate::errors::{LabError, LabResult};

/// Summary of a set of replicate measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplicateSummary {
    pub values: Vec<f64>,
    pub mean: f64,
    /// Sample standard deviation (n − 1)
    pub stdev: f64,
}

impl ReplicateSummary {
    pub fn count(&self) -> usize {
        self.values.len()
    }

    /// Coefficient of variation in percent; `None` when the mean is zero
    pub fn cv_percent(&self) -> Option<f64> {
        (self.mean != 0.0).then(|| self.stdev / self.mean.abs() * 100.0)
    }
}

/// Mean and sample standard deviation of replicates.
pub fn summarize(values: &[f64]) -> LabResult<ReplicateSummary> {
    if let Some(v) = values.iter().find(|v| !v.is_finite()) {
        return Err(LabError::invalid_input("values", v.to_string(), "Values must be finite numbers"));
    }
    Ok(ReplicateSummary {
        values: values.to_vec(),
        mean: mean(values)?,
        stdev: sample_stdev(values)?,
    })
}

/// Arithmetic mean.
pub fn mean(values: &[f64]) -> LabResult<f64> {
    if values.is_empty() {
        return Err(LabError::invalid_input("values", "[]", "At least one value is required"));
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n − 1 denominator).
///
/// A single value has a standard deviation of zero.
pub fn sample_stdev(values: &[f64]) -> LabResult<f64> {
    let m = mean(values)?;
    if values.len() == 1 {
        return Ok(0.0);
    }
    let sum_sq: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Ok((sum_sq / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_stdev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values).unwrap(), 5.0);
        assert_abs_diff_eq!(sample_stdev(&values).unwrap(), 2.138, epsilon = 1e-3);
    }

    #[test]
    fn test_single_and_empty() {
        assert_eq!(sample_stdev(&[3.5]).unwrap(), 0.0);
        assert!(mean(&[]).is_err());
        assert!(sample_stdev(&[]).is_err());
    }

    #[test]
    fn test_summarize() {
        let summary = summarize(&[0.98, 1.02, 1.00]).unwrap();
        assert_eq!(summary.count(), 3);
        assert_abs_diff_eq!(summary.mean, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.stdev, 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(summary.cv_percent().unwrap(), 2.0, epsilon = 1e-9);

        assert_eq!(summarize(&[0.0, 0.0]).unwrap().cv_percent(), None);
        assert!(summarize(&[]).is_err());
        assert!(summarize(&[1.0, f64::NAN]).is_err());
    }
}
