use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::processing::integration::validate_scale;
use crate::processing::statistics::{mean_of, unit_deviations};
use crate::state::sample_series::SampleSeries;

/// Methods for measuring how closely the samples follow the x-axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum CorrelationMethod {
    #[default]
    Pearson,
}

impl CorrelationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "Pearson",
        }
    }
}

impl FromStr for CorrelationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pearson" => Ok(CorrelationMethod::Pearson),
            other => Err(format!("unknown correlation method: {other}")),
        }
    }
}

/// Qualitative bucket for a correlation coefficient in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    /// r >= 0.95
    PerfectPositive,
    /// 0.50 <= r < 0.95
    StrongPositive,
    /// 0.05 < r < 0.50
    WeakPositive,
    /// -0.05 <= r <= 0.05
    None,
    /// -0.50 < r < -0.05
    WeakNegative,
    /// -0.95 < r <= -0.50
    StrongNegative,
    /// r <= -0.95
    PerfectNegative,
}

impl CorrelationStrength {
    /// Classify a coefficient. NaN is reported as `None`.
    pub fn from_coefficient(r: f64) -> Self {
        if r >= 0.95 {
            CorrelationStrength::PerfectPositive
        } else if r >= 0.50 {
            CorrelationStrength::StrongPositive
        } else if r > 0.05 {
            CorrelationStrength::WeakPositive
        } else if r >= -0.05 {
            CorrelationStrength::None
        } else if r > -0.50 {
            CorrelationStrength::WeakNegative
        } else if r > -0.95 {
            CorrelationStrength::StrongNegative
        } else if r <= -0.95 {
            CorrelationStrength::PerfectNegative
        } else {
            CorrelationStrength::None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CorrelationStrength::PerfectPositive => "Perfect positive",
            CorrelationStrength::StrongPositive => "Strong positive",
            CorrelationStrength::WeakPositive => "Weak positive",
            CorrelationStrength::None => "None",
            CorrelationStrength::WeakNegative => "Weak negative",
            CorrelationStrength::StrongNegative => "Strong negative",
            CorrelationStrength::PerfectNegative => "Perfect negative",
        }
    }
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bucket a coefficient produced by [`correlation_coefficient`].
pub fn correlation_strength(coefficient: f64) -> CorrelationStrength {
    CorrelationStrength::from_coefficient(coefficient)
}

/// Correlation between x position and value over the present samples.
/// Each sample keeps its original index, placed at `index * x_axis_scale`.
pub fn correlation_coefficient(
    series: &SampleSeries,
    method: CorrelationMethod,
    x_axis_scale: f64,
) -> AnalyticsResult<f64> {
    validate_scale(x_axis_scale)?;

    let (x, y): (Vec<f64>, Vec<f64>) = series
        .present_points()
        .into_iter()
        .map(|(i, v)| (i as f64 * x_axis_scale, v))
        .unzip();

    correlation_coefficient_xy(&x, &y, method)
}

/// Correlation over caller-supplied x data instead of sample positions.
pub fn correlation_coefficient_xy(
    x: &[f64],
    y: &[f64],
    method: CorrelationMethod,
) -> AnalyticsResult<f64> {
    if x.len() != y.len() {
        return Err(AnalyticsError::MismatchedLengths {
            x: x.len(),
            y: y.len(),
        });
    }
    if y.len() < 2 {
        return Err(AnalyticsError::InsufficientPoints {
            method: method.label(),
            required: 2,
            actual: y.len(),
        });
    }

    let r = match method {
        CorrelationMethod::Pearson => pearson(x, y),
    };
    tracing::debug!(method = method.label(), points = y.len(), r, "correlation coefficient");
    Ok(r)
}

/// Correlation between two aligned series, using only the positions where
/// both carry a value.
pub fn paired_correlation(
    x: &SampleSeries,
    y: &SampleSeries,
    method: CorrelationMethod,
) -> AnalyticsResult<f64> {
    if x.len() != y.len() {
        return Err(AnalyticsError::MismatchedLengths {
            x: x.len(),
            y: y.len(),
        });
    }

    let (xs, ys): (Vec<f64>, Vec<f64>) = x
        .samples()
        .iter()
        .zip(y.samples())
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .unzip();

    correlation_coefficient_xy(&xs, &ys, method)
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let flat = |v: &[f64]| v.iter().all(|e| *e == v[0]);
    if flat(x) || flat(y) {
        tracing::warn!("zero variance, reporting no correlation");
        return 0.0;
    }

    // Unit-scaled deviations keep the sums of squares finite for any finite
    // input; r does not depend on the scale.
    let (dx, sx) = unit_deviations(x, mean_of(x));
    let (dy, sy) = unit_deviations(y, mean_of(y));
    if sx == 0.0 || sy == 0.0 {
        tracing::warn!("zero variance, reporting no correlation");
        return 0.0;
    }

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in dx.iter().zip(&dy) {
        cov += a * b;
        var_x += a * a;
        var_y += b * b;
    }

    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coeff(vals: &[f64]) -> f64 {
        correlation_coefficient(&SampleSeries::from_values(vals), CorrelationMethod::Pearson, 1.0)
            .unwrap()
    }

    #[test]
    fn test_perfect_positive_line() {
        let r = coeff(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((r - 1.0).abs() < 1e-12);
        assert_eq!(correlation_strength(r), CorrelationStrength::PerfectPositive);
    }

    #[test]
    fn test_perfect_negative_line() {
        let r = coeff(&[10.0, 8.0, 6.0, 4.0]);
        assert!((r + 1.0).abs() < 1e-12);
        assert_eq!(correlation_strength(r), CorrelationStrength::PerfectNegative);
    }

    #[test]
    fn test_constant_series_is_zero() {
        let r = coeff(&[3.0, 3.0, 3.0]);
        assert_eq!(r, 0.0);
        assert_eq!(correlation_strength(r), CorrelationStrength::None);
    }

    #[test]
    fn test_inexact_constant_is_exactly_zero() {
        for (value, scale) in [(0.1, 0.3), (0.7, 0.1), (1.1, 0.7)] {
            let s = SampleSeries::from_values(&[value; 7]);
            let r = correlation_coefficient(&s, CorrelationMethod::Pearson, scale).unwrap();
            assert_eq!(r, 0.0, "constant {value} at scale {scale}");
            assert_eq!(correlation_strength(r), CorrelationStrength::None);
        }
    }

    #[test]
    fn test_extreme_magnitudes_keep_perfect_line() {
        let huge = SampleSeries::from_values(&[1e160, 2e160, 3e160, 4e160]);
        let tiny = SampleSeries::from_values(&[1e-170, 2e-170, 3e-170, 4e-170]);
        let plain = SampleSeries::from_values(&[1.0, 2.0, 3.0, 4.0]);
        let cases = [(&huge, 1.0), (&plain, 1e300), (&tiny, 1e-170)];
        for (series, scale) in cases {
            let r = correlation_coefficient(series, CorrelationMethod::Pearson, scale).unwrap();
            assert!((r - 1.0).abs() < 1e-12, "r = {r} at scale {scale}");
            assert_eq!(correlation_strength(r), CorrelationStrength::PerfectPositive);
        }

        let falling = SampleSeries::from_values(&[f64::MAX, 0.0, -f64::MAX]);
        let r = correlation_coefficient(&falling, CorrelationMethod::Pearson, 1.0).unwrap();
        assert!((r + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_scale_does_not_change_coefficient() {
        let s = SampleSeries::from_values(&[1.0, 4.0, 2.0, 8.0]);
        let a = correlation_coefficient(&s, CorrelationMethod::Pearson, 1.0).unwrap();
        let b = correlation_coefficient(&s, CorrelationMethod::Pearson, 25.0).unwrap();
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_absent_samples_keep_their_position() {
        // Present points (0,0), (3,3): still a perfect line.
        let s = SampleSeries::from_samples(vec![Some(0.0), None, None, Some(3.0)]);
        let r = correlation_coefficient(&s, CorrelationMethod::Pearson, 1.0).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_errors() {
        let single = SampleSeries::from_values(&[1.0]);
        assert!(matches!(
            correlation_coefficient(&single, CorrelationMethod::Pearson, 1.0),
            Err(AnalyticsError::InsufficientPoints { required: 2, actual: 1, .. })
        ));
        let pair = SampleSeries::from_values(&[1.0, 2.0]);
        assert_eq!(
            correlation_coefficient(&pair, CorrelationMethod::Pearson, 0.0),
            Err(AnalyticsError::InvalidScale(0.0))
        );
        assert_eq!(
            correlation_coefficient_xy(&[1.0, 2.0], &[1.0], CorrelationMethod::Pearson),
            Err(AnalyticsError::MismatchedLengths { x: 2, y: 1 })
        );
    }

    #[test]
    fn test_explicit_x_data() {
        let x = [1.0, 2.0, 4.0, 8.0];
        let y = [2.0, 4.0, 8.0, 16.0];
        let r = correlation_coefficient_xy(&x, &y, CorrelationMethod::Pearson).unwrap();
        assert!((r - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_paired_skips_incomplete_positions() {
        let x = SampleSeries::from_samples(vec![Some(0.0), Some(1.0), None, Some(3.0)]);
        let y = SampleSeries::from_samples(vec![Some(5.0), None, Some(9.0), Some(-1.0)]);
        // only (0, 5) and (3, -1) are complete
        let r = paired_correlation(&x, &y, CorrelationMethod::Pearson).unwrap();
        assert!((r + 1.0).abs() < 1e-12);

        let short = SampleSeries::from_values(&[1.0]);
        assert_eq!(
            paired_correlation(&x, &short, CorrelationMethod::Pearson),
            Err(AnalyticsError::MismatchedLengths { x: 4, y: 1 })
        );
    }

    #[test]
    fn test_strength_buckets() {
        use CorrelationStrength::*;
        let cases = [
            (1.0, PerfectPositive),
            (0.95, PerfectPositive),
            (0.94, StrongPositive),
            (0.50, StrongPositive),
            (0.49, WeakPositive),
            (0.06, WeakPositive),
            (0.05, None),
            (0.0, None),
            (-0.05, None),
            (-0.06, WeakNegative),
            (-0.49, WeakNegative),
            (-0.50, StrongNegative),
            (-0.94, StrongNegative),
            (-0.95, PerfectNegative),
            (-1.0, PerfectNegative),
            (f64::NAN, None),
        ];
        for (r, expected) in cases {
            assert_eq!(correlation_strength(r), expected, "r = {r}");
        }
    }
}
