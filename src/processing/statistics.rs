use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::state::sample_series::SampleSeries;

/// Single-number statistics that can be requested for a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Calculation {
    Sum,
    #[default]
    Average,
    Median,
    Mode,
    Minimum,
    Maximum,
    StandardDeviation,
}

impl Calculation {
    pub const ALL: [Calculation; 7] = [
        Calculation::Sum,
        Calculation::Average,
        Calculation::Median,
        Calculation::Mode,
        Calculation::Minimum,
        Calculation::Maximum,
        Calculation::StandardDeviation,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Calculation::Sum => "Sum",
            Calculation::Average => "Average",
            Calculation::Median => "Median",
            Calculation::Mode => "Mode",
            Calculation::Minimum => "Minimum",
            Calculation::Maximum => "Maximum",
            Calculation::StandardDeviation => "Std Dev",
        }
    }
}

impl fmt::Display for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Calculation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sum" => Ok(Calculation::Sum),
            "average" | "mean" | "avg" => Ok(Calculation::Average),
            "median" => Ok(Calculation::Median),
            "mode" => Ok(Calculation::Mode),
            "minimum" | "min" => Ok(Calculation::Minimum),
            "maximum" | "max" => Ok(Calculation::Maximum),
            "std-dev" | "stddev" | "standard-deviation" => Ok(Calculation::StandardDeviation),
            other => Err(format!("unknown calculation: {other}")),
        }
    }
}

/// Run the requested statistic over the present samples of `series`.
pub fn perform(calculation: Calculation, series: &SampleSeries) -> AnalyticsResult<f64> {
    match calculation {
        Calculation::Sum => sum(series),
        Calculation::Average => average(series),
        Calculation::Median => median(series),
        Calculation::Mode => mode(series),
        Calculation::Minimum => minimum(series),
        Calculation::Maximum => maximum(series),
        Calculation::StandardDeviation => standard_deviation(series),
    }
}

fn present(series: &SampleSeries) -> AnalyticsResult<Vec<f64>> {
    let vals = series.present_values();
    if vals.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }
    Ok(vals)
}

fn sorted(mut vals: Vec<f64>) -> Vec<f64> {
    vals.sort_by(|a, b| a.total_cmp(b));
    vals
}

pub fn sum(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(present(series)?.iter().sum())
}

pub fn average(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(mean_of(&present(series)?))
}

/// Mean of a non-empty slice. Each value is divided before summing so large
/// finite inputs do not overflow, and the result is held inside the value
/// range.
pub(crate) fn mean_of(vals: &[f64]) -> f64 {
    let count = vals.len() as f64;
    let (lo, hi) = vals
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    let mean: f64 = vals.iter().map(|v| v / count).sum();
    mean.clamp(lo, hi)
}

/// Deviations from `mean` divided by the largest of them, plus that divisor.
///
/// Values are halved first so `x - mean` stays finite across the whole f64
/// range; the divisor is in the same halved units. A zero divisor means every
/// value equals `mean`.
pub(crate) fn unit_deviations(vals: &[f64], mean: f64) -> (Vec<f64>, f64) {
    let half: Vec<f64> = vals.iter().map(|v| v * 0.5 - mean * 0.5).collect();
    let scale = half.iter().fold(0.0f64, |m, d| m.max(d.abs()));
    if scale == 0.0 {
        return (half, 0.0);
    }
    (half.into_iter().map(|d| d / scale).collect(), scale)
}

pub fn median(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(median_of_sorted(&sorted(present(series)?)))
}

fn median_of_sorted(vals: &[f64]) -> f64 {
    let count = vals.len();
    if count % 2 == 0 {
        (vals[count / 2 - 1] + vals[count / 2]) / 2.0
    } else {
        vals[count / 2]
    }
}

/// Most frequent present value. Ties resolve to the smallest candidate.
pub fn mode(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(mode_of_sorted(&sorted(present(series)?)))
}

fn mode_of_sorted(vals: &[f64]) -> f64 {
    let mut best = vals[0];
    let mut best_run = 0usize;
    let mut i = 0;
    while i < vals.len() {
        let start = i;
        while i < vals.len() && vals[i] == vals[start] {
            i += 1;
        }
        // strict `>` keeps the earlier (smaller) value on a tie
        if i - start > best_run {
            best_run = i - start;
            best = vals[start];
        }
    }
    best
}

/// Population standard deviation (divides by N, not N-1).
pub fn standard_deviation(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(population_std_dev(&present(series)?))
}

fn population_std_dev(vals: &[f64]) -> f64 {
    // identical values are exactly 0 even when the mean does not round-trip
    if vals.iter().all(|v| *v == vals[0]) {
        return 0.0;
    }
    let (unit, half_scale) = unit_deviations(vals, mean_of(vals));
    if half_scale == 0.0 {
        return 0.0;
    }
    let variance = unit.iter().map(|d| d * d).sum::<f64>() / vals.len() as f64;
    half_scale * (2.0 * variance.sqrt())
}

pub fn minimum(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(present(series)?.into_iter().fold(f64::INFINITY, f64::min))
}

pub fn maximum(series: &SampleSeries) -> AnalyticsResult<f64> {
    Ok(present(series)?.into_iter().fold(f64::NEG_INFINITY, f64::max))
}

/// Descriptive statistics for a sample series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesStats {
    pub count: usize,
    pub absent: usize,
    pub min: f64,
    pub max: f64,
    pub range: f64,
    pub sum: f64,
    pub mean: f64,
    pub median: f64,
    pub mode: f64,
    pub std_dev: f64,
}

impl SeriesStats {
    /// Compute every statistic from the present samples in one sort.
    pub fn compute(series: &SampleSeries) -> AnalyticsResult<Self> {
        let vals = sorted(present(series)?);

        let count = vals.len();
        let min = vals[0];
        let max = vals[count - 1];
        let sum: f64 = vals.iter().sum();

        Ok(SeriesStats {
            count,
            absent: series.absent_count(),
            min,
            max,
            range: max - min,
            sum,
            mean: mean_of(&vals),
            median: median_of_sorted(&vals),
            mode: mode_of_sorted(&vals),
            std_dev: population_std_dev(&vals),
        })
    }

    pub fn get(&self, calculation: Calculation) -> f64 {
        match calculation {
            Calculation::Sum => self.sum,
            Calculation::Average => self.mean,
            Calculation::Median => self.median,
            Calculation::Mode => self.mode,
            Calculation::Minimum => self.min,
            Calculation::Maximum => self.max,
            Calculation::StandardDeviation => self.std_dev,
        }
    }

    /// Format as a multi-line report string.
    pub fn report(&self, label: &str) -> String {
        format!(
            "{}:\n  Count: {} ({} absent)\n  Min: {:.3}\n  Max: {:.3}\n  Range: {:.3}\n  Sum: {:.3}\n  Mean: {:.3}\n  Median: {:.3}\n  Mode: {:.3}\n  Std Dev: {:.3}\n",
            label, self.count, self.absent, self.min, self.max, self.range, self.sum, self.mean, self.median, self.mode, self.std_dev
        )
    }
}
