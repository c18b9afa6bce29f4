//! Area under the piecewise curve drawn through a sample series.
//!
//! The chart only has discrete samples, never a function, so the area is
//! approximated. Sample `i` sits at `i * x_axis_scale` along the x-axis.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsError, AnalyticsResult};
use crate::processing::interpolation::resolve_heights;
use crate::state::sample_series::SampleSeries;

/// Ways of approximating the area under the curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// Rectangles with heights taken from each interval's left edge.
    LeftRiemann,
    /// Rectangles with heights taken from each interval's right edge.
    RightRiemann,
    /// Exact for constant and linear curves.
    #[default]
    Trapezoidal,
    /// Composite Simpson's 1/3 rule. Exact up to cubic curves.
    ParabolicSimpson,
}

impl IntegrationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            IntegrationMethod::LeftRiemann => "Left Riemann",
            IntegrationMethod::RightRiemann => "Right Riemann",
            IntegrationMethod::Trapezoidal => "Trapezoidal",
            IntegrationMethod::ParabolicSimpson => "Parabolic Simpson",
        }
    }

    pub fn min_points(&self) -> usize {
        match self {
            IntegrationMethod::ParabolicSimpson => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for IntegrationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "left-riemann" => Ok(IntegrationMethod::LeftRiemann),
            "right" | "right-riemann" => Ok(IntegrationMethod::RightRiemann),
            "trapezoidal" | "trapezoid" => Ok(IntegrationMethod::Trapezoidal),
            "simpson" | "parabolic-simpson" => Ok(IntegrationMethod::ParabolicSimpson),
            other => Err(format!("unknown integration method: {other}")),
        }
    }
}

/// Reject a zero, negative or non-finite x-axis scale.
pub fn validate_scale(x_axis_scale: f64) -> AnalyticsResult<()> {
    if x_axis_scale.is_finite() && x_axis_scale > 0.0 {
        Ok(())
    } else {
        Err(AnalyticsError::InvalidScale(x_axis_scale))
    }
}

/// Area under the curve through every position of `series`.
///
/// Absent samples are resolved first; see [`resolve_heights`] for how
/// `interpolate` affects them.
pub fn area_under_curve(
    series: &SampleSeries,
    method: IntegrationMethod,
    x_axis_scale: f64,
    interpolate: bool,
) -> AnalyticsResult<f64> {
    validate_scale(x_axis_scale)?;

    let required = method.min_points();
    if series.len() < required {
        return Err(AnalyticsError::InsufficientPoints {
            method: method.label(),
            required,
            actual: series.len(),
        });
    }

    let heights = resolve_heights(series, interpolate)?;
    let area = integrate_heights(&heights, method, x_axis_scale);
    tracing::debug!(method = method.label(), points = heights.len(), area, "area under curve");
    Ok(area)
}

/// Integrate already-resolved heights. `heights` must satisfy the method's
/// minimum point count.
pub fn integrate_heights(heights: &[f64], method: IntegrationMethod, h: f64) -> f64 {
    match method {
        IntegrationMethod::LeftRiemann => left_riemann(heights, h),
        IntegrationMethod::RightRiemann => right_riemann(heights, h),
        IntegrationMethod::Trapezoidal => trapezoidal(heights, h),
        IntegrationMethod::ParabolicSimpson => simpson(heights, h),
    }
}

fn left_riemann(y: &[f64], h: f64) -> f64 {
    y.windows(2).map(|w| w[0] * h).sum()
}

fn right_riemann(y: &[f64], h: f64) -> f64 {
    y.windows(2).map(|w| w[1] * h).sum()
}

fn trapezoidal(y: &[f64], h: f64) -> f64 {
    y.windows(2).map(|w| (w[0] + w[1]) / 2.0 * h).sum()
}

fn simpson(y: &[f64], h: f64) -> f64 {
    if y.len() < 3 {
        return trapezoidal(y, h);
    }

    let intervals = y.len() - 1;
    if intervals % 2 == 0 {
        return simpson_even(y, h);
    }

    // Odd interval count: Simpson over all but the last interval, which gets
    // a trapezoid.
    tracing::warn!(intervals, "odd interval count, last interval integrated as a trapezoid");
    let split = y.len() - 1;
    simpson_even(&y[..split], h) + trapezoidal(&y[split - 1..], h)
}

/// Composite Simpson 1/3 rule; `y.len() - 1` is even and at least 2.
fn simpson_even(y: &[f64], h: f64) -> f64 {
    let last = y.len() - 1;
    let interior: f64 = y[1..last]
        .iter()
        .enumerate()
        .map(|(i, v)| if i % 2 == 0 { 4.0 * v } else { 2.0 * v })
        .sum();
    h / 3.0 * (y[0] + interior + y[last])
}
