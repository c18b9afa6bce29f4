use std::sync::OnceLock;

use crate::error::AnalyticsResult;
use crate::processing::correlation::{self, CorrelationStrength};
use crate::processing::integration;
use crate::processing::statistics::{self, Calculation, SeriesStats};
use crate::state::config::AnalyticsConfig;
use crate::state::sample_series::SampleSeries;

/// Entry point for a chart asking for its numbers.
///
/// The calculator only carries an [`AnalyticsConfig`]. The series is passed
/// in on every call and never retained, so one instance can serve any number
/// of charts and threads.
#[derive(Debug, Clone, Default)]
pub struct GraphCalculator {
    config: AnalyticsConfig,
}

impl GraphCalculator {
    pub fn new(config: AnalyticsConfig) -> Self {
        Self { config }
    }

    /// Process-wide calculator using the default configuration.
    pub fn shared() -> &'static GraphCalculator {
        static SHARED: OnceLock<GraphCalculator> = OnceLock::new();
        SHARED.get_or_init(GraphCalculator::default)
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn perform(&self, calculation: Calculation, series: &SampleSeries) -> AnalyticsResult<f64> {
        let value = statistics::perform(calculation, series)?;
        tracing::debug!(calculation = calculation.label(), value, "statistic computed");
        Ok(value)
    }

    pub fn summary(&self, series: &SampleSeries) -> AnalyticsResult<SeriesStats> {
        SeriesStats::compute(series)
    }

    /// Area under the curve with the configured method, scale and absent
    /// sample policy.
    pub fn area(&self, series: &SampleSeries) -> AnalyticsResult<f64> {
        integration::area_under_curve(
            series,
            self.config.integration,
            self.config.x_axis_scale,
            self.config.interpolate_absent,
        )
    }

    pub fn correlation(&self, series: &SampleSeries) -> AnalyticsResult<f64> {
        correlation::correlation_coefficient(
            series,
            self.config.correlation,
            self.config.x_axis_scale,
        )
    }

    pub fn correlation_strength_for(
        &self,
        series: &SampleSeries,
    ) -> AnalyticsResult<CorrelationStrength> {
        self.correlation(series).map(correlation::correlation_strength)
    }

    /// Y-value of the chart's horizontal reference line.
    pub fn reference_line_value(&self, series: &SampleSeries) -> AnalyticsResult<f64> {
        self.perform(self.config.reference_line, series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;
    use crate::processing::integration::IntegrationMethod;

    #[test]
    fn test_shared_is_memoized() {
        let a = GraphCalculator::shared() as *const GraphCalculator;
        let b = GraphCalculator::shared() as *const GraphCalculator;
        assert_eq!(a, b);
        assert_eq!(GraphCalculator::shared().config(), &AnalyticsConfig::default());
    }

    #[test]
    fn test_uses_configured_method_and_scale() {
        let calc = GraphCalculator::new(AnalyticsConfig {
            x_axis_scale: 2.0,
            integration: IntegrationMethod::RightRiemann,
            ..AnalyticsConfig::default()
        });
        let series = SampleSeries::from_values(&[0.0, 10.0]);
        assert_eq!(calc.area(&series).unwrap(), 20.0);
    }

    #[test]
    fn test_configured_interpolation_toggle() {
        let series = SampleSeries::from_samples(vec![Some(4.0), None, Some(4.0)]);
        let on = GraphCalculator::default();
        let off = GraphCalculator::new(AnalyticsConfig {
            interpolate_absent: false,
            ..AnalyticsConfig::default()
        });
        assert_eq!(on.area(&series).unwrap(), 8.0);
        assert_eq!(off.area(&series).unwrap(), 4.0);
    }

    #[test]
    fn test_reference_line_follows_config() {
        let series = SampleSeries::from_values(&[1.0, 2.0, 9.0]);
        let calc = GraphCalculator::new(AnalyticsConfig {
            reference_line: Calculation::Median,
            ..AnalyticsConfig::default()
        });
        assert_eq!(calc.reference_line_value(&series).unwrap(), 2.0);
        assert_eq!(GraphCalculator::shared().reference_line_value(&series).unwrap(), 4.0);
    }

    #[test]
    fn test_strength_for_series() {
        let calc = GraphCalculator::shared();
        let rising = SampleSeries::from_values(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(
            calc.correlation_strength_for(&rising).unwrap(),
            CorrelationStrength::PerfectPositive
        );
        assert_eq!(
            calc.correlation_strength_for(&SampleSeries::default()),
            Err(AnalyticsError::InsufficientPoints {
                method: "Pearson",
                required: 2,
                actual: 0
            })
        );
    }

    #[test]
    fn test_invalid_config_scale_surfaces_per_call() {
        let calc = GraphCalculator::new(AnalyticsConfig {
            x_axis_scale: 0.0,
            ..AnalyticsConfig::default()
        });
        let series = SampleSeries::from_values(&[1.0, 2.0]);
        assert_eq!(calc.area(&series), Err(AnalyticsError::InvalidScale(0.0)));
        assert_eq!(calc.correlation(&series), Err(AnalyticsError::InvalidScale(0.0)));
        // statistics do not depend on the scale
        assert_eq!(calc.perform(Calculation::Sum, &series).unwrap(), 3.0);
    }
}
