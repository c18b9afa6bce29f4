//! Analytics for line graphs: descriptive statistics, area under the curve
//! and correlation over an ordered series of samples, some of which may be
//! absent.
//!
//! ```
//! use graph_analytics::{GraphCalculator, Calculation, SampleSeries};
//!
//! let series = SampleSeries::from_samples(vec![Some(1.0), None, Some(3.0)]);
//! let calc = GraphCalculator::shared();
//! assert_eq!(calc.perform(Calculation::Average, &series).unwrap(), 2.0);
//! assert_eq!(calc.area(&series).unwrap(), 4.0);
//! ```

pub mod data;
pub mod error;
pub mod processing;
pub mod state;

pub use error::{AnalyticsError, AnalyticsResult, ConfigError, DataError};
pub use processing::calculator::GraphCalculator;
pub use processing::correlation::{
    correlation_coefficient, correlation_coefficient_xy, correlation_strength, paired_correlation,
    CorrelationMethod, CorrelationStrength,
};
pub use processing::integration::{area_under_curve, IntegrationMethod};
pub use processing::interpolation::resolve_heights;
pub use processing::statistics::{
    average, maximum, median, minimum, mode, perform, standard_deviation, sum, Calculation,
    SeriesStats,
};
pub use state::config::AnalyticsConfig;
pub use state::sample_series::{Sample, SampleSeries};
