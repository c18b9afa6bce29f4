use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AnalyticsResult, ConfigError};
use crate::processing::correlation::CorrelationMethod;
use crate::processing::integration::{validate_scale, IntegrationMethod};
use crate::processing::statistics::Calculation;

/// Caller-side settings for area, correlation and reference-line queries.
/// Holds no sample data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Distance between two consecutive samples along the x-axis.
    pub x_axis_scale: f64,
    pub integration: IntegrationMethod,
    pub correlation: CorrelationMethod,
    /// Fill absent samples by linear interpolation before integrating.
    /// When false they count as zero height.
    pub interpolate_absent: bool,
    /// Statistic shown by the chart's horizontal reference line.
    pub reference_line: Calculation,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            x_axis_scale: 1.0,
            integration: IntegrationMethod::default(),
            correlation: CorrelationMethod::default(),
            interpolate_absent: true,
            reference_line: Calculation::default(),
        }
    }
}

impl AnalyticsConfig {
    pub fn validate(&self) -> AnalyticsResult<()> {
        validate_scale(self.x_axis_scale)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: AnalyticsConfig = serde_json::from_str(&json)?;
        config.validate()?;
        tracing::info!("Config loaded from {:?}", path);
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Config saved to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyticsError;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.x_axis_scale, 1.0);
        assert_eq!(config.integration, IntegrationMethod::Trapezoidal);
        assert_eq!(config.correlation, CorrelationMethod::Pearson);
        assert!(config.interpolate_absent);
        assert_eq!(config.reference_line, Calculation::Average);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let config: AnalyticsConfig =
            serde_json::from_str(r#"{"integration":"ParabolicSimpson"}"#).unwrap();
        assert_eq!(config.integration, IntegrationMethod::ParabolicSimpson);
        assert_eq!(config.x_axis_scale, 1.0);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analytics.json");
        let config = AnalyticsConfig {
            x_axis_scale: 0.25,
            interpolate_absent: false,
            reference_line: Calculation::Median,
            ..AnalyticsConfig::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AnalyticsConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_rejects_bad_scale() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, r#"{"x_axis_scale": -2.0}"#).unwrap();
        match AnalyticsConfig::load(&path) {
            Err(ConfigError::Invalid(AnalyticsError::InvalidScale(s))) => assert_eq!(s, -2.0),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let err = AnalyticsConfig::load(Path::new("/nonexistent/analytics.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
