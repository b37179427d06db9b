use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

/// Startup configuration. Every field has a default, so a config file only
/// needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Dataset opened at startup.
    pub dataset_path: PathBuf,
    /// Initial cost-for-two ceiling.
    pub default_max_cost: f64,
    /// Upper end of the cost slider.
    pub cost_slider_max: f64,
    pub aggregation: AggregationConfig,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from("zomato.csv"),
            default_max_cost: 800.0,
            cost_slider_max: 3000.0,
            aggregation: AggregationConfig::default(),
        }
    }
}

/// Sizes of the ranked and grouped views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Rows in the top-rated table.
    pub top_n: usize,
    /// Bars in the cuisine distribution chart.
    pub cuisine_top: usize,
    /// Bars in the location chart.
    pub location_top: usize,
    /// Bins in the rating histogram.
    pub rating_bins: usize,
    /// `online_order` value counted as "delivers online".
    pub online_sentinel: String,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            top_n: 20,
            cuisine_top: 15,
            location_top: 20,
            rating_bins: 20,
            online_sentinel: "Yes".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl DashboardConfig {
    /// Read a JSON config file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.cost_slider_max.is_finite() && self.cost_slider_max > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "cost_slider_max must be positive, got {}",
                self.cost_slider_max
            )));
        }
        if !(0.0..=self.cost_slider_max).contains(&self.default_max_cost) {
            return Err(ConfigError::Invalid(format!(
                "default_max_cost {} outside 0..={}",
                self.default_max_cost, self.cost_slider_max
            )));
        }
        if self.aggregation.rating_bins == 0 {
            return Err(ConfigError::Invalid("rating_bins must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "{json}").unwrap();
        tmp
    }

    #[test]
    fn defaults_match_dashboard_layout() {
        let cfg = DashboardConfig::default();
        assert_eq!(cfg.default_max_cost, 800.0);
        assert_eq!(cfg.cost_slider_max, 3000.0);
        assert_eq!(cfg.aggregation.top_n, 20);
        assert_eq!(cfg.aggregation.cuisine_top, 15);
        assert_eq!(cfg.aggregation.location_top, 20);
        assert_eq!(cfg.aggregation.online_sentinel, "Yes");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let tmp = write_config(r#"{ "default_max_cost": 1200, "aggregation": { "top_n": 5 } }"#);
        let cfg = DashboardConfig::from_json_file(tmp.path()).unwrap();
        assert_eq!(cfg.default_max_cost, 1200.0);
        assert_eq!(cfg.aggregation.top_n, 5);
        assert_eq!(cfg.aggregation.cuisine_top, 15);
        assert_eq!(cfg.dataset_path, PathBuf::from("zomato.csv"));
    }

    #[test]
    fn out_of_range_ceiling_is_rejected() {
        let tmp = write_config(r#"{ "default_max_cost": 5000 }"#);
        let err = DashboardConfig::from_json_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let tmp = write_config("{ not json");
        let err = DashboardConfig::from_json_file(tmp.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DashboardConfig::from_json_file(Path::new("/nonexistent/dash.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
