//! # Run configuration
//!
//! [`OverheadConfig`] names the input columns the correlator reads and the visibility
//! threshold. Every field has a default, so a TOML file only lists what it changes:
//!
//! ```toml
//! longitude_column = "longitude "
//! visibility_threshold_km = 1500.0
//! ```
use camino::Utf8Path;
use serde::Deserialize;

use crate::{
    constants::{Kilometer, VISIBILITY_THRESHOLD_KM},
    overhead_errors::OverheadError,
};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverheadConfig {
    /// Column holding the `M/D/YYYY H:MM` report timestamp
    pub datetime_column: String,
    /// Column holding the report latitude (degrees)
    pub latitude_column: String,
    /// Column holding the report longitude (degrees)
    pub longitude_column: String,
    /// Inclusive great-circle distance under which the satellite is flagged as overhead
    pub visibility_threshold_km: Kilometer,
}

impl Default for OverheadConfig {
    fn default() -> Self {
        OverheadConfig {
            datetime_column: "datetime".to_string(),
            latitude_column: "latitude".to_string(),
            longitude_column: "longitude".to_string(),
            visibility_threshold_km: VISIBILITY_THRESHOLD_KM,
        }
    }
}

impl OverheadConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, OverheadError> {
        let config: OverheadConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &Utf8Path) -> Result<Self, OverheadError> {
        let text = std::fs::read_to_string(path)?;
        OverheadConfig::from_toml_str(&text)
    }

    /// Reject thresholds that cannot compare against a distance.
    pub fn validate(&self) -> Result<(), OverheadError> {
        if self.visibility_threshold_km.is_finite() && self.visibility_threshold_km >= 0.0 {
            Ok(())
        } else {
            Err(OverheadError::InvalidThreshold(
                self.visibility_threshold_km,
            ))
        }
    }
}
