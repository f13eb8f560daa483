use std::collections::HashSet;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one station is configured
/// - Station ids are unique
/// - Every capacity is >= 1
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.stations.is_empty() {
        return Err(ConfigError::ValidationError(
            "at least one station must be configured".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for station in &config.stations {
        if station.id.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "station id cannot be empty".to_string(),
            ));
        }
        if !seen.insert(station.id.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "duplicate station id: {}",
                station.id
            )));
        }
        if station.capacity == 0 {
            return Err(ConfigError::ValidationError(format!(
                "station {} capacity cannot be 0",
                station.id
            )));
        }
    }

    Ok(())
}
