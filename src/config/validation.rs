use super::schema::Config;
use std::collections::HashSet;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref values) = config.point_values {
        if values.is_empty() {
            errors.push("point_values: must list at least one value".to_string());
        }
        let mut seen = HashSet::new();
        for (i, value) in values.iter().enumerate() {
            if *value == 0 {
                errors.push(format!("point_values[{}]: must be positive", i));
            }
            if !seen.insert(*value) {
                errors.push(format!("point_values[{}]: duplicate value {}", i, value));
            }
        }
    }

    if let Some(ref path) = config.data_file {
        if path.as_os_str().is_empty() {
            errors.push("data_file: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
