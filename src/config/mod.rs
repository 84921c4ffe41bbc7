pub mod init;
mod schema;
mod validation;

pub use schema::Config;
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the config directory path (~/.config/pickem/)
pub fn get_config_dir() -> PathBuf {
    match dirs::home_dir() {
        Some(home) => home.join(".config").join("pickem"),
        None => PathBuf::from(".pickem"),
    }
}

/// Get the default config file path (~/.config/pickem/config.yaml)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.yaml")
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/pickem/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = path.unwrap_or_else(get_config_path);

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `pickem init` to create one",
            config_path.display()
        );
    }

    let config_content = std::fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_load_missing_config() {
        let path = env::temp_dir().join("pickem_test_no_config.yaml");
        let _ = std::fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("pickem init"));
    }

    #[test]
    fn test_load_config_from_file() {
        let path = env::temp_dir().join("pickem_test_config.yaml");
        std::fs::write(&path, "point_values: [1, 2, 3]\n").unwrap();
        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.point_domain().values(), &[1, 2, 3]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let path = env::temp_dir().join("pickem_test_bad_config.yaml");
        std::fs::write(&path, "point_values: [1, 2\n").unwrap();
        assert!(load_config(Some(path.clone())).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
