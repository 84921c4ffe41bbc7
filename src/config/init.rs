use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use crate::config::{get_config_path, validate_config, Config};

/// Prompt user with a message and return their trimmed input.
fn prompt(message: &str) -> Result<String> {
    print!("{}", message);
    std::io::stdout()
        .flush()
        .context("Failed to flush stdout")?;
    let mut input = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut input)
        .context("Failed to read input")?;
    Ok(input.trim().to_string())
}

/// Prompt user with a message and a default value. Returns default if input is empty.
fn prompt_with_default(message: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}]: ", message, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

/// Prompt user with a yes/no question. Returns bool based on input and default.
fn prompt_yes_no(message: &str, default_yes: bool) -> Result<bool> {
    let hint = if default_yes { "Y/n" } else { "y/N" };
    let input = prompt(&format!("{} [{}]: ", message, hint))?;
    let input = input.to_lowercase();
    if input.is_empty() {
        Ok(default_yes)
    } else {
        Ok(input == "y" || input == "yes")
    }
}

/// Parse a comma- or space-separated list of point values, e.g. "1, 3, 5, 7".
pub fn parse_point_values(s: &str) -> Result<Vec<u32>, String> {
    let values = s
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .map_err(|_| format!("'{}' is not a whole number", part))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let config = Config {
        data_file: None,
        point_values: Some(values.clone()),
    };
    validate_config(&config).map_err(|errors| errors.join("; "))?;
    Ok(values)
}

/// Run the interactive init wizard to create a config file.
///
/// If `default_path` is Some, uses that as the config file path.
/// Otherwise, prompts the user with the default config path.
pub fn run_init_wizard(default_path: Option<PathBuf>) -> Result<()> {
    println!();
    println!("Pick'em Pool Configuration");
    println!("==========================");
    println!();

    // 1. Season data file
    println!("Games, weeks and picks are kept in a JSON season file.");
    let default_data = crate::season::get_season_path();
    let data_file = prompt_with_default("Season data file", &default_data.display().to_string())?;
    let data_file = PathBuf::from(data_file);

    // 2. Point values
    println!();
    println!("Each pick carries one of these point values. Weekly limits per value are set on each week.");
    let default_values = Config::default()
        .point_domain()
        .values()
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    let point_values = loop {
        let input = prompt_with_default("Point values", &default_values)?;
        match parse_point_values(&input) {
            Ok(values) => break values,
            Err(e) => println!("  Invalid: {}. Try again.", e),
        }
    };

    // 3. Config path
    let default_config_path = default_path.unwrap_or_else(get_config_path);
    println!();
    let path_str = prompt_with_default(
        "Where should the config be saved?",
        &default_config_path.display().to_string(),
    )?;
    let config_path = PathBuf::from(&path_str);

    if config_path.exists() {
        let overwrite = prompt_yes_no(
            &format!(
                "Config already exists at {}. Overwrite?",
                config_path.display()
            ),
            false,
        )?;
        if !overwrite {
            println!("Aborted.");
            return Ok(());
        }
    }

    // 4. Write config
    let config = Config {
        data_file: Some(data_file),
        point_values: Some(point_values),
    };
    write_config(&config_path, &config)?;

    println!();
    println!("Config written to {}", config_path.display());
    println!("Run `pickem generate-picks --year <YEAR>` once the season's games are loaded.");

    Ok(())
}

/// Serialize `config` as YAML to `path`, creating parent directories.
pub fn write_config(path: &Path, config: &Config) -> Result<()> {
    let yaml = serde_saphyr::to_string(config)
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    std::fs::write(path, &yaml)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_parse_point_values() {
        assert_eq!(parse_point_values("1, 3, 5, 7").unwrap(), vec![1, 3, 5, 7]);
        assert_eq!(parse_point_values("2 4  6").unwrap(), vec![2, 4, 6]);
    }

    #[test]
    fn test_parse_point_values_rejects_bad_input() {
        assert!(parse_point_values("1, x").unwrap_err().contains("'x'"));
        assert!(parse_point_values("1, 1").unwrap_err().contains("duplicate"));
        assert!(parse_point_values("").is_err());
    }

    #[test]
    fn test_write_config_then_load() {
        let path = env::temp_dir().join("pickem_test_init").join("config.yaml");
        let _ = std::fs::remove_file(&path);
        let config = Config {
            data_file: Some(PathBuf::from("/tmp/pickem-season.json")),
            point_values: Some(vec![1, 3, 5, 7]),
        };
        write_config(&path, &config).unwrap();
        let loaded = crate::config::load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);
        let _ = std::fs::remove_file(&path);
    }
}
