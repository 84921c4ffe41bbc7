use super::provider::{SeasonData, SEASON_DATA_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default season data path (~/.config/pickem/season.json)
pub fn get_season_path() -> PathBuf {
    crate::config::get_config_dir().join("season.json")
}

/// Load season data from a JSON file
///
/// If the file doesn't exist, returns an empty season.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_season(path: &Path) -> Result<SeasonData> {
    if !path.exists() {
        return Ok(SeasonData::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open season file at {}", path.display()))?;

    let data: SeasonData = serde_json::from_reader(file)
        .with_context(|| format!("Failed to load season data from {}", path.display()))?;

    if data.version != SEASON_DATA_VERSION {
        anyhow::bail!("Unsupported season data version: {}", data.version);
    }

    Ok(data)
}

/// Save season data to a JSON file atomically, creating the parent
/// directory if needed.
pub fn save_season(path: &Path, data: &SeasonData) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, data).context("Failed to serialize season data")?;

    file.commit().context("Failed to save season data")?;

    Ok(())
}
