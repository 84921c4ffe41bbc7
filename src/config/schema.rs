use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::season::types::PointDomain;

/// Pool configuration.
///
/// Example YAML:
/// ```yaml
/// data_file: /srv/pickem/season.json
/// point_values: [1, 3, 5, 7]
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Season data file (default: ~/.config/pickem/season.json)
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Point values a pick may carry (default: 1, 3, 5, 7)
    #[serde(default)]
    pub point_values: Option<Vec<u32>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: None,
            point_values: Some(PointDomain::default().values().to_vec()),
        }
    }
}

impl Config {
    pub fn data_path(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(crate::season::get_season_path)
    }

    pub fn point_domain(&self) -> PointDomain {
        match &self.point_values {
            Some(values) => PointDomain::new(values.clone()),
            None => PointDomain::default(),
        }
    }
}
