use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

pub const CONFIG_FILE: &str = "sessed.toml";

/// Tunables read from `sessed.toml` in the state directory. Every field is
/// optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub default_window: usize,
    pub search_radius: usize,
    pub search_max_hits: usize,
    pub scroll_span: usize,
    pub scroll_down_overlap: usize,
    pub scroll_up_back: usize,
    pub summary_max_defs: usize,
    pub summary_max_lines: usize,
    pub rewrite_context: usize,
    pub max_trials: u32,
    pub validate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_window: 10,
            search_radius: 2,
            search_max_hits: 25,
            scroll_span: 20,
            scroll_down_overlap: 3,
            scroll_up_back: 16,
            summary_max_defs: 20,
            summary_max_lines: 100,
            rewrite_context: 5,
            max_trials: 5,
            validate: true,
        }
    }
}

impl Config {
    pub async fn load(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join(CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str("search_radius = 4\nvalidate = false\n").unwrap();
        assert_eq!(config.search_radius, 4);
        assert!(!config.validate);
        assert_eq!(config.default_window, 10);
        assert_eq!(config.scroll_span, 20);
    }
}
