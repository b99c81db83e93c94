//! Configuration file handling
//!
//! The rc file lives at `~/.leadboard/rc` and holds `key=value` lines:
//!
//! ```text
//! # where the board database lives (relative paths resolve against ~/.leadboard)
//! data.location=./board.db
//! # advisory WIP limits
//! wip.proposal=8
//! wip.negotiation=none
//! ```

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use crate::models::{Stage, WipLimits};

#[derive(Debug, Clone)]
pub struct Config {
    pub data_location: PathBuf,
    pub wip: WipLimits,
}

impl Config {
    /// Configuration directory (`~/.leadboard`)
    pub fn config_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(".leadboard"))
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("rc"))
    }

    /// Load the rc file, falling back to defaults when it does not exist
    pub fn load() -> Result<Self> {
        let config_dir = Self::config_dir()?;
        let config_path = config_dir.join("rc");
        let default_db = config_dir.join("board.db");

        if !config_path.exists() {
            log::debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self {
                data_location: default_db,
                wip: WipLimits::default(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
        Self::parse(&contents, &config_dir, default_db)
            .with_context(|| format!("Invalid config file: {}", config_path.display()))
    }

    /// Parse rc file contents. Relative data paths resolve against `base_dir`.
    pub fn parse(contents: &str, base_dir: &Path, default_db: PathBuf) -> Result<Self> {
        let mut config = Self {
            data_location: default_db,
            wip: WipLimits::default(),
        };

        for (idx, raw) in contents.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                anyhow::bail!("line {}: expected key=value, got '{}'", line_no, line);
            };
            let key = key.trim();
            let value = value.trim();

            if key == "data.location" {
                let path = PathBuf::from(value);
                config.data_location = if path.is_relative() {
                    base_dir.join(path)
                } else {
                    path
                };
            } else if let Some(stage_name) = key.strip_prefix("wip.") {
                let stage = Stage::from_str(stage_name)
                    .with_context(|| format!("line {}: unknown stage '{}'", line_no, stage_name))?;
                let limit = if value.eq_ignore_ascii_case("none") {
                    None
                } else {
                    let parsed = value.parse::<usize>().with_context(|| {
                        format!("line {}: WIP limit must be a whole number or 'none', got '{}'", line_no, value)
                    })?;
                    Some(parsed)
                };
                if !config.wip.set(stage, limit) {
                    log::warn!("line {}: {} is a terminal stage and has no WIP limit; ignored", line_no, stage);
                }
            } else {
                log::warn!("line {}: unknown config key '{}' ignored", line_no, key);
            }
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_defaults() {
        let base = Path::new("/home/test/.leadboard");
        let config = Config::parse("", base, base.join("board.db")).unwrap();
        assert_eq!(config.data_location, base.join("board.db"));
        assert_eq!(config.wip, WipLimits::default());
    }

    #[test]
    fn test_parse_relative_and_absolute_location() {
        let base = Path::new("/home/test/.leadboard");
        let config = Config::parse("data.location=./custom.db\n", base, base.join("board.db")).unwrap();
        assert_eq!(config.data_location, base.join("./custom.db"));

        let config = Config::parse("data.location=/var/lib/board.db\n", base, base.join("board.db")).unwrap();
        assert_eq!(config.data_location, PathBuf::from("/var/lib/board.db"));
    }

    #[test]
    fn test_parse_wip_overrides() {
        let base = Path::new("/tmp");
        let contents = "# limits\nwip.proposal = 3\nwip.negotiation=none\nwip.won=4\n";
        let config = Config::parse(contents, base, base.join("board.db")).unwrap();
        assert_eq!(config.wip.get(Stage::Proposal), Some(3));
        assert_eq!(config.wip.get(Stage::Negotiation), None);
        assert_eq!(config.wip.get(Stage::Won), None);
        assert_eq!(config.wip.get(Stage::New), Stage::New.default_wip_limit());
    }

    #[test]
    fn test_parse_errors_name_the_line() {
        let base = Path::new("/tmp");
        let err = Config::parse("\nwip.proposal=lots\n", base, base.join("board.db")).unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));

        let err = Config::parse("wip.closed=3\n", base, base.join("board.db")).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown stage"));

        assert!(Config::parse("garbage\n", base, base.join("board.db")).is_err());
    }

    #[test]
    fn test_parse_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("rc");
        std::fs::write(&config_file, "data.location=./custom.db\nwip.new=2\n").unwrap();

        let contents = std::fs::read_to_string(&config_file).unwrap();
        let config = Config::parse(&contents, temp_dir.path(), temp_dir.path().join("board.db")).unwrap();
        assert_eq!(config.data_location, temp_dir.path().join("./custom.db"));
        assert_eq!(config.wip.get(Stage::New), Some(2));
    }
}
