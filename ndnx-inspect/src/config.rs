//! Config file loading and merging with the command line.

use std::path::{Path, PathBuf};

use ndnx_tlv::SchemaVersion;
use serde::Deserialize;

/// File looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "ndnx-inspect.toml";

/// Configuration file format.
#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct ConfigFile {
    #[serde(default)]
    pub decode: DecodeSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct DecodeSection {
    pub schema: Option<SchemaVersion>,
    pub hex: Option<bool>,
}

#[derive(Debug, Deserialize, Default, PartialEq)]
pub struct LoggingSection {
    pub level: Option<String>,
    pub log_dir: Option<String>,
}

pub fn load_config(path: &Path) -> Result<ConfigFile, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&contents)?;
    Ok(config)
}

/// Explicit path, else `ndnx-inspect.toml` if it exists in `dir`.
pub fn config_path(explicit: Option<&Path>, dir: &Path) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(|| {
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Some(default_path)
        } else {
            None
        }
    })
}

/// Effective decode settings after merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeSettings {
    pub schema: SchemaVersion,
    pub hex: bool,
}

impl DecodeSettings {
    /// Command line takes precedence; `--hex` can only turn hex input on.
    pub fn merge(schema: Option<SchemaVersion>, hex: bool, file: &DecodeSection) -> Self {
        DecodeSettings {
            schema: schema.or(file.schema).unwrap_or_default(),
            hex: hex || file.hex.unwrap_or(false),
        }
    }
}

/// Log level: `--verbose` wins over the file, which wins over "info".
pub fn log_level(verbose: bool, file: &LoggingSection) -> String {
    if verbose {
        return crate::logging::default_level(true).to_string();
    }
    file.level
        .clone()
        .unwrap_or_else(|| crate::logging::default_level(false).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config: ConfigFile = toml::from_str(
            r#"
            [decode]
            schema = "legacy"
            hex = true

            [logging]
            level = "trace"
            log_dir = "logs"
            "#,
        )
        .unwrap();
        assert_eq!(config.decode.schema, Some(SchemaVersion::Legacy));
        assert_eq!(config.decode.hex, Some(true));
        assert_eq!(config.logging.level.as_deref(), Some("trace"));
        assert_eq!(config.logging.log_dir.as_deref(), Some("logs"));
    }

    #[test]
    fn test_missing_sections_default() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_bad_schema_rejected() {
        assert!(toml::from_str::<ConfigFile>("[decode]\nschema = \"v9\"\n").is_err());
    }

    #[test]
    fn test_command_line_wins() {
        let file = DecodeSection {
            schema: Some(SchemaVersion::Legacy),
            hex: Some(true),
        };
        let merged = DecodeSettings::merge(Some(SchemaVersion::Current), false, &file);
        assert_eq!(merged.schema, SchemaVersion::Current);
        assert!(merged.hex);

        let merged = DecodeSettings::merge(None, false, &DecodeSection::default());
        assert_eq!(
            merged,
            DecodeSettings {
                schema: SchemaVersion::Current,
                hex: false
            }
        );
    }

    #[test]
    fn test_log_level() {
        let file = LoggingSection {
            level: Some("warn".to_string()),
            log_dir: None,
        };
        assert_eq!(log_level(false, &file), "warn");
        assert_eq!(log_level(true, &file), "debug");
        assert_eq!(log_level(false, &LoggingSection::default()), "info");
    }

    #[test]
    fn test_config_path_lookup() {
        let dir = std::env::temp_dir().join(format!("ndnx-inspect-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        assert_eq!(config_path(None, &dir), None);

        let file = dir.join(DEFAULT_CONFIG_FILE);
        std::fs::write(&file, "[logging]\nlevel = \"warn\"\n").unwrap();
        assert_eq!(config_path(None, &dir), Some(file.clone()));
        assert_eq!(
            config_path(Some(Path::new("other.toml")), &dir),
            Some(PathBuf::from("other.toml"))
        );
        assert_eq!(load_config(&file).unwrap().logging.level.as_deref(), Some("warn"));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
