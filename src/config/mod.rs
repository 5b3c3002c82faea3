pub mod init;
mod schema;

pub use schema::{Config, ProviderConfig, ReportConfig, ServerConfig, VerifyConfig};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::facility::Facility;

/// Get the config directory path (~/.config/yard-velocity/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("yard-velocity"))
}

/// Get the default config file path (~/.config/yard-velocity/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found at {}", path.display());
            }
            path
        }
        None => {
            let default_path = get_config_path()?;
            if !default_path.exists() {
                tracing::debug!(path = %default_path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            default_path
        }
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(path = %config_path.display(), "loaded config");
    Ok(config)
}

/// Load a target list from a YAML file containing a sequence of facilities.
pub fn load_targets(path: &Path) -> Result<Vec<Facility>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read targets file at {}", path.display()))?;
    let targets: Vec<Facility> = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse targets: invalid YAML in {}", path.display()))?;
    if targets.is_empty() {
        anyhow::bail!("Targets file {} contains no facilities", path.display());
    }
    Ok(targets)
}

/// Write a config file atomically, creating its directory if needed.
pub fn save_config(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
        }
    }

    let yaml = serde_saphyr::to_string(config).context("Failed to serialize config")?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit().context("Failed to save config")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_missing_explicit_path_is_error() {
        let path = env::temp_dir().join("yard_velocity_test_missing_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let path = env::temp_dir()
            .join("yard_velocity_test_config")
            .join("config.yaml");
        let _ = fs::remove_file(&path);

        let mut config = Config::default();
        config.providers.seed = Some(9);
        config.scoring.weights.alpha = 0.6;
        config.scoring.weights.beta = 0.2;

        save_config(&path, &config).unwrap();
        let loaded = load_config(Some(path.clone())).unwrap();
        assert_eq!(loaded, config);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let path = env::temp_dir().join("yard_velocity_test_bad_config.yaml");
        fs::write(&path, "scoring: [not, a, map]").unwrap();
        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_targets() {
        let path = env::temp_dir().join("yard_velocity_test_targets.yaml");
        fs::write(
            &path,
            "- { name: \"Hub\", lat: 33.6, lon: -84.4, tier: Enterprise }\n",
        )
        .unwrap();
        let targets = load_targets(&path).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "Hub");
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_empty_targets_is_error() {
        let path = env::temp_dir().join("yard_velocity_test_empty_targets.yaml");
        fs::write(&path, "[]\n").unwrap();
        assert!(load_targets(&path).is_err());
        let _ = fs::remove_file(&path);
    }
}
