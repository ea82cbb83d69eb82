//! Optional user configuration read from `config.toml`.

use cellgraph_engine::engine::FormulaConfig;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub formula: FormulaConfig,
}

/// Load configuration from `config_file`, or from the user config dir when
/// no file is given. Problems are reported as warnings and the defaults are
/// used instead.
pub fn load_config(config_file: Option<&PathBuf>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();

    let path = match config_file.cloned() {
        Some(path) => {
            if !path.exists() {
                warnings.push(format!("Config file not found: {}", path.display()));
                return (Config::default(), warnings);
            }
            path
        }
        None => match user_config_path() {
            Some(path) if path.exists() => path,
            _ => return (Config::default(), warnings),
        },
    };

    let config = read_config(&path, &mut warnings).unwrap_or_default();
    (config, warnings)
}

fn read_config(path: &Path, warnings: &mut Vec<String>) -> Option<Config> {
    match std::fs::metadata(path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            None
        }
        Ok(_) => match std::fs::read_to_string(path) {
            Ok(content) => parse_config(&content)
                .map_err(|err| warnings.push(format!("Failed to parse {}: {}", path.display(), err)))
                .ok(),
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                None
            }
        },
        Err(err) => {
            warnings.push(format!("Failed to read {}: {}", path.display(), err));
            None
        }
    }
}

fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgraph")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
