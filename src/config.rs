use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::SqlsegError;
use crate::mode::{Mode, OutputFormat};

const CONFIG_FILE_NAME: &str = "sqlseg.toml";

/// Load sqlseg configuration.
///
/// An explicit `config_path` must exist. Otherwise parent directories of the
/// inputs are searched for `sqlseg.toml` or a `pyproject.toml` carrying a
/// `[tool.sqlseg]` table, falling back to the user config directory.
pub fn load_config(files: &[PathBuf], config_path: Option<&Path>) -> Result<Mode, SqlsegError> {
    let mut mode = Mode::default();

    let config_file = match config_path {
        Some(path) => {
            if path.exists() {
                Some(path.to_path_buf())
            } else {
                return Err(SqlsegError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
        }
        None => find_config_file(files).or_else(user_config_file),
    };

    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "loading config");
        let raw = load_config_from_path(&path)?;
        apply_config(&mut mode, &raw)?;
    }

    Ok(mode)
}

/// Search the common parent directories of the given files.
fn find_config_file(files: &[PathBuf]) -> Option<PathBuf> {
    for parent in get_common_parents(files) {
        let config = parent.join(CONFIG_FILE_NAME);
        if config.exists() {
            return Some(config);
        }
        let config = parent.join("pyproject.toml");
        if config.exists() && has_sqlseg_table(&config) {
            return Some(config);
        }
    }
    None
}

/// `<config dir>/sqlseg/sqlseg.toml`, if present.
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::config_dir()?.join("sqlseg").join(CONFIG_FILE_NAME);
    path.exists().then_some(path)
}

fn has_sqlseg_table(path: &Path) -> bool {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| content.parse::<toml::Value>().ok())
        .map(|v| v.get("tool").and_then(|t| t.get("sqlseg")).is_some())
        .unwrap_or(false)
}

/// Get the parent directories of the given paths, ordered from most
/// specific to least specific. Relative paths walk up to the working
/// directory (`.`); stdin (`-`) contributes only the working directory.
fn get_common_parents(files: &[PathBuf]) -> Vec<PathBuf> {
    let mut parents = Vec::new();

    for file in files {
        let parent = if file.is_dir() {
            file.clone()
        } else {
            file.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        };

        let mut current = Some(parent.as_path());
        while let Some(dir) = current {
            let dir_buf = dir.to_path_buf();
            if !parents.contains(&dir_buf) {
                parents.push(dir_buf);
            }
            current = match dir.parent() {
                // An empty parent is the working directory
                Some(p) if p.as_os_str().is_empty() => {
                    (dir != Path::new(".")).then(|| Path::new("."))
                }
                other => other,
            };
        }
    }

    parents
}

/// Load and parse a TOML config file into its lower-cased sqlseg keys.
fn load_config_from_path(path: &Path) -> Result<HashMap<String, toml::Value>, SqlsegError> {
    let content = std::fs::read_to_string(path)?;
    let parsed: toml::Value = content
        .parse()
        .map_err(|e| SqlsegError::Config(format!("Failed to parse {}: {}", path.display(), e)))?;

    let is_own_file = path
        .file_name()
        .map(|n| n == CONFIG_FILE_NAME)
        .unwrap_or(false);

    let section = parsed
        .get("tool")
        .and_then(|t| t.get("sqlseg"))
        .or(if is_own_file { Some(&parsed) } else { None });

    match section {
        Some(toml::Value::Table(table)) => Ok(table
            .iter()
            .map(|(k, v)| (k.to_lowercase(), v.clone()))
            .collect()),
        _ => Ok(HashMap::new()),
    }
}

/// Apply configuration values to a Mode.
fn apply_config(mode: &mut Mode, config: &HashMap<String, toml::Value>) -> Result<(), SqlsegError> {
    let known_keys = ["output", "exclude", "no_color"];
    for key in config.keys() {
        if !known_keys.contains(&key.as_str()) {
            return Err(SqlsegError::Config(format!(
                "Unknown config option: {}",
                key
            )));
        }
    }

    match config.get("output") {
        Some(toml::Value::String(s)) => {
            mode.output = match s.to_lowercase().as_str() {
                "text" => OutputFormat::Text,
                "json" => OutputFormat::Json,
                other => {
                    return Err(SqlsegError::Config(format!(
                        "Unknown output format: {}",
                        other
                    )))
                }
            };
        }
        Some(other) => {
            return Err(SqlsegError::Config(format!(
                "output must be a string, got {}",
                other.type_str()
            )))
        }
        None => {}
    }

    match config.get("exclude") {
        Some(toml::Value::Array(arr)) => {
            mode.exclude = arr
                .iter()
                .map(|v| match v {
                    toml::Value::String(s) => Ok(s.clone()),
                    other => Err(SqlsegError::Config(format!(
                        "exclude entries must be strings, got {}",
                        other.type_str()
                    ))),
                })
                .collect::<Result<_, _>>()?;
        }
        Some(other) => {
            return Err(SqlsegError::Config(format!(
                "exclude must be an array, got {}",
                other.type_str()
            )))
        }
        None => {}
    }

    match config.get("no_color") {
        Some(toml::Value::Boolean(b)) => mode.no_color = *b,
        Some(other) => {
            return Err(SqlsegError::Config(format!(
                "no_color must be a boolean, got {}",
                other.type_str()
            )))
        }
        None => {}
    }

    Ok(())
}
