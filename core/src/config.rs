use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::info;

use crate::plot::FigureSettings;
use crate::results::ColumnNames;

/// Load a JSON configuration from disk, creating it with the provided initializer if missing.
pub fn load_or_init<T, F>(path: &Path, initializer: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> T,
{
    if let Some(value) = load_if_present(path)? {
        Ok(value)
    } else {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let value = initializer();
        let serialized = serde_json::to_string_pretty(&value)?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write config to {}", path.display()))?;
        info!(path = %path.display(), "wrote default config");
        Ok(value)
    }
}

/// Load a JSON configuration if the file exists. Never writes to disk.
pub fn load_if_present<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;
    let value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse config from {}", path.display()))?;
    Ok(Some(value))
}

/// How to reach the external engine and which evaluation task to run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineSettings {
    pub binary: String,
    pub classpath: String,
    pub entry_point: String,
    pub evaluation_task: String,
    /// Stream class path, e.g. `generators.RandomTreeGenerator`.
    pub stream: Option<String>,
    pub instance_limit: Option<u64>,
    /// Seconds.
    pub time_limit: Option<u64>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            binary: "java".to_string(),
            classpath: "moa.jar".to_string(),
            entry_point: "moa.DoTask".to_string(),
            evaluation_task: "ALPrequentialEvaluationTask".to_string(),
            stream: None,
            instance_limit: None,
            time_limit: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TradeoffSettings {
    pub columns: ColumnNames,
    /// Field separator of the result export; must be ASCII.
    pub delimiter: char,
    pub figure: FigureSettings,
}

impl Default for TradeoffSettings {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            delimiter: ',',
            figure: FigureSettings::default(),
        }
    }
}
