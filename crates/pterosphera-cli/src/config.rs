//! The configuration file: model parameters plus export settings.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use pterosphera::PterospheraConfig;
use pterosphera_export::ExportSettings;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    #[serde(flatten)]
    pub model: PterospheraConfig,
    pub export: ExportSettings,
}

impl ConfigFile {
    /// Defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            log::info!("no configuration file given, using defaults");
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading configuration {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing configuration {}", path.display()))?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
