//! CLI configuration file

use anyhow::{Context, Result};
use hl7_codec::{ParseLimits, SegmentOrder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Settings read from `--config <file.yaml>`
///
/// Every key is optional. Unknown keys are rejected so that a typo does not
/// silently fall back to a default.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    /// Parser resource limits
    pub limits: ParseLimits,
    /// Generator order: a comma-separated name list or `document`
    pub segment_order: Option<String>,
    /// Pretty-print JSON output
    pub pretty: bool,
}

impl CliConfig {
    /// Load from a YAML file, or defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "Loaded configuration");
        Ok(config)
    }

    /// Parse YAML text; an empty document yields the defaults
    pub fn from_yaml(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(text)?)
    }

    /// Generator order: an explicit flag wins over the configured one
    pub fn segment_order(&self, flag: Option<&str>) -> SegmentOrder {
        flag.or(self.segment_order.as_deref())
            .map(SegmentOrder::parse_list)
            .unwrap_or_default()
    }
}
