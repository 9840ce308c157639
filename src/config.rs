use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConvertResult;
use crate::html::ConvertOptions;
use crate::sanitize::SanitizeConfig;
use crate::validator::{validate_ignore_nodes, validate_sanitize_config};

/// Serializable part of [`ConvertOptions`], loadable from YAML.
///
/// ```yaml
/// ignoreNodes: [comment, table]
/// sanitize:
///   allowedTags: [p, a, em, strong]
///   allowedSchemes: [https]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConverterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_nodes: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitize: Option<SanitizeConfig>,
}

impl ConverterConfig {
    /// Parse and validate a YAML configuration
    pub fn from_yaml_str(yaml: &str) -> ConvertResult<Self> {
        // An empty file is an empty mapping, not an error
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ConverterConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML configuration file
    pub fn load(path: impl AsRef<Path>) -> ConvertResult<Self> {
        let yaml = fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ConvertResult<()> {
        if let Some(ref nodes) = self.ignore_nodes {
            validate_ignore_nodes(nodes)?;
        }
        if let Some(ref sanitize) = self.sanitize {
            validate_sanitize_config(sanitize)?;
        }
        Ok(())
    }

    /// Options using the default registry
    pub fn to_options(&self) -> ConvertOptions {
        ConvertOptions {
            elem_map: None,
            ignore_nodes: self.ignore_nodes.clone(),
            sanitize: self.sanitize.clone(),
        }
    }
}
