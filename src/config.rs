//! Parser configuration

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// What to do with tags the parser does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownTagPolicy {
    /// Log and drop.
    #[default]
    Ignore,
    /// Keep the line verbatim and write it back after the header tags.
    Preserve,
    /// Fail the parse.
    Reject,
}

/// What to do with attributes a known tag does not define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownAttributePolicy {
    #[default]
    Ignore,
    Reject,
}

/// Parser configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Unknown tag handling
    pub unknown_tags: UnknownTagPolicy,

    /// Unknown attribute handling
    pub unknown_attributes: UnknownAttributePolicy,

    /// Base URI recorded on every playlist and segment, for resolving
    /// relative URIs later
    pub base_uri: Option<String>,
}

impl ParserConfig {
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}
