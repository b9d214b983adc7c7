//! Editing assistant configuration.
//!
//! Read from TOML; every key is optional and falls back to the defaults:
//!
//! ```toml
//! indent_unit = "    "
//! pairs = ["()", "[]", "{}", "<>", "''", "\"\"", "``"]
//!
//! [enter]
//! expand_empty_pair = true
//! indent_after_colon = true
//! ```

use crate::buffer::is_indent_char;
use crate::pairs::{BracketPairs, DEFAULT_PAIRS};
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Default indentation level: four spaces, never a tab.
pub const DEFAULT_INDENT_UNIT: &str = "    ";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which Enter heuristics are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnterPolicy {
    /// Enter between an empty pair like `{|}` opens an indented block.
    pub expand_empty_pair: bool,
    /// Enter after a trailing `:` indents the new line one level deeper.
    pub indent_after_colon: bool,
}

impl Default for EnterPolicy {
    fn default() -> Self {
        Self {
            expand_empty_pair: true,
            indent_after_colon: true,
        }
    }
}

/// Validated assistant settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistConfig {
    pub indent_unit: String,
    pub pairs: BracketPairs,
    pub enter: EnterPolicy,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            pairs: BracketPairs::default(),
            enter: EnterPolicy::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    indent_unit: String,
    pairs: Vec<String>,
    enter: EnterPolicy,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            indent_unit: DEFAULT_INDENT_UNIT.to_string(),
            pairs: DEFAULT_PAIRS
                .iter()
                .map(|&(open, close)| format!("{open}{close}"))
                .collect(),
            enter: EnterPolicy::default(),
        }
    }
}

impl AssistConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        Self::from_file(file)
    }

    /// Reads and validates a TOML config file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        log::debug!("Loaded assistant config from {}", path.display());
        Ok(config)
    }

    /// Length of the indent unit in characters.
    pub fn indent_len(&self) -> usize {
        self.indent_unit.chars().count()
    }

    fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        if file.indent_unit.is_empty() || !file.indent_unit.chars().all(is_indent_char) {
            return Err(ConfigError::Invalid(format!(
                "indent_unit must be non-empty spaces or tabs, got {:?}",
                file.indent_unit
            )));
        }

        let mut parsed = Vec::with_capacity(file.pairs.len());
        for entry in &file.pairs {
            let mut chars = entry.chars();
            match (chars.next(), chars.next(), chars.next()) {
                (Some(open), Some(close), None) => parsed.push((open, close)),
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "pair {entry:?} must be exactly two characters"
                    )))
                }
            }
        }

        Ok(Self {
            indent_unit: file.indent_unit,
            pairs: BracketPairs::new(parsed)?,
            enter: file.enter,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_gives_defaults() {
        let config = AssistConfig::from_toml_str("").unwrap();
        assert_eq!(config, AssistConfig::default());
        assert_eq!(config.indent_len(), 4);
    }

    #[test]
    fn test_partial_override() {
        let config = AssistConfig::from_toml_str(
            "indent_unit = \"  \"\npairs = [\"()\", \"''\"]\n[enter]\nindent_after_colon = false\n",
        )
        .unwrap();
        assert_eq!(config.indent_unit, "  ");
        assert_eq!(config.pairs.closing_for('('), Some(')'));
        assert_eq!(config.pairs.closing_for('{'), None);
        assert!(config.enter.expand_empty_pair);
        assert!(!config.enter.indent_after_colon);
    }

    #[test]
    fn test_rejects_bad_indent_unit() {
        let err = AssistConfig::from_toml_str("indent_unit = \"ab\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AssistConfig::from_toml_str("indent_unit = \"\"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_bad_pairs() {
        let err = AssistConfig::from_toml_str("pairs = [\"(\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        let err = AssistConfig::from_toml_str("pairs = [\"()\", \"(]\"]").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_unknown_key_is_parse_error() {
        let err = AssistConfig::from_toml_str("tab_width = 8").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AssistConfig::load("/nonexistent/toadbin.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
