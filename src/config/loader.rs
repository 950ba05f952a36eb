use crate::config::schema::{RuleSet, ValidationError};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Where the text of a rule set came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleSource {
    /// Compiled into the binary
    Builtin,
    /// Passed in as a string
    Inline,
    File(PathBuf),
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleSource::Builtin => f.write_str("built-in rules"),
            RuleSource::Inline => f.write_str("inline rules"),
            RuleSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read rules file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{origin}: malformed TOML: {source}")]
    Toml {
        origin: RuleSource,
        #[source]
        source: toml_edit::de::Error,
    },

    #[error("{origin}: {source}")]
    Validation {
        origin: RuleSource,
        #[source]
        source: ValidationError,
    },
}

impl ConfigError {
    /// The rule set the error belongs to.
    pub fn origin(&self) -> RuleSource {
        match self {
            ConfigError::Read { path, .. } => RuleSource::File(path.clone()),
            ConfigError::Toml { origin, .. } | ConfigError::Validation { origin, .. } => {
                origin.clone()
            }
        }
    }
}

/// Deserialize and validate a rule set, tagging errors with `origin`.
pub fn parse(input: &str, origin: RuleSource) -> Result<RuleSet, ConfigError> {
    let rule_set: RuleSet = match toml_edit::de::from_str(input) {
        Ok(rule_set) => rule_set,
        Err(source) => return Err(ConfigError::Toml { origin, source }),
    };

    match rule_set.validate() {
        Ok(()) => Ok(rule_set),
        Err(source) => Err(ConfigError::Validation { origin, source }),
    }
}

pub fn load_from_str(input: &str) -> Result<RuleSet, ConfigError> {
    parse(input, RuleSource::Inline)
}

pub fn load_from_path(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&contents, RuleSource::File(path.to_path_buf()))
}
