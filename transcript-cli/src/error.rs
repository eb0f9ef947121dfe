//! Errors surfaced to the command line

use config::ConfigError;
use std::fmt;
use transcript_tree::transcript::formats::FormatError;
use transcript_tree::transcript::LoadError;

#[derive(Debug)]
pub enum CliError {
    Usage(String),
    Config(ConfigError),
    Load(LoadError),
    Format(FormatError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{}", msg),
            CliError::Config(err) => write!(f, "Configuration error: {}", err),
            CliError::Load(err) => write!(f, "{}", err),
            CliError::Format(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::Config(err)
    }
}

impl From<LoadError> for CliError {
    fn from(err: LoadError) -> Self {
        CliError::Load(err)
    }
}

impl From<FormatError> for CliError {
    fn from(err: FormatError) -> Self {
        CliError::Format(err)
    }
}
