//! Output formats for built forests
//!
//!     - `treeviz`: box-drawing tree of labels, one line per node
//!     - `outline`: heading/bullet outline produced by dispatching every node
//!     - `json`: the [snapshot](crate::transcript::snapshot) as pretty-printed JSON
//!     - `events`: the normalized event stream as JSON (before tree building)

pub mod json;
pub mod outline;
pub mod treeviz;

use std::fmt;
use std::str::FromStr;

/// Error that can occur while producing output
#[derive(Debug, Clone, PartialEq)]
pub enum FormatError {
    /// No format with this name
    FormatNotFound(String),
    /// Serialization failed
    SerializationError(String),
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatError::FormatNotFound(name) => write!(f, "Format '{}' not found", name),
            FormatError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
        }
    }
}

impl std::error::Error for FormatError {}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::SerializationError(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Treeviz,
    Outline,
    Json,
    Events,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 4] = [
        OutputFormat::Treeviz,
        OutputFormat::Outline,
        OutputFormat::Json,
        OutputFormat::Events,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "treeviz",
            OutputFormat::Outline => "outline",
            OutputFormat::Json => "json",
            OutputFormat::Events => "events",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            OutputFormat::Treeviz => "Box-drawing tree of event labels",
            OutputFormat::Outline => "Heading/bullet outline rendered through the dispatcher",
            OutputFormat::Json => "Forest snapshot as JSON",
            OutputFormat::Events => "Normalized event stream as JSON",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OutputFormat::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| FormatError::FormatNotFound(s.to_string()))
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names() {
        for format in OutputFormat::ALL {
            assert_eq!(format.name().parse::<OutputFormat>().unwrap(), format);
        }
        assert_eq!(
            "yaml".parse::<OutputFormat>().unwrap_err(),
            FormatError::FormatNotFound("yaml".to_string())
        );
    }
}
