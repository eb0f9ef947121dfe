//! Shared configuration loader for the transcript tools.
//!
//! `defaults/transcript.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top of those
//! defaults via [`Loader`] before deserializing into [`TranscriptConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/transcript.default.toml");

/// Top-level configuration consumed by transcript applications.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptConfig {
    pub tree: TreeConfig,
    pub dispatch: DispatchConfig,
    pub output: OutputConfig,
}

/// Tree building knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct TreeConfig {
    pub base_depth: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    pub namespace: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub format: String,
    pub show_ids: bool,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<TranscriptConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = Loader::new().build().expect("defaults to deserialize");
        assert_eq!(config.tree.base_depth, 0);
        assert_eq!(config.dispatch.namespace, "transcript");
        assert_eq!(config.output.format, "treeviz");
        assert!(!config.output.show_ids);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("tree.base_depth", 2i64)
            .expect("override to apply")
            .set_override("output.format", "outline")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.tree.base_depth, 2);
        assert_eq!(config.output.format, "outline");
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[dispatch]\nnamespace = \"sample-3\"").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.dispatch.namespace, "sample-3");
        // Untouched keys keep their defaults
        assert_eq!(config.output.format, "treeviz");
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/no/such/transcript.toml").build();
        assert!(result.is_err());
    }
}
