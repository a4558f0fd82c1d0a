//! Configuration traits for capability installation.

use crate::capability::ProducerKind;

/// Base trait for configuration types.
///
/// # Example
///
/// ```rust
/// use pullchain::Config;
///
/// #[derive(Debug, Clone)]
/// struct QuietConfig;
///
/// impl Config for QuietConfig {
///     fn name(&self) -> &str {
///         "quiet"
///     }
/// }
///
/// assert!(!QuietConfig.is_verbose());
/// assert!(QuietConfig.validate().is_ok());
/// ```
pub trait Config: Send + Sync {
    /// Returns the configuration name/identifier.
    fn name(&self) -> &str {
        "default"
    }

    /// Returns whether verbose output is enabled.
    fn is_verbose(&self) -> bool {
        false
    }

    /// Validates the configuration.
    ///
    /// Returns Ok(()) if valid, or an error message describing the issue.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

/// Which producer kinds an [`Installer`](crate::Installer) covers, and how
/// loudly it logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallConfig {
    /// Configuration name
    pub name: String,
    /// Producer kinds to install into
    pub kinds: Vec<ProducerKind>,
    /// Log each installed capability at `info` instead of `debug`
    pub verbose: bool,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            kinds: ProducerKind::ALL.to_vec(),
            verbose: false,
        }
    }
}

impl InstallConfig {
    /// Create a configuration covering both producer kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the configuration name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Restrict installation to a single producer kind.
    pub fn only(mut self, kind: ProducerKind) -> Self {
        self.kinds = vec![kind];
        self
    }

    /// Enable verbose output.
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Whether sets of `kind` are installed into.
    pub fn covers(&self, kind: ProducerKind) -> bool {
        self.kinds.contains(&kind)
    }
}

impl Config for InstallConfig {
    fn name(&self) -> &str {
        if self.name.is_empty() {
            "default"
        } else {
            &self.name
        }
    }

    fn is_verbose(&self) -> bool {
        self.verbose
    }

    fn validate(&self) -> Result<(), String> {
        if self.kinds.is_empty() {
            return Err("at least one producer kind must be selected".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstallConfig::new();

        assert_eq!(config.name(), "default");
        assert!(config.covers(ProducerKind::Sync));
        assert!(config.covers(ProducerKind::Async));
        assert!(!config.is_verbose());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = InstallConfig::new()
            .with_name("async-only")
            .only(ProducerKind::Async)
            .verbose();

        assert_eq!(config.name(), "async-only");
        assert!(!config.covers(ProducerKind::Sync));
        assert!(config.is_verbose());
    }

    #[test]
    fn test_empty_kinds_rejected() {
        let config = InstallConfig {
            kinds: Vec::new(),
            ..InstallConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
