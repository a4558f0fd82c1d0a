//! Capability installation.
//!
//! The installer walks the enumerated operations and adds the library's
//! implementation for every name a set does not have yet. Existing entries,
//! native or from an earlier install, are left exactly as they are, so
//! installing any number of times has the effect of installing once.

use std::sync::{Arc, OnceLock};

use tracing::{debug, info};

use crate::capability::{LibraryCapability, Operation, ProducerKind, ENTRIES_ALIAS};
use crate::config::{Config, InstallConfig};
use crate::error::{CapabilityError, CapabilityResult};
use crate::registry::CapabilitySet;

/// What one install pass did to a set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    /// Kind of the set that was visited
    pub kind: ProducerKind,
    /// Names added by this pass
    pub installed: Vec<String>,
    /// Names already present and left untouched
    pub retained: Vec<String>,
}

impl InstallReport {
    fn new(kind: ProducerKind) -> Self {
        Self {
            kind,
            installed: Vec::new(),
            retained: Vec::new(),
        }
    }

    /// Whether the pass changed nothing.
    pub fn is_noop(&self) -> bool {
        self.installed.is_empty()
    }
}

/// Installs the library's operations into capability sets.
///
/// # Example
///
/// ```rust
/// use pullchain::{CapabilitySet, InstallConfig, Installer, ProducerKind};
///
/// let installer = Installer::from_config(InstallConfig::new().only(ProducerKind::Async)).unwrap();
///
/// let mut sync_set = CapabilitySet::new(ProducerKind::Sync);
/// let mut async_set = CapabilitySet::new(ProducerKind::Async);
/// installer.install(&mut sync_set);
/// installer.install(&mut async_set);
///
/// assert!(sync_set.is_empty());
/// assert!(async_set.is_complete());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Installer {
    config: InstallConfig,
}

impl Installer {
    /// Create an installer covering both producer kinds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an installer from a validated configuration.
    pub fn from_config(config: InstallConfig) -> CapabilityResult<Self> {
        config.validate().map_err(CapabilityError::InvalidConfig)?;
        Ok(Self { config })
    }

    /// The configuration in use.
    pub fn config(&self) -> &InstallConfig {
        &self.config
    }

    /// Install every absent capability into `set`.
    ///
    /// `asIndexedPairs` is added right after `entries` and shares whichever
    /// `entries` implementation the set ends up with.
    pub fn install(&self, set: &mut CapabilitySet) -> InstallReport {
        let kind = set.kind();
        let mut report = InstallReport::new(kind);
        if !self.config.covers(kind) {
            debug!(config = self.config.name(), %kind, "producer kind not covered, skipping");
            return report;
        }

        for op in Operation::ALL {
            let capability = Arc::new(LibraryCapability::new(kind, op));
            self.record(set.insert_if_absent(op.name(), capability), op.name(), &mut report);

            if op == Operation::Entries {
                if let Some(entries) = set.get_shared(op.name()) {
                    self.record(
                        set.insert_if_absent(ENTRIES_ALIAS, entries),
                        ENTRIES_ALIAS,
                        &mut report,
                    );
                }
            }
        }

        debug!(
            config = self.config.name(),
            %kind,
            installed = report.installed.len(),
            retained = report.retained.len(),
            "capability install finished"
        );
        report
    }

    fn record(&self, inserted: bool, name: &str, report: &mut InstallReport) {
        if inserted {
            if self.config.is_verbose() {
                info!(kind = %report.kind, name, "installed capability");
            } else {
                debug!(kind = %report.kind, name, "installed capability");
            }
            report.installed.push(name.to_string());
        } else {
            debug!(kind = %report.kind, name, "capability already present, left untouched");
            report.retained.push(name.to_string());
        }
    }
}

/// Install every absent capability into `set` with the default installer.
pub fn install(set: &mut CapabilitySet) -> InstallReport {
    Installer::new().install(set)
}

static SYNC_CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();
static ASYNC_CAPABILITIES: OnceLock<CapabilitySet> = OnceLock::new();

/// The process-wide capability set for `kind`.
///
/// Installed on first access, exactly once per process.
pub fn capabilities(kind: ProducerKind) -> &'static CapabilitySet {
    let cell = match kind {
        ProducerKind::Sync => &SYNC_CAPABILITIES,
        ProducerKind::Async => &ASYNC_CAPABILITIES,
    };
    cell.get_or_init(|| {
        let mut set = CapabilitySet::new(kind);
        let report = install(&mut set);
        info!(%kind, installed = report.installed.len(), "capability set initialized");
        set
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{Origin, CAPABILITY_NAMES};

    #[test]
    fn test_install_into_empty_set() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        let report = install(&mut set);

        assert_eq!(report.installed, CAPABILITY_NAMES.to_vec());
        assert!(report.retained.is_empty());
        assert!(set.is_complete());
        assert_eq!(set.names(), CAPABILITY_NAMES.to_vec());
        assert!(set.iter().all(|(_, c)| c.origin() == Origin::Library));
    }

    #[test]
    fn test_install_is_idempotent() {
        let mut set = CapabilitySet::new(ProducerKind::Async);
        install(&mut set);
        let before: Vec<_> = CAPABILITY_NAMES
            .iter()
            .map(|name| set.get_shared(name).unwrap())
            .collect();

        let second = install(&mut set);
        assert!(second.is_noop());
        assert_eq!(second.retained.len(), CAPABILITY_NAMES.len());

        for (name, old) in CAPABILITY_NAMES.iter().zip(before) {
            assert!(Arc::ptr_eq(&old, &set.get_shared(name).unwrap()), "{name}");
        }
    }

    #[test]
    fn test_alias_shares_library_entries() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        install(&mut set);
        assert!(set.same_implementation("entries", ENTRIES_ALIAS));
        assert_eq!(set.get(ENTRIES_ALIAS).unwrap().operation(), Operation::Entries);
    }

    #[test]
    fn test_alias_follows_native_entries() {
        let mut set = CapabilitySet::new(ProducerKind::Async);
        set.define_native("entries", "host entries").unwrap();
        let report = install(&mut set);

        assert!(report.retained.contains(&"entries".to_string()));
        assert!(report.installed.contains(&ENTRIES_ALIAS.to_string()));
        assert!(set.same_implementation("entries", ENTRIES_ALIAS));
        assert_eq!(set.get(ENTRIES_ALIAS).unwrap().origin(), Origin::Native);
    }

    #[test]
    fn test_native_alias_left_alone() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        set.define_native(ENTRIES_ALIAS, "host pairs").unwrap();
        install(&mut set);

        assert!(!set.same_implementation("entries", ENTRIES_ALIAS));
        assert_eq!(set.get("entries").unwrap().origin(), Origin::Library);
        assert_eq!(set.get(ENTRIES_ALIAS).unwrap().origin(), Origin::Native);
    }

    #[test]
    fn test_uncovered_kind_untouched() {
        let installer = Installer::from_config(InstallConfig::new().only(ProducerKind::Sync)).unwrap();
        let mut set = CapabilitySet::new(ProducerKind::Async);
        let report = installer.install(&mut set);

        assert!(report.is_noop());
        assert!(set.is_empty());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = InstallConfig {
            kinds: Vec::new(),
            ..InstallConfig::default()
        };
        assert!(matches!(
            Installer::from_config(config),
            Err(CapabilityError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_global_sets_installed_once() {
        for kind in ProducerKind::ALL {
            let first = capabilities(kind);
            let second = capabilities(kind);
            assert!(std::ptr::eq(first, second));
            assert_eq!(first.kind(), kind);
            assert!(first.is_complete());
            assert!(first.same_implementation("entries", ENTRIES_ALIAS));
        }
    }
}
