//! Capability sets: one shared table of named operations per producer kind.
//!
//! A `CapabilitySet` only ever grows. Entries are never replaced or removed,
//! which is what makes installing into it idempotent and safe for entries the
//! host defined first.

use std::collections::HashMap;
use std::sync::Arc;

use crate::capability::{Capability, NativeCapability, Operation, ProducerKind, CAPABILITY_NAMES};
use crate::error::{CapabilityError, CapabilityResult};

/// The table of named capabilities for one producer kind.
///
/// # Example
///
/// ```rust
/// use pullchain::{install, Capability, CapabilitySet, Origin, ProducerKind};
///
/// let mut set = CapabilitySet::new(ProducerKind::Sync);
/// set.define_native("map", "host map").unwrap();
/// install(&mut set);
///
/// assert_eq!(set.get("map").unwrap().origin(), Origin::Native);
/// assert_eq!(set.get("filter").unwrap().origin(), Origin::Library);
/// assert!(set.same_implementation("entries", "asIndexedPairs"));
/// ```
#[derive(Debug)]
pub struct CapabilitySet {
    kind: ProducerKind,
    entries: HashMap<String, Arc<dyn Capability>>,
    ordered: Vec<String>,
}

impl CapabilitySet {
    /// Create an empty set for `kind`.
    pub fn new(kind: ProducerKind) -> Self {
        Self {
            kind,
            entries: HashMap::new(),
            ordered: Vec::new(),
        }
    }

    /// The producer kind this set belongs to.
    pub fn kind(&self) -> ProducerKind {
        self.kind
    }

    /// Record a pre-existing (native) implementation under `name`.
    ///
    /// Fails if `name` is not a capability name or is already present.
    pub fn define_native(&mut self, name: &str, label: impl Into<String>) -> CapabilityResult<()> {
        let operation = Operation::from_name(name)
            .ok_or_else(|| CapabilityError::UnknownOperation(name.to_string()))?;
        if self.contains(name) {
            return Err(CapabilityError::AlreadyDefined {
                kind: self.kind,
                name: name.to_string(),
            });
        }
        let native = NativeCapability::new(self.kind, operation, label);
        self.insert_if_absent(name, Arc::new(native));
        Ok(())
    }

    /// Insert `capability` under `name` unless the name is taken.
    ///
    /// Returns whether the entry was inserted.
    pub fn insert_if_absent(&mut self, name: &str, capability: Arc<dyn Capability>) -> bool {
        if self.entries.contains_key(name) {
            return false;
        }
        self.ordered.push(name.to_string());
        self.entries.insert(name.to_string(), capability);
        true
    }

    /// Get a capability by name.
    pub fn get(&self, name: &str) -> Option<&dyn Capability> {
        self.entries.get(name).map(|c| c.as_ref())
    }

    /// Get a shared handle to a capability by name.
    pub fn get_shared(&self, name: &str) -> Option<Arc<dyn Capability>> {
        self.entries.get(name).cloned()
    }

    /// Get a capability by name, distinguishing unknown names from missing
    /// entries.
    pub fn resolve(&self, name: &str) -> CapabilityResult<&dyn Capability> {
        if Operation::from_name(name).is_none() {
            return Err(CapabilityError::UnknownOperation(name.to_string()));
        }
        self.get(name).ok_or_else(|| CapabilityError::NotInstalled {
            kind: self.kind,
            name: name.to_string(),
        })
    }

    /// Whether both names are present and share one implementation.
    pub fn same_implementation(&self, a: &str, b: &str) -> bool {
        match (self.entries.get(a), self.entries.get(b)) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Check if a capability with the given name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether every capability name is present.
    pub fn is_complete(&self) -> bool {
        CAPABILITY_NAMES.iter().all(|name| self.contains(name))
    }

    /// Names of all entries, in insertion order.
    pub fn names(&self) -> Vec<&str> {
        self.ordered.iter().map(|s| s.as_str()).collect()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(name, capability)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &dyn Capability)> {
        self.ordered.iter().filter_map(move |name| {
            self.entries
                .get(name)
                .map(|c| (name.as_str(), c.as_ref()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityExt, LibraryCapability, Origin};

    fn library(kind: ProducerKind, op: Operation) -> Arc<dyn Capability> {
        Arc::new(LibraryCapability::new(kind, op))
    }

    #[test]
    fn test_insert_if_absent_never_replaces() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        assert!(set.insert_if_absent("map", library(ProducerKind::Sync, Operation::Map)));
        let first = set.get_shared("map").unwrap();

        assert!(!set.insert_if_absent("map", library(ProducerKind::Sync, Operation::Map)));
        assert!(Arc::ptr_eq(&first, &set.get_shared("map").unwrap()));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_define_native() {
        let mut set = CapabilitySet::new(ProducerKind::Async);
        set.define_native("find", "host find").unwrap();

        let cap = set.get("find").unwrap();
        assert_eq!(cap.origin(), Origin::Native);
        assert_eq!(cap.kind(), ProducerKind::Async);
        assert_eq!(cap.downcast_ref::<NativeCapability>().unwrap().label(), "host find");
    }

    #[test]
    fn test_define_native_rejects_duplicates_and_unknown_names() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        set.define_native("map", "first").unwrap();

        assert_eq!(
            set.define_native("map", "second"),
            Err(CapabilityError::AlreadyDefined {
                kind: ProducerKind::Sync,
                name: "map".to_string(),
            })
        );
        assert_eq!(
            set.define_native("zip", "nope"),
            Err(CapabilityError::UnknownOperation("zip".to_string()))
        );
    }

    #[test]
    fn test_resolve() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        set.insert_if_absent("take", library(ProducerKind::Sync, Operation::Take));

        assert_eq!(set.resolve("take").unwrap().operation(), Operation::Take);
        assert!(matches!(
            set.resolve("skip"),
            Err(CapabilityError::UnknownOperation(_))
        ));
        assert!(matches!(
            set.resolve("drop"),
            Err(CapabilityError::NotInstalled { .. })
        ));
    }

    #[test]
    fn test_names_in_insertion_order() {
        let mut set = CapabilitySet::new(ProducerKind::Sync);
        set.insert_if_absent("some", library(ProducerKind::Sync, Operation::Some));
        set.insert_if_absent("every", library(ProducerKind::Sync, Operation::Every));

        assert_eq!(set.names(), vec!["some", "every"]);
        let ops: Vec<Operation> = set.iter().map(|(_, c)| c.operation()).collect();
        assert_eq!(ops, vec![Operation::Some, Operation::Every]);
        assert!(!set.is_complete());
    }
}
