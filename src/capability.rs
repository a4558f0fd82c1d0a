//! Named capabilities attached to each producer kind.
//!
//! A `Capability` describes one entry of a producer kind's capability set:
//! which operation it implements, for which kind, and whether the library or
//! the host supplied it. Entries are shared behind `Arc`, so two names can
//! resolve to the very same implementation (`entries` / `asIndexedPairs`).

use std::any::Any;
use std::fmt::{self, Debug};

/// Name under which the `entries` alias is installed.
pub const ENTRIES_ALIAS: &str = "asIndexedPairs";

/// Every capability name, in installation order.
pub const CAPABILITY_NAMES: [&str; 13] = [
    "map",
    "filter",
    "take",
    "drop",
    "entries",
    ENTRIES_ALIAS,
    "flatMap",
    "reduce",
    "toArray",
    "forEach",
    "some",
    "every",
    "find",
];

/// The two kinds of sequence producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProducerKind {
    /// Pulls complete immediately ([`Producer`](crate::Producer)).
    Sync,
    /// Pulls may suspend ([`AsyncProducer`](crate::AsyncProducer)).
    Async,
}

impl ProducerKind {
    /// Both kinds.
    pub const ALL: [ProducerKind; 2] = [ProducerKind::Sync, ProducerKind::Async];

    /// Short lowercase label.
    pub fn as_str(self) -> &'static str {
        match self {
            ProducerKind::Sync => "sync",
            ProducerKind::Async => "async",
        }
    }
}

impl fmt::Display for ProducerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of operations this library implements.
///
/// `asIndexedPairs` has no variant of its own: it resolves to `Entries`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Map,
    Filter,
    Take,
    Drop,
    Entries,
    FlatMap,
    Reduce,
    ToArray,
    ForEach,
    Some,
    Every,
    Find,
}

impl Operation {
    /// Every operation, in installation order.
    pub const ALL: [Operation; 12] = [
        Operation::Map,
        Operation::Filter,
        Operation::Take,
        Operation::Drop,
        Operation::Entries,
        Operation::FlatMap,
        Operation::Reduce,
        Operation::ToArray,
        Operation::ForEach,
        Operation::Some,
        Operation::Every,
        Operation::Find,
    ];

    /// Canonical capability name.
    pub fn name(self) -> &'static str {
        match self {
            Operation::Map => "map",
            Operation::Filter => "filter",
            Operation::Take => "take",
            Operation::Drop => "drop",
            Operation::Entries => "entries",
            Operation::FlatMap => "flatMap",
            Operation::Reduce => "reduce",
            Operation::ToArray => "toArray",
            Operation::ForEach => "forEach",
            Operation::Some => "some",
            Operation::Every => "every",
            Operation::Find => "find",
        }
    }

    /// Resolve a capability name, including the `asIndexedPairs` alias.
    pub fn from_name(name: &str) -> Option<Operation> {
        if name == ENTRIES_ALIAS {
            return Some(Operation::Entries);
        }
        Operation::ALL.into_iter().find(|op| op.name() == name)
    }

    /// Whether the operation drains its source instead of returning a producer.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Operation::Reduce
                | Operation::ToArray
                | Operation::ForEach
                | Operation::Some
                | Operation::Every
                | Operation::Find
        )
    }

    /// Whether the operation may stop pulling before the source is exhausted.
    pub fn short_circuits(self) -> bool {
        matches!(
            self,
            Operation::Take | Operation::Some | Operation::Every | Operation::Find
        )
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Who supplied a capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Already present before installation.
    Native,
    /// Installed by this library.
    Library,
}

/// One entry of a capability set.
///
/// # Example
///
/// ```rust
/// use pullchain::{Capability, LibraryCapability, Operation, Origin, ProducerKind};
///
/// let cap = LibraryCapability::new(ProducerKind::Sync, Operation::Find);
/// assert_eq!(cap.operation(), Operation::Find);
/// assert_eq!(cap.origin(), Origin::Library);
/// assert_eq!(cap.describe(), "sync::find");
/// ```
pub trait Capability: Send + Sync + Debug {
    /// The operation this entry implements.
    fn operation(&self) -> Operation;

    /// The producer kind this entry belongs to.
    fn kind(&self) -> ProducerKind;

    /// Who supplied this entry.
    fn origin(&self) -> Origin {
        Origin::Library
    }

    /// Human-readable `kind::name` label.
    fn describe(&self) -> String {
        format!("{}::{}", self.kind(), self.operation().name())
    }

    /// Downcast to concrete type for advanced usage.
    fn as_any(&self) -> &dyn Any;
}

/// A capability implemented by this library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryCapability {
    kind: ProducerKind,
    operation: Operation,
}

impl LibraryCapability {
    pub fn new(kind: ProducerKind, operation: Operation) -> Self {
        Self { kind, operation }
    }
}

impl Capability for LibraryCapability {
    fn operation(&self) -> Operation {
        self.operation
    }

    fn kind(&self) -> ProducerKind {
        self.kind
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A capability that existed before installation and must be left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativeCapability {
    kind: ProducerKind,
    operation: Operation,
    label: String,
}

impl NativeCapability {
    pub fn new(kind: ProducerKind, operation: Operation, label: impl Into<String>) -> Self {
        Self {
            kind,
            operation,
            label: label.into(),
        }
    }

    /// Free-form label identifying the native implementation.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Capability for NativeCapability {
    fn operation(&self) -> Operation {
        self.operation
    }

    fn kind(&self) -> ProducerKind {
        self.kind
    }

    fn origin(&self) -> Origin {
        Origin::Native
    }

    fn describe(&self) -> String {
        format!("{}::{} ({})", self.kind, self.operation.name(), self.label)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Extension trait for capability type checking.
pub trait CapabilityExt: Capability {
    /// Check if this capability is of type T.
    fn is<T: Capability + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast to type T.
    fn downcast_ref<T: Capability + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl<C: Capability + ?Sized> CapabilityExt for C {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(Operation::from_name(op.name()), Some(op));
        }
        assert_eq!(Operation::from_name(ENTRIES_ALIAS), Some(Operation::Entries));
        assert_eq!(Operation::from_name("zip"), None);
    }

    #[test]
    fn test_capability_names_cover_operations() {
        for name in CAPABILITY_NAMES {
            assert!(Operation::from_name(name).is_some(), "{name}");
        }
        assert_eq!(CAPABILITY_NAMES.len(), Operation::ALL.len() + 1);
    }

    #[test]
    fn test_terminal_and_short_circuit() {
        assert!(!Operation::Map.is_terminal());
        assert!(Operation::ToArray.is_terminal());
        assert!(Operation::Take.short_circuits());
        assert!(Operation::Find.short_circuits());
        assert!(!Operation::Reduce.short_circuits());
    }

    #[test]
    fn test_native_capability_downcast() {
        let native = NativeCapability::new(ProducerKind::Sync, Operation::Map, "host");
        assert_eq!(native.origin(), Origin::Native);
        assert!(native.is::<NativeCapability>());
        assert!(!native.is::<LibraryCapability>());
        assert_eq!(native.downcast_ref::<NativeCapability>().unwrap().label(), "host");
        assert_eq!(native.describe(), "sync::map (host)");
    }
}
