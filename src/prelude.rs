//! Prelude module for convenient imports.
//!
//! This module re-exports the producer traits, the bridge sources and the
//! error types for convenient glob imports.
//!
//! # Example
//!
//! ```rust
//! use pullchain::prelude::*;
//! ```

// Pull protocols and operations
pub use crate::async_producer::{AsyncProducer, AsyncProducerExt};
pub use crate::producer::{Producer, ProducerExt};

// Sources
pub use crate::source::{from_fn, from_iter, from_results};
pub use crate::stream::{
    channel, channel_with_buffer, from_stream, from_try_stream, ChannelBuilder, Feeder,
};

// Capabilities
pub use crate::capability::{Operation, ProducerKind};
pub use crate::install::capabilities;

// Errors
pub use crate::error::{CapabilityError, SeqError, SeqResult};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
