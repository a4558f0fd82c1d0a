//! # Pullchain
//!
//! **Pullchain** adds lazy, chainable operations to pull-based sequence
//! producers, both synchronous and asynchronous.
//!
//! ## Overview
//!
//! A producer yields a possibly infinite sequence one element per pull. Any
//! type implementing the minimal pull protocol gets the full operation set:
//!
//! - **Lazy**: `map`, `filter`, `take`, `skip` (`drop`), `entries` /
//!   `as_indexed_pairs`, `flat_map`
//! - **Terminal**: `reduce`, `to_vec` (`toArray`), `for_each`, `some`,
//!   `every`, `find`
//!
//! Lazy operations pull nothing until they are pulled themselves. Terminal
//! operations pull strictly in order and stop as soon as the answer is known.
//!
//! ## Producer Kinds
//!
//! ```text
//! sync:  Producer      + ProducerExt       (pull returns immediately)
//! async: AsyncProducer + AsyncProducerExt  (pull may suspend)
//! ```
//!
//! Each kind also has a `CapabilitySet` listing the operations available on
//! it by name. The process-wide sets are installed once, on first access, by
//! the `Installer`, which never overwrites an entry that is already present.
//!
//! ## Quick Start
//!
//! ```rust
//! use pullchain::prelude::*;
//!
//! let pairs = from_iter(vec!["a", "b", "c"])
//!     .skip(1)
//!     .entries()
//!     .to_vec()
//!     .unwrap();
//! assert_eq!(pairs, vec![(0, "b"), (1, "c")]);
//!
//! # async fn example() -> Result<(), SeqError> {
//! let (feeder, producer) = channel::<u32>();
//! feeder.send(4).await.unwrap();
//! drop(feeder);
//!
//! let found = producer.find(|x| std::future::ready(Ok(*x > 3))).await?;
//! assert_eq!(found, Some(4));
//! # Ok(())
//! # }
//! ```
//!
//! ## Errors
//!
//! Every producer declares its own `Error` type, and callbacks return
//! `Result<_, Self::Error>`. A failing source or callback ends the chain and
//! the error reaches the caller of the terminal operation unchanged.

mod async_producer;
mod capability;
mod config;
mod error;
mod install;
mod producer;
mod registry;
mod source;
pub mod async_combinators;
pub mod combinators;
pub mod stream;

pub mod prelude;

// Re-export core types
pub use async_producer::{AsyncProducer, AsyncProducerExt, SyncToAsync};
pub use capability::{
    Capability, CapabilityExt, LibraryCapability, NativeCapability, Operation, Origin,
    ProducerKind, CAPABILITY_NAMES, ENTRIES_ALIAS,
};
pub use config::{Config, InstallConfig};
pub use error::{CapabilityError, CapabilityResult, SeqError, SeqResult};
pub use install::{capabilities, install, InstallReport, Installer};
pub use producer::{Producer, ProducerExt};
pub use registry::CapabilitySet;
pub use source::{from_fn, from_iter, from_results, FromFn, IterProducer, Results, TryIterProducer};
pub use stream::{
    channel, channel_with_buffer, from_stream, from_try_stream, BoxStream, ChannelBuilder,
    ChannelProducer, Feeder, ProducerStream, StreamProducer, TryStreamProducer,
};

// Re-export async-trait for convenience
pub use async_trait::async_trait;
