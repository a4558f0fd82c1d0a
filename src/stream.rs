//! Async sources and sinks built on `futures_core::Stream` and tokio channels.
//!
//! This module connects asynchronous producers to the rest of the async
//! ecosystem: any `Stream` can become a producer, a bounded channel can feed
//! one, and any producer can be consumed as a `Stream` again.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use async_trait::async_trait;
use futures_core::Stream;
use tokio::sync::mpsc;
use tokio_stream::StreamExt;

use crate::async_producer::AsyncProducer;
use crate::error::SeqError;

/// Type alias for a boxed stream of pull results.
pub type BoxStream<T, E> = Pin<Box<dyn Stream<Item = Result<T, E>> + Send>>;

/// The feeding half of a [`channel`].
///
/// Wraps a tokio mpsc sender. Dropping every feeder completes the producer.
#[derive(Debug)]
pub struct Feeder<T> {
    tx: mpsc::Sender<Result<T, SeqError>>,
}

impl<T> Feeder<T> {
    /// Send an element.
    ///
    /// Returns `Ok(())` if the element was queued, or `Err(element)` if the
    /// producer was dropped.
    pub async fn send(&self, item: T) -> Result<(), T> {
        match self.tx.reserve().await {
            Ok(permit) => {
                permit.send(Ok(item));
                Ok(())
            }
            Err(_) => Err(item),
        }
    }

    /// Try to send an element without waiting.
    ///
    /// Returns `Err(element)` if the channel is full or closed.
    pub fn try_send(&self, item: T) -> Result<(), T> {
        match self.tx.try_reserve() {
            Ok(permit) => {
                permit.send(Ok(item));
                Ok(())
            }
            Err(_) => Err(item),
        }
    }

    /// Make the producer report `err` from its next pull once the elements
    /// already queued have been pulled.
    pub async fn fail(&self, err: SeqError) -> Result<(), SeqError> {
        match self.tx.reserve().await {
            Ok(permit) => {
                permit.send(Err(err));
                Ok(())
            }
            Err(_) => Err(err),
        }
    }

    /// Check if the producer has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Get the remaining capacity of the underlying channel.
    pub fn capacity(&self) -> usize {
        self.tx.capacity()
    }
}

impl<T> Clone for Feeder<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

/// The producing half of a [`channel`].
///
/// Each pull suspends until an element, a failure, or the closing of every
/// feeder arrives. After a failure the producer is exhausted.
#[derive(Debug)]
pub struct ChannelProducer<T> {
    rx: mpsc::Receiver<Result<T, SeqError>>,
    done: bool,
}

#[async_trait]
impl<T: Send> AsyncProducer for ChannelProducer<T> {
    type Item = T;
    type Error = SeqError;

    async fn pull(&mut self) -> Result<Option<T>, SeqError> {
        if self.done {
            return Ok(None);
        }
        match self.rx.recv().await {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(err)) => {
                self.done = true;
                self.rx.close();
                Err(err)
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// Builder for channel-fed producers.
///
/// # Example
///
/// ```rust
/// use pullchain::prelude::*;
///
/// # async fn example() {
/// let (feeder, producer) = ChannelBuilder::<u32>::new()
///     .buffer_size(8)
///     .build();
///
/// feeder.send(1).await.unwrap();
/// feeder.send(2).await.unwrap();
/// drop(feeder);
///
/// assert_eq!(producer.to_vec().await.unwrap(), vec![1, 2]);
/// # }
/// ```
pub struct ChannelBuilder<T> {
    buffer_size: usize,
    _marker: std::marker::PhantomData<T>,
}

impl<T: Send + 'static> ChannelBuilder<T> {
    /// Create a new channel builder with default settings.
    pub fn new() -> Self {
        Self {
            buffer_size: 100,
            _marker: std::marker::PhantomData,
        }
    }

    /// Set the buffer size for the underlying channel.
    ///
    /// Default is 100. Zero is raised to one.
    pub fn buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Build the feeder and producer.
    pub fn build(self) -> (Feeder<T>, ChannelProducer<T>) {
        let (tx, rx) = mpsc::channel(self.buffer_size);
        (Feeder { tx }, ChannelProducer { rx, done: false })
    }
}

impl<T: Send + 'static> Default for ChannelBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a channel-fed producer with the default buffer size.
pub fn channel<T: Send + 'static>() -> (Feeder<T>, ChannelProducer<T>) {
    ChannelBuilder::<T>::new().build()
}

/// Create a channel-fed producer with a specific buffer size.
pub fn channel_with_buffer<T: Send + 'static>(
    buffer_size: usize,
) -> (Feeder<T>, ChannelProducer<T>) {
    ChannelBuilder::<T>::new().buffer_size(buffer_size).build()
}

/// An async producer over any `Stream`. Never fails.
#[derive(Debug)]
pub struct StreamProducer<S> {
    stream: S,
    done: bool,
}

#[async_trait]
impl<S> AsyncProducer for StreamProducer<S>
where
    S: Stream + Unpin + Send,
    S::Item: Send,
{
    type Item = S::Item;
    type Error = SeqError;

    async fn pull(&mut self) -> Result<Option<S::Item>, SeqError> {
        if self.done {
            return Ok(None);
        }
        let next = self.stream.next().await;
        self.done = next.is_none();
        Ok(next)
    }
}

/// Create an async producer from a stream.
pub fn from_stream<S>(stream: S) -> StreamProducer<S>
where
    S: Stream + Unpin + Send,
{
    StreamProducer {
        stream,
        done: false,
    }
}

/// An async producer over a stream of `Result`s.
///
/// The first `Err` is reported from `pull`; the producer is exhausted after it.
#[derive(Debug)]
pub struct TryStreamProducer<S> {
    stream: S,
    done: bool,
}

#[async_trait]
impl<S, T, E> AsyncProducer for TryStreamProducer<S>
where
    S: Stream<Item = Result<T, E>> + Unpin + Send,
    T: Send,
    E: Send,
{
    type Item = T;
    type Error = E;

    async fn pull(&mut self) -> Result<Option<T>, E> {
        if self.done {
            return Ok(None);
        }
        match self.stream.next().await {
            Some(Ok(item)) => Ok(Some(item)),
            Some(Err(err)) => {
                self.done = true;
                Err(err)
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// Create a fallible async producer from a stream of `Result`s.
pub fn from_try_stream<S, T, E>(stream: S) -> TryStreamProducer<S>
where
    S: Stream<Item = Result<T, E>> + Unpin + Send,
{
    TryStreamProducer {
        stream,
        done: false,
    }
}

type PendingPull<P> = Pin<
    Box<
        dyn Future<
                Output = (
                    P,
                    Result<Option<<P as AsyncProducer>::Item>, <P as AsyncProducer>::Error>,
                ),
            > + Send,
    >,
>;

enum StreamState<P: AsyncProducer> {
    Idle(P),
    Pulling(PendingPull<P>),
    Done,
}

/// Stream returned by [`AsyncProducerExt::into_stream`](crate::AsyncProducerExt::into_stream).
///
/// Yields `Ok` for every element and at most one `Err`, after which it ends.
/// The producer is moved into each pending pull, so only one pull is ever in
/// flight.
pub struct ProducerStream<P: AsyncProducer> {
    state: StreamState<P>,
}

impl<P: AsyncProducer + 'static> ProducerStream<P> {
    pub(crate) fn new(producer: P) -> Self {
        Self {
            state: StreamState::Idle(producer),
        }
    }

    /// Box this stream.
    pub fn boxed(self) -> BoxStream<P::Item, P::Error> {
        Box::pin(self)
    }
}

// The producer is never pinned in place; it moves in and out of each pull.
impl<P: AsyncProducer> Unpin for ProducerStream<P> {}

impl<P: AsyncProducer + 'static> Stream for ProducerStream<P> {
    type Item = Result<P::Item, P::Error>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            match std::mem::replace(&mut this.state, StreamState::Done) {
                StreamState::Idle(mut producer) => {
                    this.state = StreamState::Pulling(Box::pin(async move {
                        let outcome = producer.pull().await;
                        (producer, outcome)
                    }));
                }
                StreamState::Pulling(mut pending) => {
                    return match pending.as_mut().poll(cx) {
                        Poll::Pending => {
                            this.state = StreamState::Pulling(pending);
                            Poll::Pending
                        }
                        Poll::Ready((producer, Ok(Some(item)))) => {
                            this.state = StreamState::Idle(producer);
                            Poll::Ready(Some(Ok(item)))
                        }
                        Poll::Ready((_, Ok(None))) => Poll::Ready(None),
                        Poll::Ready((_, Err(err))) => Poll::Ready(Some(Err(err))),
                    };
                }
                StreamState::Done => return Poll::Ready(None),
            }
        }
    }
}

impl<P: AsyncProducer> fmt::Debug for ProducerStream<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            StreamState::Idle(_) => "idle",
            StreamState::Pulling(_) => "pulling",
            StreamState::Done => "done",
        };
        f.debug_struct("ProducerStream")
            .field("state", &state)
            .finish()
    }
}
