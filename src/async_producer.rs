//! Asynchronous pull protocol and its combinator surface.
//!
//! `AsyncProducer` mirrors [`Producer`](crate::Producer): each pull is a
//! suspension point. Every operation in `AsyncProducerExt` awaits one pull at
//! a time and awaits each callback before pulling again, so a chain always
//! runs in a single deterministic order.

use std::future::Future;

use async_trait::async_trait;

use crate::async_combinators::{Entries, Filter, FlatMap, Map, Skip, Take};
use crate::producer::Producer;
use crate::stream::ProducerStream;

/// A cursor over a possibly unbounded, ordered sequence whose pulls may
/// suspend.
///
/// # Example
///
/// ```rust
/// use pullchain::{async_trait, AsyncProducer, SeqError};
///
/// struct Ticks(u32);
///
/// #[async_trait]
/// impl AsyncProducer for Ticks {
///     type Item = u32;
///     type Error = SeqError;
///
///     async fn pull(&mut self) -> Result<Option<u32>, SeqError> {
///         if self.0 == 0 {
///             return Ok(None);
///         }
///         self.0 -= 1;
///         Ok(Some(self.0))
///     }
/// }
/// ```
#[async_trait]
pub trait AsyncProducer: Send {
    /// The element type.
    type Item: Send;

    /// The failure type of the source and of callbacks applied to it.
    type Error: Send;

    /// Pull the next element, suspending until it is available.
    async fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error>;
}

#[async_trait]
impl<'a, P: AsyncProducer + ?Sized> AsyncProducer for &'a mut P {
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        (**self).pull().await
    }
}

#[async_trait]
impl<P: AsyncProducer + ?Sized> AsyncProducer for Box<P> {
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        (**self).pull().await
    }
}

/// Chainable operations available on every asynchronous producer.
///
/// Callbacks of `map`, `filter`, `reduce`, `for_each`, `some`, `every` and
/// `find` return futures; a plain value can be returned with
/// `std::future::ready` or an `async move` block.
///
/// # Example
///
/// ```rust
/// use pullchain::prelude::*;
///
/// # async fn example() -> Result<(), SeqError> {
/// let total = from_iter(1..=3)
///     .into_async()
///     .map(|x| async move { Ok(x * 10) })
///     .reduce(|acc, x| async move { Ok(acc + x) }, 0)
///     .await?;
///
/// assert_eq!(total, 60);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait AsyncProducerExt: AsyncProducer {
    /// Borrow this producer so a chain can consume part of it.
    fn by_ref(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self
    }

    /// Transform every element with the future returned by `f`.
    fn map<U, F, Fut>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        U: Send,
        F: FnMut(Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<U, Self::Error>> + Send,
    {
        Map::new(self, f)
    }

    /// Keep only the elements whose predicate future resolves to `true`.
    fn filter<F, Fut>(self, f: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<bool, Self::Error>> + Send,
    {
        Filter::new(self, f)
    }

    /// Yield at most `limit` leading elements.
    fn take(self, limit: usize) -> Take<Self>
    where
        Self: Sized,
    {
        Take::new(self, limit)
    }

    /// Discard the first `limit` elements and yield the rest.
    #[doc(alias = "drop")]
    fn skip(self, limit: usize) -> Skip<Self>
    where
        Self: Sized,
    {
        Skip::new(self, limit)
    }

    /// Pair each element with its zero-based position.
    fn entries(self) -> Entries<Self>
    where
        Self: Sized,
    {
        Entries::new(self)
    }

    /// Alias of [`entries`](AsyncProducerExt::entries).
    fn as_indexed_pairs(self) -> Entries<Self>
    where
        Self: Sized,
    {
        self.entries()
    }

    /// Replace each element with the elements of the producer `f` returns.
    ///
    /// Synchronous inner producers can be lifted with
    /// [`into_async`](crate::ProducerExt::into_async).
    fn flat_map<Q, F>(self, f: F) -> FlatMap<Self, F, Q>
    where
        Self: Sized,
        Q: AsyncProducer<Error = Self::Error>,
        F: FnMut(Self::Item) -> Result<Q, Self::Error> + Send,
    {
        FlatMap::new(self, f)
    }

    /// Fold every element into an accumulator, one step at a time.
    async fn reduce<A, F, Fut>(mut self, mut f: F, init: A) -> Result<A, Self::Error>
    where
        Self: Sized,
        A: Send,
        F: FnMut(A, Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<A, Self::Error>> + Send,
    {
        let mut acc = init;
        while let Some(x) = self.pull().await? {
            let step = f(acc, x);
            acc = step.await?;
        }
        Ok(acc)
    }

    /// Collect every element in pull order.
    #[doc(alias = "toArray")]
    async fn to_vec(mut self) -> Result<Vec<Self::Item>, Self::Error>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while let Some(x) = self.pull().await? {
            out.push(x);
        }
        Ok(out)
    }

    /// Await `f` on every element before pulling the next one.
    async fn for_each<F, Fut>(mut self, mut f: F) -> Result<(), Self::Error>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<(), Self::Error>> + Send,
    {
        while let Some(x) = self.pull().await? {
            let visit = f(x);
            visit.await?;
        }
        Ok(())
    }

    /// Whether any element satisfies `f`. Stops at the first match.
    async fn some<F, Fut>(mut self, mut f: F) -> Result<bool, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<bool, Self::Error>> + Send,
    {
        while let Some(x) = self.pull().await? {
            let verdict = f(&x);
            if verdict.await? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether every element satisfies `f`. Stops at the first failure.
    async fn every<F, Fut>(mut self, mut f: F) -> Result<bool, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<bool, Self::Error>> + Send,
    {
        while let Some(x) = self.pull().await? {
            let verdict = f(&x);
            if !verdict.await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The first element satisfying `f`, or `None`.
    async fn find<F, Fut>(mut self, mut f: F) -> Result<Option<Self::Item>, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Fut + Send,
        Fut: Future<Output = Result<bool, Self::Error>> + Send,
    {
        while let Some(x) = self.pull().await? {
            let verdict = f(&x);
            if verdict.await? {
                return Ok(Some(x));
            }
        }
        Ok(None)
    }

    /// Expose this producer as a `futures_core::Stream` of results.
    fn into_stream(self) -> ProducerStream<Self>
    where
        Self: Sized + 'static,
    {
        ProducerStream::new(self)
    }
}

impl<P: AsyncProducer + ?Sized> AsyncProducerExt for P {}

/// A synchronous producer used as an asynchronous one.
///
/// Every pull completes without suspending.
#[derive(Debug)]
pub struct SyncToAsync<P> {
    inner: P,
}

impl<P> SyncToAsync<P> {
    /// Wrap a synchronous producer.
    pub fn new(inner: P) -> Self {
        Self { inner }
    }

    /// Recover the wrapped producer.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

#[async_trait]
impl<P> AsyncProducer for SyncToAsync<P>
where
    P: Producer + Send,
    P::Item: Send,
    P::Error: Send,
{
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        self.inner.pull()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::SeqError;
    use crate::producer::ProducerExt;
    use crate::source::from_iter;

    /// Yields `1..=n`, suspending once before every element and logging pulls.
    struct Suspending {
        next: u32,
        last: u32,
        log: Arc<Mutex<Vec<u32>>>,
    }

    impl Suspending {
        fn new(last: u32) -> (Self, Arc<Mutex<Vec<u32>>>) {
            let log = Arc::new(Mutex::new(Vec::new()));
            let producer = Self {
                next: 1,
                last,
                log: log.clone(),
            };
            (producer, log)
        }
    }

    #[async_trait]
    impl AsyncProducer for Suspending {
        type Item = u32;
        type Error = SeqError;

        async fn pull(&mut self) -> Result<Option<u32>, SeqError> {
            tokio::task::yield_now().await;
            if self.next > self.last {
                return Ok(None);
            }
            let value = self.next;
            self.next += 1;
            self.log.lock().unwrap().push(value);
            Ok(Some(value))
        }
    }

    #[tokio::test]
    async fn test_reduce_pulls_in_order() {
        let (source, log) = Suspending::new(3);
        let total = source
            .reduce(|acc, x| async move { Ok(acc + x) }, 0)
            .await
            .unwrap();
        assert_eq!(total, 6);
        assert_eq!(*log.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_reduce_empty_returns_init() {
        let (source, _log) = Suspending::new(0);
        let total = source
            .reduce(|_, _| async move { Err(SeqError::callback("unreachable")) }, 42)
            .await
            .unwrap();
        assert_eq!(total, 42);
    }

    #[tokio::test]
    async fn test_for_each_awaits_sequentially() {
        let (source, _log) = Suspending::new(4);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        source
            .for_each(move |x| {
                let sink = sink.clone();
                async move {
                    tokio::task::yield_now().await;
                    sink.lock().unwrap().push(x);
                    Ok(())
                }
            })
            .await
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_find_short_circuits() {
        let (source, log) = Suspending::new(5);
        let found = source
            .find(|x| std::future::ready(Ok(*x == 3)))
            .await
            .unwrap();
        assert_eq!(found, Some(3));
        assert_eq!(log.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_some_every_on_empty() {
        let (empty, _) = Suspending::new(0);
        assert!(!empty.some(|_| std::future::ready(Ok(true))).await.unwrap());
        let (empty, _) = Suspending::new(0);
        assert!(empty.every(|_| std::future::ready(Ok(false))).await.unwrap());
    }

    #[tokio::test]
    async fn test_every_stops_at_first_failure() {
        let (source, log) = Suspending::new(5);
        let all_small = source
            .every(|x| std::future::ready(Ok(*x < 2)))
            .await
            .unwrap();
        assert!(!all_small);
        assert_eq!(*log.lock().unwrap(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_sync_to_async_bridge() {
        let out = from_iter(vec!["x", "y"]).into_async().to_vec().await.unwrap();
        assert_eq!(out, vec!["x", "y"]);
    }

    #[tokio::test]
    async fn test_by_ref_leaves_remainder() {
        let mut source = from_iter(1..=4).into_async();
        let first = source.by_ref().find(|x| std::future::ready(Ok(*x > 1))).await.unwrap();
        assert_eq!(first, Some(2));
        assert_eq!(source.to_vec().await.unwrap(), vec![3, 4]);
    }
}
