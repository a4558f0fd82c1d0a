//! Lazy adapters returned by `AsyncProducerExt`.
//!
//! Same state machines as [`combinators`](crate::combinators), with an
//! awaited pull. Callback futures are awaited before the adapter pulls again.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;

use crate::async_producer::AsyncProducer;
use crate::combinators::settle;

/// Producer returned by [`AsyncProducerExt::map`](crate::AsyncProducerExt::map).
pub struct Map<P, F> {
    source: P,
    f: F,
    done: bool,
}

impl<P, F> Map<P, F> {
    pub(crate) fn new(source: P, f: F) -> Self {
        Self {
            source,
            f,
            done: false,
        }
    }
}

impl<P, F, Fut, U> Map<P, F>
where
    P: AsyncProducer,
    U: Send,
    F: FnMut(P::Item) -> Fut + Send,
    Fut: Future<Output = Result<U, P::Error>> + Send,
{
    async fn advance(&mut self) -> Result<Option<U>, P::Error> {
        match self.source.pull().await? {
            Some(x) => {
                let mapped = (self.f)(x);
                mapped.await.map(Some)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<P, F, Fut, U> AsyncProducer for Map<P, F>
where
    P: AsyncProducer,
    U: Send,
    F: FnMut(P::Item) -> Fut + Send,
    Fut: Future<Output = Result<U, P::Error>> + Send,
{
    type Item = U;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<U>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.advance().await;
        settle(&mut self.done, outcome)
    }
}

impl<P: fmt::Debug, F> fmt::Debug for Map<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("source", &self.source)
            .field("done", &self.done)
            .finish()
    }
}

/// Producer returned by [`AsyncProducerExt::filter`](crate::AsyncProducerExt::filter).
pub struct Filter<P, F> {
    source: P,
    f: F,
    done: bool,
}

impl<P, F> Filter<P, F> {
    pub(crate) fn new(source: P, f: F) -> Self {
        Self {
            source,
            f,
            done: false,
        }
    }
}

impl<P, F, Fut> Filter<P, F>
where
    P: AsyncProducer,
    F: FnMut(&P::Item) -> Fut + Send,
    Fut: Future<Output = Result<bool, P::Error>> + Send,
{
    async fn advance(&mut self) -> Result<Option<P::Item>, P::Error> {
        while let Some(x) = self.source.pull().await? {
            let verdict = (self.f)(&x);
            if verdict.await? {
                return Ok(Some(x));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl<P, F, Fut> AsyncProducer for Filter<P, F>
where
    P: AsyncProducer,
    F: FnMut(&P::Item) -> Fut + Send,
    Fut: Future<Output = Result<bool, P::Error>> + Send,
{
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.advance().await;
        settle(&mut self.done, outcome)
    }
}

impl<P: fmt::Debug, F> fmt::Debug for Filter<P, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Filter")
            .field("source", &self.source)
            .field("done", &self.done)
            .finish()
    }
}

/// Producer returned by [`AsyncProducerExt::take`](crate::AsyncProducerExt::take).
#[derive(Debug)]
pub struct Take<P> {
    source: P,
    remaining: usize,
}

impl<P> Take<P> {
    pub(crate) fn new(source: P, limit: usize) -> Self {
        Self {
            source,
            remaining: limit,
        }
    }
}

#[async_trait]
impl<P: AsyncProducer> AsyncProducer for Take<P> {
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let outcome = self.source.pull().await;
        match outcome {
            Ok(Some(_)) => self.remaining -= 1,
            _ => self.remaining = 0,
        }
        outcome
    }
}

/// Producer returned by [`AsyncProducerExt::skip`](crate::AsyncProducerExt::skip).
#[derive(Debug)]
pub struct Skip<P> {
    source: P,
    remaining: usize,
    done: bool,
}

impl<P> Skip<P> {
    pub(crate) fn new(source: P, limit: usize) -> Self {
        Self {
            source,
            remaining: limit,
            done: false,
        }
    }
}

#[async_trait]
impl<P: AsyncProducer> AsyncProducer for Skip<P> {
    type Item = P::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        while self.remaining > 0 {
            match self.source.pull().await {
                Ok(Some(_)) => self.remaining -= 1,
                other => return settle(&mut self.done, other),
            }
        }
        let outcome = self.source.pull().await;
        settle(&mut self.done, outcome)
    }
}

/// Producer returned by [`AsyncProducerExt::entries`](crate::AsyncProducerExt::entries).
#[derive(Debug)]
pub struct Entries<P> {
    source: P,
    index: usize,
    done: bool,
}

impl<P> Entries<P> {
    pub(crate) fn new(source: P) -> Self {
        Self {
            source,
            index: 0,
            done: false,
        }
    }
}

#[async_trait]
impl<P: AsyncProducer> AsyncProducer for Entries<P> {
    type Item = (usize, P::Item);
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<Self::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = match self.source.pull().await {
            Ok(Some(x)) => {
                let index = self.index;
                self.index += 1;
                Ok(Some((index, x)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        settle(&mut self.done, outcome)
    }
}

/// Producer returned by [`AsyncProducerExt::flat_map`](crate::AsyncProducerExt::flat_map).
pub struct FlatMap<P, F, Q> {
    source: P,
    f: F,
    inner: Option<Q>,
    done: bool,
}

impl<P, F, Q> FlatMap<P, F, Q> {
    pub(crate) fn new(source: P, f: F) -> Self {
        Self {
            source,
            f,
            inner: None,
            done: false,
        }
    }
}

impl<P, F, Q> FlatMap<P, F, Q>
where
    P: AsyncProducer,
    Q: AsyncProducer<Error = P::Error>,
    F: FnMut(P::Item) -> Result<Q, P::Error> + Send,
{
    async fn advance(&mut self) -> Result<Option<Q::Item>, P::Error> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(x) = inner.pull().await? {
                    return Ok(Some(x));
                }
                self.inner = None;
            }
            match self.source.pull().await? {
                Some(x) => self.inner = Some((self.f)(x)?),
                None => return Ok(None),
            }
        }
    }
}

#[async_trait]
impl<P, F, Q> AsyncProducer for FlatMap<P, F, Q>
where
    P: AsyncProducer,
    Q: AsyncProducer<Error = P::Error>,
    F: FnMut(P::Item) -> Result<Q, P::Error> + Send,
{
    type Item = Q::Item;
    type Error = P::Error;

    async fn pull(&mut self) -> Result<Option<Q::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.advance().await;
        settle(&mut self.done, outcome)
    }
}

impl<P: fmt::Debug, F, Q: fmt::Debug> fmt::Debug for FlatMap<P, F, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatMap")
            .field("source", &self.source)
            .field("inner", &self.inner)
            .field("done", &self.done)
            .finish()
    }
}
