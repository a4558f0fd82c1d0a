//! Bridges between std iterators and synchronous producers.

use std::iter::Fuse;

use crate::error::SeqError;
use crate::producer::Producer;

/// A producer over any iterator. Never fails.
#[derive(Debug, Clone)]
pub struct IterProducer<I> {
    iter: Fuse<I>,
}

impl<I: Iterator> Producer for IterProducer<I> {
    type Item = I::Item;
    type Error = SeqError;

    fn pull(&mut self) -> Result<Option<I::Item>, SeqError> {
        Ok(self.iter.next())
    }
}

/// Create a producer from anything iterable.
///
/// # Example
///
/// ```rust
/// use pullchain::prelude::*;
///
/// let mut producer = from_iter(vec![1, 2]);
/// assert_eq!(producer.pull(), Ok(Some(1)));
/// assert_eq!(producer.pull(), Ok(Some(2)));
/// assert_eq!(producer.pull(), Ok(None));
/// ```
pub fn from_iter<I: IntoIterator>(iter: I) -> IterProducer<I::IntoIter> {
    IterProducer {
        iter: iter.into_iter().fuse(),
    }
}

/// A producer over an iterator of `Result`s.
///
/// The first `Err` is reported from `pull`; the producer is exhausted after it.
#[derive(Debug, Clone)]
pub struct TryIterProducer<I> {
    iter: I,
    done: bool,
}

impl<I, T, E> Producer for TryIterProducer<I>
where
    I: Iterator<Item = Result<T, E>>,
{
    type Item = T;
    type Error = E;

    fn pull(&mut self) -> Result<Option<T>, E> {
        if self.done {
            return Ok(None);
        }
        match self.iter.next() {
            Some(Ok(x)) => Ok(Some(x)),
            Some(Err(e)) => {
                self.done = true;
                Err(e)
            }
            None => {
                self.done = true;
                Ok(None)
            }
        }
    }
}

/// Create a fallible producer from an iterable of `Result`s.
pub fn from_results<I, T, E>(iter: I) -> TryIterProducer<I::IntoIter>
where
    I: IntoIterator<Item = Result<T, E>>,
{
    TryIterProducer {
        iter: iter.into_iter(),
        done: false,
    }
}

/// A producer driven by a closure.
pub struct FromFn<F> {
    f: F,
    done: bool,
}

impl<F, T, E> Producer for FromFn<F>
where
    F: FnMut() -> Result<Option<T>, E>,
{
    type Item = T;
    type Error = E;

    fn pull(&mut self) -> Result<Option<T>, E> {
        if self.done {
            return Ok(None);
        }
        let outcome = (self.f)();
        if !matches!(outcome, Ok(Some(_))) {
            self.done = true;
        }
        outcome
    }
}

/// Create a producer that calls `f` for every pull.
///
/// The closure is not called again once it has returned `Ok(None)` or `Err`.
pub fn from_fn<F, T, E>(f: F) -> FromFn<F>
where
    F: FnMut() -> Result<Option<T>, E>,
{
    FromFn { f, done: false }
}

/// Iterator returned by [`ProducerExt::results`](crate::ProducerExt::results).
///
/// Yields `Ok` for every element and at most one `Err`, after which it is
/// exhausted.
#[derive(Debug)]
pub struct Results<P> {
    source: P,
    done: bool,
}

impl<P> Results<P> {
    pub(crate) fn new(source: P) -> Self {
        Self {
            source,
            done: false,
        }
    }

    /// Recover the wrapped producer.
    pub fn into_inner(self) -> P {
        self.source
    }
}

impl<P: Producer> Iterator for Results<P> {
    type Item = Result<P::Item, P::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.source.pull() {
            Ok(Some(x)) => Some(Ok(x)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<P: Producer> std::iter::FusedIterator for Results<P> {}
