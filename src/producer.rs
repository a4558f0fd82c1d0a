//! Synchronous pull protocol and its combinator surface.
//!
//! The `Producer` trait is the minimal contract a synchronous sequence has to
//! satisfy. Every operation in `ProducerExt` is implemented once, generically,
//! for anything that implements it.

use crate::async_producer::SyncToAsync;
use crate::combinators::{Entries, Filter, FlatMap, Map, Skip, Take};
use crate::source::Results;

/// A cursor over a possibly unbounded, ordered sequence.
///
/// Each call to `pull` either yields the next element (`Ok(Some(_))`),
/// reports completion (`Ok(None)`), or fails (`Err(_)`). Once a producer has
/// reported completion it must keep doing so.
///
/// # Example
///
/// ```rust
/// use pullchain::{Producer, SeqError};
///
/// struct Countdown(u32);
///
/// impl Producer for Countdown {
///     type Item = u32;
///     type Error = SeqError;
///
///     fn pull(&mut self) -> Result<Option<u32>, SeqError> {
///         if self.0 == 0 {
///             return Ok(None);
///         }
///         self.0 -= 1;
///         Ok(Some(self.0 + 1))
///     }
/// }
///
/// let mut countdown = Countdown(2);
/// assert_eq!(countdown.pull(), Ok(Some(2)));
/// assert_eq!(countdown.pull(), Ok(Some(1)));
/// assert_eq!(countdown.pull(), Ok(None));
/// ```
pub trait Producer {
    /// The element type.
    type Item;

    /// The failure type of the source and of callbacks applied to it.
    type Error;

    /// Pull the next element.
    fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error>;
}

impl<P: Producer + ?Sized> Producer for &mut P {
    type Item = P::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        (**self).pull()
    }
}

impl<P: Producer + ?Sized> Producer for Box<P> {
    type Item = P::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<Self::Item>, Self::Error> {
        (**self).pull()
    }
}

/// Chainable operations available on every synchronous producer.
///
/// Lazy operations (`map`, `filter`, `take`, `skip`, `entries`, `flat_map`)
/// return a new producer and do no work until it is pulled. Terminal
/// operations (`reduce`, `to_vec`, `for_each`, `some`, `every`, `find`) drive
/// the source until it is exhausted or the answer is known.
///
/// Callbacks return `Result<_, Self::Error>`; an `Err` stops the chain and is
/// handed back to the caller unchanged.
///
/// # Example
///
/// ```rust
/// use pullchain::prelude::*;
///
/// let doubled = from_iter(1..=5)
///     .map(|x| Ok(x * 2))
///     .filter(|x| Ok(*x > 4))
///     .to_vec()
///     .unwrap();
///
/// assert_eq!(doubled, vec![6, 8, 10]);
/// ```
pub trait ProducerExt: Producer {
    /// Borrow this producer so a chain can consume part of it.
    fn by_ref(&mut self) -> &mut Self
    where
        Self: Sized,
    {
        self
    }

    /// Transform every element with `f`.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Result<U, Self::Error>,
    {
        Map::new(self, f)
    }

    /// Keep only the elements for which `f` holds.
    fn filter<F>(self, f: F) -> Filter<Self, F>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Result<bool, Self::Error>,
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

    /// Alias of [`entries`](ProducerExt::entries).
    fn as_indexed_pairs(self) -> Entries<Self>
    where
        Self: Sized,
    {
        self.entries()
    }

    /// Replace each element with the elements of the producer `f` returns.
    fn flat_map<Q, F>(self, f: F) -> FlatMap<Self, F, Q>
    where
        Self: Sized,
        Q: Producer<Error = Self::Error>,
        F: FnMut(Self::Item) -> Result<Q, Self::Error>,
    {
        FlatMap::new(self, f)
    }

    /// Fold every element into an accumulator.
    ///
    /// Returns `init` untouched when the source is empty.
    fn reduce<A, F>(mut self, mut f: F, init: A) -> Result<A, Self::Error>
    where
        Self: Sized,
        F: FnMut(A, Self::Item) -> Result<A, Self::Error>,
    {
        let mut acc = init;
        while let Some(x) = self.pull()? {
            acc = f(acc, x)?;
        }
        Ok(acc)
    }

    /// Collect every element in pull order.
    #[doc(alias = "toArray")]
    fn to_vec(mut self) -> Result<Vec<Self::Item>, Self::Error>
    where
        Self: Sized,
    {
        let mut out = Vec::new();
        while let Some(x) = self.pull()? {
            out.push(x);
        }
        Ok(out)
    }

    /// Call `f` on every element.
    fn for_each<F>(mut self, mut f: F) -> Result<(), Self::Error>
    where
        Self: Sized,
        F: FnMut(Self::Item) -> Result<(), Self::Error>,
    {
        while let Some(x) = self.pull()? {
            f(x)?;
        }
        Ok(())
    }

    /// Whether any element satisfies `f`. Stops at the first match.
    fn some<F>(mut self, mut f: F) -> Result<bool, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Result<bool, Self::Error>,
    {
        while let Some(x) = self.pull()? {
            if f(&x)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Whether every element satisfies `f`. Stops at the first failure.
    fn every<F>(mut self, mut f: F) -> Result<bool, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Result<bool, Self::Error>,
    {
        while let Some(x) = self.pull()? {
            if !f(&x)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The first element satisfying `f`, or `None`.
    fn find<F>(mut self, mut f: F) -> Result<Option<Self::Item>, Self::Error>
    where
        Self: Sized,
        F: FnMut(&Self::Item) -> Result<bool, Self::Error>,
    {
        while let Some(x) = self.pull()? {
            if f(&x)? {
                return Ok(Some(x));
            }
        }
        Ok(None)
    }

    /// Drive this producer from a `for` loop.
    fn results(self) -> Results<Self>
    where
        Self: Sized,
    {
        Results::new(self)
    }

    /// Use this producer where an `AsyncProducer` is expected.
    fn into_async(self) -> SyncToAsync<Self>
    where
        Self: Sized,
    {
        SyncToAsync::new(self)
    }
}

impl<P: Producer + ?Sized> ProducerExt for P {}
