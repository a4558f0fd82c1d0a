//! Lazy adapters returned by `ProducerExt`.
//!
//! Each adapter is a small state machine: its `pull` delegates to the wrapped
//! source and keeps only the cursor state the operation needs. An adapter
//! that has completed or failed stays exhausted.

use std::fmt;

use crate::producer::Producer;

/// Latch `done` once a pull reports completion or failure.
pub(crate) fn settle<T, E>(done: &mut bool, outcome: Result<Option<T>, E>) -> Result<Option<T>, E> {
    if !matches!(outcome, Ok(Some(_))) {
        *done = true;
    }
    outcome
}

/// Producer returned by [`ProducerExt::map`](crate::ProducerExt::map).
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

impl<P, F, U> Producer for Map<P, F>
where
    P: Producer,
    F: FnMut(P::Item) -> Result<U, P::Error>,
{
    type Item = U;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<U>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self
            .source
            .pull()
            .and_then(|next| next.map(&mut self.f).transpose());
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

/// Producer returned by [`ProducerExt::filter`](crate::ProducerExt::filter).
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

impl<P, F> Filter<P, F>
where
    P: Producer,
    F: FnMut(&P::Item) -> Result<bool, P::Error>,
{
    fn advance(&mut self) -> Result<Option<P::Item>, P::Error> {
        while let Some(x) = self.source.pull()? {
            if (self.f)(&x)? {
                return Ok(Some(x));
            }
        }
        Ok(None)
    }
}

impl<P, F> Producer for Filter<P, F>
where
    P: Producer,
    F: FnMut(&P::Item) -> Result<bool, P::Error>,
{
    type Item = P::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.advance();
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

/// Producer returned by [`ProducerExt::take`](crate::ProducerExt::take).
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

impl<P: Producer> Producer for Take<P> {
    type Item = P::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        // The source is never touched once the budget is spent.
        if self.remaining == 0 {
            return Ok(None);
        }
        let outcome = self.source.pull();
        match outcome {
            Ok(Some(_)) => self.remaining -= 1,
            _ => self.remaining = 0,
        }
        outcome
    }
}

/// Producer returned by [`ProducerExt::skip`](crate::ProducerExt::skip).
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

impl<P: Producer> Producer for Skip<P> {
    type Item = P::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<P::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        while self.remaining > 0 {
            match self.source.pull() {
                Ok(Some(_)) => self.remaining -= 1,
                other => return settle(&mut self.done, other),
            }
        }
        let outcome = self.source.pull();
        settle(&mut self.done, outcome)
    }
}

/// Producer returned by [`ProducerExt::entries`](crate::ProducerExt::entries).
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

impl<P: Producer> Producer for Entries<P> {
    type Item = (usize, P::Item);
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<Self::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.source.pull().map(|next| {
            next.map(|x| {
                let index = self.index;
                self.index += 1;
                (index, x)
            })
        });
        settle(&mut self.done, outcome)
    }
}

/// Producer returned by [`ProducerExt::flat_map`](crate::ProducerExt::flat_map).
///
/// Holds at most one inner producer; the next source element is pulled only
/// after the current inner producer is exhausted.
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
    P: Producer,
    Q: Producer<Error = P::Error>,
    F: FnMut(P::Item) -> Result<Q, P::Error>,
{
    fn advance(&mut self) -> Result<Option<Q::Item>, P::Error> {
        loop {
            if let Some(inner) = self.inner.as_mut() {
                if let Some(x) = inner.pull()? {
                    return Ok(Some(x));
                }
                self.inner = None;
            }
            match self.source.pull()? {
                Some(x) => self.inner = Some((self.f)(x)?),
                None => return Ok(None),
            }
        }
    }
}

impl<P, F, Q> Producer for FlatMap<P, F, Q>
where
    P: Producer,
    Q: Producer<Error = P::Error>,
    F: FnMut(P::Item) -> Result<Q, P::Error>,
{
    type Item = Q::Item;
    type Error = P::Error;

    fn pull(&mut self) -> Result<Option<Q::Item>, P::Error> {
        if self.done {
            return Ok(None);
        }
        let outcome = self.advance();
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

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use crate::error::SeqError;
    use crate::producer::{Producer, ProducerExt};
    use crate::source::{from_fn, from_iter};

    #[test]
    fn test_map_then_filter() {
        let out = from_iter(1..=5)
            .map(|x| Ok(x * 2))
            .filter(|x| Ok(*x > 4))
            .to_vec()
            .unwrap();
        assert_eq!(out, vec![6, 8, 10]);
    }

    #[test]
    fn test_map_is_lazy() {
        let calls = Cell::new(0);
        let mut mapped = from_iter(1..=3).map(|x| {
            calls.set(calls.get() + 1);
            Ok(x)
        });
        assert_eq!(calls.get(), 0);

        assert_eq!(mapped.pull().unwrap(), Some(1));
        assert_eq!(calls.get(), 1);

        mapped.pull().unwrap();
        mapped.pull().unwrap();
        assert_eq!(mapped.pull().unwrap(), None);
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_filter_costs_one_pull_per_element() {
        let pulls = Cell::new(0);
        let mut items = 1..=6;
        let mut evens = from_fn(|| {
            pulls.set(pulls.get() + 1);
            Ok::<_, SeqError>(items.next())
        })
        .filter(|x| Ok(x % 2 == 0));

        assert_eq!(evens.pull().unwrap(), Some(2));
        assert_eq!(pulls.get(), 2);
        assert_eq!(evens.pull().unwrap(), Some(4));
        assert_eq!(pulls.get(), 4);
    }

    #[test]
    fn test_take_zero_never_pulls() {
        let pulls = Cell::new(0);
        let out = from_fn(|| {
            pulls.set(pulls.get() + 1);
            Ok::<_, SeqError>(Some(1))
        })
        .take(0)
        .to_vec()
        .unwrap();
        assert!(out.is_empty());
        assert_eq!(pulls.get(), 0);
    }

    #[test]
    fn test_take_infinite_source() {
        let out = from_iter(1..).take(3).to_vec().unwrap();
        assert_eq!(out, vec![1, 2, 3]);
    }

    #[test]
    fn test_take_leaves_borrowed_source_pullable() {
        let mut src = from_iter(1..=5);
        let head = src.by_ref().take(2).to_vec().unwrap();
        assert_eq!(head, vec![1, 2]);
        assert_eq!(src.to_vec().unwrap(), vec![3, 4, 5]);
    }

    #[test]
    fn test_take_more_than_available() {
        let out = from_iter(vec!['a', 'b']).take(10).to_vec().unwrap();
        assert_eq!(out, vec!['a', 'b']);
    }

    #[test]
    fn test_skip_discards_leading_elements() {
        assert_eq!(from_iter(1..=5).skip(2).to_vec().unwrap(), vec![3, 4, 5]);
        assert_eq!(from_iter(1..=5).skip(0).to_vec().unwrap(), vec![1, 2, 3, 4, 5]);
        assert!(from_iter(1..=2).skip(5).to_vec().unwrap().is_empty());
    }

    #[test]
    fn test_entries_and_alias_match() {
        let entries = from_iter(vec!["a", "b", "c"]).entries().to_vec().unwrap();
        let pairs = from_iter(vec!["a", "b", "c"])
            .as_indexed_pairs()
            .to_vec()
            .unwrap();
        assert_eq!(entries, vec![(0, "a"), (1, "b"), (2, "c")]);
        assert_eq!(entries, pairs);
    }

    #[test]
    fn test_entries_index_after_filter() {
        let out = from_iter(1..=6)
            .filter(|x| Ok(x % 3 == 0))
            .entries()
            .to_vec()
            .unwrap();
        assert_eq!(out, vec![(0, 3), (1, 6)]);
    }

    #[test]
    fn test_flat_map_duplicates() {
        let out = from_iter(vec![1, 2, 3])
            .flat_map(|x| Ok(from_iter(vec![x, x])))
            .to_vec()
            .unwrap();
        assert_eq!(out, vec![1, 1, 2, 2, 3, 3]);
    }

    #[test]
    fn test_flat_map_does_not_pull_ahead() {
        let outer_pulls = Cell::new(0);
        let mut items = vec![1, 2, 3].into_iter();
        let mut flat = from_fn(|| {
            outer_pulls.set(outer_pulls.get() + 1);
            Ok::<_, SeqError>(items.next())
        })
        .flat_map(|x| Ok(from_iter(vec![x * 10, x * 10 + 1])));

        assert_eq!(flat.pull().unwrap(), Some(10));
        assert_eq!(flat.pull().unwrap(), Some(11));
        assert_eq!(outer_pulls.get(), 1);
        assert_eq!(flat.pull().unwrap(), Some(20));
        assert_eq!(outer_pulls.get(), 2);
    }

    #[test]
    fn test_flat_map_skips_empty_inners() {
        let out = from_iter(0..4)
            .flat_map(|n| Ok(from_iter(0..n)))
            .to_vec()
            .unwrap();
        assert_eq!(out, vec![0, 0, 1, 0, 1, 2]);
    }

    #[test]
    fn test_failed_adapter_stays_exhausted() {
        let mut mapped = from_iter(1..=5).map(|x| {
            if x == 2 {
                Err(SeqError::callback("two"))
            } else {
                Ok(x)
            }
        });
        assert_eq!(mapped.pull(), Ok(Some(1)));
        assert!(mapped.pull().is_err());
        assert_eq!(mapped.pull(), Ok(None));
        assert_eq!(mapped.pull(), Ok(None));
    }

    #[test]
    fn test_completed_map_does_not_call_transform() {
        let calls = Cell::new(0);
        let mut mapped = from_iter(vec![1]).map(|x| {
            calls.set(calls.get() + 1);
            Ok(x)
        });
        mapped.pull().unwrap();
        assert_eq!(mapped.pull().unwrap(), None);
        assert_eq!(mapped.pull().unwrap(), None);
        assert_eq!(calls.get(), 1);
    }
}
