use std::{fmt, iter::FusedIterator};

use log::{debug, trace};

use crate::{
    error::{Error, Result, SourceError},
    source::Source,
};

/// Outcome of pulling one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step<T> {
    Yielded(T),
    Exhausted,
}

impl<T> Step<T> {
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Step::Exhausted)
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Step::Yielded(value) => Some(value),
            Step::Exhausted => None,
        }
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Step<U> {
        match self {
            Step::Yielded(value) => Step::Yielded(f(value)),
            Step::Exhausted => Step::Exhausted,
        }
    }
}

impl<T> From<Option<T>> for Step<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Step::Yielded(value),
            None => Step::Exhausted,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Active,
    Exhausted,
}

/// A pull-based, single-pass cursor over values produced on demand.
///
/// Nothing is computed until [`next`](LazySequence::next) is called, and each
/// call advances the cursor by exactly one position. Once the underlying
/// source runs out the sequence is `Exhausted` for good: the source is never
/// pulled again and every later `next` returns [`Step::Exhausted`].
///
/// Combinators (`chain`, `map`, `filter`, `slice`, ...) take the sequence by
/// value and wrap it; use [`by_ref`](LazySequence::by_ref) to keep consuming
/// the same cursor afterwards.
///
/// A sequence is not `Send`: it is meant for a single owner on a single
/// thread.
pub struct LazySequence<'a, T> {
    source: Box<dyn Source<Item = T> + 'a>,
    state: State,
}

impl<'a, T: 'a> LazySequence<'a, T> {
    pub fn new<S>(source: S) -> Self
    where
        S: Source<Item = T> + 'a,
    {
        Self {
            source: Box::new(source),
            state: State::Active,
        }
    }

    pub fn next(&mut self) -> Result<Step<T>, SourceError> {
        if self.state == State::Exhausted {
            return Ok(Step::Exhausted);
        }
        let step = self.source.pull()?;
        if step.is_exhausted() {
            trace!("lazy sequence exhausted");
            self.state = State::Exhausted;
        }
        Ok(step)
    }

    /// Drains up to `limit` remaining values (all of them when `limit` is
    /// `None`) into a vector.
    ///
    /// A sequence known to be infinite must be given a limit; otherwise this
    /// fails with [`Error::InvalidArgument`] before pulling anything.
    ///
    /// If the source fails partway, the error is returned and the values
    /// drained before it are dropped. They cannot be pulled again; drain with
    /// [`next`](LazySequence::next) to keep them.
    pub fn to_eager_list(&mut self, limit: Option<usize>) -> Result<Vec<T>> {
        if limit.is_none() && self.is_infinite() {
            debug!("refusing to drain an infinite sequence without a limit");
            return Err(Error::InvalidArgument(String::from(
                "an infinite sequence can only be drained with a limit",
            )));
        }
        let mut values = Vec::new();
        while limit.map_or(true, |limit| values.len() < limit) {
            match self.next()? {
                Step::Yielded(value) => values.push(value),
                Step::Exhausted => break,
            }
        }
        Ok(values)
    }

    /// Borrows this sequence as a new one sharing the same cursor.
    pub fn by_ref(&mut self) -> LazySequence<'_, T> {
        LazySequence::new(self)
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_exhausted(&self) -> bool {
        self.state == State::Exhausted
    }

    pub fn is_infinite(&self) -> bool {
        self.state == State::Active && self.source.is_infinite()
    }
}

impl<'a, T: 'a> Source for LazySequence<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        self.next()
    }

    fn is_infinite(&self) -> bool {
        LazySequence::is_infinite(self)
    }
}

impl<'a, T> fmt::Debug for LazySequence<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("LazySequence")
            .field("state", &self.state)
            .field("infinite", &self.source.is_infinite())
            .finish()
    }
}

/// Iterator over the remaining values of a [`LazySequence`]. Source errors
/// are yielded as `Err` items; iteration stops at exhaustion.
#[derive(Debug)]
pub struct IntoIter<'a, T> {
    seq: LazySequence<'a, T>,
}

impl<'a, T: 'a> Iterator for IntoIter<'a, T> {
    type Item = Result<T, SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.seq.next().map(Step::into_option).transpose()
    }
}

impl<'a, T: 'a> FusedIterator for IntoIter<'a, T> {}

impl<'a, T: 'a> IntoIterator for LazySequence<'a, T> {
    type Item = Result<T, SourceError>;
    type IntoIter = IntoIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { seq: self }
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn finite_sequence_exhausts_once_and_for_all() {
        let mut seq = LazySequence::from_vec(vec!['x', 'y']);
        assert_eq!(seq.state(), State::Active);
        assert_eq!(seq.next().unwrap(), Step::Yielded('x'));
        assert_eq!(seq.next().unwrap(), Step::Yielded('y'));
        assert_eq!(seq.state(), State::Active);
        for _ in 0..3 {
            assert_eq!(seq.next().unwrap(), Step::Exhausted);
            assert_eq!(seq.state(), State::Exhausted);
        }
    }

    #[test]
    fn exhausted_source_is_not_pulled_again() {
        let mut pulls = 0;
        {
            let mut seq = LazySequence::from_fn(|| {
                pulls += 1;
                None::<u8>
            });
            assert_eq!(seq.next().unwrap(), Step::Exhausted);
            assert_eq!(seq.next().unwrap(), Step::Exhausted);
            assert!(seq.to_eager_list(None).unwrap().is_empty());
        }
        assert_eq!(pulls, 1);
    }

    #[test]
    fn to_eager_list_respects_limit() {
        let mut seq = LazySequence::from_vec(vec![1, 2, 3, 4, 5]);
        assert_eq!(seq.to_eager_list(Some(2)).unwrap(), vec![1, 2]);
        assert_eq!(seq.to_eager_list(Some(0)).unwrap(), Vec::<i32>::new());
        assert_eq!(seq.to_eager_list(Some(10)).unwrap(), vec![3, 4, 5]);
        assert!(seq.is_exhausted());
    }

    #[test]
    fn failed_drain_drops_what_it_pulled() {
        let mut pulls = 0;
        let mut seq = LazySequence::try_from_fn(move || {
            pulls += 1;
            match pulls {
                1 | 2 => Ok(Some(pulls)),
                3 => Err(SourceError::Busy),
                4 => Ok(Some(4)),
                _ => Ok(None),
            }
        });
        assert!(matches!(
            seq.to_eager_list(None),
            Err(Error::Source(SourceError::Busy))
        ));
        assert_eq!(seq.to_eager_list(None).unwrap(), vec![4]);
    }

    #[test]
    fn by_ref_shares_cursor() {
        let mut seq = LazySequence::from_vec(vec![1, 2, 3, 4]);
        assert_eq!(seq.by_ref().to_eager_list(Some(1)).unwrap(), vec![1]);
        assert_eq!(seq.next().unwrap(), Step::Yielded(2));
        assert_eq!(seq.by_ref().to_eager_list(None).unwrap(), vec![3, 4]);
        assert!(seq.is_exhausted());
    }

    #[test]
    fn into_iter_yields_results() {
        let seq = LazySequence::from_vec(vec!["a", "b"]);
        let values: Result<Vec<_>, SourceError> = seq.into_iter().collect();
        assert_eq!(values.unwrap(), vec!["a", "b"]);

        let joined = LazySequence::from_vec(vec![1, 2, 3])
            .into_iter()
            .map(|value| value.unwrap())
            .join("-");
        assert_eq!(joined, "1-2-3");
    }

    #[test]
    fn debug_shows_state() {
        let mut seq = LazySequence::from_vec(Vec::<u8>::new());
        assert_eq!(
            format!("{:?}", seq),
            "LazySequence { state: Active, infinite: false }"
        );
        seq.next().unwrap();
        assert_eq!(
            format!("{:?}", seq),
            "LazySequence { state: Exhausted, infinite: false }"
        );
    }

    quickcheck! {
        fn n_values_then_exhausted(values: Vec<i32>, extra: u8) -> bool {
            let mut seq = LazySequence::from_vec(values.clone());
            let mut pulled = Vec::new();
            for _ in 0..values.len() {
                match seq.next().unwrap() {
                    Step::Yielded(value) => pulled.push(value),
                    Step::Exhausted => return false,
                }
            }
            pulled == values
                && (0..=extra % 8).all(|_| seq.next().unwrap() == Step::Exhausted)
        }
    }
}
