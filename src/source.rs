use std::{cell::RefCell, rc::Rc};

use crate::{
    error::SourceError,
    lazy_sequence::{LazySequence, Step},
};

/// Anything that can hand out values one at a time.
///
/// A source is pulled only when the sequence wrapping it is pulled, and
/// exactly once per pull. After reporting [`Step::Exhausted`] a source is not
/// pulled again by [`LazySequence`], so implementations need not be fused.
pub trait Source {
    type Item;

    fn pull(&mut self) -> Result<Step<Self::Item>, SourceError>;

    /// Whether the source is known never to exhaust. Draining such a source
    /// needs an explicit bound.
    fn is_infinite(&self) -> bool {
        false
    }
}

impl<S: Source + ?Sized> Source for &mut S {
    type Item = S::Item;

    fn pull(&mut self) -> Result<Step<Self::Item>, SourceError> {
        (**self).pull()
    }

    fn is_infinite(&self) -> bool {
        (**self).is_infinite()
    }
}

/// How a sequence over a shared collection sees later mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Elements are read at consumption time; mutations made before a
    /// position is consumed are observed, including changes in length.
    Live,
    /// The collection is copied when the sequence is built.
    Snapshot,
}

pub(crate) struct IterSource<I> {
    iter: I,
}

impl<I: Iterator> Source for IterSource<I> {
    type Item = I::Item;

    fn pull(&mut self) -> Result<Step<Self::Item>, SourceError> {
        Ok(self.iter.next().into())
    }
}

pub(crate) struct SharedSource<T> {
    vec: Rc<RefCell<Vec<T>>>,
    next_idx: usize,
}

impl<T: Clone> Source for SharedSource<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        let vec = self.vec.try_borrow().map_err(|_| SourceError::Busy)?;
        if self.next_idx < vec.len() {
            let res = vec[self.next_idx].clone();
            self.next_idx += 1;
            Ok(Step::Yielded(res))
        } else {
            Ok(Step::Exhausted)
        }
    }
}

pub(crate) struct FromFn<F> {
    rule: F,
}

impl<T, F: FnMut() -> Result<Option<T>, SourceError>> Source for FromFn<F> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        (self.rule)().map(Step::from)
    }
}

pub(crate) struct RepeatWith<F> {
    rule: F,
}

impl<T, F: FnMut() -> T> Source for RepeatWith<F> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        Ok(Step::Yielded((self.rule)()))
    }

    fn is_infinite(&self) -> bool {
        true
    }
}

pub(crate) struct Unfold<S, F> {
    state: S,
    rule: F,
}

impl<T, S, F: FnMut(&mut S) -> Option<T>> Source for Unfold<S, F> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        Ok((self.rule)(&mut self.state).into())
    }
}

impl<'a, T: 'a> LazySequence<'a, T> {
    pub fn from_vec(vec: Vec<T>) -> Self {
        Self::from_iterator(vec)
    }

    /// Wraps any iterator. The layer cannot tell whether it ends, so the
    /// result is treated as finite.
    pub fn from_iterator<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'a,
    {
        Self::new(IterSource {
            iter: iter.into_iter(),
        })
    }

    /// A sequence over a collection that stays reachable (and mutable) by the
    /// caller. See [`View`] for the two visibility modes.
    ///
    /// A snapshot is copied right away, so it fails with
    /// [`SourceError::Busy`] if the collection is mutably borrowed at that
    /// point. A live view reports the same conflict from the pull that hits it.
    pub fn shared(vec: &Rc<RefCell<Vec<T>>>, view: View) -> Result<Self, SourceError>
    where
        T: Clone,
    {
        let vec = match view {
            View::Live => vec.clone(),
            View::Snapshot => {
                let copy = vec.try_borrow().map_err(|_| SourceError::Busy)?.clone();
                Rc::new(RefCell::new(copy))
            }
        };
        Ok(Self::new(SharedSource { vec, next_idx: 0 }))
    }

    /// A stateful generator rule; `None` ends the sequence.
    pub fn from_fn<F>(mut rule: F) -> Self
    where
        F: FnMut() -> Option<T> + 'a,
    {
        Self::try_from_fn(move || Ok(rule()))
    }

    pub fn try_from_fn<F>(rule: F) -> Self
    where
        F: FnMut() -> Result<Option<T>, SourceError> + 'a,
    {
        Self::new(FromFn { rule })
    }

    /// An infinite generator rule.
    pub fn repeat_with<F>(rule: F) -> Self
    where
        F: FnMut() -> T + 'a,
    {
        Self::new(RepeatWith { rule })
    }

    /// A generator function with its state made explicit: `rule` advances
    /// `state` and returns the next value, or `None` once done.
    pub fn unfold<S, F>(state: S, rule: F) -> Self
    where
        S: 'a,
        F: FnMut(&mut S) -> Option<T> + 'a,
    {
        Self::new(Unfold { state, rule })
    }
}

impl<'a, T: 'a> From<Vec<T>> for LazySequence<'a, T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_vec(vec)
    }
}
