use crate::{
    error::SourceError,
    lazy_sequence::{LazySequence, Step},
    source::Source,
};

pub(crate) struct Chain<'a, T> {
    first: LazySequence<'a, T>,
    second: LazySequence<'a, T>,
}

impl<'a, T: 'a> Source for Chain<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        match self.first.next()? {
            Step::Yielded(value) => Ok(Step::Yielded(value)),
            Step::Exhausted => self.second.next(),
        }
    }

    fn is_infinite(&self) -> bool {
        self.first.is_infinite() || self.second.is_infinite()
    }
}

pub(crate) struct Map<'a, T, F> {
    parent: LazySequence<'a, T>,
    f: F,
}

impl<'a, T: 'a, U, F: FnMut(T) -> U> Source for Map<'a, T, F> {
    type Item = U;

    fn pull(&mut self) -> Result<Step<U>, SourceError> {
        Ok(self.parent.next()?.map(&mut self.f))
    }

    fn is_infinite(&self) -> bool {
        self.parent.is_infinite()
    }
}

pub(crate) struct Filter<'a, T, P> {
    parent: LazySequence<'a, T>,
    predicate: P,
}

impl<'a, T: 'a, P: FnMut(&T) -> bool> Source for Filter<'a, T, P> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        loop {
            match self.parent.next()? {
                Step::Yielded(value) => {
                    if (self.predicate)(&value) {
                        return Ok(Step::Yielded(value));
                    }
                }
                Step::Exhausted => return Ok(Step::Exhausted),
            }
        }
    }

    // A filter over an infinite sequence may still never end.
    fn is_infinite(&self) -> bool {
        self.parent.is_infinite()
    }
}

pub(crate) struct Enumerate<'a, T> {
    parent: LazySequence<'a, T>,
    next_idx: usize,
}

impl<'a, T: 'a> Source for Enumerate<'a, T> {
    type Item = (usize, T);

    fn pull(&mut self) -> Result<Step<(usize, T)>, SourceError> {
        let step = self.parent.next()?;
        let idx = self.next_idx;
        if !step.is_exhausted() {
            self.next_idx += 1;
        }
        Ok(step.map(|value| (idx, value)))
    }

    fn is_infinite(&self) -> bool {
        self.parent.is_infinite()
    }
}

pub(crate) struct Zip<'a, A, B> {
    left: LazySequence<'a, A>,
    right: LazySequence<'a, B>,
}

impl<'a, A: 'a, B: 'a> Source for Zip<'a, A, B> {
    type Item = (A, B);

    fn pull(&mut self) -> Result<Step<(A, B)>, SourceError> {
        let left = match self.left.next()? {
            Step::Yielded(value) => value,
            Step::Exhausted => return Ok(Step::Exhausted),
        };
        Ok(self.right.next()?.map(|right| (left, right)))
    }

    fn is_infinite(&self) -> bool {
        self.left.is_infinite() && self.right.is_infinite()
    }
}

impl<'a, T: 'a> LazySequence<'a, T> {
    /// All remaining values of `self`, then all of `other`. `other` is not
    /// touched until `self` is exhausted.
    pub fn chain(self, other: LazySequence<'a, T>) -> Self {
        LazySequence::new(Chain {
            first: self,
            second: other,
        })
    }

    pub fn map<U, F>(self, f: F) -> LazySequence<'a, U>
    where
        U: 'a,
        F: FnMut(T) -> U + 'a,
    {
        LazySequence::new(Map { parent: self, f })
    }

    /// Values for which `predicate` holds. Rejected values are dropped as
    /// they are pulled.
    pub fn filter<P>(self, predicate: P) -> Self
    where
        P: FnMut(&T) -> bool + 'a,
    {
        LazySequence::new(Filter {
            parent: self,
            predicate,
        })
    }

    /// Pairs each value with its position, counting from `start`.
    pub fn enumerate(self, start: usize) -> LazySequence<'a, (usize, T)> {
        LazySequence::new(Enumerate {
            parent: self,
            next_idx: start,
        })
    }

    /// Pairs values of both sequences until either runs out. When `self`
    /// exhausts first, `other` is not pulled; when `other` does, the value
    /// already pulled from `self` is dropped.
    pub fn zip<U: 'a>(self, other: LazySequence<'a, U>) -> LazySequence<'a, (T, U)> {
        LazySequence::new(Zip {
            left: self,
            right: other,
        })
    }
}

pub fn chain<'a, T: 'a>(
    first: LazySequence<'a, T>,
    second: LazySequence<'a, T>,
) -> LazySequence<'a, T> {
    first.chain(second)
}

pub fn map_seq<'a, T, U, F>(seq: LazySequence<'a, T>, f: F) -> LazySequence<'a, U>
where
    T: 'a,
    U: 'a,
    F: FnMut(T) -> U + 'a,
{
    seq.map(f)
}

pub fn filter_seq<'a, T, P>(seq: LazySequence<'a, T>, predicate: P) -> LazySequence<'a, T>
where
    T: 'a,
    P: FnMut(&T) -> bool + 'a,
{
    seq.filter(predicate)
}

pub fn zip<'a, A: 'a, B: 'a>(
    left: LazySequence<'a, A>,
    right: LazySequence<'a, B>,
) -> LazySequence<'a, (A, B)> {
    left.zip(right)
}
