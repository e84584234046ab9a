use crate::{
    error::SourceError,
    lazy_sequence::{LazySequence, Step},
    source::Source,
};

pub(crate) struct Slice<'a, T> {
    parent: LazySequence<'a, T>,
    to_skip: usize,
    // None means no upper bound
    remaining: Option<usize>,
}

impl<'a, T: 'a> Source for Slice<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        while self.to_skip > 0 {
            match self.parent.next()? {
                Step::Yielded(_) => self.to_skip -= 1,
                Step::Exhausted => return Ok(Step::Exhausted),
            }
        }
        if self.remaining == Some(0) {
            return Ok(Step::Exhausted);
        }
        let step = self.parent.next()?;
        if let (Step::Yielded(_), Some(remaining)) = (&step, self.remaining.as_mut()) {
            *remaining -= 1;
        }
        Ok(step)
    }

    fn is_infinite(&self) -> bool {
        self.remaining.is_none() && self.parent.is_infinite()
    }
}

impl<'a, T: 'a> LazySequence<'a, T> {
    /// Discards the first `start` values, then yields up to `stop - start`
    /// more. Nothing is pulled until the slice itself is, and the parent is
    /// never pulled past `stop`. A `stop` before `start` yields nothing.
    pub fn slice(self, start: usize, stop: usize) -> Self {
        LazySequence::new(Slice {
            parent: self,
            to_skip: start,
            remaining: Some(stop.saturating_sub(start)),
        })
    }

    pub fn take(self, n: usize) -> Self {
        self.slice(0, n)
    }

    /// Discards the first `n` values; the rest are passed through unbounded.
    pub fn skip(self, n: usize) -> Self {
        LazySequence::new(Slice {
            parent: self,
            to_skip: n,
            remaining: None,
        })
    }
}

pub fn slice<'a, T: 'a>(
    seq: LazySequence<'a, T>,
    start: usize,
    stop: usize,
) -> LazySequence<'a, T> {
    seq.slice(start, stop)
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use quickcheck::quickcheck;

    use super::*;
    use crate::{count_from, cycle, error::Error, source::View};

    #[test]
    fn slice_middle() {
        let mut seq = slice(LazySequence::from_vec(vec![1, 2, 3, 4, 5]), 1, 4);
        assert_eq!(seq.to_eager_list(None).unwrap(), vec![2, 3, 4]);
        assert_eq!(seq.next().unwrap(), Step::Exhausted);
    }

    #[test]
    fn slice_of_live_view_sees_mutation_before_consumption() {
        let vec = Rc::new(RefCell::new(vec![1, 2, 3, 4, 5]));
        let mut seq = LazySequence::shared(&vec, View::Live).unwrap().slice(1, 4);
        vec.borrow_mut()[2] = 30;
        assert_eq!(seq.to_eager_list(None).unwrap(), vec![2, 30, 4]);

        let vec = Rc::new(RefCell::new(vec![1, 2, 3, 4, 5]));
        let mut seq = LazySequence::shared(&vec, View::Snapshot).unwrap().slice(1, 4);
        vec.borrow_mut()[2] = 30;
        assert_eq!(seq.to_eager_list(None).unwrap(), vec![2, 3, 4]);
    }

    #[test]
    fn slice_stops_early_when_source_does() {
        let mut seq = LazySequence::from_vec(vec!['a', 'b', 'c']).slice(1, 10);
        assert_eq!(seq.to_eager_list(None).unwrap(), vec!['b', 'c']);

        let mut seq = LazySequence::from_vec(vec!['a', 'b']).slice(5, 10);
        assert_eq!(seq.next().unwrap(), Step::Exhausted);
    }

    #[test]
    fn inverted_bounds_yield_nothing() {
        let mut seq = LazySequence::from_vec(vec![1, 2, 3]).slice(2, 1);
        assert!(seq.to_eager_list(None).unwrap().is_empty());
    }

    #[test]
    fn slice_is_lazy() {
        let pulls = Rc::new(RefCell::new(0));
        let counter = pulls.clone();
        let mut seq = LazySequence::repeat_with(move || {
            *counter.borrow_mut() += 1;
            'z'
        })
        .slice(3, 5);
        assert_eq!(*pulls.borrow(), 0);
        assert_eq!(seq.next().unwrap(), Step::Yielded('z'));
        assert_eq!(*pulls.borrow(), 4);
        assert_eq!(seq.next().unwrap(), Step::Yielded('z'));
        assert_eq!(seq.next().unwrap(), Step::Exhausted);
        assert_eq!(*pulls.borrow(), 5);
    }

    #[test]
    fn cycle_sliced_to_seven() {
        let mut seq = cycle(vec!['a', 'b', 'c']).slice(0, 7);
        assert!(!seq.is_infinite());
        assert_eq!(
            seq.to_eager_list(None).unwrap(),
            vec!['a', 'b', 'c', 'a', 'b', 'c', 'a']
        );
    }

    #[test]
    fn consecutive_slices_share_cursor() {
        let mut counter = count_from(0.0, 0.25);
        let first = counter.by_ref().slice(0, 5).to_eager_list(None).unwrap();
        let second = counter.by_ref().slice(0, 5).to_eager_list(None).unwrap();
        assert_eq!(first, vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(second, vec![1.25, 1.5, 1.75, 2.0, 2.25]);
    }

    #[test]
    fn skip_keeps_infinity() {
        let mut seq = count_from(0u32, 1).skip(3);
        assert!(seq.is_infinite());
        assert!(matches!(
            seq.to_eager_list(None),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(seq.take(2).to_eager_list(None).unwrap(), vec![3, 4]);
    }

    quickcheck! {
        fn slice_length(len: u8, start: u8, stop: u8) -> bool {
            let (len, start, stop) = (len as usize, start as usize, stop as usize);
            let expected: Vec<usize> = (0..len)
                .skip(start)
                .take(stop.saturating_sub(start))
                .collect();
            let mut seq = LazySequence::from_iterator(0..len).slice(start, stop);
            seq.to_eager_list(None).unwrap() == expected
        }
    }
}
