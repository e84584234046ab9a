use crate::{
    error::SourceError,
    lazy_sequence::{LazySequence, Step},
    source::Source,
};

pub(crate) struct Cycle<'a, T> {
    parent: LazySequence<'a, T>,
    seen: Vec<T>,
    // index into `seen` once the parent has run out
    replay_idx: Option<usize>,
}

impl<'a, T: Clone + 'a> Source for Cycle<'a, T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        let idx = match self.replay_idx {
            Some(idx) => idx,
            None => match self.parent.next()? {
                Step::Yielded(elem) => {
                    self.seen.push(elem.clone());
                    return Ok(Step::Yielded(elem));
                }
                Step::Exhausted if self.seen.is_empty() => return Ok(Step::Exhausted),
                Step::Exhausted => 0,
            },
        };
        let elem = self.seen[idx].clone();
        self.replay_idx = Some((idx + 1) % self.seen.len());
        Ok(Step::Yielded(elem))
    }

    fn is_infinite(&self) -> bool {
        true
    }
}

/// Values `count_from` can step through.
///
/// Integer steps are checked: running past the end of the type is reported as
/// [`SourceError::Overflow`] instead of wrapping.
pub trait Counter: Clone {
    fn checked_step(&self, step: &Self) -> Option<Self>;
}

macro_rules! integer_counter {
    ($($ty:ty)*) => {$(
        impl Counter for $ty {
            fn checked_step(&self, step: &Self) -> Option<Self> {
                self.checked_add(*step)
            }
        }
    )*};
}

integer_counter!(i8 i16 i32 i64 i128 isize u8 u16 u32 u64 u128 usize);

macro_rules! float_counter {
    ($($ty:ty)*) => {$(
        impl Counter for $ty {
            fn checked_step(&self, step: &Self) -> Option<Self> {
                Some(*self + *step)
            }
        }
    )*};
}

float_counter!(f32 f64);

pub(crate) struct CountFrom<T> {
    start: T,
    step: T,
    last: Option<T>,
}

impl<T: Counter> Source for CountFrom<T> {
    type Item = T;

    fn pull(&mut self) -> Result<Step<T>, SourceError> {
        let next = match &self.last {
            // `last` is kept on overflow, so every later pull fails the same way
            Some(last) => last.checked_step(&self.step).ok_or(SourceError::Overflow)?,
            None => self.start.clone(),
        };
        self.last = Some(next.clone());
        Ok(Step::Yielded(next))
    }

    fn is_infinite(&self) -> bool {
        true
    }
}

impl<'a, T: Clone + 'a> LazySequence<'a, T> {
    /// Repeats the values of this sequence forever.
    ///
    /// The first pass is pulled lazily from `self` and remembered; later
    /// passes replay the remembered values. `self` must be finite for any
    /// value to be replayed. If `self` yields nothing the cycle is exhausted
    /// straight away, though it is still reported as infinite.
    pub fn cycle(self) -> Self {
        LazySequence::new(Cycle {
            parent: self,
            seen: Vec::new(),
            replay_idx: None,
        })
    }
}

/// Endlessly repeats the elements of `collection` in order.
pub fn cycle<'a, I>(collection: I) -> LazySequence<'a, I::Item>
where
    I: IntoIterator,
    I::Item: Clone + 'a,
    I::IntoIter: 'a,
{
    LazySequence::from_iterator(collection).cycle()
}

/// `start`, `start + step`, `start + step + step`, ... with no upper bound.
///
/// Each value is computed when it is pulled, by adding `step` to the
/// previous one. An integer count that would leave its type fails with
/// [`SourceError::Overflow`].
pub fn count_from<'a, T>(start: T, step: T) -> LazySequence<'a, T>
where
    T: Counter + 'a,
{
    LazySequence::new(CountFrom {
        start,
        step,
        last: None,
    })
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use super::*;
    use crate::{error::Error, source::View};

    #[test]
    fn cycle_never_exhausts() {
        let mut seq = cycle(vec![1, 2, 3]);
        assert!(seq.is_infinite());
        assert_eq!(
            seq.to_eager_list(Some(10)).unwrap(),
            vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1]
        );
        assert!(!seq.is_exhausted());
    }

    #[test]
    fn cycle_of_single_element() {
        let mut seq = cycle(Some("only"));
        assert_eq!(seq.to_eager_list(Some(3)).unwrap(), vec!["only"; 3]);
    }

    #[test]
    fn cycle_of_empty_collection() {
        let mut seq = cycle(Vec::<u8>::new());
        assert!(seq.is_infinite());
        assert!(matches!(
            seq.to_eager_list(None),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(seq.next().unwrap(), Step::Exhausted);
        assert!(seq.is_exhausted());
        assert!(!seq.is_infinite());
        assert!(seq.to_eager_list(None).unwrap().is_empty());
    }

    #[test]
    fn cycle_replays_first_pass_of_live_view() {
        let vec = Rc::new(RefCell::new(vec!['a', 'b']));
        let mut seq = LazySequence::shared(&vec, View::Live).unwrap().cycle();
        assert_eq!(seq.next().unwrap(), Step::Yielded('a'));
        vec.borrow_mut()[1] = 'B';
        assert_eq!(seq.next().unwrap(), Step::Yielded('B'));
        vec.borrow_mut()[0] = 'A';
        assert_eq!(seq.to_eager_list(Some(3)).unwrap(), vec!['a', 'B', 'a']);
    }

    #[test]
    fn count_from_quarter_steps() {
        let mut seq = count_from(0.0, 0.25);
        assert_eq!(
            seq.to_eager_list(Some(5)).unwrap(),
            vec![0.0, 0.25, 0.5, 0.75, 1.0]
        );
        assert_eq!(
            seq.to_eager_list(Some(5)).unwrap(),
            vec![1.25, 1.5, 1.75, 2.0, 2.25]
        );
    }

    #[test]
    fn count_from_negative_step() {
        let mut seq = count_from(10i64, -3);
        assert_eq!(seq.to_eager_list(Some(4)).unwrap(), vec![10, 7, 4, 1]);
    }

    #[test]
    fn count_from_without_limit_is_rejected() {
        let mut seq = count_from(0, 1);
        match seq.to_eager_list(None) {
            Err(Error::InvalidArgument(msg)) => assert!(msg.contains("limit")),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(seq.next().unwrap(), Step::Yielded(0));
    }

    #[test]
    fn count_from_computes_only_requested_values() {
        let mut seq = count_from(u8::MAX - 1, 1);
        assert_eq!(seq.to_eager_list(Some(2)).unwrap(), vec![254, 255]);
    }

    #[test]
    fn count_from_reports_overflow() {
        let mut seq = count_from(u8::MAX - 1, 1);
        assert!(matches!(
            seq.to_eager_list(Some(3)),
            Err(Error::Source(SourceError::Overflow))
        ));
        assert!(matches!(seq.next(), Err(SourceError::Overflow)));
        assert!(!seq.is_exhausted());

        let mut down = count_from(i8::MIN + 3, -2);
        assert_eq!(down.to_eager_list(Some(2)).unwrap(), vec![-125, -127]);
        assert!(matches!(down.next(), Err(SourceError::Overflow)));
    }
}
