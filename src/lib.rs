//! Lazy, single-pass sequences.
//!
//! A [`LazySequence`] produces values only when pulled with
//! [`LazySequence::next`], which answers with a [`Step`]: either the next
//! value or `Exhausted`. Sequences are built from collections, generator
//! rules or borrowed readers, and combined with `chain`, `map`, `filter`,
//! `slice`, `enumerate`, `zip`, `cycle` and `count_from` without consuming
//! anything up front.
//!
//! ```
//! use lazyseq::{count_from, LazySequence};
//!
//! let mut evens = count_from(0, 1).filter(|n| n % 2 == 0);
//! assert_eq!(evens.to_eager_list(Some(3)).unwrap(), vec![0, 2, 4]);
//!
//! let mut letters = LazySequence::from_vec(vec!['a', 'b']).chain(vec!['c'].into());
//! assert_eq!(letters.to_eager_list(None).unwrap(), vec!['a', 'b', 'c']);
//! ```

mod combinators;
mod error;
mod infinite;
mod lazy_sequence;
pub mod rows;
mod slice;
mod source;

pub use delimited::Delimiter;

pub use crate::{
    combinators::{chain, filter_seq, map_seq, zip},
    error::{Error, Result, SourceError},
    infinite::{count_from, cycle, Counter},
    lazy_sequence::{IntoIter, LazySequence, State, Step},
    rows::{records, rows, Record, Row, RowFormat},
    slice::slice,
    source::{Source, View},
};
