#[macro_use]
extern crate pest_derive;

pub mod record;

pub use record::{parse_record, Delimiter, Rule, UnknownDelimiter};
