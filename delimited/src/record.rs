use std::{fmt, str::FromStr};

use pest::error::Error;
use pest::iterators::Pair;
use pest::Parser;

#[derive(Parser)]
#[grammar = "grammar.pest"]
struct RecordParser;

/// Field separator of a delimited-text record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    Comma,
    Tab,
    Semicolon,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Semicolon => ';',
            Delimiter::Pipe => '|',
        }
    }

    fn record_rule(self) -> Rule {
        match self {
            Delimiter::Comma => Rule::comma_record,
            Delimiter::Tab => Rule::tab_record,
            Delimiter::Semicolon => Rule::semicolon_record,
            Delimiter::Pipe => Rule::pipe_record,
        }
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Delimiter::Comma
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDelimiter(pub String);

impl fmt::Display for UnknownDelimiter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unknown delimiter {:?} (expected comma, tab, semicolon or pipe)",
            self.0
        )
    }
}

impl std::error::Error for UnknownDelimiter {}

impl FromStr for Delimiter {
    type Err = UnknownDelimiter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "comma" | "," => Ok(Delimiter::Comma),
            "tab" | "\t" | "\\t" => Ok(Delimiter::Tab),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "pipe" | "|" => Ok(Delimiter::Pipe),
            _ => Err(UnknownDelimiter(s.to_owned())),
        }
    }
}

/// Parses a single record (one line, terminator already stripped) into its
/// fields. Quoted fields are unescaped (`""` becomes `"`).
pub fn parse_record(line: &str, delimiter: Delimiter) -> Result<Vec<String>, Error<Rule>> {
    fn build_field(pair: Pair<Rule>) -> Option<String> {
        match pair.as_rule() {
            Rule::quoted => {
                let raw = pair.as_str();
                Some(raw[1..raw.len() - 1].replace("\"\"", "\""))
            }
            Rule::comma_bare | Rule::tab_bare | Rule::semicolon_bare | Rule::pipe_bare => {
                Some(String::from(pair.as_str()))
            }
            _ => None,
        }
    }

    let fields = RecordParser::parse(delimiter.record_rule(), line)?
        .flat_map(|record| record.into_inner())
        .filter_map(build_field)
        .collect();
    Ok(fields)
}
