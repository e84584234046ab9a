use std::{
    cell::RefCell,
    io::{self, BufWriter, Write},
    process,
    rc::Rc,
};

use anyhow::Context;
use itertools::Itertools;
use lazyseq::{
    chain, count_from, cycle, filter_seq, map_seq, rows, slice, Delimiter, LazySequence, RowFormat,
    SourceError, Step, View,
};
use log::warn;

const ABOUT: &str = "\
Reads delimited text from stdin and prints its rows.

Lines are read one at a time and only as far as --skip and --take require, so
piping in a huge file and asking for the first few rows stops reading early.
Malformed rows are reported on stderr and skipped.
";

const ABOUT_DEMO: &str = "\
Prints a walkthrough of the lazy sequence combinators.
";

fn app() -> clap::App<'static, 'static> {
    let flag = |name| clap::Arg::with_name(name).long(name);

    clap::App::new("lazyseq")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about(ABOUT)
        .arg(flag("delimiter").short("d").default_value("comma").help(
            "The field delimiter: comma, tab, semicolon or pipe.",
        ))
        .arg(flag("header").help(
            "When set, the first non-blank line is a header and is not printed.",
        ))
        .arg(flag("grep").takes_value(true).help(
            "Only show rows with a field containing this text.",
        ))
        .arg(flag("skip").default_value("0").help("Skip this many (matching) rows."))
        .arg(flag("take").takes_value(true).help("Show at most this many rows."))
        .arg(flag("number").short("n").help("Prefix each row with its position."))
        .subcommand(clap::SubCommand::with_name("demo").about(ABOUT_DEMO))
}

#[derive(Debug)]
struct Args {
    format: RowFormat,
    grep: Option<String>,
    skip: usize,
    take: Option<usize>,
    number: bool,
}

impl Args {
    fn new(m: &clap::ArgMatches) -> anyhow::Result<Args> {
        let delimiter = m
            .value_of("delimiter")
            .unwrap_or("comma")
            .parse::<Delimiter>()?;
        let skip = m
            .value_of("skip")
            .unwrap_or("0")
            .parse()
            .context("--skip expects a number")?;
        let take = m
            .value_of("take")
            .map(str::parse::<usize>)
            .transpose()
            .context("--take expects a number")?;
        Ok(Args {
            format: RowFormat {
                delimiter,
                has_header: m.is_present("header"),
            },
            grep: m.value_of("grep").map(String::from),
            skip,
            take,
            number: m.is_present("number"),
        })
    }

    fn run(&self) -> anyhow::Result<()> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());

        let mut seq = rows(&mut input, self.format);
        if let Some(needle) = self.grep.clone() {
            seq = seq.filter(move |row| row.fields.iter().any(|field| field.contains(&needle)));
        }
        seq = seq.skip(self.skip);
        if let Some(take) = self.take {
            seq = seq.take(take);
        }

        let separator = self.format.delimiter.as_char().to_string();
        let mut numbered = seq.enumerate(self.skip + 1);
        loop {
            match numbered.next() {
                Ok(Step::Yielded((n, row))) => {
                    if self.number {
                        write!(out, "{}{}", n, separator)?;
                    }
                    writeln!(out, "{}", row.fields.iter().join(&separator))?;
                }
                Ok(Step::Exhausted) => break,
                Err(err @ SourceError::MalformedRow { .. }) => warn!("skipping row: {}", err),
                Err(err) => return Err(err).context("failed to read rows from stdin"),
            }
        }
        out.flush()?;
        Ok(())
    }
}

fn demo<W: Write>(mut out: W) -> anyhow::Result<()> {
    let mut seq = chain(
        LazySequence::from_vec(vec![1, 2]),
        LazySequence::from_vec(vec![3]),
    );
    writeln!(out, "chain([1, 2], [3])       = {:?}", seq.to_eager_list(None)?)?;

    let mut seq = map_seq(LazySequence::from_vec(vec![1, 2, 3]), |x| x * 2);
    writeln!(out, "map([1, 2, 3], double)   = {:?}", seq.to_eager_list(None)?)?;

    let mut seq = filter_seq(LazySequence::from_vec(vec![1, 2, 3, 4]), |x| x % 2 == 0);
    writeln!(out, "filter([1, 2, 3, 4], even) = {:?}", seq.to_eager_list(None)?)?;

    let mut seq = slice(LazySequence::from_vec(vec![1, 2, 3, 4, 5]), 1, 4);
    writeln!(out, "slice([1..=5], 1, 4)     = {:?}", seq.to_eager_list(None)?)?;

    let mut seq = cycle(vec!['a', 'b', 'c']).take(7);
    writeln!(out, "cycle([a, b, c])[..7]    = {:?}", seq.to_eager_list(None)?)?;

    let mut counter = count_from(0.0, 0.25);
    writeln!(
        out,
        "count_from(0, 0.25)[..5] = {:?}",
        counter.by_ref().take(5).to_eager_list(None)?
    )?;
    writeln!(
        out,
        "  and the next five      = {:?}",
        counter.by_ref().take(5).to_eager_list(None)?
    )?;
    if let Err(err) = counter.to_eager_list(None) {
        writeln!(out, "  draining it unbounded  : {}", err)?;
    }

    let names = LazySequence::from_vec(vec!["ann", "bob", "cid"]);
    let mut seq = names.zip(count_from(30, 5)).enumerate(1);
    writeln!(out, "enumerate(zip(names, ages)) = {:?}", seq.to_eager_list(None)?)?;

    let mut fib = LazySequence::unfold((0u64, 1u64), |state| {
        let (a, b) = *state;
        *state = (b, a.checked_add(b)?);
        Some(a)
    });
    writeln!(out, "fibonacci[..10]          = {:?}", fib.to_eager_list(Some(10))?)?;

    let data = Rc::new(RefCell::new(vec![1, 2, 3, 4, 5]));
    let mut live = LazySequence::shared(&data, View::Live)?.slice(1, 4);
    let mut snapshot = LazySequence::shared(&data, View::Snapshot)?.slice(1, 4);
    data.borrow_mut()[2] = 30;
    writeln!(out, "after data[2] = 30:")?;
    writeln!(out, "  live slice             = {:?}", live.to_eager_list(None)?)?;
    writeln!(out, "  snapshot slice         = {:?}", snapshot.to_eager_list(None)?)?;

    out.flush()?;
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = app().get_matches();
    let result = match matches.subcommand() {
        ("demo", Some(_)) => demo(io::stdout()),
        _ => Args::new(&matches).and_then(|args| args.run()),
    };
    if let Err(err) = result {
        eprintln!("{:#}", err);
        process::exit(1);
    }
}
