use std::io::{self, Write};

use clap::{App, AppSettings, Arg, ArgMatches};
use stdinout::{OrExit, Output};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weat::prelude::*;
use weat_utils::{model_name, read_embeddings, EmbeddingFormat};

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

// Option constants
static FIRST: &str = "FIRST";
static FIRST_FORMAT: &str = "first-format";
static OUTPUT: &str = "output";
static SECOND: &str = "SECOND";
static SECOND_FORMAT: &str = "second-format";

fn parse_args() -> ArgMatches<'static> {
    App::new("weat-vocab-diff")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("List the words that occur in only one of two embedding vocabularies")
        .arg(
            Arg::with_name(FIRST_FORMAT)
                .short("f")
                .long("first-format")
                .value_name("FORMAT")
                .help("Format of the first embeddings: text, textdims, or word2vec (default: textdims)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SECOND_FORMAT)
                .short("g")
                .long("second-format")
                .value_name("FORMAT")
                .help("Format of the second embeddings (default: textdims)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(OUTPUT)
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(FIRST)
                .help("First embedding file")
                .index(1)
                .required(true),
        )
        .arg(
            Arg::with_name(SECOND)
                .help("Second embedding file")
                .index(2)
                .required(true),
        )
        .get_matches()
}

fn embedding_format(matches: &ArgMatches, option: &str) -> EmbeddingFormat {
    matches
        .value_of(option)
        .map(|f| EmbeddingFormat::try_from(f).or_exit("Cannot parse embedding format", 1))
        .unwrap_or(EmbeddingFormat::TextDims)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = parse_args();

    let first_filename = matches.value_of(FIRST).unwrap();
    let second_filename = matches.value_of(SECOND).unwrap();
    let first = read_embeddings(first_filename, embedding_format(&matches, FIRST_FORMAT))
        .or_exit("Cannot read first embeddings", 1);
    let second = read_embeddings(second_filename, embedding_format(&matches, SECOND_FORMAT))
        .or_exit("Cannot read second embeddings", 1);

    let diff = vocab_difference(first.vocab(), second.vocab());
    info!(
        "{} word(s) only in {}, {} word(s) only in {}",
        diff.only_first.len(),
        model_name(first_filename),
        diff.only_second.len(),
        model_name(second_filename)
    );

    let output = Output::from(matches.value_of(OUTPUT));
    let mut writer = output.write().or_exit("Cannot open output for writing", 1);
    for word in diff.symmetric() {
        writeln!(writer, "{}", word).or_exit("Cannot write word", 1);
    }
}
