use std::io::{self, BufRead, Write};

use clap::{App, AppSettings, Arg, ArgMatches};
use stdinout::{Input, OrExit, Output};
use tracing::warn;
use tracing_subscriber::EnvFilter;
use weat::prelude::*;
use weat_utils::{read_embeddings, EmbeddingFormat};

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

// Option constants
static EMBEDDINGS: &str = "EMBEDDINGS";
static FORMAT: &str = "format";
static INPUT: &str = "INPUT";
static NEIGHBORS: &str = "neighbors";
static OUTPUT: &str = "output";

fn parse_args() -> ArgMatches<'static> {
    App::new("weat-similar")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("Find the nearest neighbors of words")
        .arg(
            Arg::with_name(FORMAT)
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Embedding format: text, textdims, or word2vec (default: textdims)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(NEIGHBORS)
                .short("k")
                .long("neighbors")
                .value_name("K")
                .help("Return K nearest neighbors (default: 20)")
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
            Arg::with_name(EMBEDDINGS)
                .help("Embedding file")
                .index(1)
                .required(true),
        )
        .arg(Arg::with_name(INPUT).help("Query words, one per line").index(2))
        .get_matches()
}

struct Config {
    embeddings_filename: String,
    embedding_format: EmbeddingFormat,
    k: usize,
}

fn config_from_matches(matches: &ArgMatches) -> Config {
    let embeddings_filename = matches.value_of(EMBEDDINGS).unwrap().to_owned();

    let embedding_format = matches
        .value_of(FORMAT)
        .map(|f| EmbeddingFormat::try_from(f).or_exit("Cannot parse embedding format", 1))
        .unwrap_or(EmbeddingFormat::TextDims);

    let k = matches
        .value_of(NEIGHBORS)
        .map(|v| v.parse().or_exit("Cannot parse k", 1))
        .unwrap_or(20);

    Config {
        embeddings_filename,
        embedding_format,
        k,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = parse_args();
    let config = config_from_matches(&matches);

    let embeddings = read_embeddings(&config.embeddings_filename, config.embedding_format)
        .or_exit("Cannot read embeddings", 1);

    let input = Input::from(matches.value_of(INPUT));
    let reader = input.buf_read().or_exit("Cannot open input for reading", 1);

    let output = Output::from(matches.value_of(OUTPUT));
    let mut writer = output.write().or_exit("Cannot open output for writing", 1);

    for line in reader.lines() {
        let line = line.or_exit("Cannot read line", 1).trim().to_owned();
        if line.is_empty() {
            continue;
        }

        let results = match embeddings.word_similarity(&line, config.k) {
            Some(results) => results,
            None => {
                warn!("'{}' is not in the vocabulary", line);
                continue;
            }
        };

        for similar in results {
            writeln!(
                writer,
                "{}\t{}\t{}",
                line,
                similar.word(),
                similar.cosine_similarity()
            )
            .or_exit("Cannot write neighbor", 1);
        }
    }
}
