use std::fs::File;
use std::io::{self, BufReader};

use clap::{App, AppSettings, Arg, ArgMatches};
use stdinout::{OrExit, Output};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weat::prelude::*;

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

// Option constants
static OUTPUT: &str = "output";
static RESULTS: &str = "RESULTS";

fn parse_args() -> ArgMatches<'static> {
    App::new("weat-summarize")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("Summarize WEAT results of replicate models")
        .arg(
            Arg::with_name(OUTPUT)
                .short("o")
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(RESULTS)
                .help("Result tables written by weat-compute")
                .multiple(true)
                .required(true),
        )
        .get_matches()
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = parse_args();

    let mut rows = Vec::new();
    for filename in matches.values_of(RESULTS).unwrap() {
        let f = File::open(filename).or_exit(format!("Cannot open {}", filename), 1);
        let results = read_results(BufReader::new(f))
            .or_exit(format!("Cannot read results from {}", filename), 1);
        info!("Read {} result(s) from {}", results.len(), filename);
        rows.extend(results);
    }

    let summaries = summarize(&rows);

    let output = Output::from(matches.value_of(OUTPUT));
    let writer = output.write().or_exit("Cannot open output for writing", 1);
    write_summaries(&summaries, writer).or_exit("Cannot write summaries", 1);
}
