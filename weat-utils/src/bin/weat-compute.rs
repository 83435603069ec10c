use std::io;

use clap::{App, AppSettings, Arg, ArgMatches};
use rayon::ThreadPoolBuilder;
use stdinout::{Input, OrExit, Output};
use tracing::info;
use tracing_subscriber::EnvFilter;
use weat::prelude::*;
use weat_utils::{model_name, read_config, read_embeddings, EmbeddingFormat};

static DEFAULT_CLAP_SETTINGS: &[AppSettings] = &[
    AppSettings::DontCollapseArgsInUsage,
    AppSettings::UnifiedHelpMessage,
];

// Option constants
static EMBEDDINGS: &str = "EMBEDDINGS";
static CASES: &str = "CASES";
static CONFIG: &str = "config";
static FAIL_MISSING: &str = "fail-missing";
static FORMAT: &str = "format";
static MODEL: &str = "model";
static NO_PVALUE: &str = "no-pvalue";
static ORIGINAL_FINDING: &str = "original-finding";
static OUTPUT: &str = "output";
static SAMPLES: &str = "samples";
static SEED: &str = "seed";
static THREADS: &str = "threads";

fn parse_args() -> ArgMatches<'static> {
    App::new("weat-compute")
        .settings(DEFAULT_CLAP_SETTINGS)
        .about("Compute WEAT effect sizes and p-values")
        .arg(
            Arg::with_name(FORMAT)
                .short("f")
                .long("format")
                .value_name("FORMAT")
                .help("Embedding format: text, textdims, or word2vec (default: textdims)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(CONFIG)
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (TOML)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SEED)
                .long("seed")
                .value_name("N")
                .help("Seed for sampled permutation tests")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(SAMPLES)
                .long("samples")
                .value_name("N")
                .help("Number of sampled partitions")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(NO_PVALUE)
                .long("no-pvalue")
                .help("Do not compute p-values"),
        )
        .arg(
            Arg::with_name(ORIGINAL_FINDING)
                .long("original-finding")
                .help("Report original findings next to the results"),
        )
        .arg(
            Arg::with_name(FAIL_MISSING)
                .long("fail-missing")
                .help("Fail cases with out-of-vocabulary words instead of excluding the words"),
        )
        .arg(
            Arg::with_name(MODEL)
                .long("model")
                .value_name("NAME")
                .help("Model identifier in the output (default: embedding file stem)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name(THREADS)
                .long("threads")
                .value_name("N")
                .help("Number of threads (default: logical_cpus / 2)")
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
        .arg(Arg::with_name(CASES).help("Case definitions (JSON)").index(2))
        .get_matches()
}

struct Config {
    cases_filename: Option<String>,
    embeddings_filename: String,
    embedding_format: EmbeddingFormat,
    model: String,
    n_threads: usize,
    output_filename: Option<String>,
    weat: WeatConfig,
}

fn config_from_matches(matches: &ArgMatches) -> Config {
    let embeddings_filename = matches.value_of(EMBEDDINGS).unwrap().to_owned();
    let cases_filename = matches.value_of(CASES).map(ToOwned::to_owned);
    let output_filename = matches.value_of(OUTPUT).map(ToOwned::to_owned);

    let embedding_format = matches
        .value_of(FORMAT)
        .map(|f| EmbeddingFormat::try_from(f).or_exit("Cannot parse embedding format", 1))
        .unwrap_or(EmbeddingFormat::TextDims);

    let model = matches
        .value_of(MODEL)
        .map(ToOwned::to_owned)
        .unwrap_or_else(|| model_name(&embeddings_filename));

    let n_threads = matches
        .value_of(THREADS)
        .map(|v| v.parse().or_exit("Cannot parse number of threads", 1))
        .unwrap_or((num_cpus::get() / 2).max(1));

    // Command-line options override the configuration file.
    let mut weat = read_config(matches.value_of(CONFIG)).or_exit("Cannot load configuration", 1);
    if let Some(seed) = matches.value_of(SEED) {
        weat.seed = Some(seed.parse().or_exit("Cannot parse seed", 1));
    }
    if let Some(n_samples) = matches.value_of(SAMPLES) {
        weat.n_samples = n_samples
            .parse()
            .or_exit("Cannot parse number of samples", 1);
        if weat.n_samples == 0 {
            eprintln!("Number of samples must be at least 1");
            std::process::exit(1);
        }
    }
    if matches.is_present(NO_PVALUE) {
        weat.with_pvalue = false;
    }
    if matches.is_present(ORIGINAL_FINDING) {
        weat.with_original_finding = true;
    }
    if matches.is_present(FAIL_MISSING) {
        weat.missing_words = MissingWords::Fail;
    }

    Config {
        cases_filename,
        embeddings_filename,
        embedding_format,
        model,
        n_threads,
        output_filename,
        weat,
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let matches = parse_args();
    let config = config_from_matches(&matches);

    ThreadPoolBuilder::new()
        .num_threads(config.n_threads)
        .build_global()
        .or_exit("Cannot build thread pool", 1);

    let embeddings = read_embeddings(&config.embeddings_filename, config.embedding_format)
        .or_exit("Cannot read embeddings", 1);
    info!(
        "Read {} embeddings with {} dimensions",
        embeddings.len(),
        embeddings.dims()
    );

    let cases_file = Input::from(config.cases_filename);
    let reader = cases_file
        .buf_read()
        .or_exit("Cannot open case definitions for reading", 1);
    let cases = read_cases(reader).or_exit("Cannot read case definitions", 1);

    let outcomes = Weat::new(&embeddings, &config.weat).par_run_batch(&cases);

    let output = Output::from(config.output_filename);
    let mut writer = output.write().or_exit("Cannot open output for writing", 1);
    outcomes
        .write_csv(&mut writer, &config.model)
        .or_exit("Cannot write results", 1);
}
