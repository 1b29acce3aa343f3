use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;

use wordchain_core::Error;
use wordchain_core::io::load_chain;
use wordchain_core::model::chain::ChainBuilder;
use wordchain_core::model::generation_input::{DEFAULT_STEPS, GenerationInput, StartWord};
use wordchain_core::model::generator::Generator;
use wordchain_core::model::tokenizer::Token;

/// Usage errors and unreadable corpus files (sysexits EX_UNAVAILABLE).
const EXIT_UNAVAILABLE: u8 = 69;
/// Corpus too short to build a chain (sysexits EX_DATAERR).
const EXIT_DATAERR: u8 = 65;
/// Generated sequence could not be written (sysexits EX_IOERR).
const EXIT_IOERR: u8 = 74;

/// Failure of one command-line run.
#[derive(thiserror::Error, Debug)]
enum RunError {
    #[error("Could not read corpus file {path}: {source}")]
    Unreadable { path: String, source: io::Error },

    #[error(transparent)]
    Chain(Error),

    #[error("Could not write output: {0}")]
    Output(io::Error),
}

impl RunError {
    /// Maps the failure to the process exit code.
    fn exit_code(&self) -> u8 {
        match self {
            RunError::Unreadable { .. } => EXIT_UNAVAILABLE,
            RunError::Chain(e) if e.is_corpus_error() => EXIT_DATAERR,
            RunError::Chain(_) => EXIT_UNAVAILABLE,
            RunError::Output(_) => EXIT_IOERR,
        }
    }
}

/// Accepts a start word only if it could come out of the tokenizer.
fn start_word(value: &str) -> Result<String, String> {
    Token::from_word(value).map_err(|e| e.to_string())?;
    Ok(value.to_owned())
}

/// Generates a random word sequence from a text corpus using a
/// first-order Markov chain.
#[derive(Parser, Debug)]
#[command(name = "wordchain")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path of the corpus text file
    #[arg(value_name = "CORPUS")]
    corpus: PathBuf,

    /// Number of transitions to walk
    #[arg(short = 'n', long, default_value_t = DEFAULT_STEPS)]
    steps: usize,

    /// First word of the sequence (defaults to the corpus's first word)
    #[arg(short, long, conflicts_with = "random_start", value_parser = start_word)]
    start: Option<String>,

    /// Start from a random word of the chain
    #[arg(long)]
    random_start: bool,

    /// Seed for reproducible output (defaults to the clock)
    #[arg(long)]
    seed: Option<u64>,

    /// Fail if the start word never appears as a predecessor in the corpus
    #[arg(long)]
    strict: bool,

    /// Build the chain on every CPU
    #[arg(long)]
    parallel: bool,
}

impl Cli {
    fn generation_input(&self) -> GenerationInput {
        let start = match (&self.start, self.random_start) {
            (Some(word), _) => StartWord::Custom(word.clone()),
            (None, true) => StartWord::Random,
            (None, false) => StartWord::First,
        };
        GenerationInput {
            steps: self.steps,
            start,
            strict: self.strict,
            seed: self.seed,
        }
    }

    fn builder(&self) -> ChainBuilder {
        if self.parallel { ChainBuilder::parallel() } else { ChainBuilder::new() }
    }
}

/// Loads the corpus, then writes the source size line and the generated
/// words (single-space separated) to `out`.
fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), RunError> {
    let (source_size, chain) = load_chain(&cli.corpus, &cli.builder()).map_err(|e| match e {
        Error::Io(source) => RunError::Unreadable {
            path: cli.corpus.display().to_string(),
            source,
        },
        e => RunError::Chain(e),
    })?;
    writeln!(out, "Source size {}", source_size).map_err(RunError::Output)?;
    log::info!("chain has {} keys", chain.len());

    let words = Generator::new(&chain)
        .run(&cli.generation_input())
        .map_err(RunError::Chain)?;

    let line: Vec<&str> = words.iter().map(|w| w.as_str()).collect();
    writeln!(out, "{}", line.join(" ")).map_err(RunError::Output)?;
    out.flush().map_err(RunError::Output)
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(EXIT_UNAVAILABLE);
        }
    };

    match run(&cli, &mut io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
