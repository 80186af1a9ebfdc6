//! seqbuf: subsequence buffer
//!
//! Usage: seqbuf <COMMAND> [OPTIONS]

use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use seqbuf::generate::{generate, GenerateConfig};
use seqbuf::parallel::{read_jobs, run_batch, ParallelStats};
use seqbuf::render::{Concat, DiagnosticWriter, ElementRender, Joined, ResultFormat};
use seqbuf::script::{write_script, RunStats, ScriptReader, ScriptRunner};
use seqbuf::{ScriptError, SequenceBuffer};

#[derive(Parser)]
#[command(name = "seqbuf")]
#[command(author = "Manish Kumar Bobbili")]
#[command(version)]
#[command(about = "seqbuf: refine a sequence partition as results arrive", long_about = None)]
struct Cli {
    /// Number of threads to use (default: number of CPUs)
    #[arg(long, short = 't', global = true)]
    threads: Option<usize>,

    /// Abort when a submission matches no unprocessed subsequence.
    /// By default such submissions are reported and skipped.
    #[arg(long, global = true)]
    strict: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a submission script and print the joined results
    Run {
        /// Original sequence
        #[arg(short, long)]
        sequence: String,

        /// Treat the sequence as whitespace-separated words
        #[arg(short, long)]
        words: bool,

        /// Submission script (default: stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Delimiter between subsequence results
        #[arg(short, long)]
        delimiter: Option<String>,

        /// Print run statistics to stderr
        #[arg(long)]
        stats: bool,
    },

    /// Apply a submission script and print every subsequence
    Inspect {
        /// Original sequence
        #[arg(short, long)]
        sequence: String,

        /// Treat the sequence as whitespace-separated words
        #[arg(short, long)]
        words: bool,

        /// Submission script (default: no submissions)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Generate a random script that fully processes a sequence
    Generate {
        /// Sequence length
        #[arg(short, long)]
        length: usize,

        /// Random seed
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Largest range covered by one submission (0 = unlimited)
        #[arg(short, long, default_value = "0")]
        granularity: usize,
    },

    /// Run several scripts against fresh buffers in parallel
    Batch {
        /// Original sequence
        #[arg(short, long)]
        sequence: String,

        /// Treat the sequence as whitespace-separated words
        #[arg(short, long)]
        words: bool,

        /// Submission scripts
        #[arg(required = true)]
        scripts: Vec<PathBuf>,

        /// Print batch statistics to stderr
        #[arg(long)]
        stats: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    // Must be set before any script runs
    if cli.strict {
        seqbuf::config::set_strict_submissions(true);
    }

    if let Some(n) = cli.threads {
        if let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
        {
            eprintln!("Error: failed to initialize thread pool: {}", e);
            process::exit(1);
        }
    }

    let result = match cli.command {
        Commands::Run {
            sequence,
            words,
            input,
            delimiter,
            stats,
        } => run_run(sequence, words, input, delimiter, stats),

        Commands::Inspect {
            sequence,
            words,
            input,
        } => run_inspect(sequence, words, input),

        Commands::Generate {
            length,
            seed,
            granularity,
        } => run_generate(length, seed, granularity),

        Commands::Batch {
            sequence,
            words,
            scripts,
            stats,
        } => run_batch_cmd(sequence, words, scripts, stats),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Apply a script from a file, or stdin when no path is given.
fn apply_script<T>(
    buffer: &mut SequenceBuffer<T>,
    input: Option<PathBuf>,
) -> Result<RunStats, ScriptError> {
    let runner = ScriptRunner::new();
    match input {
        Some(path) if path.as_os_str() != "-" => {
            runner.run(buffer, ScriptReader::from_path(path)?.records())
        }
        _ => runner.run(buffer, ScriptReader::new(io::stdin().lock()).records()),
    }
}

fn print_stats(stats: &RunStats) {
    eprintln!("\n=== Run Statistics ===");
    eprint!("{}", stats);
}

fn run_run(
    sequence: String,
    words: bool,
    input: Option<PathBuf>,
    delimiter: Option<String>,
    stats: bool,
) -> Result<(), ScriptError> {
    let (output, run_stats) = if words {
        let mut buffer = SequenceBuffer::from_words(&sequence)?;
        let run_stats = apply_script(&mut buffer, input)?;
        let format = with_delimiter(ResultFormat::words(), delimiter);
        (buffer.result_to_string(&format), run_stats)
    } else {
        let mut buffer = SequenceBuffer::from_chars(&sequence)?;
        let run_stats = apply_script(&mut buffer, input)?;
        let format = with_delimiter(ResultFormat::chars(), delimiter);
        (buffer.result_to_string(&format), run_stats)
    };

    if stats {
        print_stats(&run_stats);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", output)?;
    Ok(())
}

fn with_delimiter(format: ResultFormat, delimiter: Option<String>) -> ResultFormat {
    match delimiter {
        Some(d) => format.with_delimiter(d),
        None => format,
    }
}

fn run_inspect(sequence: String, words: bool, input: Option<PathBuf>) -> Result<(), ScriptError> {
    if words {
        let buffer = SequenceBuffer::from_words(&sequence)?;
        inspect(buffer, input, &Joined::default())
    } else {
        let buffer = SequenceBuffer::from_chars(&sequence)?;
        inspect(buffer, input, &Concat)
    }
}

fn inspect<T, R>(
    mut buffer: SequenceBuffer<T>,
    input: Option<PathBuf>,
    renderer: &R,
) -> Result<(), ScriptError>
where
    R: ElementRender<T>,
{
    if input.is_some() {
        apply_script(&mut buffer, input)?;
    }

    let stdout = io::stdout();
    let mut writer = DiagnosticWriter::new(stdout.lock());
    writer.write_buffer(&buffer, renderer)?;
    writer.flush()?;
    Ok(())
}

fn run_generate(length: usize, seed: u64, granularity: usize) -> Result<(), ScriptError> {
    let config = GenerateConfig::new(length)
        .with_seed(seed)
        .with_granularity(granularity);
    let records = generate(&config)?;

    let stdout = io::stdout();
    let mut handle = io::BufWriter::new(stdout.lock());
    write_script(&mut handle, &records)?;
    handle.flush()?;
    Ok(())
}

fn run_batch_cmd(
    sequence: String,
    words: bool,
    scripts: Vec<PathBuf>,
    stats: bool,
) -> Result<(), ScriptError> {
    let jobs = read_jobs(&scripts)?;
    let runner = ScriptRunner::new();

    let outcomes = if words {
        let original: Arc<[String]> = SequenceBuffer::from_words(&sequence)?.shared_original();
        run_batch(original, &jobs, &runner, &ResultFormat::words())
    } else {
        let original: Arc<[char]> = SequenceBuffer::from_chars(&sequence)?.shared_original();
        run_batch(original, &jobs, &runner, &ResultFormat::chars())
    };

    if stats {
        let summary = ParallelStats::from_outcomes(&outcomes);
        eprintln!("\n=== Batch Statistics ===");
        eprintln!("Jobs:        {}", summary.jobs);
        eprintln!("Completed:   {}", summary.completed);
        eprintln!("Failed:      {}", summary.failed);
        eprintln!("Submissions: {}", summary.total_submissions);
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let mut first_error = None;
    for (job, outcome) in jobs.iter().zip(outcomes) {
        match outcome {
            Ok(o) => writeln!(handle, "{}\t{}", o.name, o.result)?,
            Err(e) => {
                eprintln!("Error: {}: {}", job.name, e);
                if first_error.is_none() {
                    first_error = Some(e);
                }
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
