mod errors;
mod generator;
mod logging;
mod parser;
mod runner;
mod writer;

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use runner::RunStatus;

/// Output format for validation results
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Print results to standard output (human-readable)
    Stdout,
    /// Print results as JSON on standard output
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "healframe",
    version,
    author = "HealFrame Contributors",
    about = "HealFrame CLI - normalize and self-heal messy CSV files",
    long_about = "HealFrame loads a messy delimited file, canonicalizes its headers, \
                  coerces numeric columns and validates every row against a declared \
                  schema. Rows breaking any rule are removed and reported.\n\n\
                  Example usage:\n  \
                  healframe generate\n  \
                  healframe run --config healframe.toml --format stdout"
)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Enable debug mode with detailed error backtraces and stack traces
    #[arg(short, long, global = true)]
    debug: bool,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load, normalize and validate the configured input
    Run(RunArgs),
    /// Write the sample messy customer file
    Generate {
        /// Destination file or directory
        #[arg(short, long, default_value = generator::DEFAULT_SAMPLE_PATH)]
        output: String,
    },
}

#[derive(ClapArgs, Debug)]
pub struct RunArgs {
    /// Path to the TOML configuration file that defines the schema
    #[arg(short, long, value_name = "FILE")]
    config: String,

    /// Input file, overrides `input.path`
    #[arg(short, long, value_name = "PATH")]
    input: Option<String>,

    /// Where to write the clean table, overrides `output.path`
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Output format for validation results
    #[arg(short, long, value_enum, default_value = "stdout")]
    format: OutputFormat,

    /// Exit with status 2 when any row had to be removed
    #[arg(long)]
    strict: bool,
}

/// Process exit code for a finished command.
fn dispatch(args: &Args) -> Result<i32> {
    match &args.command {
        Command::Run(run_args) => {
            let status = runner::run(run_args)?;
            Ok(match (status, run_args.strict) {
                (RunStatus::Healed, true) => 2,
                _ => 0,
            })
        }
        Command::Generate { output } => {
            let path = generator::generate_messy_data(output)?;
            println!("Messy data generated at: {}", path.display());
            Ok(0)
        }
    }
}

fn main() {
    let args = Args::parse();

    // Enable backtraces in debug mode
    if args.debug {
        // SAFETY: single-threaded here, before logging or the rayon pool start
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }

    if let Err(err) = logging::init_logging(args.verbose) {
        eprintln!("Warning: {:#}", err);
    }

    match dispatch(&args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            if std::env::var("RUST_BACKTRACE").is_ok() {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("Error: {:#}", err);
                eprintln!("\nHint: Run with --debug flag for detailed stack traces");
            }
            std::process::exit(1);
        }
    }
}
