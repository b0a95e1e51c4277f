//! CLI tool to stream a text file through the demo pipeline.
//!
//! Usage:
//!   stream-run <input.txt>
//!   stream-run <input.txt> -o <output.txt>
//!
//! Each line is prefixed, printed, and (with `-o`) written to the output
//! file. Per-record `LOG - ` diagnostics go to stdout unless `--quiet`.

use clap::Parser;
use lazy_pipe::{OperatorConfig, StreamOperator};
use std::process;
use tracing_subscriber::EnvFilter;

/// Stream a text file through prepend -> observe [-> sink], one record at a time.
#[derive(Parser)]
#[command(name = "stream-run")]
struct Cli {
    /// Input text file, read line by line
    input: String,

    /// Also write every record to this file (truncated first)
    #[arg(short, long)]
    output: Option<String>,

    /// Marker prepended to each record
    #[arg(long, default_value = lazy_pipe::DEFAULT_MARKER)]
    prefix: String,

    /// Disable per-record LOG diagnostics
    #[arg(short, long)]
    quiet: bool,

    /// Show paths and record count on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut config = OperatorConfig::new(&cli.input)
        .with_prefix(cli.prefix)
        .with_log(!cli.quiet);
    if let Some(output) = &cli.output {
        config = config.with_output(output);
    }

    if cli.verbose {
        eprintln!("Input:   {}", cli.input);
        eprintln!("Output:  {}", cli.output.as_deref().unwrap_or("(none)"));
        eprintln!("Logging: {}", if config.log { "on" } else { "off" });
    }

    let operator = StreamOperator::from_config(&config, config.diagnostics());
    match operator.run() {
        Ok(stats) => {
            if cli.verbose {
                eprintln!("Records: {}", stats.records);
            }
        }
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            process::exit(1);
        }
    }
}
