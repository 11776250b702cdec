use clap::Parser;
use std::path::PathBuf;
use std::process::exit;
use swinging_wild::io::input_file::{InputFile, InputFileError};
use tracing::error;

/// Reads a Swinging Wild input file and prints a summary of its test cases.
#[derive(Parser)]
#[command(version, about)]
pub struct Arguments {
    /// Input file to read
    pub input: PathBuf,

    /// Disable logging of warnings and errors
    #[arg(short, long)]
    pub quiet: bool,

    /// Treat warnings (e.g. extra whitespace) as errors
    #[arg(short, long)]
    pub paranoid: bool,
}

fn inspect(args: &Arguments) -> Result<(), InputFileError> {
    let input = InputFile::read(&args.input, args.paranoid)?;
    input.write_summary(&mut std::io::stdout().lock())?;
    Ok(())
}

fn main() {
    let args = Arguments::parse();

    if !args.quiet {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::INFO)
            .without_time()
            .init();
    }

    if let Err(e) = inspect(&args) {
        error!("{e}");
        exit(1)
    }
}
