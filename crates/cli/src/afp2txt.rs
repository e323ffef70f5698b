//! afp2txt - Extract text from AFP files
//!
//! A command line tool that scans an AFP/MO:DCA file for presentation
//! text fields and prints every transparent data run on its own line.

use afplite_core::error::Result;
use afplite_core::high_level::extract_text;
use afplite_core::ParserConfig;
use clap::{ArgAction, Parser};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Extract presentation text from an AFP file.
#[derive(Parser, Debug)]
#[command(name = "afp2txt")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the AFP file
    file: PathBuf,

    /// Output file to write to (use "-" for stdout)
    #[arg(short = 'o', long, default_value = "-")]
    outfile: String,

    /// Use debug logging level
    #[arg(short = 'd', long, action = ArgAction::SetTrue)]
    debug: bool,

    /// Tolerate truncated trailing control sequences in text fields
    #[arg(long, action = ArgAction::SetTrue)]
    lenient: bool,
}

fn process_file(path: &Path, output: &mut dyn Write, config: ParserConfig) -> Result<()> {
    let file = File::open(path)?;
    for string in extract_text(BufReader::new(file), config) {
        writeln!(output, "{}", string?)?;
    }
    Ok(())
}

fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if args.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    let config = ParserConfig {
        lenient: args.lenient,
    };

    // Open output file or use stdout
    let mut output: Box<dyn Write> = if args.outfile == "-" {
        Box::new(BufWriter::new(io::stdout()))
    } else {
        let file = File::create(&args.outfile)
            .map_err(|e| format!("Failed to create output file {}: {}", args.outfile, e))?;
        Box::new(BufWriter::new(file))
    };

    if !args.file.exists() {
        eprintln!("Error: File not found: {}", args.file.display());
        std::process::exit(1);
    }

    if let Err(e) = process_file(&args.file, output.as_mut(), config) {
        eprintln!("Error processing {}: {}", args.file.display(), e);
        std::process::exit(1);
    }

    output.flush()?;
    Ok(())
}
