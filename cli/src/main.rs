//! flatpdf CLI - flatten PDF layout and bookmarks to JSON.

use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use colored::Colorize;

use flatpdf::render::{to_json, JsonFormat};

const USAGE: &str = "Usage: flatpdf <input.pdf> <output.json>";

#[derive(Parser)]
#[command(name = "flatpdf")]
#[command(version)]
#[command(about = "Flatten PDF layout and bookmarks to JSON", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output JSON file, overwritten wholesale
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }
        // Anything but exactly two positional arguments: usage on stdout,
        // status 1, and no file is touched.
        Err(_) => {
            println!("{}", USAGE);
            process::exit(1);
        }
    };

    if let Err(e) = run(&cli.input, &cli.output) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        process::exit(1);
    }
}

fn run(input: &Path, output: &Path) -> flatpdf::Result<()> {
    log::info!("converting {} -> {}", input.display(), output.display());

    let doc = flatpdf::convert_file(input)?;
    let json = to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output, json)?;

    Ok(())
}
