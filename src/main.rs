//! Gridsheet - evaluate a spreadsheet command script and print the grid

mod error;
mod script;

use std::env;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::Context;
use gridsheet_core::Sheet;
use tracing_subscriber::EnvFilter;

fn print_usage() {
    eprintln!("Usage: gridsheet [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Command script to run (stdin when absent or '-')");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -t, --texts               Print cell texts instead of values");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Script lines have the form 'CELL: TEXT'; 'CELL:' clears the cell.");
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=gridsheet_core=trace) for diagnostics.");
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn read_script(file_path: Option<&PathBuf>) -> error::Result<String> {
    match file_path {
        Some(path) if path.as_os_str() != "-" => Ok(fs::read_to_string(path)?),
        _ => {
            let mut content = String::new();
            io::stdin().read_to_string(&mut content)?;
            Ok(content)
        }
    }
}

fn run(file_path: Option<PathBuf>, print_texts: bool) -> anyhow::Result<()> {
    let content = read_script(file_path.as_ref()).with_context(|| match &file_path {
        Some(path) => format!("failed to read {}", path.display()),
        None => "failed to read stdin".to_string(),
    })?;
    let commands = script::parse_script(&content)?;

    let mut sheet = Sheet::new();
    for (line, e) in script::apply(&mut sheet, &commands) {
        tracing::debug!(line, error = %e, "edit rejected");
        eprintln!("line {}: {}", line, e);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if print_texts {
        sheet.print_texts(&mut out)?;
    } else {
        sheet.print_values(&mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut print_texts = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-t" | "--texts" => {
                print_texts = true;
            }
            arg if arg.starts_with('-') && arg != "-" => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    init_tracing();

    if let Err(e) = run(file_path, print_texts) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
