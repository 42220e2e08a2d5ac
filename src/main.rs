use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use explain::{Config, ExplainError};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "explain")]
#[command(about = "Format question explanations as HTML, Typst or PDF")]
struct Cli {
    /// Input text file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output file (defaults to stdout; required for PDF)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Target::Html)]
    to: Target,

    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Target {
    Html,
    Typst,
    Pdf,
    /// Debug dump of the recovered document tree
    Tree,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), ExplainError> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };

    let raw = read_input(cli.input.as_ref())?;

    let bytes = match cli.to {
        Target::Html => explain::format_with_config(&raw, &config).into_bytes(),
        Target::Typst => explain::explanation_to_typst_with_config(&raw, &config).into_bytes(),
        Target::Tree => format!("{:#?}\n", explain::parse(&raw)).into_bytes(),
        Target::Pdf => {
            if cli.output.is_none() {
                return Err(ExplainError::config("PDF output needs --output <file>"));
            }
            explain::explanation_to_pdf_with_config(&raw, &config)?
        }
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, bytes).map_err(|e| ExplainError::io(path, e))?;
            eprintln!("Created {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

fn read_input(input: Option<&PathBuf>) -> Result<String, ExplainError> {
    match input {
        Some(path) if path.as_os_str() != "-" => {
            fs::read_to_string(path).map_err(|e| ExplainError::io(path, e))
        }
        _ => {
            let mut raw = String::new();
            io::stdin()
                .read_to_string(&mut raw)
                .map_err(|e| ExplainError::io("<stdin>", e))?;
            Ok(raw)
        }
    }
}
