//! fieldlist - canonicalize and compare JSON objects from the command line.
//!
//! Inputs are files, or `-` for standard input. Objects are decoded with
//! member order preserved; `--sorted` puts both sides in canonical form before
//! comparing.

mod config;
mod error;

use crate::config::Config;
use crate::error::{CliError, Result};
use clap::{Parser, Subcommand};
use fieldlist_engine::{FieldList, Limits};
use std::cmp::Ordering;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "fieldlist")]
#[command(about = "Canonicalize and compare JSON objects", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sort an object's members by name and print it
    Canonicalize {
        /// Input file, or `-` for stdin
        input: PathBuf,
    },

    /// Print -1, 0 or 1 as the first object orders before, equal to or after the second
    Compare {
        lhs: PathBuf,
        rhs: PathBuf,
        /// Sort both objects before comparing
        #[arg(long)]
        sorted: bool,
    },

    /// Print whether two objects are equal; exits with 1 when they are not
    Equals {
        lhs: PathBuf,
        rhs: PathBuf,
        /// Sort both objects before comparing
        #[arg(long)]
        sorted: bool,
    },
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("fieldlist: {}", CliError::from(err));
            return ExitCode::from(2);
        }
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| crate::config::DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command, &config) {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            eprintln!("fieldlist: {}", err);
            ExitCode::from(2)
        }
    }
}

fn run(command: Commands, config: &Config) -> Result<ExitCode> {
    match command {
        Commands::Canonicalize { input } => {
            let mut fields = load(&input, config.limits)?;
            fields.sort();
            println!("{}", fields.to_json_string()?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Compare { lhs, rhs, sorted } => {
            let (lhs, rhs) = load_pair(&lhs, &rhs, sorted, config.limits)?;
            let result = match lhs.compare(&rhs) {
                Ordering::Less => -1,
                Ordering::Equal => 0,
                Ordering::Greater => 1,
            };
            println!("{}", result);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Equals { lhs, rhs, sorted } => {
            let (lhs, rhs) = load_pair(&lhs, &rhs, sorted, config.limits)?;
            let equal = lhs.equals(&rhs);
            println!("{}", equal);
            Ok(if equal {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
    }
}

fn load_pair(
    lhs: &Path,
    rhs: &Path,
    sorted: bool,
    limits: Limits,
) -> Result<(FieldList, FieldList)> {
    let mut lhs = load(lhs, limits)?;
    let mut rhs = load(rhs, limits)?;
    if sorted {
        lhs.sort();
        rhs.sort();
    }
    Ok((lhs, rhs))
}

fn load(path: &Path, limits: Limits) -> Result<FieldList> {
    let bytes = read_input(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "decoding input");
    FieldList::from_json_with_limits(&bytes, limits).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn read_input(path: &Path) -> std::io::Result<Vec<u8>> {
    if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes)?;
        Ok(bytes)
    } else {
        std::fs::read(path)
    }
}
