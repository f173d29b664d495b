use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    Terminal,
    /// Machine-readable JSON
    Json,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "facetmap")]
#[command(about = "Facet-based metamodel construction engine", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the metamodel from a model file and report validation failures
    Validate {
        /// Model file (.toml or .json) declaring the domain classes
        model: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Fail when the validation report is non-empty
        #[arg(long)]
        strict: bool,

        /// Configuration file (defaults to ./facetmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Dump one specification: members, facets and precedences
    Inspect {
        /// Model file (.toml or .json) declaring the domain classes
        model: PathBuf,

        /// Class to inspect
        class: String,

        /// Configuration file (defaults to ./facetmap.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
