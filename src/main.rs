use anyhow::Result;
use clap::Parser;
use facetmap::cli::{Cli, Commands};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate {
            model,
            format,
            output,
            strict,
            config,
        } => facetmap::commands::validate::validate_model(
            facetmap::commands::validate::ValidateConfig {
                model,
                format: format.into(),
                output,
                strict,
                config,
            },
        ),
        Commands::Inspect {
            model,
            class,
            config,
        } => facetmap::commands::inspect::inspect_class(
            facetmap::commands::inspect::InspectConfig {
                model,
                class,
                config,
            },
        ),
    }
}
