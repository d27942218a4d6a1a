use anyhow::{Context, Result};
use clap::Parser;
use dimap::builders::CancellationToken;
use dimap::cli::{Cli, Commands};
use dimap::commands::{self, AnalyzeArgs};
use dimap::observability::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Analyze {
            path,
            format,
            output,
            config,
            exclude,
            jobs,
        } => {
            let cancellation = CancellationToken::new();
            let handler_token = cancellation.clone();
            ctrlc::set_handler(move || handler_token.cancel())
                .context("Failed to set Ctrl+C handler")?;

            commands::handle_analyze(
                AnalyzeArgs {
                    path,
                    format,
                    output,
                    config,
                    exclude,
                    jobs,
                },
                cancellation,
            )
        }
        Commands::Import {
            input,
            format,
            output,
        } => commands::handle_import(&input, format, output.as_deref()),
        Commands::Init { force } => commands::init_config(force),
    }
}
