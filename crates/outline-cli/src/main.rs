//! oln - command-line client for the Outline knowledge base
//!
//! Entry point: parses arguments, sets up logging, loads the configuration
//! file and dispatches to the command handlers.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use clap::ValueEnum;
use cli::{Cli, Commands, OutputFormat};
use colored::control;
use config::Config;
use error::Result;
use handlers::Session;
use logging::{timing::Timer, LoggingConfig};
use outline_core::ConfigLayer;
use output::OutputWriter;
use std::process;
use tracing::instrument;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    control::set_override(cli.use_color());

    if let Err(e) = init_logging(&cli) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli).await {
        Ok(()) => process::exit(0),
        Err(e) => {
            eprintln!("{}", error::format_error(&e, control::SHOULD_COLORIZE.should_colorize()));

            if e.should_show_help() {
                eprintln!("\nFor more information, try '--help'");
            }

            process::exit(e.exit_code());
        }
    }
}

/// Main application logic
#[instrument(skip(cli), fields(command = ?cli.command))]
async fn run(cli: Cli) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    if let Commands::Completions(args) = cli.command {
        return handlers::handle_completions(args);
    }

    let path = Config::resolve_path(cli.config.as_deref())?;
    let file = match &cli.command {
        // `config set` may create the file, so a missing one is fine here
        Commands::Config(_) => Config::load_or_default(&path)?,
        _ => {
            let _config_timer = Timer::new("config_loading");
            Config::load_with_file(cli.config.as_deref())?
        }
    };

    let format = output_format(cli.output, &file);
    let mut output = OutputWriter::new(format, cli.use_color(), cli.quiet);

    let flags = ConfigLayer {
        api_key: cli.api_key.clone(),
        api_url: cli.api_url.clone(),
        ..Default::default()
    };
    let session = Session::new(file, path, flags);

    tracing::info!(
        command = ?cli.command,
        verbosity = cli.verbosity_level(),
        "Executing command"
    );

    match cli.command {
        Commands::Docs(args) => handlers::handle_docs(args, &session, &mut output).await,
        Commands::Collections(args) => {
            handlers::handle_collections(args, &session, &mut output).await
        }
        Commands::Auth(args) => handlers::handle_auth(args, &session, &mut output).await,
        Commands::Config(args) => handlers::handle_config(args, &session, &mut output).await,
        Commands::Completions(args) => handlers::handle_completions(args),
    }
}

/// `--output`, else the config file's choice, else human
fn output_format(flag: Option<OutputFormat>, file: &Config) -> OutputFormat {
    flag.or_else(|| {
        file.output
            .as_deref()
            .and_then(|name| OutputFormat::from_str(name, true).ok())
    })
    .unwrap_or(OutputFormat::Human)
}

/// Initialize the logging system
fn init_logging(cli: &Cli) -> Result<()> {
    let mut logging_config = LoggingConfig::from_verbosity(cli.verbosity_level());
    logging_config.merge_with_env();

    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
