mod commands;
mod config;
mod error;
mod git;
mod github;
mod license;
mod logging;
mod manifest;
mod materialize;
mod orchestrator;
#[cfg(test)]
mod test_utils;

use clap::{Parser, Subcommand};
use config::Config;
use orchestrator::InitOptions;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "skt",
    about = "SaaSKit CLI - bootstraps a SaaS starter-kit project",
    disable_help_subcommand = true
)]
struct Cli {
    #[arg(long, short, global = true, help = "Enable debug logging")]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print a hello message
    Print,
    /// Get help from the bot
    Help,
    /// Clone a repository into a directory
    #[command(name = "clone")]
    CloneRepo {
        #[arg(long, help = "URL of the repository to clone (required)")]
        repo: Option<String>,
        #[arg(long, help = "Path where to clone the repository (required)")]
        path: Option<String>,
    },
    /// Initialize a new SaaS project
    Init {
        #[arg(long, help = "Name of your SaaS project (required)")]
        name: Option<String>,
        #[arg(long, help = "License key for verification (required)")]
        key: Option<String>,
        #[arg(long, help = "Organization to fork the templates into")]
        org: Option<String>,
        #[arg(long, help = "Directory the project is created in (required)")]
        path: Option<String>,
    },
}

// single-threaded: every stage runs to completion before the next starts
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        None => commands::banner(),
        Some(Command::Print) => commands::print(),
        Some(Command::Help) => commands::help(),
        Some(Command::CloneRepo { repo, path }) => {
            let Some(config) = load_config() else {
                return ExitCode::FAILURE;
            };
            commands::clone(&config, repo, path)
        }
        Some(Command::Init {
            name,
            key,
            org,
            path,
        }) => {
            let Some(config) = load_config() else {
                return ExitCode::FAILURE;
            };
            let options = InitOptions {
                name: name.unwrap_or_default(),
                key: key.unwrap_or_default(),
                org: org.unwrap_or_default(),
                path: path.unwrap_or_default(),
            };
            commands::init(&config, options).await
        }
    }
}

fn load_config() -> Option<Config> {
    match Config::load() {
        Ok(config) => {
            tracing::debug!(?config, "loaded configuration");
            Some(config)
        }
        Err(e) => {
            eprintln!("❌ {e}");
            None
        }
    }
}
