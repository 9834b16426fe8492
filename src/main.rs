//! Pasteback CLI entry point

use std::process::ExitCode;

use clap::{CommandFactory, Parser};

use pasteback::cli::{
    app::{cli_overrides, daemon_options, init_logging, load_merged_config},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    daemon_cmd::{handle_daemon_command, handle_history_command},
    presenter::Presenter,
    run_daemon, EXIT_ERROR, EXIT_USAGE_ERROR,
};
use pasteback::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let presenter = Presenter::new();
    let overrides = cli_overrides(&cli);

    let run_as_daemon = match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Daemon {
            action: Some(action),
        }) => {
            if let Err(e) = handle_daemon_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Daemon { action: None }) => true,
        Some(command) => {
            if let Err(e) = handle_history_command(command, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => cli.daemon,
    };

    if !run_as_daemon {
        let _ = Cli::command().print_help();
        return ExitCode::from(EXIT_USAGE_ERROR);
    }

    let config = load_merged_config(overrides).await;
    match daemon_options(&config) {
        Ok(options) => run_daemon(options).await,
        Err(e) => {
            presenter.error(&e);
            ExitCode::from(EXIT_USAGE_ERROR)
        }
    }
}
