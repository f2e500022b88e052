//! Voice Recorder CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_recorder::cli::{
    app::{load_merged_config, CommandError, Library},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    library_cmd::{handle_delete_command, handle_list_command},
    play_cmd::handle_play_command,
    presenter::Presenter,
    record_cmd::handle_record_command,
    settings_cmd::handle_settings_command,
    EXIT_ERROR,
};
use voice_recorder::domain::config::AppConfig;
use voice_recorder::infrastructure::XdgConfigStore;
use voice_recorder::logging::init_logging;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut presenter = Presenter::new();

    if let Err(e) = init_logging() {
        presenter.warn(&format!("File logging disabled: {}", e));
    }

    let command = match cli.command {
        // Config management never touches the data directory
        Commands::Config { action } => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        command => command,
    };

    // Build CLI config from args
    let cli_config = AppConfig {
        data_dir: cli.data_dir,
        ..Default::default()
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    match run(command, &config, &mut presenter).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            presenter.error(&e.to_string());
            e.exit_code()
        }
    }
}

async fn run(
    command: Commands,
    config: &AppConfig,
    presenter: &mut Presenter,
) -> Result<(), CommandError> {
    let library = Library::open(config.data_dir_or_default());
    tracing::debug!(data_dir = %library.data_dir().display(), "library opened");

    match command {
        Commands::Record { name, max_duration } => {
            handle_record_command(&library, config, name, max_duration, presenter).await
        }
        Commands::List { search } => handle_list_command(&library, search, presenter).await,
        Commands::Play { target, speed } => {
            handle_play_command(&library, &target, speed, presenter).await
        }
        Commands::Delete { target } => handle_delete_command(&library, &target, presenter).await,
        Commands::Settings { action } => handle_settings_command(action, &library, presenter).await,
        Commands::Config { action } => {
            handle_config_command(action, &XdgConfigStore::new(), presenter).await?;
            Ok(())
        }
    }
}
