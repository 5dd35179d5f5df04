use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use hb_platform::DirsAppDirsAdapter;
use helperboot_lib::bootstrap::{
    init_tracing_subscriber, load_config, run_command, wire_services, with_default_paths,
};
use helperboot_lib::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let dirs = DirsAppDirsAdapter::new()
        .get_app_dirs()
        .context("Failed to resolve application directories")?;
    let config_path = cli.config.clone().unwrap_or_else(|| dirs.config_file());
    let config = with_default_paths(load_config(&config_path)?, &dirs);

    init_tracing_subscriber(&config.storage.log_dir)?;
    info!(
        config = %config_path.display(),
        state = %config.storage.state_file.display(),
        "helperboot starting"
    );

    let services = wire_services(&config)?;
    run_command(cli.command, &services).await
}
