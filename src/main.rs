// licwatch: Google Workspace license threshold monitor
use clap::Parser;
use tracing_subscriber::EnvFilter;

use licwatch::cli::{Cli, Commands};
use licwatch::commands::{
    handle_check_command, handle_config_action, handle_error, handle_report_command,
    handle_sync_command, MonitorContext,
};
use licwatch::config::Config;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "licwatch=info" } else { "licwatch=warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Config { action } = cli.command {
        return handle_config_action(action, cli.config.as_deref(), cli.json);
    }

    let config = Config::load(cli.config.as_deref())?;
    let mut context = MonitorContext::new(config)?;

    match cli.command {
        Commands::Sync => handle_sync_command(&mut context, cli.json).await,
        Commands::Check { dry_run, offline } => {
            handle_check_command(&mut context, dry_run, offline, cli.json).await
        }
        Commands::Report { dry_run } => handle_report_command(&context, dry_run, cli.json).await,
        Commands::Config { .. } => Ok(()),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let json_output = cli.json;
    if let Err(e) = run(cli).await {
        handle_error(&e, json_output);
        std::process::exit(1);
    }
}
