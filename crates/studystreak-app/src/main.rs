use clap::Parser;

use studystreak_infrastructure::config::Settings;
use studystreak_infrastructure::logging::init_logger;
use studystreak_lib::presentation::bootstrap::build_app_state;
use studystreak_lib::presentation::cli::{self, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref())?;
    init_logger(&settings.log_dir, settings.log_to_console || cli.verbose)?;

    let state = build_app_state(&settings).await?;
    cli::run(cli.command, state).await
}
