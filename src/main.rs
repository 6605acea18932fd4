// ABOUTME: Main entry point for the hive command-line tool
// Parses arguments, scopes logging to the command, and maps errors to exit status 1

use anyhow::{Context, Result};
use clap::Parser;

use hive::app::App;
use hive::cli::Args;
use hive::config::AppConfig;
use hive::logging;

fn main() {
    let args = Args::parse();
    let subscriber = logging::subscriber(args.verbose);

    let code = tracing::subscriber::with_default(subscriber, || match run(args) {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    });
    std::process::exit(code);
}

fn run(args: Args) -> Result<()> {
    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let config = AppConfig::load().context("failed to load hive settings")?;

    let mut app = App::new(config, cwd).with_config_path(args.config);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    app.run(args.command, &mut out)
}
