use std::io;

use anyhow::Context;
use clap::Parser;
use tracing::debug;

use estimate_cli::app::{self, Env};
use estimate_cli::cli::Cli;
use estimate_cli::config::FileConfig;
use estimate_cli::logging;
use estimate_core::{DirectoryExportSink, SystemClock};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = FileConfig::load(cli.global.config.as_deref())
        .context("failed to load configuration")?
        .resolve(&cli.global);

    logging::init_logging(&config.log_level, config.log_file.as_deref())?;
    debug!(?config, "configuration resolved");

    let registry = app::build_registry();
    let mut store =
        app::open_store(&registry, &config.storage, app::store_key(&cli.command)).await?;

    let sink = DirectoryExportSink::new(&config.export_dir);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut env = Env {
        sink: &sink,
        clock: &SystemClock,
        out: &mut out,
    };

    app::run_command(cli.command, &mut store, &mut env).await
}
