//! Mirror client - Main entry point
//!
//! Periodically accepts the checkpoint a quorum of monitors agree on and
//! records it in the accepted checkpoint log.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mirror_daemon::{duration::parse_duration, Cycle, MirrorConfig};

#[derive(Parser)]
#[command(name = "mirror-client")]
#[command(about = "Accept transparency log checkpoints agreed on by a quorum of monitors", long_about = None)]
#[command(version)]
struct Cli {
    /// Length of interval between each periodical check [default: 1m]
    #[arg(long, value_parser = parse_duration)]
    interval: Option<Duration>,

    /// Read monitors from a monitor list instead of globbing for logInfo*.txt
    #[arg(long)]
    monitor_list: Option<PathBuf>,

    /// Directory holding the monitor logs and the accepted log
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mirror_daemon=info,mirror_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    info!("Starting mirror client v{}", env!("CARGO_PKG_VERSION"));

    let mut config = MirrorConfig::from_env()?;
    if let Some(list) = cli.monitor_list {
        config.monitor_list = Some(list);
    }
    if let Some(dir) = cli.work_dir {
        config.work_dir = dir;
    }
    config.validate()?;
    let interval = cli.interval.unwrap_or_else(|| config.interval());

    let cycle = Cycle::from_config(&config);
    info!(
        source = ?config.monitor_source(),
        accepted_log = %cycle.accepted_log().path().display(),
        interval = ?interval,
        "Client configured"
    );

    if cli.once {
        if let Err(e) = cycle.run_once() {
            error!("Cycle failed: {}", e);
            return Err(e.into());
        }
        return Ok(());
    }

    if let Err(e) = cycle.run_forever(interval).await {
        error!("Cycle failed: {}", e);
        return Err(e.into());
    }

    Ok(())
}
