//! Drum Lights terminal controller.

use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
    time::Duration,
};

use clap::Parser;
use drumlights_app::{App, Bridge, HighlightPolicy, Layout, Runtime, SentinelPolicy, SyncConfig};
use drumlights_core::{BuildMode, Connection, ConnectionConfig, Endpoint};
use drumlights_tui::TerminalDriver;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Control the Drum Lights from a terminal.
#[derive(Debug, Parser)]
#[command(name = "drumlights", version, about)]
struct Args {
    /// Device host, optionally with a port.
    #[arg(long, default_value = "192.168.4.1")]
    host: String,

    /// Delay before reconnecting after the socket closes, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    reconnect_ms: u64,

    /// Send the blue strobes mode without asking.
    #[arg(long)]
    no_confirm: bool,

    /// Highlight a mode as soon as it is requested.
    #[arg(long)]
    optimistic: bool,

    /// Log file. The terminal is busy with the UI.
    #[arg(long, default_value = "drumlights.log")]
    log_file: PathBuf,
}

impl Args {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            sentinel: if self.no_confirm { SentinelPolicy::Direct } else { SentinelPolicy::Confirm },
            highlight: if self.optimistic {
                HighlightPolicy::Optimistic
            } else {
                HighlightPolicy::Deferred
            },
        }
    }

    fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig { reconnect_delay: Duration::from_millis(self.reconnect_ms) }
    }
}

fn init_logging(path: &Path) -> std::io::Result<()> {
    let file = File::create(path)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let endpoint = Endpoint::resolve(BuildMode::from_build(), &args.host)?;
    info!(%endpoint, "starting");

    let app = App::new(Layout::drum_lights()?, args.sync_config());
    let bridge = Bridge::new(Connection::new(endpoint, args.connection_config()));
    let driver = TerminalDriver::new()?;

    let mut runtime = Runtime::new(app, bridge, driver);
    runtime.run().await?;

    info!("bye");
    Ok(())
}
