//! petirc entry point.

use clap::{Parser, ValueEnum};
use petirc_tui::runtime::{Options, Runtime};
use petirc_tui::transport::DEFAULT_PORT;

/// On/off switch for flag arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Switch {
    /// Enabled.
    On,
    /// Disabled.
    Off,
}

/// Tiny chat client with a fixed 40x25 screen
#[derive(Parser, Debug)]
#[command(name = "petirc")]
#[command(about = "A small line-oriented chat client")]
#[command(version)]
struct Args {
    /// Nickname to register with
    nick: String,

    /// Server host to connect to
    server: String,

    /// Server port
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Connect at startup
    #[arg(long, value_enum, default_value_t = Switch::On)]
    autoconnect: Switch,

    /// Show timestamps in the gutter and status bar
    #[arg(long)]
    timestamps: bool,

    /// Color theme id (1-based; out-of-range falls back to the default)
    #[arg(long, default_value_t = 1)]
    theme: u8,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;
    let args = Args::parse();

    let runtime = Runtime::new(Options {
        nick: args.nick,
        host: args.server,
        port: args.port,
        autoconnect: args.autoconnect == Switch::On,
        timestamps: args.timestamps,
        theme_id: args.theme,
    })?;

    Ok(runtime.run().await?)
}

/// Log to the file named by `PETIRC_LOG`, filtered by `RUST_LOG`.
///
/// The terminal is in raw alternate-screen mode while running, so logs
/// never go to stdout or stderr.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let Ok(path) = std::env::var("PETIRC_LOG") else {
        return Ok(());
    };
    let file = std::fs::File::create(path)?;

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
