/// Pocket Demo - scripted playback session over the simulated engine
use clap::Parser;
use pocket_demo::{script, DemoConfig};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "pocket-demo")]
#[command(about = "Play a scripted Pocket Player session", long_about = None)]
struct Cli {
    /// Configuration file path (default: ./pocket.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resource locator of the track to play
    #[arg(short, long, env = "POCKET_TRACK")]
    track: Option<String>,

    /// Duration of the virtual track in milliseconds
    #[arg(long)]
    duration_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "pocket_demo=info,pocket_playback=info,pocket_audio_mobile=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = DemoConfig::load(cli.config.as_deref())?;
    if let Some(track) = cli.track {
        config.script.track = track;
    }
    if let Some(duration_ms) = cli.duration_ms {
        config.script.duration_ms = duration_ms;
    }
    config.validate()?;

    tracing::info!("Starting Pocket demo");
    tracing::info!("Track: {}", config.script.track);

    let summary = script::run(&config).await?;

    tracing::info!(
        notifications = summary.notifications_published,
        releases = summary.engine_releases,
        "Session finished"
    );

    Ok(())
}
