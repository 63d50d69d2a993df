pub mod demo;
pub mod error;
pub mod json_actions;
pub mod launcher;
pub mod playback;
pub mod settings;
pub mod watch;

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use crate::demo::Perspective;
use crate::playback::AnalysisFileRepository;
use crate::settings::{default_settings_path, FileSettingsProvider};
use crate::watch::{HighlightsWatcher, WatchPlayerHighlightsOptions};

#[derive(Parser, Debug)]
#[command(
    name = "replaycast",
    about = "Watch a player's highlights from a Counter-Strike demo"
)]
struct Args {
    /// Path to the .dem file
    #[arg(long)]
    demo: PathBuf,

    /// SteamID64 of the player whose kills are replayed
    #[arg(long)]
    steam_id: String,

    /// Camera used for generated highlights: player | enemy
    #[arg(long, default_value = "player")]
    perspective: Perspective,

    /// Settings file, defaults to the per-user config folder
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

async fn watch_from_args(args: Args) -> error::Result<()> {
    let settings_path = args
        .settings
        .or_else(default_settings_path)
        .unwrap_or_else(|| PathBuf::from("settings.json"));
    let settings_provider = FileSettingsProvider::new(settings_path);

    tracing::info!(
        demo_path = %args.demo.display(),
        steam_id = %args.steam_id,
        perspective = ?args.perspective,
        settings_path = %settings_provider.path().display(),
        "Watching player highlights"
    );

    let watcher = HighlightsWatcher::new(
        Arc::new(settings_provider),
        Arc::new(AnalysisFileRepository),
    );

    watcher
        .watch_player_highlights(WatchPlayerHighlightsOptions {
            demo_path: args.demo,
            steam_id: args.steam_id,
            perspective: args.perspective,
            on_game_start: Box::new(|| tracing::info!("Game is running")),
        })
        .await
}

pub fn run() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            tracing::error!("Failed to start async runtime: {error}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(watch_from_args(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("Failed to watch player highlights: {error}");
            ExitCode::FAILURE
        }
    }
}
