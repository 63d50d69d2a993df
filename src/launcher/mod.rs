mod arguments;
mod direct;
mod executable;
mod hlae;

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;

use crate::demo::Game;
use crate::error::Result;
use crate::settings::PlaybackSettings;

pub use direct::DirectLauncher;
pub use executable::resolve_game_executable;
pub use hlae::HlaeLauncher;
pub(crate) use hlae::HLAE_CONFIG_NAME;

pub type GameStartCallback = Box<dyn FnOnce() + Send>;

pub struct LaunchRequest {
    pub demo_path: PathBuf,
    pub game: Game,
    pub play_demo_args: Vec<String>,
    pub playback_settings: PlaybackSettings,
    pub on_game_start: GameStartCallback,
}

#[async_trait]
pub trait GameLauncher: Send + Sync {
    async fn launch(&self, request: LaunchRequest) -> Result<()>;
}

pub(crate) async fn spawn_and_wait(
    mut command: Command,
    program_label: &str,
    on_game_start: GameStartCallback,
) -> Result<()> {
    let mut child = command.spawn()?;

    tracing::info!(
        program = program_label,
        pid = child.id(),
        "Game process started"
    );
    on_game_start();

    let status = child.wait().await?;
    if status.success() {
        tracing::info!(program = program_label, "Game process exited");
    } else {
        tracing::warn!(
            program = program_label,
            exit_code = status.code(),
            "Game process exited with a failure status"
        );
    }

    Ok(())
}
