use async_trait::async_trait;
use tokio::process::Command;

use super::arguments::build_game_arguments;
use super::executable::resolve_game_executable;
use super::{spawn_and_wait, GameLauncher, LaunchRequest};
use crate::error::Result;

#[derive(Debug, Default, Clone, Copy)]
pub struct DirectLauncher;

#[async_trait]
impl GameLauncher for DirectLauncher {
    async fn launch(&self, request: LaunchRequest) -> Result<()> {
        let executable_path = resolve_game_executable(request.game, &request.playback_settings)?;
        let arguments = build_game_arguments(
            &request.demo_path,
            &request.play_demo_args,
            &request.playback_settings,
            None,
        );

        tracing::info!(
            game = request.game.label(),
            executable = %executable_path.display(),
            arguments = ?arguments,
            "Starting game"
        );

        let mut command = Command::new(&executable_path);
        command.args(&arguments);
        if let Some(game_directory) = executable_path
            .parent()
            .filter(|directory| !directory.as_os_str().is_empty())
        {
            command.current_dir(game_directory);
        }

        spawn_and_wait(command, request.game.label(), request.on_game_start).await
    }
}
