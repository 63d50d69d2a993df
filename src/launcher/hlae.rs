use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::process::Command;

use super::arguments::{build_game_arguments, join_command_line};
use super::executable::resolve_game_executable;
use super::{spawn_and_wait, GameLauncher, LaunchRequest};
use crate::demo::Game;
use crate::error::{LaunchError, Result};

const HLAE_EXECUTABLE_NAME: &str = "HLAE.exe";
// Loaded through `+exec` so the name replacements apply before playback.
pub(crate) const HLAE_CONFIG_NAME: &str = "hlae";

pub(crate) fn hook_dll_path(hlae_folder: &Path, game: Game) -> PathBuf {
    match game {
        Game::Csgo => hlae_folder.join("AfxHookSource.dll"),
        Game::Cs2 => hlae_folder.join("x64").join("AfxHookSource2.dll"),
    }
}

pub(crate) fn build_hlae_arguments(
    hlae_folder: &Path,
    game: Game,
    game_executable: &Path,
    game_arguments: &[String],
) -> Vec<String> {
    vec![
        "-customLoader".to_string(),
        "-noGui".to_string(),
        "-autoStart".to_string(),
        "-hookDllPath".to_string(),
        hook_dll_path(hlae_folder, game).to_string_lossy().to_string(),
        "-programPath".to_string(),
        game_executable.to_string_lossy().to_string(),
        "-cmdLine".to_string(),
        join_command_line(game_arguments),
    ]
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HlaeLauncher;

#[async_trait]
impl GameLauncher for HlaeLauncher {
    async fn launch(&self, request: LaunchRequest) -> Result<()> {
        let hlae_folder = request
            .playback_settings
            .hlae
            .folder_path
            .clone()
            .ok_or(LaunchError::HlaeFolderNotConfigured)?;
        let hlae_executable = hlae_folder.join(HLAE_EXECUTABLE_NAME);
        if !hlae_executable.is_file() {
            return Err(LaunchError::ExecutableNotFound {
                program: "HLAE",
                candidates: vec![hlae_executable],
            });
        }

        let game_executable = resolve_game_executable(request.game, &request.playback_settings)?;
        let game_arguments = build_game_arguments(
            &request.demo_path,
            &request.play_demo_args,
            &request.playback_settings,
            Some(HLAE_CONFIG_NAME),
        );
        let arguments =
            build_hlae_arguments(&hlae_folder, request.game, &game_executable, &game_arguments);

        tracing::info!(
            game = request.game.label(),
            hlae = %hlae_executable.display(),
            executable = %game_executable.display(),
            arguments = ?arguments,
            "Starting game through HLAE"
        );

        let mut command = Command::new(&hlae_executable);
        command.args(&arguments).current_dir(&hlae_folder);

        spawn_and_wait(command, "HLAE", request.on_game_start).await
    }
}
