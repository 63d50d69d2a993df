use std::path::{Path, PathBuf};

use crate::demo::Game;
use crate::error::{LaunchError, Result};
use crate::settings::PlaybackSettings;

const CS_INSTALL_FOLDER: &str = "Counter-Strike Global Offensive";

fn steam_library_roots() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = Vec::new();

    if cfg!(target_os = "windows") {
        if let Some(program_files) = std::env::var_os("ProgramFiles(x86)") {
            roots.push(Path::new(&program_files).join("Steam"));
        }
        roots.push(PathBuf::from(r"C:\Program Files (x86)\Steam"));
    } else if let Some(home) = std::env::var_os("HOME") {
        let home = Path::new(&home);
        roots.push(home.join(".steam").join("steam"));
        roots.push(home.join(".local").join("share").join("Steam"));
    }

    roots.dedup();
    roots
}

fn relative_executable_path(game: Game) -> PathBuf {
    match (game, cfg!(target_os = "windows")) {
        (Game::Cs2, true) => Path::new("game").join("bin").join("win64").join("cs2.exe"),
        (Game::Cs2, false) => Path::new("game")
            .join("bin")
            .join("linuxsteamrt64")
            .join("cs2"),
        (Game::Csgo, true) => PathBuf::from("csgo.exe"),
        (Game::Csgo, false) => PathBuf::from("csgo_linux64"),
    }
}

pub(crate) fn game_executable_candidates(game: Game, settings: &PlaybackSettings) -> Vec<PathBuf> {
    let mut candidates: Vec<PathBuf> = Vec::new();

    let configured_path = match game {
        Game::Cs2 => settings.cs2_executable_path.as_ref(),
        Game::Csgo => settings.csgo_executable_path.as_ref(),
    };
    if let Some(configured_path) = configured_path {
        candidates.push(configured_path.clone());
    }

    let relative_path = relative_executable_path(game);
    for root in steam_library_roots() {
        candidates.push(
            root.join("steamapps")
                .join("common")
                .join(CS_INSTALL_FOLDER)
                .join(&relative_path),
        );
    }

    candidates
}

pub fn resolve_game_executable(game: Game, settings: &PlaybackSettings) -> Result<PathBuf> {
    let candidates = game_executable_candidates(game, settings);

    if let Some(found_path) = candidates.iter().find(|path| path.is_file()) {
        return Ok(found_path.clone());
    }

    Err(LaunchError::ExecutableNotFound {
        program: game.label(),
        candidates,
    })
}
