use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;
use tokio::io::AsyncReadExt;

use crate::error::{LaunchError, Result};

const CSGO_DEMO_MAGIC: &[u8; 8] = b"HL2DEMO\0";
const CS2_DEMO_MAGIC: &[u8; 8] = b"PBDEMS2\0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Game {
    Csgo,
    Cs2,
}

impl Game {
    pub fn label(self) -> &'static str {
        match self {
            Game::Csgo => "CS:GO",
            Game::Cs2 => "CS2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Perspective {
    #[default]
    Player,
    Enemy,
}

impl FromStr for Perspective {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "player" => Ok(Perspective::Player),
            "enemy" => Ok(Perspective::Enemy),
            other => Err(format!(
                "Unknown perspective '{other}', expected 'player' or 'enemy'"
            )),
        }
    }
}

pub(crate) fn game_from_header(header: &[u8]) -> Option<Game> {
    if header.starts_with(CS2_DEMO_MAGIC) {
        return Some(Game::Cs2);
    }

    if header.starts_with(CSGO_DEMO_MAGIC) {
        return Some(Game::Csgo);
    }

    None
}

pub async fn detect_demo_game(demo_path: &Path) -> Result<Game> {
    let mut file = tokio::fs::File::open(demo_path).await?;
    let mut header = [0u8; 8];

    match file.read_exact(&mut header).await {
        Ok(_) => {}
        Err(error) if error.kind() == ErrorKind::UnexpectedEof => {
            return Err(LaunchError::UnsupportedDemo {
                path: demo_path.to_path_buf(),
            });
        }
        Err(error) => return Err(error.into()),
    }

    game_from_header(&header).ok_or_else(|| LaunchError::UnsupportedDemo {
        path: demo_path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::{detect_demo_game, game_from_header, Game, Perspective};
    use crate::error::LaunchError;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_directory() -> std::path::PathBuf {
        let timestamp_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        let process_id = std::process::id();
        std::env::temp_dir().join(format!("replaycast_demo_test_{process_id}_{timestamp_nanos}"))
    }

    #[test]
    fn recognizes_both_demo_headers() {
        assert_eq!(game_from_header(b"HL2DEMO\0\x04\x00"), Some(Game::Csgo));
        assert_eq!(game_from_header(b"PBDEMS2\0\x10\x20"), Some(Game::Cs2));
        assert_eq!(game_from_header(b"PK\x03\x04zip"), None);
        assert_eq!(game_from_header(b"HL2"), None);
    }

    #[test]
    fn parses_perspective_case_insensitively() {
        assert_eq!("Player".parse::<Perspective>(), Ok(Perspective::Player));
        assert_eq!(" enemy ".parse::<Perspective>(), Ok(Perspective::Enemy));
        assert!("spectator".parse::<Perspective>().is_err());
    }

    #[tokio::test]
    async fn detects_game_from_demo_file() {
        let temp_directory = unique_temp_directory();
        std::fs::create_dir_all(&temp_directory)
            .expect("Failed to create temporary demo test directory");

        let cs2_demo = temp_directory.join("cs2.dem");
        std::fs::write(&cs2_demo, b"PBDEMS2\0rest-of-demo").expect("Failed to write CS2 demo");
        let truncated_demo = temp_directory.join("truncated.dem");
        std::fs::write(&truncated_demo, b"HL2").expect("Failed to write truncated demo");

        let game = detect_demo_game(&cs2_demo)
            .await
            .expect("Expected CS2 demo detection to succeed");
        assert_eq!(game, Game::Cs2);

        let error = detect_demo_game(&truncated_demo)
            .await
            .expect_err("Expected truncated demo to be rejected");
        assert!(matches!(error, LaunchError::UnsupportedDemo { .. }));

        let missing = detect_demo_game(&temp_directory.join("missing.dem"))
            .await
            .expect_err("Expected missing demo to fail");
        assert!(matches!(missing, LaunchError::Io(_)));

        std::fs::remove_dir_all(&temp_directory)
            .expect("Failed to remove temporary demo test directory");
    }
}
