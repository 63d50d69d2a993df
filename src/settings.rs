use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{LaunchError, Result};

const SETTINGS_DIRECTORY_NAME: &str = "replaycast";
const SETTINGS_FILE_NAME: &str = "settings.json";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub playback: PlaybackSettings,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlaybackSettings {
    pub use_custom_highlights: bool,
    pub highlights: HighlightsSettings,
    pub use_hlae: bool,
    pub hlae: HlaeSettings,
    pub player_voices_enabled: bool,
    pub width: u32,
    pub height: u32,
    pub fullscreen: bool,
    pub launch_parameters: Option<String>,
    pub cs2_executable_path: Option<PathBuf>,
    pub csgo_executable_path: Option<PathBuf>,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            use_custom_highlights: true,
            highlights: HighlightsSettings::default(),
            use_hlae: false,
            hlae: HlaeSettings::default(),
            player_voices_enabled: true,
            width: 1920,
            height: 1080,
            fullscreen: false,
            launch_parameters: None,
            cs2_executable_path: None,
            csgo_executable_path: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HighlightsSettings {
    pub include_damages: bool,
    pub before_kill_delay_in_seconds: u32,
    pub after_kill_delay_in_seconds: u32,
}

impl Default for HighlightsSettings {
    fn default() -> Self {
        Self {
            include_damages: false,
            before_kill_delay_in_seconds: 2,
            after_kill_delay_in_seconds: 2,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HlaeSettings {
    pub folder_path: Option<PathBuf>,
}

#[async_trait]
pub trait SettingsProvider: Send + Sync {
    async fn load_settings(&self) -> Result<Settings>;
}

pub struct FileSettingsProvider {
    path: PathBuf,
}

impl FileSettingsProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SettingsProvider for FileSettingsProvider {
    async fn load_settings(&self) -> Result<Settings> {
        read_settings_file(&self.path).await
    }
}

pub async fn read_settings_file(path: &Path) -> Result<Settings> {
    let raw_json = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            tracing::debug!(settings_path = %path.display(), "Settings file not found, using defaults");
            return Ok(Settings::default());
        }
        Err(error) => return Err(error.into()),
    };

    serde_json::from_str::<Settings>(&raw_json).map_err(|source| LaunchError::InvalidSettings {
        path: path.to_path_buf(),
        source,
    })
}

pub fn default_settings_path() -> Option<PathBuf> {
    let config_directory = std::env::var_os("APPDATA")
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from))
        .or_else(|| {
            std::env::var_os("HOME").map(|home| Path::new(&home).join(".config"))
        })?;

    Some(
        config_directory
            .join(SETTINGS_DIRECTORY_NAME)
            .join(SETTINGS_FILE_NAME),
    )
}
