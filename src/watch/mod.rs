mod hlae_config;
mod plan;

use std::path::PathBuf;
use std::sync::Arc;

use crate::demo::{detect_demo_game, Perspective};
use crate::error::Result;
use crate::json_actions::{
    delete_json_actions_file, generate_player_highlights_json_file, PlayerHighlightsOptions,
};
use crate::launcher::{DirectLauncher, GameLauncher, GameStartCallback, HlaeLauncher, LaunchRequest};
use crate::playback::{PlaybackMatchQuery, PlaybackMatchRepository, WatchType};
use crate::settings::SettingsProvider;

pub use hlae_config::{build_anonymization_config, hlae_config_path, write_hlae_config};
pub use plan::{
    assert_player_has_actions, assert_players_slots_are_defined, resolve_highlights_mode,
    HighlightsMode,
};

pub struct WatchPlayerHighlightsOptions {
    pub demo_path: PathBuf,
    pub steam_id: String,
    pub perspective: Perspective,
    pub on_game_start: GameStartCallback,
}

pub struct HighlightsWatcher {
    settings_provider: Arc<dyn SettingsProvider>,
    match_repository: Arc<dyn PlaybackMatchRepository>,
    direct_launcher: Arc<dyn GameLauncher>,
    hlae_launcher: Arc<dyn GameLauncher>,
}

impl HighlightsWatcher {
    pub fn new(
        settings_provider: Arc<dyn SettingsProvider>,
        match_repository: Arc<dyn PlaybackMatchRepository>,
    ) -> Self {
        Self {
            settings_provider,
            match_repository,
            direct_launcher: Arc::new(DirectLauncher),
            hlae_launcher: Arc::new(HlaeLauncher),
        }
    }

    pub fn with_launchers(
        mut self,
        direct_launcher: Arc<dyn GameLauncher>,
        hlae_launcher: Arc<dyn GameLauncher>,
    ) -> Self {
        self.direct_launcher = direct_launcher;
        self.hlae_launcher = hlae_launcher;
        self
    }

    pub async fn watch_player_highlights(&self, options: WatchPlayerHighlightsOptions) -> Result<()> {
        let WatchPlayerHighlightsOptions {
            demo_path,
            steam_id,
            perspective,
            on_game_start,
        } = options;

        let game = detect_demo_game(&demo_path).await?;
        delete_json_actions_file(&demo_path).await?;

        let settings = self.settings_provider.load_settings().await?;
        let playback = settings.playback;
        let playback_match = self
            .match_repository
            .get_playback_match(&PlaybackMatchQuery {
                demo_path: demo_path.clone(),
                steam_id: steam_id.clone(),
                watch_type: WatchType::Highlights,
                include_damages: playback.highlights.include_damages,
            })
            .await?;

        let mode = resolve_highlights_mode(
            game,
            playback.use_custom_highlights,
            playback_match.as_ref(),
        )?;

        tracing::info!(
            demo_path = %demo_path.display(),
            game = game.label(),
            steam_id = %steam_id,
            mode = mode.label(),
            use_hlae = playback.use_hlae,
            "Resolved highlights mode"
        );

        let mut play_demo_args: Vec<String> = Vec::new();
        match mode {
            HighlightsMode::Custom(playback_match) => {
                generate_player_highlights_json_file(&PlayerHighlightsOptions {
                    actions: &playback_match.actions,
                    demo_path: &demo_path,
                    game,
                    tick_count: playback_match.tick_count,
                    tickrate: playback_match.tickrate,
                    perspective,
                    before_delay_seconds: playback.highlights.before_kill_delay_in_seconds,
                    next_delay_seconds: playback.highlights.after_kill_delay_in_seconds,
                    player_voices_enabled: playback.player_voices_enabled,
                })
                .await?;
            }
            HighlightsMode::BuiltIn => play_demo_args.push(steam_id.clone()),
        }

        let use_hlae = playback.use_hlae;
        if use_hlae {
            write_hlae_config(&demo_path, &steam_id).await?;
        }

        let request = LaunchRequest {
            demo_path,
            game,
            play_demo_args,
            playback_settings: playback,
            on_game_start,
        };

        if use_hlae {
            self.hlae_launcher.launch(request).await
        } else {
            self.direct_launcher.launch(request).await
        }
    }
}
