use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::demo::{Game, Perspective};
use crate::error::Result;
use crate::playback::Action;

const STEAM_ID64_BASE: u64 = 76_561_197_960_265_728;
const FALLBACK_TICKRATE: f64 = 64.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonAction {
    pub tick: u64,
    pub cmd: String,
}

#[derive(Debug, Clone)]
pub struct PlayerHighlightsOptions<'a> {
    pub actions: &'a [Action],
    pub demo_path: &'a Path,
    pub game: Game,
    pub tick_count: u64,
    pub tickrate: f64,
    pub perspective: Perspective,
    pub before_delay_seconds: u32,
    pub next_delay_seconds: u32,
    pub player_voices_enabled: bool,
}

struct HighlightSequence {
    start_tick: u64,
    end_tick: u64,
    last_action_tick: u64,
    focus_commands: Vec<JsonAction>,
}

pub fn json_actions_file_path(demo_path: &Path) -> PathBuf {
    let mut file_path = OsString::from(demo_path.as_os_str());
    file_path.push(".json");
    PathBuf::from(file_path)
}

pub async fn delete_json_actions_file(demo_path: &Path) -> Result<()> {
    let file_path = json_actions_file_path(demo_path);
    match tokio::fs::remove_file(&file_path).await {
        Ok(()) => {
            tracing::debug!(actions_path = %file_path.display(), "Deleted stale JSON actions file");
            Ok(())
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(()),
        Err(error) => Err(error.into()),
    }
}

fn seconds_to_ticks(seconds: u32, tickrate: f64) -> u64 {
    let tickrate = if tickrate > 0.0 {
        tickrate
    } else {
        FALLBACK_TICKRATE
    };

    (f64::from(seconds) * tickrate).round() as u64
}

fn account_id_from_steam_id(steam_id: &str) -> Option<u64> {
    steam_id
        .trim()
        .parse::<u64>()
        .ok()
        .and_then(|steam_id64| steam_id64.checked_sub(STEAM_ID64_BASE))
}

fn focus_command(action: &Action, game: Game, perspective: Perspective) -> Option<String> {
    let slot_command = action
        .focus_slot(perspective)
        .map(|slot| format!("spec_player {}", u64::from(slot) + 1));

    match game {
        Game::Cs2 => slot_command,
        Game::Csgo => account_id_from_steam_id(action.focus_steam_id(perspective))
            .map(|account_id| format!("spec_player_by_accountid {account_id}"))
            .or(slot_command),
    }
}

fn voice_command(player_voices_enabled: bool) -> JsonAction {
    let indices = if player_voices_enabled { "-1" } else { "0" };
    JsonAction {
        tick: 0,
        cmd: format!("tv_listen_voice_indices {indices}"),
    }
}

fn build_sequences(options: &PlayerHighlightsOptions<'_>) -> Vec<HighlightSequence> {
    let before_ticks = seconds_to_ticks(options.before_delay_seconds, options.tickrate);
    let after_ticks = seconds_to_ticks(options.next_delay_seconds, options.tickrate);

    let mut actions: Vec<&Action> = options.actions.iter().collect();
    actions.sort_by_key(|action| action.tick);

    let mut sequences: Vec<HighlightSequence> = Vec::new();
    for action in actions {
        let start_tick = action.tick.saturating_sub(before_ticks);
        let mut end_tick = action.tick.saturating_add(after_ticks);
        if options.tick_count > 0 {
            end_tick = end_tick.min(options.tick_count);
        }

        let Some(command) = focus_command(action, options.game, options.perspective) else {
            tracing::warn!(
                tick = action.tick,
                game = ?options.game,
                "Unable to resolve the player to spectate for a highlight action"
            );
            continue;
        };

        match sequences.last_mut() {
            Some(sequence) if start_tick <= sequence.end_tick => {
                sequence.end_tick = sequence.end_tick.max(end_tick);
                let focus_changed = sequence
                    .focus_commands
                    .last()
                    .map_or(true, |previous| previous.cmd != command);
                if focus_changed {
                    sequence.focus_commands.push(JsonAction {
                        tick: start_tick.max(sequence.last_action_tick),
                        cmd: command,
                    });
                }
                sequence.last_action_tick = action.tick;
            }
            _ => sequences.push(HighlightSequence {
                start_tick,
                end_tick,
                last_action_tick: action.tick,
                focus_commands: vec![JsonAction {
                    tick: start_tick,
                    cmd: command,
                }],
            }),
        }
    }

    sequences
}

pub fn build_player_highlights_actions(options: &PlayerHighlightsOptions<'_>) -> Vec<JsonAction> {
    let sequences = build_sequences(options);
    let mut json_actions = vec![voice_command(options.player_voices_enabled)];

    let Some(first_sequence) = sequences.first() else {
        return json_actions;
    };

    if first_sequence.start_tick > 0 {
        json_actions.push(JsonAction {
            tick: 0,
            cmd: format!("demo_gototick {}", first_sequence.start_tick),
        });
    }

    for (index, sequence) in sequences.iter().enumerate() {
        json_actions.extend(sequence.focus_commands.iter().cloned());

        let cmd = match sequences.get(index + 1) {
            Some(next_sequence) => format!("demo_gototick {}", next_sequence.start_tick),
            None => "disconnect".to_string(),
        };
        json_actions.push(JsonAction {
            tick: sequence.end_tick,
            cmd,
        });
    }

    json_actions
}

pub async fn generate_player_highlights_json_file(
    options: &PlayerHighlightsOptions<'_>,
) -> Result<PathBuf> {
    let json_actions = build_player_highlights_actions(options);
    let file_path = json_actions_file_path(options.demo_path);
    let temp_path = temporary_file_path(&file_path);
    let serialized = serde_json::to_string_pretty(&json_actions)?;

    tokio::fs::write(&temp_path, serialized).await?;

    if let Err(error) = tokio::fs::rename(&temp_path, &file_path).await {
        if let Err(cleanup_error) = tokio::fs::remove_file(&temp_path).await {
            tracing::warn!(
                temp_path = %temp_path.display(),
                "Failed to remove temporary JSON actions file: {cleanup_error}"
            );
        }
        return Err(error.into());
    }

    tracing::info!(
        actions_path = %file_path.display(),
        action_count = options.actions.len(),
        command_count = json_actions.len(),
        "Generated player highlights JSON actions file"
    );

    Ok(file_path)
}

fn temporary_file_path(file_path: &Path) -> PathBuf {
    let mut temp_path = OsString::from(file_path.as_os_str());
    temp_path.push(".tmp");
    PathBuf::from(temp_path)
}

#[cfg(test)]
mod tests {
    use super::{
        build_player_highlights_actions, delete_json_actions_file,
        generate_player_highlights_json_file, json_actions_file_path, JsonAction,
        PlayerHighlightsOptions,
    };
    use crate::demo::{Game, Perspective};
    use crate::playback::{Action, ActionKind};
    use std::path::Path;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_directory() -> std::path::PathBuf {
        let timestamp_nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_nanos())
            .unwrap_or(0);
        let process_id = std::process::id();
        std::env::temp_dir().join(format!(
            "replaycast_json_actions_test_{process_id}_{timestamp_nanos}"
        ))
    }

    fn kill(tick: u64, killer_slot: u32, victim_slot: u32) -> Action {
        Action {
            kind: ActionKind::Kill,
            tick,
            round_number: 1,
            killer_steam_id: "76561198000000001".to_string(),
            killer_slot: Some(killer_slot),
            victim_steam_id: format!("7656119800000010{victim_slot}"),
            victim_slot: Some(victim_slot),
        }
    }

    fn options<'a>(actions: &'a [Action], game: Game) -> PlayerHighlightsOptions<'a> {
        PlayerHighlightsOptions {
            actions,
            demo_path: Path::new("match.dem"),
            game,
            tick_count: 50_000,
            tickrate: 64.0,
            perspective: Perspective::Player,
            before_delay_seconds: 2,
            next_delay_seconds: 2,
            player_voices_enabled: true,
        }
    }

    fn command(tick: u64, cmd: &str) -> JsonAction {
        JsonAction {
            tick,
            cmd: cmd.to_string(),
        }
    }

    #[test]
    fn appends_json_extension_to_demo_path() {
        let file_path = json_actions_file_path(Path::new("replays/match.dem"));
        assert_eq!(file_path, Path::new("replays/match.dem.json"));
    }

    #[test]
    fn separate_kills_jump_between_sequences() {
        let actions = vec![kill(10_000, 3, 7), kill(1_000, 3, 5)];
        let json_actions = build_player_highlights_actions(&options(&actions, Game::Cs2));

        assert_eq!(
            json_actions,
            vec![
                command(0, "tv_listen_voice_indices -1"),
                command(0, "demo_gototick 872"),
                command(872, "spec_player 4"),
                command(1_128, "demo_gototick 9872"),
                command(9_872, "spec_player 4"),
                command(10_128, "disconnect"),
            ]
        );
    }

    #[test]
    fn overlapping_kills_merge_into_one_sequence() {
        let actions = vec![kill(1_000, 3, 5), kill(1_200, 3, 6)];
        let json_actions = build_player_highlights_actions(&options(&actions, Game::Cs2));

        assert_eq!(
            json_actions,
            vec![
                command(0, "tv_listen_voice_indices -1"),
                command(0, "demo_gototick 872"),
                command(872, "spec_player 4"),
                command(1_328, "disconnect"),
            ]
        );
    }

    #[test]
    fn enemy_perspective_switches_focus_inside_a_sequence() {
        let actions = vec![kill(1_000, 3, 5), kill(1_200, 3, 6)];
        let mut highlight_options = options(&actions, Game::Cs2);
        highlight_options.perspective = Perspective::Enemy;
        highlight_options.player_voices_enabled = false;

        let json_actions = build_player_highlights_actions(&highlight_options);

        assert_eq!(json_actions[0], command(0, "tv_listen_voice_indices 0"));
        assert_eq!(json_actions[2], command(872, "spec_player 6"));
        assert_eq!(json_actions[3], command(1_072, "spec_player 7"));
        assert_eq!(json_actions[4], command(1_328, "disconnect"));
    }

    #[test]
    fn highest_slot_number_does_not_overflow() {
        let actions = vec![kill(1_000, u32::MAX, 5)];
        let json_actions = build_player_highlights_actions(&options(&actions, Game::Cs2));

        assert!(json_actions.contains(&command(872, "spec_player 4294967296")));
    }

    #[test]
    fn csgo_spectates_by_account_id_and_clamps_to_demo_length() {
        let actions = vec![kill(100, 0, 1)];
        let mut highlight_options = options(&actions, Game::Csgo);
        highlight_options.tick_count = 150;

        let json_actions = build_player_highlights_actions(&highlight_options);

        assert_eq!(
            json_actions,
            vec![
                command(0, "tv_listen_voice_indices -1"),
                command(0, "spec_player_by_accountid 39734273"),
                command(150, "disconnect"),
            ]
        );
    }

    #[tokio::test]
    async fn writes_and_deletes_json_actions_file() {
        let temp_directory = unique_temp_directory();
        std::fs::create_dir_all(&temp_directory)
            .expect("Failed to create temporary JSON actions test directory");
        let demo_path = temp_directory.join("match.dem");
        let actions = vec![kill(1_000, 3, 5)];
        let mut highlight_options = options(&actions, Game::Cs2);
        highlight_options.demo_path = demo_path.as_path();

        let file_path = generate_player_highlights_json_file(&highlight_options)
            .await
            .expect("Expected JSON actions file generation to succeed");
        assert_eq!(file_path, json_actions_file_path(&demo_path));

        let raw_json = std::fs::read_to_string(&file_path).expect("Failed to read JSON actions");
        let written: Vec<JsonAction> =
            serde_json::from_str(&raw_json).expect("Failed to parse JSON actions");
        assert_eq!(written, build_player_highlights_actions(&highlight_options));

        delete_json_actions_file(&demo_path)
            .await
            .expect("Expected JSON actions delete to succeed");
        assert!(!file_path.exists());
        delete_json_actions_file(&demo_path)
            .await
            .expect("Expected deleting a missing JSON actions file to succeed");

        std::fs::remove_dir_all(&temp_directory)
            .expect("Failed to remove temporary JSON actions test directory");
    }
}
