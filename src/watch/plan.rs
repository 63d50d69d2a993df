use crate::demo::Game;
use crate::error::{LaunchError, Result};
use crate::playback::{Action, PlaybackMatch};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HighlightsMode<'a> {
    BuiltIn,
    Custom(&'a PlaybackMatch),
}

impl HighlightsMode<'_> {
    pub fn label(&self) -> &'static str {
        match self {
            HighlightsMode::BuiltIn => "built-in",
            HighlightsMode::Custom(_) => "custom",
        }
    }
}

pub fn assert_player_has_actions(playback_match: &PlaybackMatch) -> Result<()> {
    if playback_match.actions.is_empty() {
        return Err(LaunchError::NoKillsFound);
    }

    Ok(())
}

pub fn assert_players_slots_are_defined(actions: &[Action]) -> Result<()> {
    match actions.iter().find(|action| !action.has_player_slots()) {
        Some(action) => Err(LaunchError::MissingPlayerSlot { tick: action.tick }),
        None => Ok(()),
    }
}

// CS2 has no built-in highlights.
pub fn resolve_highlights_mode(
    game: Game,
    use_custom_highlights: bool,
    playback_match: Option<&PlaybackMatch>,
) -> Result<HighlightsMode<'_>> {
    match game {
        Game::Csgo => {
            if !use_custom_highlights {
                return Ok(HighlightsMode::BuiltIn);
            }

            match playback_match {
                None => Ok(HighlightsMode::BuiltIn),
                Some(playback_match) => {
                    assert_player_has_actions(playback_match)?;
                    Ok(HighlightsMode::Custom(playback_match))
                }
            }
        }
        Game::Cs2 => {
            let playback_match = playback_match.ok_or(LaunchError::NoKillsFound)?;
            assert_player_has_actions(playback_match)?;
            assert_players_slots_are_defined(&playback_match.actions)?;
            Ok(HighlightsMode::Custom(playback_match))
        }
    }
}
