use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::demo::Perspective;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Kill,
    Damage,
}

// One moment worth replaying. For damages the killer fields hold the attacker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub kind: ActionKind,
    pub tick: u64,
    pub round_number: u32,
    pub killer_steam_id: String,
    pub killer_slot: Option<u32>,
    pub victim_steam_id: String,
    pub victim_slot: Option<u32>,
}

impl Action {
    pub fn focus_steam_id(&self, perspective: Perspective) -> &str {
        match perspective {
            Perspective::Player => &self.killer_steam_id,
            Perspective::Enemy => &self.victim_steam_id,
        }
    }

    pub fn focus_slot(&self, perspective: Perspective) -> Option<u32> {
        match perspective {
            Perspective::Player => self.killer_slot,
            Perspective::Enemy => self.victim_slot,
        }
    }

    pub fn has_player_slots(&self) -> bool {
        self.killer_slot.is_some() && self.victim_slot.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackMatch {
    pub demo_path: PathBuf,
    pub tickrate: f64,
    pub tick_count: u64,
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchType {
    Highlights,
}

#[derive(Debug, Clone)]
pub struct PlaybackMatchQuery {
    pub demo_path: PathBuf,
    pub steam_id: String,
    pub watch_type: WatchType,
    pub include_damages: bool,
}
