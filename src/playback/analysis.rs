use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::model::{Action, ActionKind, PlaybackMatch, PlaybackMatchQuery, WatchType};
use super::PlaybackMatchRepository;
use crate::error::{LaunchError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MatchAnalysis {
    pub(crate) tickrate: f64,
    pub(crate) tick_count: u64,
    #[serde(default)]
    pub(crate) kills: Vec<AnalysisKill>,
    #[serde(default)]
    pub(crate) damages: Vec<AnalysisDamage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisKill {
    pub(crate) tick: u64,
    #[serde(default)]
    pub(crate) round_number: u32,
    pub(crate) killer_steam_id: String,
    #[serde(default)]
    pub(crate) killer_slot: Option<u32>,
    #[serde(default)]
    pub(crate) killer_side: Option<u8>,
    pub(crate) victim_steam_id: String,
    #[serde(default)]
    pub(crate) victim_slot: Option<u32>,
    #[serde(default)]
    pub(crate) victim_side: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AnalysisDamage {
    pub(crate) tick: u64,
    #[serde(default)]
    pub(crate) round_number: u32,
    pub(crate) attacker_steam_id: String,
    #[serde(default)]
    pub(crate) attacker_slot: Option<u32>,
    #[serde(default)]
    pub(crate) attacker_side: Option<u8>,
    pub(crate) victim_steam_id: String,
    #[serde(default)]
    pub(crate) victim_slot: Option<u32>,
    #[serde(default)]
    pub(crate) victim_side: Option<u8>,
}

fn is_same_side(left: Option<u8>, right: Option<u8>) -> bool {
    matches!((left, right), (Some(left), Some(right)) if left == right)
}

impl AnalysisKill {
    fn is_highlight_for(&self, steam_id: &str) -> bool {
        self.killer_steam_id == steam_id
            && self.victim_steam_id != steam_id
            && !is_same_side(self.killer_side, self.victim_side)
    }
}

impl AnalysisDamage {
    fn is_highlight_for(&self, steam_id: &str) -> bool {
        self.attacker_steam_id == steam_id
            && self.victim_steam_id != steam_id
            && !is_same_side(self.attacker_side, self.victim_side)
    }
}

pub fn analysis_sidecar_path(demo_path: &Path) -> PathBuf {
    demo_path.with_extension("analysis.json")
}

pub(crate) fn highlight_actions(
    analysis: &MatchAnalysis,
    steam_id: &str,
    include_damages: bool,
) -> Vec<Action> {
    let mut actions: Vec<Action> = analysis
        .kills
        .iter()
        .filter(|kill| kill.is_highlight_for(steam_id))
        .map(|kill| Action {
            kind: ActionKind::Kill,
            tick: kill.tick,
            round_number: kill.round_number,
            killer_steam_id: kill.killer_steam_id.clone(),
            killer_slot: kill.killer_slot,
            victim_steam_id: kill.victim_steam_id.clone(),
            victim_slot: kill.victim_slot,
        })
        .collect();

    if include_damages {
        let damages = analysis
            .damages
            .iter()
            .filter(|damage| damage.is_highlight_for(steam_id))
            .filter(|damage| {
                !actions.iter().any(|kill| {
                    kill.tick == damage.tick && kill.victim_steam_id == damage.victim_steam_id
                })
            })
            .map(|damage| Action {
                kind: ActionKind::Damage,
                tick: damage.tick,
                round_number: damage.round_number,
                killer_steam_id: damage.attacker_steam_id.clone(),
                killer_slot: damage.attacker_slot,
                victim_steam_id: damage.victim_steam_id.clone(),
                victim_slot: damage.victim_slot,
            })
            .collect::<Vec<_>>();
        actions.extend(damages);
    }

    actions.sort_by_key(|action| action.tick);
    actions
}

pub(crate) async fn read_match_analysis(demo_path: &Path) -> Result<Option<MatchAnalysis>> {
    let sidecar_path = analysis_sidecar_path(demo_path);
    let raw_json = match tokio::fs::read_to_string(&sidecar_path).await {
        Ok(content) => content,
        Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };

    let analysis = serde_json::from_str::<MatchAnalysis>(&raw_json).map_err(|source| {
        LaunchError::InvalidAnalysis {
            path: sidecar_path.clone(),
            source,
        }
    })?;

    Ok(Some(analysis))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct AnalysisFileRepository;

#[async_trait]
impl PlaybackMatchRepository for AnalysisFileRepository {
    async fn get_playback_match(&self, query: &PlaybackMatchQuery) -> Result<Option<PlaybackMatch>> {
        let Some(analysis) = read_match_analysis(&query.demo_path).await? else {
            tracing::debug!(
                demo_path = %query.demo_path.display(),
                "No analysis sidecar found for demo"
            );
            return Ok(None);
        };

        let actions = match query.watch_type {
            WatchType::Highlights => {
                highlight_actions(&analysis, &query.steam_id, query.include_damages)
            }
        };

        Ok(Some(PlaybackMatch {
            demo_path: query.demo_path.clone(),
            tickrate: analysis.tickrate,
            tick_count: analysis.tick_count,
            actions,
        }))
    }
}
