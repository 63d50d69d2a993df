mod analysis;
mod model;

use async_trait::async_trait;

use crate::error::Result;

pub use analysis::{analysis_sidecar_path, AnalysisFileRepository};
pub use model::{Action, ActionKind, PlaybackMatch, PlaybackMatchQuery, WatchType};

#[async_trait]
pub trait PlaybackMatchRepository: Send + Sync {
    async fn get_playback_match(&self, query: &PlaybackMatchQuery) -> Result<Option<PlaybackMatch>>;
}
