use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LaunchError>;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No kills found for this player")]
    NoKillsFound,

    #[error("Player slot is missing for the action at tick {tick}")]
    MissingPlayerSlot { tick: u64 },

    #[error("Unsupported demo file '{}'", .path.display())]
    UnsupportedDemo { path: PathBuf },

    #[error("{program} executable was not found, tried: {}", format_candidates(.candidates))]
    ExecutableNotFound {
        program: &'static str,
        candidates: Vec<PathBuf>,
    },

    #[error("HLAE folder is not configured")]
    HlaeFolderNotConfigured,

    #[error("Failed to parse settings '{}': {source}", .path.display())]
    InvalidSettings {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse analysis file '{}': {source}", .path.display())]
    InvalidAnalysis {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_candidates(candidates: &[PathBuf]) -> String {
    if candidates.is_empty() {
        return "<none>".to_string();
    }

    candidates
        .iter()
        .map(|candidate| format!("'{}'", candidate.display()))
        .collect::<Vec<_>>()
        .join(", ")
}
