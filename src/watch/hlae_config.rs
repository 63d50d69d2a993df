use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::launcher::HLAE_CONFIG_NAME;

const ANONYMIZED_SLOT_COUNT: u32 = 12;

// `<demo>/../../cfg/hlae.cfg`, i.e. the `cfg` folder next to the demo's parent folder.
pub fn hlae_config_path(demo_path: &Path) -> PathBuf {
    let demo_directory = demo_path
        .parent()
        .filter(|directory| !directory.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let game_directory = demo_directory
        .parent()
        .filter(|directory| !directory.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| demo_directory.join(".."));

    game_directory
        .join("cfg")
        .join(format!("{HLAE_CONFIG_NAME}.cfg"))
}

pub fn build_anonymization_config(steam_id: &str) -> String {
    let mut lines = vec!["cl_draw_only_deathnotices 1".to_string()];
    lines.extend((0..ANONYMIZED_SLOT_COUNT).map(|user_id| {
        format!(
            "mirv_replace_name byUserId add {user_id} \"Player_{}\"",
            user_id + 1
        )
    }));
    lines.push(format!("mirv_replace_name byXuid add x{steam_id} \"Suspect\""));

    lines.join("\n")
}

pub async fn write_hlae_config(demo_path: &Path, steam_id: &str) -> Result<PathBuf> {
    let config_path = hlae_config_path(demo_path);
    if let Some(config_directory) = config_path.parent() {
        tokio::fs::create_dir_all(config_directory).await?;
    }

    tokio::fs::write(&config_path, build_anonymization_config(steam_id)).await?;
    tracing::info!(config_path = %config_path.display(), "Wrote HLAE anonymization config");

    Ok(config_path)
}
