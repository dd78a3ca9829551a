use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// High-score ledger file under $HOME/.local/state/shadow-rush
    pub fn scores_path() -> Option<PathBuf> {
        let file_name = format!("{}.json", crate::ledger::HIGH_SCORES_KEY);
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("shadow-rush");
            Some(state_dir.join(file_name))
        } else {
            ProjectDirs::from("", "", "shadow-rush")
                .map(|proj_dirs| proj_dirs.data_local_dir().join(file_name))
        }
    }
}
