use directories::ProjectDirs;
use std::path::PathBuf;

pub const PREFS_FILE_NAME: &str = "user_prefs.json";
pub const BOOTSTRAP_FILE_NAME: &str = "peercheck_bootstrap.json";

/// Base directory used until the user picks another one.
pub fn default_base_dir() -> PathBuf {
    // org = "peercheck", app = "PeerCheck"
    if let Some(pd) = ProjectDirs::from("com", "peercheck", "PeerCheck") {
        pd.data_dir().to_path_buf()
    } else {
        std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
    }
}

/// The bootstrap record sits beside the executable, never under the base dir.
pub fn default_bootstrap_file() -> PathBuf {
    let dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));
    dir.join(BOOTSTRAP_FILE_NAME)
}
