//! Locating the bot's data directory

use std::env;
use std::path::{Path, PathBuf};

/// Folder holding `config/` and `debug/`.
///
/// A bundled executable with a `config` folder next to it keeps its data
/// there; otherwise the current working directory is used.
pub fn get_data_dir() -> PathBuf {
    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .filter(|dir| has_config_dir(dir))
        .unwrap_or_else(|| env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn has_config_dir(dir: &Path) -> bool {
    dir.join("config").is_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_data_dir() {
        let dir = get_data_dir();
        assert!(dir.exists() || dir == PathBuf::from("."));
    }

    #[test]
    fn test_has_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!has_config_dir(dir.path()));
        std::fs::create_dir(dir.path().join("config")).unwrap();
        assert!(has_config_dir(dir.path()));
    }
}
