use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "hilo";

/// Where the game keeps its database and log file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppDirs {
    root: PathBuf,
}

impl AppDirs {
    /// `$HOME/.local/state/hilo`, else the platform data dir, else the working directory
    pub fn resolve() -> Self {
        let root = if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join(APP_NAME)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", APP_NAME) {
            proj_dirs.data_local_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        };
        Self { root }
    }

    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            root: dir.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn db_path(&self) -> PathBuf {
        self.root.join("hilo.db")
    }

    pub fn log_path(&self) -> PathBuf {
        self.root.join("hilo.log")
    }
}
