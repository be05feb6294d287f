use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Resolves where the campaign core keeps its files.
///
/// Everything lives under a single root so the console can run from a USB
/// stick or a throwaway directory.
#[derive(Debug, Clone)]
pub struct PortablePathManager {
    root: PathBuf,
}

impl PortablePathManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root from `CAMPAIGN_DATA_DIR`, falling back to the current directory.
    pub fn from_env() -> Self {
        let root = std::env::var("CAMPAIGN_DATA_DIR")
            .map(PathBuf::from)
            .or_else(|_| std::env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));
        Self::new(root)
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    /// Data directory under the root (`<root>/data`).
    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    /// Database directory (`<root>/data/db`).
    pub fn db_dir(&self) -> PathBuf {
        self.data_dir().join("db")
    }

    pub fn db_path(&self) -> PathBuf {
        self.db_dir().join("campaign.sqlite")
    }

    /// Creates the data and db directories when missing.
    pub fn init(&self) -> Result<(), std::io::Error> {
        let db_path = self.db_dir();
        if !db_path.exists() {
            info!("Creating db directory: {:?}", db_path);
            fs::create_dir_all(&db_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_creates_db_dir() {
        let dir = tempdir().unwrap();
        let paths = PortablePathManager::new(dir.path());
        paths.init().unwrap();

        assert!(paths.db_dir().is_dir());
        assert_eq!(
            paths.db_path(),
            dir.path().join("data").join("db").join("campaign.sqlite")
        );
    }

    #[test]
    fn test_from_env() {
        temp_env::with_var("CAMPAIGN_DATA_DIR", Some("/srv/campaign"), || {
            let paths = PortablePathManager::from_env();
            assert_eq!(paths.root_dir(), Path::new("/srv/campaign"));
        });
    }
}
