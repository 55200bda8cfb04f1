use std::path::{Path, PathBuf};

use log::warn;

use crate::errors::MergeError;
use crate::sources::{is_yaml_path, SourceFetcher};

/// Fetches source files from a local directory tree.
///
/// Used by `--local` runs against a checkout of the config repository, where
/// the directory layout mirrors the repository layout.
pub struct LocalFetcher {
    root: PathBuf,
}

impl LocalFetcher {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        LocalFetcher { root: root.into() }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        self.root.join(Path::new(path))
    }
}

impl SourceFetcher for LocalFetcher {
    fn fetch(&self, path: &str) -> Result<Option<String>, MergeError> {
        let full = self.resolve(path);
        match std::fs::read_to_string(&full) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(MergeError::SourceUnavailable(format!(
                "{}: {}",
                full.display(),
                e
            ))),
        }
    }

    fn list_dir(&self, dir: &str) -> Result<Vec<String>, MergeError> {
        let full = self.resolve(dir);
        if !full.is_dir() {
            warn!("Local directory does not exist: {}", full.display());
            return Ok(Vec::new());
        }

        let entries = std::fs::read_dir(&full).map_err(|e| {
            MergeError::SourceUnavailable(format!("{}: {}", full.display(), e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MergeError::SourceUnavailable(format!("{}: {}", full.display(), e))
            })?;
            let file_name = entry.file_name().to_string_lossy().into_owned();
            if entry.path().is_file() && is_yaml_path(&file_name) {
                paths.push(format!("{}/{}", dir.trim_end_matches('/'), file_name));
            }
        }

        // Filesystem listing order is arbitrary; sort for reproducible runs
        paths.sort();
        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_tree() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("proxies")).unwrap();
        std::fs::write(dir.path().join("proxies/b.yaml"), "proxies: []").unwrap();
        std::fs::write(dir.path().join("proxies/a.yaml"), "proxies: []").unwrap();
        std::fs::write(dir.path().join("proxies/c.yml"), "proxies: []").unwrap();
        std::fs::write(dir.path().join("proxies/notes.txt"), "ignore me").unwrap();
        dir
    }

    #[test]
    fn test_list_dir_sorted_yaml_only() {
        let dir = fixture_tree();
        let fetcher = LocalFetcher::new(dir.path());

        let paths = fetcher.list_dir("proxies").unwrap();
        assert_eq!(
            paths,
            vec!["proxies/a.yaml", "proxies/b.yaml", "proxies/c.yml"]
        );
    }

    #[test]
    fn test_list_missing_dir_is_empty() {
        let dir = fixture_tree();
        let fetcher = LocalFetcher::new(dir.path());
        assert!(fetcher.list_dir("rules").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_reads_content() {
        let dir = fixture_tree();
        let fetcher = LocalFetcher::new(dir.path());

        let content = fetcher.fetch("proxies/a.yaml").unwrap().unwrap();
        assert_eq!(content, "proxies: []");
    }

    #[test]
    fn test_fetch_missing_file_is_none() {
        let dir = fixture_tree();
        let fetcher = LocalFetcher::new(dir.path());
        assert!(fetcher.fetch("proxies/missing.yaml").unwrap().is_none());
    }
}
