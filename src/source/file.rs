//! File-based snapshot source.
//!
//! Replays a saved `/update_data` response body from disk. The file is re-read
//! on every fetch so it can be edited while the client runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{MetricsSnapshot, SnapshotSource};
use crate::error::PollFailure;

/// A source that reads snapshots from a JSON file.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    description: String,
}

impl FileSource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    async fn fetch(&self) -> Result<MetricsSnapshot, PollFailure> {
        let content = tokio::fs::read(&self.path).await?;
        MetricsSnapshot::from_slice(&content)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_file_source_new() {
        let source = FileSource::new("/tmp/update_data.json");
        assert_eq!(source.path(), Path::new("/tmp/update_data.json"));
        assert_eq!(source.description(), "file: /tmp/update_data.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"attack_stats": {{"DDoS": 7}}, "attack_chart": ""}}"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch().await.unwrap();
        assert_eq!(snapshot.attack_stats.get("DDoS"), Some(&7));
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileSource::new("/nonexistent/path/update_data.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PollFailure::Io(_)));
        assert!(err.to_string().contains("Read error"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, PollFailure::Parse(_)));
    }
}
