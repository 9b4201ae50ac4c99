//! Artifact publishers
//!
//! Defines the publisher trait and the local-directory implementation.
//! The S3 implementation lives in `s3_client.rs`.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::PublishMode;
use crate::error::PublishError;

use super::types::{ArtifactName, RequestOrigin};

/// Route prefix under which locally published files are served
pub const LOCAL_FILES_ROUTE: &str = "/files";

/// Stores a finished PDF and hands back a URL for it
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Which backend this is
    fn mode(&self) -> PublishMode;

    /// Store `bytes` under `name` and return the download URL.
    ///
    /// `origin` is the scheme/host of the triggering request, when known.
    async fn publish(
        &self,
        name: &ArtifactName,
        bytes: Vec<u8>,
        origin: Option<&RequestOrigin>,
    ) -> Result<String, PublishError>;
}

/// Ephemeral publisher writing into a local directory
///
/// Files are never cleaned up here; something external has to reap them.
#[derive(Debug, Clone)]
pub struct LocalPublisher {
    dir: PathBuf,
    public_base_url: Option<String>,
}

impl LocalPublisher {
    /// Create the publisher, making sure the directory exists
    pub async fn new(dir: impl AsRef<Path>, public_base_url: Option<String>) -> Result<Self, PublishError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).await?;
        tracing::info!("Publishing artifacts to local directory {}", dir.display());
        Ok(Self {
            dir,
            public_base_url,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// URL for a stored artifact.
    ///
    /// Configured base URL first, then the request's own origin, then a
    /// bare relative path.
    pub fn url_for(&self, name: &ArtifactName, origin: Option<&RequestOrigin>) -> String {
        let path = format!("{}/{}", LOCAL_FILES_ROUTE, name);
        match (&self.public_base_url, origin) {
            (Some(base), _) => format!("{}{}", base, path),
            (None, Some(origin)) => format!("{}{}", origin.base_url(), path),
            (None, None) => path,
        }
    }
}

#[async_trait]
impl Publisher for LocalPublisher {
    fn mode(&self) -> PublishMode {
        PublishMode::Local
    }

    async fn publish(
        &self,
        name: &ArtifactName,
        bytes: Vec<u8>,
        origin: Option<&RequestOrigin>,
    ) -> Result<String, PublishError> {
        let path = self.dir.join(name.as_str());
        let temp_path = self
            .dir
            .join(format!(".{}.tmp.{}", name, Uuid::new_v4()));

        if let Err(e) = write_then_rename(&temp_path, &path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(e.into());
        }

        tracing::info!(key = %name, bytes = bytes.len(), "Stored artifact locally");
        Ok(self.url_for(name, origin))
    }
}

/// Write under a temporary name, then rename into place
async fn write_then_rename(temp_path: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(temp_path).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);
    fs::rename(temp_path, path).await
}

/// Mock publisher for testing
#[cfg(test)]
#[derive(Default)]
pub struct MockPublisher {
    pub published: tokio::sync::Mutex<Vec<(ArtifactName, Vec<u8>)>>,
    pub fail: bool,
}

#[cfg(test)]
#[async_trait]
impl Publisher for MockPublisher {
    fn mode(&self) -> PublishMode {
        PublishMode::S3
    }

    async fn publish(
        &self,
        name: &ArtifactName,
        bytes: Vec<u8>,
        _origin: Option<&RequestOrigin>,
    ) -> Result<String, PublishError> {
        if self.fail {
            return Err(PublishError::Upload {
                key: name.to_string(),
                reason: "mock failure".to_string(),
            });
        }
        self.published.lock().await.push((name.clone(), bytes));
        Ok(format!("https://storage.test/{}?X-Amz-Expires=259200", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_local_publish_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path(), None).await.unwrap();
        let name = ArtifactName::from_millis(1);

        let url = publisher
            .publish(&name, b"%PDF-1.5 test".to_vec(), None)
            .await
            .unwrap();

        assert_eq!(url, "/files/barcodes_1.pdf");
        let stored = std::fs::read(temp_dir.path().join("barcodes_1.pdf")).unwrap();
        assert_eq!(stored, b"%PDF-1.5 test");

        // no temporary files left behind
        let entries = std::fs::read_dir(temp_dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_failed_publish_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let publisher = LocalPublisher::new(temp_dir.path(), None).await.unwrap();
        let name = ArtifactName::from_millis(3);

        // a non-empty directory in the way makes the final rename fail
        let blocker = temp_dir.path().join(name.as_str());
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep"), b"x").unwrap();

        let result = publisher.publish(&name, b"%PDF-1.5".to_vec(), None).await;
        assert!(matches!(result, Err(PublishError::Io(_))));

        let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with('.'))
            .collect();
        assert!(leftovers.is_empty(), "leftovers: {:?}", leftovers);
    }

    #[tokio::test]
    async fn test_local_publish_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("labels").join("out");
        let publisher = LocalPublisher::new(&nested, None).await.unwrap();
        publisher
            .publish(&ArtifactName::from_millis(2), vec![1, 2, 3], None)
            .await
            .unwrap();
        assert!(nested.join("barcodes_2.pdf").exists());
    }

    #[tokio::test]
    async fn test_local_url_variants() {
        let temp_dir = TempDir::new().unwrap();
        let name = ArtifactName::from_millis(7);
        let origin = RequestOrigin::new("http", "localhost:3000");

        let bare = LocalPublisher::new(temp_dir.path(), None).await.unwrap();
        assert_eq!(bare.url_for(&name, None), "/files/barcodes_7.pdf");
        assert_eq!(
            bare.url_for(&name, Some(&origin)),
            "http://localhost:3000/files/barcodes_7.pdf"
        );

        let based = LocalPublisher::new(temp_dir.path(), Some("https://cdn.example.com".into()))
            .await
            .unwrap();
        assert_eq!(
            based.url_for(&name, Some(&origin)),
            "https://cdn.example.com/files/barcodes_7.pdf"
        );
    }
}
