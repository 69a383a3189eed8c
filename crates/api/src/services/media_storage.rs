//! Media files on local disk.
//!
//! Uploads are stored as `<storage_dir>/YYYY/MM/<uuid>.<ext>`; the database
//! keeps the path relative to the storage directory.

use std::path::{Path, PathBuf};

use chrono::{Datelike, Utc};
use persistence::repositories::NewMedia;
use shared::crypto::sha256_hex;
use uuid::Uuid;

const GENERIC_MIME: &str = "application/octet-stream";
const MAX_EXTENSION_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes an upload and returns the row to insert for it.
    pub async fn store(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> std::io::Result<NewMedia> {
        let now = Utc::now();
        let extension = extension_of(original_name);
        let file_name = match &extension {
            Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
            None => Uuid::new_v4().to_string(),
        };
        let relative = format!("{:04}/{:02}/{}", now.year(), now.month(), file_name);

        let absolute = self.root.join(&relative);
        if let Some(dir) = absolute.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(&absolute, bytes).await?;

        tracing::debug!(path = %relative, size = bytes.len(), "Media file written");

        Ok(NewMedia {
            file_name,
            original_name: display_name(original_name),
            mime_type: resolve_mime(original_name, content_type),
            size_bytes: bytes.len() as i64,
            checksum: sha256_hex(bytes),
            path: relative,
        })
    }

    /// Removes a stored file. A missing file is not an error.
    pub async fn remove(&self, relative: &str) {
        let Some(path) = self.resolve(relative) else {
            tracing::warn!(path = %relative, "Refusing to remove media outside storage");
            return;
        };
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %relative, error = %e, "Failed to remove media file"),
        }
    }

    fn resolve(&self, relative: &str) -> Option<PathBuf> {
        let path = Path::new(relative);
        let safe = path
            .components()
            .all(|c| matches!(c, std::path::Component::Normal(_)));
        safe.then(|| self.root.join(path))
    }
}

/// Lowercased alphanumeric extension of the uploaded name, if sane.
fn extension_of(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .filter(|e| !e.is_empty() && e.len() <= MAX_EXTENSION_LEN)
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// The client's name without any directory part.
fn display_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() {
        "upload".to_string()
    } else {
        base.to_string()
    }
}

/// Declared content type, or a guess from the file name when the client sent
/// nothing useful.
fn resolve_mime(name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() && mime != GENERIC_MIME => mime.to_ascii_lowercase(),
        _ => mime_guess::from_path(name)
            .first_raw()
            .unwrap_or(GENERIC_MIME)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("Banner.JPG"), Some("jpg".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_of("README"), None);
        assert_eq!(extension_of("evil.p/hp"), None);
    }

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name("C:\\Users\\me\\photo.png"), "photo.png");
        assert_eq!(display_name("../../etc/passwd"), "passwd");
        assert_eq!(display_name("  "), "upload");
    }

    #[test]
    fn test_resolve_mime() {
        assert_eq!(resolve_mime("a.png", Some("image/png")), "image/png");
        assert_eq!(resolve_mime("a.png", Some(GENERIC_MIME)), "image/png");
        assert_eq!(resolve_mime("clip.mp4", None), "video/mp4");
        assert_eq!(resolve_mime("blob", None), GENERIC_MIME);
    }

    #[test]
    fn test_resolve_rejects_traversal() {
        let storage = MediaStorage::new("/srv/media");
        assert!(storage.resolve("../secret").is_none());
        assert!(storage.resolve("/etc/passwd").is_none());
        assert_eq!(
            storage.resolve("2026/10/x.png"),
            Some(PathBuf::from("/srv/media/2026/10/x.png"))
        );
    }

    #[tokio::test]
    async fn test_store_and_remove() {
        let root = std::env::temp_dir().join(format!("media-test-{}", Uuid::new_v4()));
        let storage = MediaStorage::new(&root);

        let media = storage
            .store("banner.png", Some("image/png"), b"png-bytes")
            .await
            .unwrap();
        assert_eq!(media.original_name, "banner.png");
        assert_eq!(media.size_bytes, 9);
        assert_eq!(media.checksum, sha256_hex(b"png-bytes"));
        assert!(media.path.ends_with(".png"));
        assert!(root.join(&media.path).exists());

        storage.remove(&media.path).await;
        assert!(!root.join(&media.path).exists());
        storage.remove(&media.path).await;

        let _ = std::fs::remove_dir_all(&root);
    }
}
