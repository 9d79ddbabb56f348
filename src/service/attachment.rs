use std::fs;
use std::path::{Component, Path, PathBuf};

use uuid::Uuid;

use crate::error::{AppError, AppResult};

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "png", "jpg", "jpeg"];

/// Filesystem-backed attachment store. Files live under
/// `<root>/<username>/<uuid>.<ext>`; the returned reference is the path
/// relative to the root and is the only handle callers ever see.
#[derive(Clone)]
pub struct AttachmentStore {
    root: PathBuf,
}

impl AttachmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store raw bytes under the submitting user's directory. The original
    /// filename is only used to check the extension whitelist.
    pub fn save(&self, username: &str, original_filename: &str, bytes: &[u8]) -> AppResult<String> {
        let ext = Path::new(original_filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::UnsupportedFileType(ext));
        }

        let dir = self.root.join(username);
        fs::create_dir_all(&dir)?;

        let filename = format!("{}.{}", Uuid::new_v4(), ext);
        fs::write(dir.join(&filename), bytes)?;

        Ok(format!("{}/{}", username, filename))
    }

    /// Dereference an attachment back to its bytes. References must stay
    /// inside the store root; anything with traversal components is
    /// treated as not found.
    pub fn load(&self, reference: &str) -> AppResult<Vec<u8>> {
        let rel = Path::new(reference);
        let safe = rel
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe {
            return Err(AppError::NotFound("attachment"));
        }

        fs::read(self.root.join(rel)).map_err(|_| AppError::NotFound("attachment"))
    }
}
