use std::path::{Path, PathBuf};

/// Why a folder key or filename was rejected before touching the filesystem.
#[derive(Debug, PartialEq, Eq)]
pub enum PathKeyError {
    Empty,
    ContainsSeparator,
    Traversal,
    Hidden,
    ControlCharacter,
}

impl PathKeyError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Name cannot be empty",
            Self::ContainsSeparator => "Invalid name: path separators are not allowed",
            Self::Traversal => "Invalid name: '..' is not allowed",
            Self::Hidden => "Invalid name: names starting with '.' are not allowed",
            Self::ControlCharacter => "Invalid name: control characters are not allowed",
        }
    }
}

/// Validate a single path component (a participant folder key or a filename).
///
/// Folder keys come from participant codes or request paths and end up on the
/// filesystem verbatim, so anything that could escape the uploads root is
/// rejected here.
pub fn safe_component(raw: &str) -> Result<&str, PathKeyError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(PathKeyError::Empty);
    }
    if trimmed.contains('\0') || trimmed.chars().any(|c| c.is_ascii_control()) {
        return Err(PathKeyError::ControlCharacter);
    }
    if trimmed.contains('/') || trimmed.contains('\\') {
        return Err(PathKeyError::ContainsSeparator);
    }
    if trimmed == ".." {
        return Err(PathKeyError::Traversal);
    }
    if trimmed.starts_with('.') {
        return Err(PathKeyError::Hidden);
    }

    Ok(trimmed)
}

/// Maps participant identities and stored filenames to on-disk locations.
///
/// The layout changed over the system's life: files were first stored flat
/// under a folder named after the numeric participant id, then moved to an
/// `images/` subfolder, then the folder key switched to the participant code.
/// Writes always use the current layout; reads and deletes fall back through
/// the older ones so pre-migration files stay reachable.
#[derive(Clone)]
pub struct UploadStorage {
    root: PathBuf,
}

impl UploadStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base folder for a given folder key (participant code or numeric id).
    pub fn base_dir(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }

    /// Canonical write location: `<root>/<code>/images/`.
    pub fn canonical_dir(&self, code: &str) -> PathBuf {
        self.root.join(code).join("images")
    }

    /// The four read/delete candidates for one stored file, in fallback
    /// order: code/images, code flat, id/images, id flat.
    pub fn candidates(&self, code: &str, participant_id: i32, filename: &str) -> [PathBuf; 4] {
        let id_key = participant_id.to_string();
        [
            self.canonical_dir(code).join(filename),
            self.base_dir(code).join(filename),
            self.canonical_dir(&id_key).join(filename),
            self.base_dir(&id_key).join(filename),
        ]
    }

    /// First candidate that exists on disk, if any.
    pub async fn first_existing(
        &self,
        code: &str,
        participant_id: i32,
        filename: &str,
    ) -> Option<PathBuf> {
        for path in self.candidates(code, participant_id, filename) {
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    /// Read-side resolution for the file-serve endpoint, where only a folder
    /// key is known: `<key>/images/<file>` then the flat `<key>/<file>`.
    pub async fn resolve_read(&self, folder_key: &str, filename: &str) -> Option<PathBuf> {
        let images = self.canonical_dir(folder_key).join(filename);
        if tokio::fs::try_exists(&images).await.unwrap_or(false) {
            return Some(images);
        }
        let flat = self.base_dir(folder_key).join(filename);
        if tokio::fs::try_exists(&flat).await.unwrap_or(false) {
            return Some(flat);
        }
        None
    }

    /// Create `<root>/<code>/images/` if absent and return it.
    pub async fn ensure_folder(&self, code: &str) -> std::io::Result<PathBuf> {
        let dir = self.canonical_dir(code);
        tokio::fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    /// Path for staging an in-flight upload before it is renamed into place.
    pub fn staging_path(&self) -> PathBuf {
        self.root.join(format!(".staging-{}", uuid::Uuid::new_v4()))
    }
}
