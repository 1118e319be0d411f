use crate::Result;
use crate::credentials::{CredentialPatch, CredentialRecord};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File name of the single credential record, matching the original
/// storage key.
const STORE_FILE: &str = "loginData.json";

/// JSON-file persistence for the single credential record.
///
/// The store holds at most one record. Every read path is lenient: a
/// missing, unreadable or malformed file reads as "no credentials", so
/// a corrupt store degrades to manual login instead of a crash.
pub struct CredentialFile {
    path: PathBuf,
}

impl CredentialFile {
    /// Store rooted in the given roost home directory.
    pub fn in_home(home: &Path) -> Self {
        Self {
            path: home.join(STORE_FILE),
        }
    }

    /// Store backed by an explicit file path.
    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether a record is currently stored. Presence of the file is
    /// enough for the top-level gate; contents are checked on load.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the stored record. Missing, unreadable and malformed files
    /// all read as `None`; failures are logged, never propagated.
    pub fn load(&self) -> Option<CredentialRecord> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(
                    "Malformed credential record in {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    /// Overwrite the stored record. Last writer wins.
    pub fn save(&self, record: &CredentialRecord) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(record)?;
        std::fs::write(&self.path, contents)?;

        tracing::debug!("Saved credential record to {}", self.path.display());
        Ok(())
    }

    /// Remove the stored record. A missing file already counts as
    /// cleared.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!("Cleared credential record at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Merge a partial record over the stored one. When nothing is
    /// stored the patch is a no-op, not an error.
    pub fn patch(&self, patch: CredentialPatch) -> Result<()> {
        let Some(mut record) = self.load() else {
            tracing::debug!("No stored credentials; patch is a no-op");
            return Ok(());
        };

        patch.apply(&mut record);
        self.save(&record)
    }
}
