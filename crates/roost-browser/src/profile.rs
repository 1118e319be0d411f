use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Manages Chrome profile directories. A persistent profile keeps the
/// portal's cookies between runs so an established session survives a
/// restart.
pub struct ProfileManager {
    path: PathBuf,
    is_temporary: bool,
}

impl ProfileManager {
    /// Create a temporary profile that will be deleted on drop
    pub fn temporary() -> Result<Self> {
        let temp_dir = tempfile::tempdir().map_err(|e| Error::Io(e.into()))?;

        let path = temp_dir.keep();

        Ok(Self {
            path,
            is_temporary: true,
        })
    }

    /// Create or use a persistent profile at the given path
    pub fn persistent(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            std::fs::create_dir_all(&path).map_err(Error::Io)?;
        }

        Ok(Self {
            path,
            is_temporary: false,
        })
    }

    /// Create or use a named persistent profile under the app home
    pub fn named(home: &Path, name: &str) -> Result<Self> {
        Self::persistent(Self::profiles_dir(home).join(name))
    }

    /// Directory that holds all named profiles
    pub fn profiles_dir(home: &Path) -> PathBuf {
        home.join("profiles")
    }

    /// Get the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check if this is a temporary profile
    pub fn is_temporary(&self) -> bool {
        self.is_temporary
    }
}

impl Drop for ProfileManager {
    fn drop(&mut self) {
        if self.is_temporary && self.path.exists() {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }
}
