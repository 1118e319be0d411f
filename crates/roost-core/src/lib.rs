pub mod credentials;
pub mod error;
pub mod portal;
pub mod store;

pub use credentials::{CredentialPatch, CredentialRecord};
pub use error::{Error, Result};
pub use portal::{PORTAL_FILE, PortalProfile};
pub use store::CredentialFile;

use std::path::PathBuf;

/// Directory under the user's home holding roost state: the credential
/// file, the portal override, and Chrome profiles.
pub const ROOST_DIR: &str = ".roost";

/// Default roost home (`~/.roost`), unless the caller overrides it.
pub fn default_home() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(ROOST_DIR))
}
