use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// File name of the portal override within the roost home directory.
pub const PORTAL_FILE: &str = "portal.json";

/// Description of the fixed external web application.
///
/// Everything the classifier and the injected script depend on lives
/// here, so pointing roost at a different portal (or a test double) is
/// a config file away; no fragment or element id is hardcoded anywhere
/// else. Defaults describe the portal the tool was built against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortalProfile {
    /// Entry URL loaded on a fresh surface.
    pub base_url: String,
    /// Path fragment of the authenticated landing page.
    pub home_fragment: String,
    /// Path fragment of the login form. The landing page also contains
    /// this fragment; classification order disambiguates.
    pub login_fragment: String,
    /// Path fragment of the logout endpoint.
    pub logout_fragment: String,
    /// DOM id of the user-ID input on the login form.
    pub user_field_id: String,
    /// DOM id of the password input on the login form.
    pub password_field_id: String,
    /// Postback event target of the login submit control.
    pub submit_control_id: String,
    /// CSS selector of the logout link, used to hook logout clicks.
    pub logout_link_selector: String,
    /// Delay in milliseconds between filling the form and firing the
    /// postback.
    pub submit_delay_ms: u64,
    /// Account signup page, offered next to credential entry.
    pub signup_url: String,
    /// Password reminder page, offered next to credential entry.
    pub password_reminder_url: String,
}

impl Default for PortalProfile {
    fn default() -> Self {
        Self {
            base_url: "https://clica.jp/app/".to_string(),
            home_fragment: "home/default.aspx".to_string(),
            login_fragment: "default.aspx".to_string(),
            logout_fragment: "logout.aspx".to_string(),
            user_field_id: "ctl00_cplPageContent_txtUserID".to_string(),
            password_field_id: "ctl00_cplPageContent_txtPassword".to_string(),
            submit_control_id: "ctl00$cplPageContent$LinkButton1".to_string(),
            logout_link_selector: r#"a[href="https://clica.jp/app/logout.aspx"]"#.to_string(),
            submit_delay_ms: 1000,
            signup_url: "https://clica.jp/app/signup/user_entry.aspx".to_string(),
            password_reminder_url: "https://clica.jp/app/remind/_sub/remind.aspx".to_string(),
        }
    }
}

impl PortalProfile {
    /// Load the profile from a JSON override file. A missing file
    /// yields the defaults; fields omitted from the file keep theirs.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No portal override at {}; using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let profile: Self = serde_json::from_str(&contents)?;
        profile.validate()?;

        tracing::debug!("Loaded portal override from {}", path.display());
        Ok(profile)
    }

    /// Write the profile as an editable override template.
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Check the fields the classifier and injector cannot work
    /// without.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::InvalidPortal(format!("base_url: {}", e)))?;

        for (name, value) in [
            ("home_fragment", &self.home_fragment),
            ("login_fragment", &self.login_fragment),
            ("logout_fragment", &self.logout_fragment),
        ] {
            if value.is_empty() {
                return Err(Error::InvalidPortal(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}
