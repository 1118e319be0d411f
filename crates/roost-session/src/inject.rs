use roost_core::{CredentialRecord, PortalProfile};

use crate::error::Result;

/// Builds the script injected into the portal page after each load.
///
/// The script fills the login form, schedules the postback that
/// submits it, and hooks the logout link so a click reports back
/// through the host message function before the navigation happens.
pub struct ScriptBuilder<'a> {
    portal: &'a PortalProfile,
    message_fn: &'a str,
}

impl<'a> ScriptBuilder<'a> {
    /// `message_fn` is the name of the host function the page calls to
    /// send a message back to us, e.g. a CDP binding.
    pub fn new(portal: &'a PortalProfile, message_fn: &'a str) -> Self {
        Self { portal, message_fn }
    }

    /// Render the autofill script for one credential record.
    ///
    /// Every dynamic value is embedded as a JSON string literal, which
    /// is also a valid JavaScript string literal, so credentials
    /// containing quotes or backslashes cannot break out of the
    /// script.
    pub fn autofill(&self, record: &CredentialRecord) -> Result<String> {
        let user_field = js_string(&self.portal.user_field_id)?;
        let password_field = js_string(&self.portal.password_field_id)?;
        let user_id = js_string(&record.user_id)?;
        let password = js_string(&record.password)?;
        let submit_control = js_string(&self.portal.submit_control_id)?;
        let logout_selector = js_string(&self.portal.logout_link_selector)?;
        let message_fn = self.message_fn;
        let logout_message = js_string(crate::classifier::LOGOUT_MESSAGE)?;
        let delay = self.portal.submit_delay_ms;

        Ok(format!(
            r#"(function() {{
  var userField = document.getElementById({user_field});
  var passwordField = document.getElementById({password_field});
  if (userField && passwordField) {{
    userField.value = {user_id};
    passwordField.value = {password};
    setTimeout(function() {{
      if (typeof __doPostBack === 'function') {{
        __doPostBack({submit_control}, '');
      }}
    }}, {delay});
  }}
  var logoutLink = document.querySelector({logout_selector});
  if (logoutLink && !logoutLink.dataset.roostHooked) {{
    logoutLink.dataset.roostHooked = '1';
    logoutLink.addEventListener('click', function() {{
      window.{message_fn}({logout_message});
    }});
  }}
}})();"#
        ))
    }

    /// Render the logout hook on its own, for pages where the form is
    /// not present but the logout link is.
    pub fn logout_hook(&self) -> Result<String> {
        let logout_selector = js_string(&self.portal.logout_link_selector)?;
        let message_fn = self.message_fn;
        let logout_message = js_string(crate::classifier::LOGOUT_MESSAGE)?;

        Ok(format!(
            r#"(function() {{
  var logoutLink = document.querySelector({logout_selector});
  if (logoutLink && !logoutLink.dataset.roostHooked) {{
    logoutLink.dataset.roostHooked = '1';
    logoutLink.addEventListener('click', function() {{
      window.{message_fn}({logout_message});
    }});
  }}
}})();"#
        ))
    }
}

/// Encode a value as a JavaScript string literal. JSON string encoding
/// is a strict subset of JavaScript string syntax.
fn js_string(value: &str) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_script(record: &CredentialRecord) -> String {
        let portal = PortalProfile::default();
        ScriptBuilder::new(&portal, "__roostPost")
            .autofill(record)
            .unwrap()
    }

    #[test]
    fn test_autofill_embeds_portal_identifiers() {
        let record = CredentialRecord::new("student01", "hunter2", true);
        let script = builder_script(&record);

        assert!(script.contains(r#"getElementById("ctl00_cplPageContent_txtUserID")"#));
        assert!(script.contains(r#"getElementById("ctl00_cplPageContent_txtPassword")"#));
        assert!(script.contains(r#"__doPostBack("ctl00$cplPageContent$LinkButton1", '')"#));
        assert!(script.contains("}, 1000)"));
    }

    #[test]
    fn test_autofill_embeds_credentials_as_string_literals() {
        let record = CredentialRecord::new("student01", "hunter2", true);
        let script = builder_script(&record);

        assert!(script.contains(r#"userField.value = "student01";"#));
        assert!(script.contains(r#"passwordField.value = "hunter2";"#));
    }

    #[test]
    fn test_hostile_password_cannot_escape_the_literal() {
        let password = r#"pa"ss'\word</script>"#;
        let record = CredentialRecord::new("student01", password, true);
        let script = builder_script(&record);

        // The raw password must never appear unescaped.
        assert!(!script.contains(password));
        let escaped = serde_json::to_string(password).unwrap();
        assert!(script.contains(&escaped));
    }

    #[test]
    fn test_logout_hook_posts_logout_message() {
        let record = CredentialRecord::new("student01", "hunter2", true);
        let script = builder_script(&record);

        assert!(script.contains(
            r#"querySelector("a[href=\"https://clica.jp/app/logout.aspx\"]")"#
        ));
        assert!(script.contains(r#"window.__roostPost("logout");"#));
    }

    #[test]
    fn test_standalone_logout_hook() {
        let portal = PortalProfile::default();
        let script = ScriptBuilder::new(&portal, "__roostPost")
            .logout_hook()
            .unwrap();

        assert!(script.contains("querySelector"));
        assert!(script.contains(r#"window.__roostPost("logout");"#));
        assert!(!script.contains("getElementById"));
    }

    #[test]
    fn test_custom_submit_delay_is_used() {
        let mut portal = PortalProfile::default();
        portal.submit_delay_ms = 250;
        let record = CredentialRecord::new("student01", "hunter2", true);
        let script = ScriptBuilder::new(&portal, "__roostPost")
            .autofill(&record)
            .unwrap();

        assert!(script.contains("}, 250)"));
        assert!(!script.contains("}, 1000)"));
    }
}
