use roost_core::PortalProfile;
use serde::{Deserialize, Serialize};

/// Inbound surface message treated as a logout navigation. Used where
/// logout does not produce a distinct URL transition before the click
/// is observed.
pub const LOGOUT_MESSAGE: &str = "logout";

/// Semantic session event derived from one observed navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavEvent {
    /// The portal landed on the authenticated home page.
    ArrivedHome,
    /// The portal presented the login form.
    ArrivedLoginForm,
    /// The portal hit its logout endpoint.
    LoggedOut,
    /// Anything else; produces no session transition.
    Other,
}

impl NavEvent {
    pub fn as_str(&self) -> &str {
        match self {
            NavEvent::ArrivedHome => "arrived home",
            NavEvent::ArrivedLoginForm => "arrived at login form",
            NavEvent::LoggedOut => "logged out",
            NavEvent::Other => "other",
        }
    }
}

/// Maps raw navigation URLs to semantic session events.
///
/// The rules are an ordered list of (fragment, event) pairs evaluated
/// first-match-wins. The home page URL also contains the login-form
/// fragment, so rule order is load-bearing and kept explicit here
/// rather than spread over a chain of ifs.
pub struct NavClassifier {
    rules: Vec<(String, NavEvent)>,
}

impl NavClassifier {
    pub fn for_portal(portal: &PortalProfile) -> Self {
        Self {
            rules: vec![
                (portal.home_fragment.clone(), NavEvent::ArrivedHome),
                (portal.logout_fragment.clone(), NavEvent::LoggedOut),
                (portal.login_fragment.clone(), NavEvent::ArrivedLoginForm),
            ],
        }
    }

    /// Classify one completed navigation. Pure classification by
    /// case-sensitive substring match; invoked once per transition,
    /// including the very first load.
    pub fn classify(&self, url: &str) -> NavEvent {
        for (fragment, event) in &self.rules {
            if url.contains(fragment.as_str()) {
                tracing::debug!("Classified {} as {}", url, event.as_str());
                return *event;
            }
        }
        NavEvent::Other
    }

    /// Classify an inbound surface message. The literal `"logout"`
    /// payload is treated identically to classifying a logout URL;
    /// every other payload is ignored.
    pub fn classify_message(&self, data: &str) -> Option<NavEvent> {
        if data == LOGOUT_MESSAGE {
            tracing::debug!("Surface message {:?} classified as logout", data);
            Some(NavEvent::LoggedOut)
        } else {
            tracing::debug!("Ignoring surface message {:?}", data);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> NavClassifier {
        NavClassifier::for_portal(&PortalProfile::default())
    }

    #[test]
    fn test_home_page_classifies_as_arrived_home() {
        let event = classifier().classify("https://clica.jp/app/home/default.aspx");
        assert_eq!(event, NavEvent::ArrivedHome);
    }

    #[test]
    fn test_home_wins_over_login_form_fragment() {
        // The home URL contains the login-form fragment as a substring;
        // the first rule must win.
        let url = "https://clica.jp/app/home/default.aspx?tab=1";
        assert_eq!(classifier().classify(url), NavEvent::ArrivedHome);
    }

    #[test]
    fn test_login_form_classifies_as_arrived_login_form() {
        let event = classifier().classify("https://clica.jp/app/default.aspx");
        assert_eq!(event, NavEvent::ArrivedLoginForm);
    }

    #[test]
    fn test_logout_classifies_as_logged_out() {
        let event = classifier().classify("https://clica.jp/app/logout.aspx");
        assert_eq!(event, NavEvent::LoggedOut);
    }

    #[test]
    fn test_logout_wins_over_login_form_fragment() {
        let url = "https://clica.jp/app/logout.aspx?return=default.aspx";
        assert_eq!(classifier().classify(url), NavEvent::LoggedOut);
    }

    #[test]
    fn test_unrelated_url_classifies_as_other() {
        assert_eq!(
            classifier().classify("https://clica.jp/app/"),
            NavEvent::Other
        );
        assert_eq!(
            classifier().classify("https://example.com/unrelated"),
            NavEvent::Other
        );
    }

    #[test]
    fn test_match_is_case_sensitive() {
        assert_eq!(
            classifier().classify("https://clica.jp/app/DEFAULT.ASPX"),
            NavEvent::Other
        );
    }

    #[test]
    fn test_logout_message_matches_logout_url() {
        let classifier = classifier();

        let from_message = classifier.classify_message(LOGOUT_MESSAGE);
        let from_url = classifier.classify("https://clica.jp/app/logout.aspx");

        assert_eq!(from_message, Some(from_url));
    }

    #[test]
    fn test_unknown_message_is_ignored() {
        assert_eq!(classifier().classify_message("ping"), None);
        assert_eq!(classifier().classify_message(""), None);
    }

    #[test]
    fn test_custom_portal_fragments_apply() {
        let mut portal = PortalProfile::default();
        portal.home_fragment = "dashboard".to_string();
        portal.login_fragment = "signin".to_string();
        portal.logout_fragment = "bye".to_string();
        let classifier = NavClassifier::for_portal(&portal);

        assert_eq!(
            classifier.classify("https://portal.example/dashboard"),
            NavEvent::ArrivedHome
        );
        assert_eq!(
            classifier.classify("https://portal.example/signin"),
            NavEvent::ArrivedLoginForm
        );
        assert_eq!(
            classifier.classify("https://portal.example/bye"),
            NavEvent::LoggedOut
        );
        assert_eq!(
            classifier.classify("https://clica.jp/app/default.aspx"),
            NavEvent::Other
        );
    }
}
