use roost_core::CredentialRecord;
use serde::{Deserialize, Serialize};

use crate::tracker::{AutoLoginTracker, SessionPhase};

/// Which top-level surface the user should be looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gate {
    /// Credentials exist; show the portal itself.
    Main,
    /// No credentials; show the login/settings flow.
    AuthFlow,
}

/// Point-in-time projection of session state, suitable for display or
/// JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub has_credentials: bool,
    pub auto_login_enabled: bool,
    pub phase: SessionPhase,
    pub attempts: u32,
}

impl SessionStatus {
    /// Project the status of a live tracker.
    pub fn project(record: Option<&CredentialRecord>, tracker: &AutoLoginTracker) -> Self {
        Self {
            has_credentials: record.is_some(),
            auto_login_enabled: record.is_some_and(|r| r.auto_login_enabled),
            phase: tracker.phase(),
            attempts: tracker.attempts(),
        }
    }

    /// Status with no session running, from stored state alone.
    pub fn at_rest(record: Option<&CredentialRecord>) -> Self {
        Self {
            has_credentials: record.is_some(),
            auto_login_enabled: record.is_some_and(|r| r.auto_login_enabled),
            phase: SessionPhase::Unknown,
            attempts: 0,
        }
    }

    /// Stored credentials decide the gate, not the live phase. A user
    /// with saved credentials goes straight to the portal even before
    /// any navigation has been observed.
    pub fn gate(&self) -> Gate {
        if self.has_credentials {
            Gate::Main
        } else {
            Gate::AuthFlow
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.phase == SessionPhase::Authenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::NavEvent;

    fn record(enabled: bool) -> CredentialRecord {
        CredentialRecord::new("student01", "hunter2", enabled)
    }

    #[test]
    fn test_gate_is_main_with_credentials() {
        let record = record(true);
        let status = SessionStatus::at_rest(Some(&record));
        assert_eq!(status.gate(), Gate::Main);
    }

    #[test]
    fn test_gate_is_main_even_with_auto_login_disabled() {
        let record = record(false);
        let status = SessionStatus::at_rest(Some(&record));
        assert_eq!(status.gate(), Gate::Main);
        assert!(!status.auto_login_enabled);
    }

    #[test]
    fn test_gate_is_auth_flow_without_credentials() {
        let status = SessionStatus::at_rest(None);
        assert_eq!(status.gate(), Gate::AuthFlow);
        assert!(!status.has_credentials);
    }

    #[test]
    fn test_at_rest_has_unknown_phase() {
        let status = SessionStatus::at_rest(None);
        assert_eq!(status.phase, SessionPhase::Unknown);
        assert_eq!(status.attempts, 0);
        assert!(!status.is_logged_in());
    }

    #[test]
    fn test_project_reflects_tracker_state() {
        let mut tracker = AutoLoginTracker::new(Some(record(true)));
        tracker.observe(NavEvent::ArrivedLoginForm);
        tracker.observe(NavEvent::ArrivedLoginForm);

        let stored = record(true);
        let status = SessionStatus::project(Some(&stored), &tracker);

        assert!(status.has_credentials);
        assert!(status.auto_login_enabled);
        assert_eq!(status.phase, SessionPhase::Unauthenticated);
        assert_eq!(status.attempts, 2);
        assert!(!status.is_logged_in());
    }

    #[test]
    fn test_is_logged_in_after_home_arrival() {
        let mut tracker = AutoLoginTracker::new(Some(record(true)));
        tracker.observe(NavEvent::ArrivedHome);

        let stored = record(true);
        let status = SessionStatus::project(Some(&stored), &tracker);
        assert!(status.is_logged_in());
    }

    #[test]
    fn test_serializes_with_snake_case_fields() {
        let status = SessionStatus::at_rest(None);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["has_credentials"], serde_json::json!(false));
        assert_eq!(json["phase"], serde_json::json!("unknown"));
        assert_eq!(json["attempts"], serde_json::json!(0));
    }
}
