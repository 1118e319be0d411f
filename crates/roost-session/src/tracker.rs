use roost_core::CredentialRecord;
use serde::{Deserialize, Serialize};

use crate::classifier::NavEvent;

/// Number of consecutive login-form arrivals tolerated while auto-login
/// is enabled before stored credentials are treated as bad and purged.
pub const MAX_LOGIN_ATTEMPTS: u32 = 10;

/// Coarse authentication phase inferred from navigation events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No navigation observed yet.
    Unknown,
    /// Last observed navigation reached the home page.
    Authenticated,
    /// Last observed navigation reached the login form or logout.
    Unauthenticated,
}

/// Side effect requested by the tracker. The tracker itself never
/// touches the credential store or the surface; the caller performs
/// these in order after each [`AutoLoginTracker::observe`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Delete the stored credential record entirely.
    PurgeCredentials,
    /// Persist `autoLoginEnabled = false` on the stored record,
    /// leaving the identity fields intact.
    DisableAutoLogin,
    /// Tell the user that repeated automatic logins failed and their
    /// stored credentials were discarded.
    NotifyLockout,
    /// Session ended deliberately; surface the login flow.
    ShowAuthFlow,
}

/// Tracks authentication phase and the auto-login attempt counter
/// across a stream of navigation events.
///
/// Transitions are pure: `observe` mutates only this struct and
/// returns the effects the caller must apply. The in-memory record is
/// kept in sync with what the effects will do to the store, so
/// [`should_autofill`](AutoLoginTracker::should_autofill) stays
/// truthful between observations.
#[derive(Debug)]
pub struct AutoLoginTracker {
    phase: SessionPhase,
    attempts: u32,
    record: Option<CredentialRecord>,
}

impl AutoLoginTracker {
    pub fn new(record: Option<CredentialRecord>) -> Self {
        Self {
            phase: SessionPhase::Unknown,
            attempts: 0,
            record,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn record(&self) -> Option<&CredentialRecord> {
        self.record.as_ref()
    }

    /// Replace the in-memory record, e.g. after the store changed
    /// underneath a long-lived tracker.
    pub fn set_record(&mut self, record: Option<CredentialRecord>) {
        self.record = record;
    }

    /// The record to fill into the login form, if auto-login should run.
    pub fn should_autofill(&self) -> Option<&CredentialRecord> {
        self.record.as_ref().filter(|r| r.auto_login_enabled)
    }

    fn auto_login_enabled(&self) -> bool {
        self.record.as_ref().is_some_and(|r| r.auto_login_enabled)
    }

    /// Feed one navigation event through the state machine and collect
    /// the effects the caller must perform.
    pub fn observe(&mut self, event: NavEvent) -> Vec<Effect> {
        match event {
            NavEvent::ArrivedHome => {
                self.phase = SessionPhase::Authenticated;
                if self.attempts > 0 {
                    tracing::debug!(
                        "Login succeeded after {} attempt(s), counter reset",
                        self.attempts
                    );
                }
                self.attempts = 0;
                Vec::new()
            }
            NavEvent::ArrivedLoginForm => {
                self.phase = SessionPhase::Unauthenticated;
                if !self.auto_login_enabled() {
                    return Vec::new();
                }
                self.attempts += 1;
                if self.attempts >= MAX_LOGIN_ATTEMPTS {
                    tracing::warn!(
                        "Auto-login failed {} times, purging stored credentials",
                        self.attempts
                    );
                    self.attempts = 0;
                    self.record = None;
                    vec![Effect::PurgeCredentials, Effect::NotifyLockout]
                } else {
                    tracing::debug!(
                        "Auto-login attempt {} of {}",
                        self.attempts,
                        MAX_LOGIN_ATTEMPTS
                    );
                    Vec::new()
                }
            }
            NavEvent::LoggedOut => {
                self.phase = SessionPhase::Unauthenticated;
                if let Some(record) = &mut self.record {
                    record.auto_login_enabled = false;
                }
                vec![Effect::DisableAutoLogin, Effect::ShowAuthFlow]
            }
            NavEvent::Other => Vec::new(),
        }
    }
}
