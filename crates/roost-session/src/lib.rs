pub mod classifier;
pub mod error;
pub mod inject;
pub mod status;
pub mod tracker;

// Re-export main types for convenience
pub use classifier::{LOGOUT_MESSAGE, NavClassifier, NavEvent};
pub use error::{Error, Result};
pub use inject::ScriptBuilder;
pub use status::{Gate, SessionStatus};
pub use tracker::{AutoLoginTracker, Effect, MAX_LOGIN_ATTEMPTS, SessionPhase};
