mod action;
mod config;
mod effect;
mod error;
mod event;
mod purchase;
mod snapshot;
mod state;
mod summary;

#[cfg(test)]
mod tests;

pub use action::SessionAction;
pub use config::{SessionConfig, SessionPhase};
pub use effect::SessionEffect;
pub use error::SessionError;
pub use event::SessionEvent;
pub use snapshot::{ItemLine, SessionSnapshot};
pub use state::SessionState;
pub use summary::SessionSummary;
