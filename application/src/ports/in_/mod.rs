pub mod ad_gate_service;
pub mod history_service;
pub mod persona_service;
pub mod session_service;

pub use ad_gate_service::AdGateService;
pub use history_service::HistoryService;
pub use persona_service::{PersonaEntry, PersonaRegistry, PersonaServiceError};
pub use session_service::{SessionService, SessionServiceError, SessionStore};
