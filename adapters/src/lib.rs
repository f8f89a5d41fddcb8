mod file_store;
mod in_memory;
mod simulated_ads;
mod tokio_scheduler;
mod tokio_timer;
pub mod web;

pub use file_store::JsonFileStore;
pub use in_memory::{AdScript, InMemory, InMemoryStore, ScriptedAdProvider};
pub use simulated_ads::SimulatedAdProvider;
pub use tokio_scheduler::TokioTickScheduler;
pub use tokio_timer::{SystemClock, TokioTimer};
pub use web::{AppPorts, AppState, create_app_state, router};
