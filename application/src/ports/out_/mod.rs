mod ads;
mod common;
mod session;
mod store;

pub use ads::{Ad, AdError, AdOutcome, AdProvider};
pub use common::{AsyncTimer, Clock};
pub use session::{SessionNotification, SessionNotifier, TickScheduler};
pub use store::{KeyValueStore, StoreError};
