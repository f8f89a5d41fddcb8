use std::time::Duration;

use super::event::SessionEvent;
use super::summary::SessionSummary;

#[derive(Clone, Debug)]
pub enum SessionEffect {
    Notify(SessionEvent),
    /// Run `SessionAction::Tick` again after `delay`.
    ScheduleTick { delay: Duration },
    /// Emitted once, when the balance first reaches zero.
    Complete(SessionSummary),
}
