use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use futures::future::BoxFuture;

use application::ports::out_::{
    Ad, AdError, AdOutcome, AdProvider, AsyncTimer, Clock, KeyValueStore, SessionNotification, SessionNotifier,
    StoreError, TickScheduler,
};
use domain::SessionId;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Test double for the runtime ports. Notifications, scheduled ticks and
/// sleeps are recorded instead of acted on; scheduled tasks can be run by
/// hand with [`InMemory::run_pending_ticks`].
pub struct InMemory {
    notifications: Mutex<Vec<(SessionId, SessionNotification)>>,
    scheduled_ticks: Mutex<Vec<(SessionId, Duration)>>,
    pending: Mutex<Vec<(SessionId, BoxFuture<'static, ()>)>>,
    cancelled: Mutex<Vec<SessionId>>,
    sleeps: Mutex<Vec<Duration>>,
    now_millis: AtomicI64,
}

impl InMemory {
    pub fn new() -> Self {
        Self {
            notifications: Mutex::new(Vec::new()),
            scheduled_ticks: Mutex::new(Vec::new()),
            pending: Mutex::new(Vec::new()),
            cancelled: Mutex::new(Vec::new()),
            sleeps: Mutex::new(Vec::new()),
            now_millis: AtomicI64::new(0),
        }
    }

    pub fn get_notifications(&self) -> Vec<(SessionId, SessionNotification)> {
        lock(&self.notifications).clone()
    }

    pub fn get_scheduled_ticks(&self) -> Vec<(SessionId, Duration)> {
        lock(&self.scheduled_ticks).clone()
    }

    pub fn get_cancelled(&self) -> Vec<SessionId> {
        lock(&self.cancelled).clone()
    }

    pub fn get_sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }

    pub fn set_now_millis(
        &self,
        millis: i64,
    ) {
        self.now_millis.store(millis, Ordering::SeqCst);
    }

    /// Runs every tick scheduled so far, in order. Ticks they schedule in
    /// turn are left pending. Returns how many ran.
    pub async fn run_pending_ticks(&self) -> usize {
        let pending = std::mem::take(&mut *lock(&self.pending));
        let count = pending.len();
        for (_, task) in pending {
            task.await;
        }
        count
    }
}

impl Default for InMemory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionNotifier for InMemory {
    async fn notify(
        &self,
        session_id: SessionId,
        notification: SessionNotification,
    ) {
        lock(&self.notifications).push((session_id, notification));
    }
}

impl TickScheduler for InMemory {
    fn schedule(
        &self,
        session_id: SessionId,
        delay: Duration,
        task: BoxFuture<'static, ()>,
    ) {
        lock(&self.scheduled_ticks).push((session_id, delay));
        lock(&self.pending).push((session_id, task));
    }

    fn cancel(
        &self,
        session_id: SessionId,
    ) {
        lock(&self.pending).retain(|(sid, _)| *sid != session_id);
        lock(&self.cancelled).push(session_id);
    }
}

#[async_trait]
impl AsyncTimer for InMemory {
    async fn sleep(
        &self,
        duration: Duration,
    ) {
        // Instant return; the duration is only recorded
        lock(&self.sleeps).push(duration);
    }
}

impl Clock for InMemory {
    fn now_millis(&self) -> i64 {
        self.now_millis.load(Ordering::SeqCst)
    }
}

/// Key-value store kept in a map, keyed by `(namespace, key)`.
pub struct InMemoryStore {
    values: Mutex<HashMap<(String, String), String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            values: Mutex::new(HashMap::new()),
        }
    }

    /// Seeds a raw value, bypassing any encoding.
    pub fn with_value(
        self,
        namespace: &str,
        key: &str,
        value: &str,
    ) -> Self {
        lock(&self.values).insert((namespace.to_string(), key.to_string()), value.to_string());
        self
    }

    pub fn raw(
        &self,
        namespace: &str,
        key: &str,
    ) -> Option<String> {
        lock(&self.values)
            .get(&(namespace.to_string(), key.to_string()))
            .cloned()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get_string(
        &self,
        namespace: &str,
        key: &str,
        default: &str,
    ) -> String {
        self.raw(namespace, key).unwrap_or_else(|| default.to_string())
    }

    async fn put_string(
        &self,
        namespace: &str,
        key: &str,
        value: String,
    ) -> Result<(), StoreError> {
        lock(&self.values).insert((namespace.to_string(), key.to_string()), value);
        Ok(())
    }

    async fn clear(
        &self,
        namespace: &str,
    ) -> Result<(), StoreError> {
        lock(&self.values).retain(|(ns, _), _| ns != namespace);
        Ok(())
    }
}

/// Scripted step for [`ScriptedAdProvider`].
#[derive(Clone, Debug)]
pub enum AdScript {
    NoFill,
    Unavailable,
    ShowFailed,
    Shown(AdOutcome),
}

/// Ad provider that replays a fixed script, one step per request. Once the
/// script runs out every request reports no fill.
pub struct ScriptedAdProvider {
    script: Mutex<VecDeque<AdScript>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedAdProvider {
    pub fn new(script: impl IntoIterator<Item = AdScript>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn get_requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl AdProvider for ScriptedAdProvider {
    async fn request_ad(
        &self,
        placement: &str,
    ) -> Result<Ad, AdError> {
        let attempt = {
            let mut requests = lock(&self.requests);
            requests.push(placement.to_string());
            requests.len()
        };

        let step = lock(&self.script).front().cloned().unwrap_or(AdScript::NoFill);
        match step {
            AdScript::NoFill => {
                lock(&self.script).pop_front();
                Err(AdError::NoFill(placement.to_string()))
            }
            AdScript::Unavailable => {
                lock(&self.script).pop_front();
                Err(AdError::Unavailable("scripted outage".to_string()))
            }
            // Consumed by `show`
            AdScript::ShowFailed | AdScript::Shown(_) => Ok(Ad {
                id: format!("scripted-{attempt}"),
                placement: placement.to_string(),
            }),
        }
    }

    async fn show(
        &self,
        ad: Ad,
    ) -> Result<AdOutcome, AdError> {
        match lock(&self.script).pop_front() {
            Some(AdScript::Shown(outcome)) => Ok(outcome),
            _ => Err(AdError::ShowFailed(ad.id)),
        }
    }
}
