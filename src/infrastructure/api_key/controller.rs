//! Key list controller
//!
//! Single owner of the live key collection. Every mutation goes through the
//! remote key service first and is applied locally only once the service has
//! confirmed it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::{
    validate_key_name, ApiKey, ApiKeyId, Clock, DomainError, KeyServiceClient, QuotaConfig,
    SystemClock,
};
use crate::infrastructure::countdown::{
    CountdownTimer, DEFAULT_TICK_INTERVAL, MIN_TICK_INTERVAL,
};

/// Render-ready view of one live key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeyView {
    pub key: ApiKey,
    /// Formatted remaining time, `"Expired"` once the countdown has run out
    pub remaining: String,
    pub remaining_ms: i64,
    pub expired: bool,
}

/// A live key and the countdown it owns
#[derive(Debug)]
struct TrackedKey {
    key: ApiKey,
    timer: CountdownTimer,
}

#[derive(Debug, Default)]
struct KeyCollection {
    keys: Vec<TrackedKey>,
    quota: QuotaConfig,
}

impl KeyCollection {
    fn position(&self, id: &ApiKeyId) -> Option<usize> {
        self.keys.iter().position(|tracked| tracked.key.id() == id)
    }

    fn get(&self, id: &ApiKeyId) -> Option<&TrackedKey> {
        self.keys.iter().find(|tracked| tracked.key.id() == id)
    }

    fn get_mut(&mut self, id: &ApiKeyId) -> Option<&mut TrackedKey> {
        self.keys.iter_mut().find(|tracked| tracked.key.id() == id)
    }

    /// Insert at the end, or replace in place when the id is already live
    fn upsert(&mut self, tracked: TrackedKey) {
        match self.position(tracked.key.id()) {
            Some(index) => self.keys[index] = tracked,
            None => self.keys.push(tracked),
        }
    }

    /// Remove a key, dropping (and so releasing) its timer
    fn remove(&mut self, id: &ApiKeyId) -> bool {
        match self.position(id) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Controller for the live key collection
///
/// Must be used from within a tokio runtime: every live key owns a
/// [`CountdownTimer`]. When a countdown runs out its key id is queued, and the
/// caller's event loop is expected to pick it up with
/// [`KeyListController::next_expired`] and hand it to
/// [`KeyListController::expire_locally`].
pub struct KeyListController<C: KeyServiceClient> {
    client: Arc<C>,
    clock: Arc<dyn Clock>,
    tick: Duration,
    state: RwLock<KeyCollection>,
    expired_tx: mpsc::UnboundedSender<ApiKeyId>,
    expired_rx: Mutex<mpsc::UnboundedReceiver<ApiKeyId>>,
}

impl<C: KeyServiceClient> KeyListController<C> {
    pub fn new(client: Arc<C>) -> Self {
        let (expired_tx, expired_rx) = mpsc::unbounded_channel();

        Self {
            client,
            clock: Arc::new(SystemClock),
            tick: DEFAULT_TICK_INTERVAL,
            state: RwLock::new(KeyCollection::default()),
            expired_tx,
            expired_rx: Mutex::new(expired_rx),
        }
    }

    /// Use a custom clock for countdowns
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Use a custom countdown recomputation period, at least [`MIN_TICK_INTERVAL`]
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick.max(MIN_TICK_INTERVAL);
        self
    }

    /// Fetch keys and quota concurrently and replace the local state
    ///
    /// On failure the collection is left empty and the previous quota is kept.
    pub async fn load_all(&self) -> Result<usize, DomainError> {
        debug!("Loading keys and quota configuration");

        let result = tokio::try_join!(self.client.list_keys(), self.client.get_config());

        let mut state = self.state.write().await;
        state.keys.clear();

        match result {
            Ok((keys, quota)) => {
                state.quota = quota;
                for key in keys {
                    let tracked = self.track(key);
                    state.upsert(tracked);
                }

                info!(
                    "Loaded {} keys (quota: max_keys={}, expiration_days={})",
                    state.keys.len(),
                    quota.max_keys,
                    quota.expiration_days
                );
                Ok(state.keys.len())
            }
            Err(e) => {
                warn!("Failed to load keys: {}", e);
                Err(DomainError::load_failed(e.to_string()))
            }
        }
    }

    /// Generate a new key, subject to the quota
    ///
    /// Without a label the key is named `API Key {n}`, `n` being its position in
    /// the collection.
    pub async fn generate(&self, label: Option<&str>) -> Result<ApiKey, DomainError> {
        let name = {
            let state = self.state.read().await;

            if !state.quota.allows_another(state.keys.len()) {
                debug!(
                    "Refusing to generate key: {} of {} keys live",
                    state.keys.len(),
                    state.quota.max_keys
                );
                return Err(DomainError::quota_exceeded(state.quota.max_keys));
            }

            match label {
                Some(label) => validate_key_name(label)?.to_string(),
                None => format!("API Key {}", state.keys.len() + 1),
            }
        };

        let key = self.client.create_key(Some(name)).await?;
        info!("API key generated: id={}", key.id());

        let tracked = self.track(key.clone());
        self.state.write().await.upsert(tracked);

        Ok(key)
    }

    /// Rename a key; the local record takes the name the service confirmed
    pub async fn rename(&self, id: &ApiKeyId, new_name: &str) -> Result<ApiKey, DomainError> {
        let name = validate_key_name(new_name)?;

        let confirmed = self.client.update_key(id, name).await?;

        if confirmed.id() != id {
            warn!(
                "Key service confirmed rename of '{}' for a different key '{}'",
                id,
                confirmed.id()
            );
            return Err(DomainError::remote(format!(
                "Key service returned key '{}' when renaming '{}'",
                confirmed.id(),
                id
            )));
        }

        let mut state = self.state.write().await;
        match state.get_mut(id) {
            Some(tracked) => {
                if tracked.key.expires_at() != confirmed.expires_at() {
                    let on_expire = self.on_expire(id.clone());
                    tracked.timer.restart(confirmed.expires_at(), on_expire);
                }
                tracked.key = confirmed.clone();
                info!("API key renamed: id={}", id);
            }
            None => debug!("Renamed key '{}' is no longer in the collection", id),
        }

        Ok(confirmed)
    }

    /// Revoke a key
    ///
    /// Returns whether a local record was removed; an id that is already gone
    /// locally is not an error once the service has accepted the delete.
    pub async fn revoke(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        self.client.delete_key(id).await?;

        let removed = self.state.write().await.remove(id);
        info!("API key revoked: id={}, removed_locally={}", id, removed);

        Ok(removed)
    }

    /// Revoke a key whose countdown has run out
    ///
    /// Issues the same remote delete as [`KeyListController::revoke`], but the
    /// record is dropped locally whatever the outcome; a remote failure is still
    /// returned. Stale events (the key is gone, or was reloaded with a countdown
    /// still running) are ignored without a remote call.
    pub async fn expire_locally(&self, id: &ApiKeyId) -> Result<bool, DomainError> {
        {
            let state = self.state.read().await;
            match state.get(id) {
                Some(tracked) if tracked.timer.is_expired() => {}
                _ => {
                    debug!("Ignoring stale expiration event for key '{}'", id);
                    return Ok(false);
                }
            }
        }

        info!("API key expired: id={}", id);
        let result = self.client.delete_key(id).await;

        let mut state = self.state.write().await;
        let removed = match state.get(id) {
            Some(tracked) if tracked.timer.is_expired() => state.remove(id),
            _ => false,
        };

        match result {
            Ok(()) => Ok(removed),
            Err(e) => {
                warn!("Failed to revoke expired key '{}' remotely: {}", id, e);
                Err(e)
            }
        }
    }

    /// Wait for the next key whose countdown ran out
    pub async fn next_expired(&self) -> Option<ApiKeyId> {
        self.expired_rx.lock().await.recv().await
    }

    /// Drain expiration events that are already queued, without waiting
    pub async fn take_expired(&self) -> Vec<ApiKeyId> {
        let mut rx = self.expired_rx.lock().await;
        let mut expired = Vec::new();
        while let Ok(id) = rx.try_recv() {
            expired.push(id);
        }
        expired
    }

    /// Secret of a live key, for copying
    pub async fn copy_secret(&self, id: &ApiKeyId) -> Result<String, DomainError> {
        self.state
            .read()
            .await
            .get(id)
            .map(|tracked| tracked.key.secret().to_string())
            .ok_or_else(|| DomainError::not_found(format!("API key '{}' not found", id)))
    }

    /// Current keys with their countdowns, in collection order
    pub async fn snapshot(&self) -> Vec<KeyView> {
        self.state
            .read()
            .await
            .keys
            .iter()
            .map(|tracked| KeyView {
                key: tracked.key.clone(),
                remaining: tracked.timer.display(),
                remaining_ms: tracked.timer.remaining_millis(),
                expired: tracked.timer.is_expired(),
            })
            .collect()
    }

    pub async fn get(&self, id: &ApiKeyId) -> Option<ApiKey> {
        self.state.read().await.get(id).map(|tracked| tracked.key.clone())
    }

    pub async fn quota(&self) -> QuotaConfig {
        self.state.read().await.quota
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.keys.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether the quota leaves room for another key
    pub async fn can_generate(&self) -> bool {
        let state = self.state.read().await;
        state.quota.allows_another(state.keys.len())
    }

    fn track(&self, key: ApiKey) -> TrackedKey {
        let on_expire = self.on_expire(key.id().clone());
        let timer = CountdownTimer::start(key.expires_at(), Arc::clone(&self.clock), self.tick, on_expire);

        TrackedKey { key, timer }
    }

    fn on_expire(&self, id: ApiKeyId) -> impl FnOnce() + Send + 'static {
        let tx = self.expired_tx.clone();
        move || {
            // Receiver lives as long as the controller
            let _ = tx.send(id);
        }
    }
}

impl<C: KeyServiceClient> fmt::Debug for KeyListController<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyListController")
            .field("client", &self.client)
            .field("clock", &self.clock)
            .field("tick", &self.tick)
            .finish_non_exhaustive()
    }
}
