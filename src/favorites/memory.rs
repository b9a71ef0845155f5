use crate::favorites::error::StoreError;
use crate::favorites::store::{FavoritesStore, SnapshotCallback, Subscription};
use crate::models::{FavoriteKey, FavoriteRecord};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, warn};

struct Listener {
    user_id: String,
    on_change: SnapshotCallback,
}

#[derive(Default)]
struct Inner {
    /// Documents stored as JSON, keyed by `FavoriteRecord::key`
    documents: Mutex<HashMap<FavoriteKey, Value>>,
    listeners: Mutex<HashMap<u64, Listener>>,
    next_listener: AtomicU64,
}

/// In-process favorites store with live queries.
/// Snapshots are delivered synchronously: once on subscribe, then after
/// every write touching the subscribed user.
#[derive(Clone, Default)]
pub struct InMemoryFavoritesStore {
    inner: Arc<Inner>,
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    pub fn document_count(&self) -> usize {
        self.inner.documents.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Newest first
    fn snapshot(&self, user_id: &str) -> Result<Vec<FavoriteRecord>, StoreError> {
        let documents = self
            .inner
            .documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document lock poisoned".to_string()))?;

        let mut records = documents
            .values()
            .filter(|doc| doc.get("userId").and_then(Value::as_str) == Some(user_id))
            .map(|doc| serde_json::from_value::<FavoriteRecord>(doc.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.property.id.cmp(&b.property.id))
        });
        Ok(records)
    }

    fn notify(&self, user_id: &str) {
        let callbacks: Vec<SnapshotCallback> = match self.inner.listeners.lock() {
            Ok(listeners) => listeners
                .values()
                .filter(|l| l.user_id == user_id)
                .map(|l| l.on_change.clone())
                .collect(),
            Err(_) => {
                warn!("Listener lock poisoned; snapshot for {} dropped", user_id);
                return;
            }
        };

        if callbacks.is_empty() {
            return;
        }

        let snapshot = self.snapshot(user_id);
        debug!("Delivering favorites snapshot to {} listener(s)", callbacks.len());
        for callback in callbacks {
            callback(snapshot.clone());
        }
    }
}

/// A stored document must belong to the (user, property) it is filed under
fn owned_by(doc: &Value, key: &FavoriteKey) -> bool {
    doc.get("userId").and_then(Value::as_str) == Some(key.user_id.as_str())
        && doc
            .get("property")
            .and_then(|p| p.get("id"))
            .and_then(Value::as_str)
            == Some(key.property_id.as_str())
}

fn unregister(inner: &Weak<Inner>, id: u64) {
    if let Some(inner) = inner.upgrade() {
        if let Ok(mut listeners) = inner.listeners.lock() {
            listeners.remove(&id);
        }
    }
}

#[async_trait]
impl FavoritesStore for InMemoryFavoritesStore {
    async fn add(&self, record: FavoriteRecord) -> Result<(), StoreError> {
        let user_id = record.user_id.clone();
        let key = record.key();
        let doc = serde_json::to_value(&record)?;
        {
            let mut documents = self
                .inner
                .documents
                .lock()
                .map_err(|_| StoreError::Unavailable("document lock poisoned".to_string()))?;
            documents.insert(key, doc);
        }
        self.notify(&user_id);
        Ok(())
    }

    async fn remove(&self, user_id: &str, property_id: &str) -> Result<(), StoreError> {
        let key = FavoriteRecord::key_for(user_id, property_id);
        {
            let mut documents = self
                .inner
                .documents
                .lock()
                .map_err(|_| StoreError::Unavailable("document lock poisoned".to_string()))?;
            if documents.get(&key).is_some_and(|doc| owned_by(doc, &key)) {
                documents.remove(&key);
            } else if documents.contains_key(&key) {
                warn!("Refusing to delete {}: document owner mismatch", key);
            }
        }
        self.notify(user_id);
        Ok(())
    }

    async fn get(&self, user_id: &str, property_id: &str) -> Result<Option<FavoriteRecord>, StoreError> {
        let key = FavoriteRecord::key_for(user_id, property_id);
        let doc = {
            let documents = self
                .inner
                .documents
                .lock()
                .map_err(|_| StoreError::Unavailable("document lock poisoned".to_string()))?;
            documents.get(&key).filter(|doc| owned_by(doc, &key)).cloned()
        };
        match doc {
            Some(doc) => Ok(Some(serde_json::from_value(doc)?)),
            None => Ok(None),
        }
    }

    fn subscribe(&self, user_id: &str, on_change: SnapshotCallback) -> Result<Subscription, StoreError> {
        let id = self.inner.next_listener.fetch_add(1, Ordering::SeqCst);
        {
            let mut listeners = self
                .inner
                .listeners
                .lock()
                .map_err(|_| StoreError::Unavailable("listener lock poisoned".to_string()))?;
            listeners.insert(
                id,
                Listener {
                    user_id: user_id.to_string(),
                    on_change: on_change.clone(),
                },
            );
        }
        debug!("Registered favorites listener {} for {}", id, user_id);

        on_change(self.snapshot(user_id));

        let inner = Arc::downgrade(&self.inner);
        Ok(Subscription::new(move || unregister(&inner, id)))
    }
}
