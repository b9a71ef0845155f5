use crate::favorites::error::StoreError;
use crate::models::FavoriteRecord;
use async_trait::async_trait;
use std::sync::Arc;

/// Receives every snapshot of a user's favorites, in delivery order
pub type SnapshotCallback = Arc<dyn Fn(Result<Vec<FavoriteRecord>, StoreError>) + Send + Sync>;

/// Document store holding favorites, keyed per (user, property)
#[async_trait]
pub trait FavoritesStore: Send + Sync {
    /// Point write of a favorite document
    async fn add(&self, record: FavoriteRecord) -> Result<(), StoreError>;

    /// Point delete; deleting a missing document is not an error
    async fn remove(&self, user_id: &str, property_id: &str) -> Result<(), StoreError>;

    async fn get(&self, user_id: &str, property_id: &str) -> Result<Option<FavoriteRecord>, StoreError>;

    /// Live query over one user's favorites. The callback stays registered
    /// until the returned handle is dropped or unsubscribed.
    fn subscribe(&self, user_id: &str, on_change: SnapshotCallback) -> Result<Subscription, StoreError>;
}

/// Handle that unregisters a live query
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
