use crate::favorites::error::StoreError;
use crate::favorites::store::{FavoritesStore, SnapshotCallback, Subscription};
use crate::models::{FavoriteRecord, Property};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, Weak};
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerPhase {
    /// No user; membership is always empty
    Unauthenticated,
    /// Subscribed, waiting for the first snapshot
    Subscribing,
    Live,
}

struct TrackerState {
    phase: TrackerPhase,
    user_id: Option<String>,
    /// Bumped on every user change; callbacks carrying an older value are stale
    generation: u64,
    favorites: Vec<FavoriteRecord>,
    ids: HashSet<String>,
    /// Outstanding writes per property id
    loading: HashMap<String, usize>,
    subscription: Option<Subscription>,
}

impl TrackerState {
    fn new() -> Self {
        Self {
            phase: TrackerPhase::Unauthenticated,
            user_id: None,
            generation: 0,
            favorites: Vec::new(),
            ids: HashSet::new(),
            loading: HashMap::new(),
            subscription: None,
        }
    }
}

/// Tracks which properties the current user has favorited.
///
/// Membership comes from a live store subscription. Toggles read the last
/// snapshot and issue one independent write each; two toggles on the same id
/// are not serialized, so the store's last write wins.
#[derive(Clone)]
pub struct FavoritesTracker {
    store: Arc<dyn FavoritesStore>,
    state: Arc<Mutex<TrackerState>>,
}

impl FavoritesTracker {
    pub fn new(store: Arc<dyn FavoritesStore>) -> Self {
        Self {
            store,
            state: Arc::new(Mutex::new(TrackerState::new())),
        }
    }

    /// Switch the tracked user. `None` signs out.
    pub fn set_user(&self, user_id: Option<&str>) {
        let (previous, generation) = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            if state.user_id.as_deref() == user_id {
                return;
            }

            let previous = state.subscription.take();
            state.generation += 1;
            state.user_id = user_id.map(str::to_string);
            state.favorites.clear();
            state.ids.clear();
            state.loading.clear();
            state.phase = match user_id {
                Some(_) => TrackerPhase::Subscribing,
                None => TrackerPhase::Unauthenticated,
            };
            (previous, state.generation)
        };
        // Unregister outside our lock; the store may be mid-delivery
        drop(previous);

        let Some(user_id) = user_id else {
            info!("Signed out; favorites cleared");
            return;
        };

        let weak = Arc::downgrade(&self.state);
        let on_change: SnapshotCallback = Arc::new(
            move |snapshot: Result<Vec<FavoriteRecord>, StoreError>| {
                apply_snapshot(&weak, generation, snapshot)
            },
        );

        match self.store.subscribe(user_id, on_change) {
            Ok(subscription) => {
                let stale = match self.state.lock() {
                    Ok(mut state) if state.generation == generation => {
                        state.subscription = Some(subscription);
                        None
                    }
                    _ => Some(subscription),
                };
                if stale.is_some() {
                    debug!("User changed while subscribing; dropping subscription");
                }
            }
            Err(e) => warn!("Failed to subscribe to favorites for {}: {}", user_id, e),
        }
    }

    pub fn phase(&self) -> TrackerPhase {
        self.state
            .lock()
            .map(|s| s.phase)
            .unwrap_or(TrackerPhase::Unauthenticated)
    }

    pub fn user_id(&self) -> Option<String> {
        self.state.lock().ok().and_then(|s| s.user_id.clone())
    }

    pub fn is_favorite(&self, property_id: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.ids.contains(property_id))
            .unwrap_or(false)
    }

    /// Whether a write for this id is still outstanding
    pub fn is_loading(&self, property_id: &str) -> bool {
        self.state
            .lock()
            .map(|s| s.loading.contains_key(property_id))
            .unwrap_or(false)
    }

    pub fn favorite_ids(&self) -> HashSet<String> {
        self.state.lock().map(|s| s.ids.clone()).unwrap_or_default()
    }

    pub fn loading_ids(&self) -> HashSet<String> {
        self.state
            .lock()
            .map(|s| s.loading.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Favorited property snapshots, newest first
    pub fn favorites(&self) -> Vec<Property> {
        self.state
            .lock()
            .map(|s| s.favorites.iter().map(|r| r.property.clone()).collect())
            .unwrap_or_default()
    }

    /// Add the property if it is not a favorite, remove it otherwise.
    ///
    /// No-op without a signed-in user. Write failures are logged. The id
    /// stays loading until every write issued for it has resolved.
    pub async fn toggle(&self, property: &Property) {
        let (user_id, generation, was_favorite) = {
            let Ok(mut state) = self.state.lock() else {
                return;
            };
            let Some(user_id) = state.user_id.clone() else {
                debug!("Toggle on {} ignored: no user", property.id);
                return;
            };
            let was_favorite = state.ids.contains(&property.id);
            *state.loading.entry(property.id.clone()).or_insert(0) += 1;
            (user_id, state.generation, was_favorite)
        };

        let result = if was_favorite {
            self.store.remove(&user_id, &property.id).await
        } else {
            self.store
                .add(FavoriteRecord::new(user_id.clone(), property.clone()))
                .await
        };

        match result {
            Ok(()) => debug!(
                "{} favorite {} for {}",
                if was_favorite { "Removed" } else { "Added" },
                property.id,
                user_id
            ),
            Err(e) => error!("Failed to toggle favorite {}: {}", property.id, e),
        }

        if let Ok(mut state) = self.state.lock() {
            if state.generation == generation {
                let settled = match state.loading.get_mut(&property.id) {
                    Some(pending) => {
                        *pending -= 1;
                        *pending == 0
                    }
                    None => false,
                };
                if settled {
                    state.loading.remove(&property.id);
                }
            } else {
                debug!("Write for {} finished after user change; ignored", property.id);
            }
        }
    }
}

fn apply_snapshot(
    state: &Weak<Mutex<TrackerState>>,
    generation: u64,
    snapshot: Result<Vec<FavoriteRecord>, StoreError>,
) {
    let Some(state) = state.upgrade() else {
        return;
    };
    let Ok(mut state) = state.lock() else {
        return;
    };
    if state.generation != generation {
        debug!("Ignoring stale favorites snapshot");
        return;
    }

    match snapshot {
        Ok(records) => {
            state.ids = records.iter().map(|r| r.property.id.clone()).collect();
            state.favorites = records;
            state.phase = TrackerPhase::Live;
            debug!("Favorites snapshot: {} item(s)", state.ids.len());
        }
        Err(e) => warn!("Favorites subscription error: {}", e),
    }
}
