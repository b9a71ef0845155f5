pub mod error;
pub mod memory;
pub mod store;
pub mod tracker;

pub use error::StoreError;
pub use memory::InMemoryFavoritesStore;
pub use store::{FavoritesStore, SnapshotCallback, Subscription};
pub use tracker::{FavoritesTracker, TrackerPhase};
