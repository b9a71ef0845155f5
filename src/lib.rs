pub mod config;
pub mod favorites;
pub mod listings;
pub mod models;
pub mod search;

pub use config::Config;
pub use models::{FavoriteRecord, Property, PropertyView, Session, User};
