pub mod api;
pub mod fallback;
pub mod mock;
pub mod traits;

pub use api::ListingsApiClient;
pub use fallback::FallbackListingSource;
pub use mock::MockListingSource;
pub use traits::ListingSource;
