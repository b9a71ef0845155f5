use crate::models::Property;
use crate::search::params::ListingQuery;
use anyhow::Result;
use async_trait::async_trait;

/// Common trait for anything that answers a listing search.
/// Results come back already filtered by the query's parameters.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Run a search against the source
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Property>>;

    /// Get the name of the listing source
    fn source_name(&self) -> &'static str;
}
