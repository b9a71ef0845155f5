pub mod filters;
pub mod params;
pub mod reconcile;

pub use filters::{FilterForm, SearchFilters};
pub use params::{ListingQuery, DEFAULT_RESULT_LIMIT};
pub use reconcile::{filter_by_amenities, merge_favorites, reconcile};

use crate::listings::ListingSource;
use crate::models::PropertyView;
use anyhow::Result;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

/// Runs the whole pipeline: form → filters → query → source → reconcile
pub struct SearchService {
    source: Arc<dyn ListingSource>,
    limit: u32,
}

impl SearchService {
    pub fn new(source: Arc<dyn ListingSource>, limit: u32) -> Self {
        Self { source, limit }
    }

    pub async fn search(&self, form: &FilterForm, favorite_ids: &HashSet<String>) -> Result<Vec<PropertyView>> {
        let filters = form.normalize();
        let query = ListingQuery::from_filters(&filters, self.limit);

        info!("🔎 Searching {} with {:?}", self.source.source_name(), query.to_pairs());
        let properties = self.source.search(&query).await?;
        let fetched = properties.len();

        let views = reconcile(properties, &filters.amenities, favorite_ids);
        info!("{} of {} results kept after amenity filter", views.len(), fetched);
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listings::MockListingSource;

    fn service() -> SearchService {
        SearchService::new(Arc::new(MockListingSource::new()), DEFAULT_RESULT_LIMIT)
    }

    #[tokio::test]
    async fn test_search_city_state_and_amenities() {
        let mut form = FilterForm {
            location: "Springfield, IL".to_string(),
            ..Default::default()
        };
        form.toggle_amenity("pool");

        let favorites: HashSet<String> = ["1".to_string()].into_iter().collect();
        let views = service().search(&form, &favorites).await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].property.id, "1");
        assert!(views[0].is_favorite);
    }

    #[tokio::test]
    async fn test_inverted_price_range_yields_empty_results() {
        let form = FilterForm {
            min_price: "500000".to_string(),
            max_price: "300000".to_string(),
            ..Default::default()
        };
        let views = service().search(&form, &HashSet::new()).await.unwrap();
        assert!(views.is_empty());
    }

    #[tokio::test]
    async fn test_garbage_input_returns_everything() {
        let form = FilterForm {
            min_price: "cheap".to_string(),
            min_bedrooms: "a few".to_string(),
            ..Default::default()
        };
        let views = service().search(&form, &HashSet::new()).await.unwrap();
        assert_eq!(views.len(), 6);
        assert!(views.iter().all(|v| !v.is_favorite));
    }

    #[tokio::test]
    async fn test_limit_caps_results() {
        let service = SearchService::new(Arc::new(MockListingSource::new()), 2);
        let views = service.search(&FilterForm::default(), &HashSet::new()).await.unwrap();
        assert_eq!(views.len(), 2);
    }
}
