use crate::listings::mock::MockListingSource;
use crate::listings::traits::ListingSource;
use crate::models::Property;
use crate::search::params::ListingQuery;
use anyhow::Result;
use async_trait::async_trait;
use tracing::warn;

/// Wraps a remote source; transport failures are answered from the mock list
pub struct FallbackListingSource<P> {
    primary: P,
    fallback: MockListingSource,
}

impl<P: ListingSource> FallbackListingSource<P> {
    pub fn new(primary: P) -> Self {
        Self::with_fallback(primary, MockListingSource::new())
    }

    pub fn with_fallback(primary: P, fallback: MockListingSource) -> Self {
        Self { primary, fallback }
    }
}

#[async_trait]
impl<P: ListingSource> ListingSource for FallbackListingSource<P> {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Property>> {
        match self.primary.search(query).await {
            Ok(properties) => Ok(properties),
            Err(e) => {
                warn!("{} search failed: {:#}", self.primary.source_name(), e);
                warn!("Using mock data instead...");
                self.fallback.search(query).await
            }
        }
    }

    fn source_name(&self) -> &'static str {
        self.primary.source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::property;

    struct DownSource;

    #[async_trait]
    impl ListingSource for DownSource {
        async fn search(&self, _query: &ListingQuery) -> Result<Vec<Property>> {
            anyhow::bail!("connection refused")
        }

        fn source_name(&self) -> &'static str {
            "Down"
        }
    }

    struct FixedSource(Vec<Property>);

    #[async_trait]
    impl ListingSource for FixedSource {
        async fn search(&self, _query: &ListingQuery) -> Result<Vec<Property>> {
            Ok(self.0.clone())
        }

        fn source_name(&self) -> &'static str {
            "Fixed"
        }
    }

    #[tokio::test]
    async fn test_failure_falls_back_to_filtered_mock() {
        let source = FallbackListingSource::new(DownSource);
        let query = ListingQuery {
            city: Some("Springfield".to_string()),
            state: Some("IL".to_string()),
            ..Default::default()
        };

        let results = source.search(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "1");
    }

    #[tokio::test]
    async fn test_failure_uses_supplied_fallback_list() {
        let fallback = MockListingSource::with_listings(vec![
            property("local-1", &[]),
            property("local-2", &[]),
        ]);
        let source = FallbackListingSource::with_fallback(DownSource, fallback);
        let query = ListingQuery {
            limit: Some(1),
            ..Default::default()
        };

        let results = source.search(&query).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "local-1");
    }

    #[tokio::test]
    async fn test_success_skips_fallback() {
        let source = FallbackListingSource::new(FixedSource(vec![property("remote", &[])]));
        let results = source.search(&ListingQuery::default()).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "remote");
        assert_eq!(source.source_name(), "Fixed");
    }
}
