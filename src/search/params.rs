use crate::search::filters::SearchFilters;
use serde::{Deserialize, Serialize};

/// Default cap on the number of listings requested per search
pub const DEFAULT_RESULT_LIMIT: u32 = 20;

/// Search parameters in the listings API's shape.
/// Absent fields mean "no constraint" to the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    /// State or region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
}

impl ListingQuery {
    /// Map canonical filters to API parameters, dropping every field that
    /// sits at its unconstrained default.
    pub fn from_filters(filters: &SearchFilters, limit: u32) -> Self {
        let (city, state) = split_location(&filters.location);

        Self {
            city,
            state,
            zip_code: None,
            min_price: Some(filters.min_price).filter(|p| *p > 0.0),
            max_price: filters.max_price.filter(|p| *p > 0.0),
            bedrooms: Some(filters.min_bedrooms).filter(|n| *n > 0),
            bathrooms: Some(filters.min_bathrooms).filter(|n| *n > 0),
            property_type: non_empty(&filters.property_type),
            limit: Some(limit),
            offset: None,
        }
    }

    /// Query-string pairs, in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(city) = &self.city {
            pairs.push(("city", city.clone()));
        }
        if let Some(state) = &self.state {
            pairs.push(("state", state.clone()));
        }
        if let Some(zip) = &self.zip_code {
            pairs.push(("zipCode", zip.clone()));
        }
        if let Some(min) = self.min_price {
            pairs.push(("minPrice", min.to_string()));
        }
        if let Some(max) = self.max_price {
            pairs.push(("maxPrice", max.to_string()));
        }
        if let Some(beds) = self.bedrooms {
            pairs.push(("bedrooms", beds.to_string()));
        }
        if let Some(baths) = self.bathrooms {
            pairs.push(("bathrooms", baths.to_string()));
        }
        if let Some(kind) = &self.property_type {
            pairs.push(("propertyType", kind.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        pairs
    }
}

/// "City, ST" splits at the first comma; anything else is a city
fn split_location(location: &str) -> (Option<String>, Option<String>) {
    match location.split_once(',') {
        Some((city, state)) => (non_empty(city), non_empty(state)),
        None => (non_empty(location), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filters_only_carry_limit() {
        let query = ListingQuery::from_filters(&SearchFilters::default(), DEFAULT_RESULT_LIMIT);
        assert_eq!(
            query,
            ListingQuery {
                limit: Some(DEFAULT_RESULT_LIMIT),
                ..Default::default()
            }
        );

        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": 20 }));
    }

    #[test]
    fn test_location_with_comma_splits_city_and_state() {
        let filters = SearchFilters {
            location: "Springfield, IL".to_string(),
            ..Default::default()
        };
        let query = ListingQuery::from_filters(&filters, 10);
        assert_eq!(query.city.as_deref(), Some("Springfield"));
        assert_eq!(query.state.as_deref(), Some("IL"));
        assert_eq!(query.limit, Some(10));
    }

    #[test]
    fn test_location_splits_only_at_first_comma() {
        let filters = SearchFilters {
            location: "Portland, OR, USA".to_string(),
            ..Default::default()
        };
        let query = ListingQuery::from_filters(&filters, 10);
        assert_eq!(query.city.as_deref(), Some("Portland"));
        assert_eq!(query.state.as_deref(), Some("OR, USA"));
    }

    #[test]
    fn test_location_without_comma_is_city() {
        let filters = SearchFilters {
            location: "Austin".to_string(),
            ..Default::default()
        };
        let query = ListingQuery::from_filters(&filters, 10);
        assert_eq!(query.city.as_deref(), Some("Austin"));
        assert_eq!(query.state, None);
    }

    #[test]
    fn test_constrained_fields_are_emitted() {
        let filters = SearchFilters {
            min_price: 100_000.0,
            max_price: Some(300_000.0),
            property_type: "Condo".to_string(),
            min_bedrooms: 2,
            min_bathrooms: 1,
            ..Default::default()
        };
        let query = ListingQuery::from_filters(&filters, 5);
        assert_eq!(
            query.to_pairs(),
            vec![
                ("minPrice", "100000".to_string()),
                ("maxPrice", "300000".to_string()),
                ("bedrooms", "2".to_string()),
                ("bathrooms", "1".to_string()),
                ("propertyType", "Condo".to_string()),
                ("limit", "5".to_string()),
            ]
        );
    }

    #[test]
    fn test_zero_max_price_is_omitted() {
        let filters = SearchFilters {
            max_price: Some(0.0),
            ..Default::default()
        };
        let query = ListingQuery::from_filters(&filters, 5);
        assert_eq!(query.max_price, None);
    }
}
