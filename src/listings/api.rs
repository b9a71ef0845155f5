use crate::listings::traits::ListingSource;
use crate::models::{Coordinates, Property, Source};
use crate::search::params::ListingQuery;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Listing record as returned by the listings API
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListing {
    id: Option<String>,
    formatted_address: Option<String>,
    address_line1: Option<String>,
    #[serde(default)]
    city: String,
    #[serde(default)]
    state: String,
    zip_code: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    property_type: String,
    bedrooms: Option<f64>,
    bathrooms: Option<f64>,
    square_footage: Option<f64>,
    year_built: Option<i32>,
    price: Option<f64>,
    description: Option<String>,
    #[serde(default)]
    features: Value,
    #[serde(default)]
    photos: Vec<String>,
}

impl RawListing {
    fn into_property(self) -> Option<Property> {
        let id = self.id?;
        let address = self.formatted_address.or(self.address_line1)?;

        let location = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => None,
        };

        Some(Property {
            id,
            source: Source::ListingsApi,
            price: self.price.unwrap_or(0.0).max(0.0),
            address,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            property_type: self.property_type,
            bedrooms: whole(self.bedrooms),
            bathrooms: whole(self.bathrooms),
            size: self.square_footage.unwrap_or(0.0).max(0.0),
            year_built: self.year_built,
            amenities: feature_tags(&self.features),
            photos: self.photos,
            description: self.description,
            location,
        })
    }
}

fn whole(value: Option<f64>) -> u32 {
    value
        .filter(|v| v.is_finite() && *v > 0.0)
        .map(|v| v.floor() as u32)
        .unwrap_or(0)
}

/// Features arrive either as a tag list or as an object of flags
fn feature_tags(features: &Value) -> Vec<String> {
    match features {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(str::to_string)
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, v)| match v {
                Value::Bool(b) => *b,
                Value::Null => false,
                _ => true,
            })
            .map(|(k, _)| k.clone())
            .collect(),
        _ => Vec::new(),
    }
}

/// HTTP client for the third-party listings API
pub struct ListingsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ListingsApiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("property-finder/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn parse_listings(body: Value) -> Result<Vec<Property>> {
        let items = match body {
            Value::Array(items) => items,
            other => anyhow::bail!("Unexpected listings payload: {}", other),
        };

        let total = items.len();
        let properties: Vec<Property> = items
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawListing>(item) {
                Ok(raw) => raw.into_property(),
                Err(e) => {
                    warn!("Skipping malformed listing: {}", e);
                    None
                }
            })
            .collect();

        if properties.len() < total {
            debug!("Dropped {} incomplete listings", total - properties.len());
        }
        Ok(properties)
    }
}

#[async_trait]
impl ListingSource for ListingsApiClient {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Property>> {
        let url = format!("{}/listings/sale", self.base_url);
        debug!("Fetching URL: {} with {:?}", url, query.to_pairs());

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .header("X-Api-Key", &self.api_key)
            .query(&query.to_pairs())
            .send()
            .await
            .context("Failed to reach listings API")?;

        if !response.status().is_success() {
            warn!("Listings API returned status: {}", response.status());
            anyhow::bail!("Listings API request failed: {}", response.status());
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to decode listings response")?;

        let properties = Self::parse_listings(body)?;
        info!("✅ Listings API returned {} properties", properties.len());
        Ok(properties)
    }

    fn source_name(&self) -> &'static str {
        "ListingsApi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_listings_maps_api_records() {
        let body = json!([
            {
                "id": "abc",
                "formattedAddress": "1 Elm St, Springfield, IL 62701",
                "city": "Springfield",
                "state": "IL",
                "zipCode": "62701",
                "latitude": 39.8,
                "longitude": -89.6,
                "propertyType": "Single Family",
                "bedrooms": 3,
                "bathrooms": 2.5,
                "squareFootage": 1850,
                "yearBuilt": 2001,
                "price": 399000,
                "features": { "pool": true, "garage": true, "fireplace": false }
            }
        ]);

        let props = ListingsApiClient::parse_listings(body).unwrap();
        assert_eq!(props.len(), 1);
        let p = &props[0];
        assert_eq!(p.id, "abc");
        assert_eq!(p.source, Source::ListingsApi);
        assert_eq!(p.bathrooms, 2);
        assert_eq!(p.size, 1850.0);
        assert_eq!(p.amenities, vec!["garage".to_string(), "pool".to_string()]);
        assert_eq!(
            p.location,
            Some(Coordinates {
                latitude: 39.8,
                longitude: -89.6
            })
        );
    }

    #[test]
    fn test_parse_listings_skips_incomplete_records() {
        let body = json!([
            { "id": "no-address" },
            { "formattedAddress": "no id" },
            { "id": "ok", "addressLine1": "2 Oak Ave", "features": ["Garage"] },
            { "id": 7 }
        ]);

        let props = ListingsApiClient::parse_listings(body).unwrap();
        assert_eq!(props.len(), 1);
        assert_eq!(props[0].address, "2 Oak Ave");
        assert_eq!(props[0].amenities, vec!["Garage".to_string()]);
        assert_eq!(props[0].bedrooms, 0);
    }

    #[test]
    fn test_parse_listings_rejects_non_array() {
        assert!(ListingsApiClient::parse_listings(json!({ "error": "quota" })).is_err());
    }

    #[tokio::test]
    async fn test_unreachable_api_is_an_error() {
        let client =
            ListingsApiClient::new("http://127.0.0.1:9", "key", Duration::from_millis(200)).unwrap();
        assert!(client.search(&ListingQuery::default()).await.is_err());
    }
}
