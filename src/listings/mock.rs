use crate::listings::traits::ListingSource;
use crate::models::{Coordinates, Property, Source};
use crate::search::params::ListingQuery;
use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Local listing source backed by a fixed sample list.
/// Used directly when no API key is configured, and as the transport fallback.
pub struct MockListingSource {
    listings: Vec<Property>,
}

impl MockListingSource {
    pub fn new() -> Self {
        Self {
            listings: sample_listings(),
        }
    }

    pub fn with_listings(listings: Vec<Property>) -> Self {
        Self { listings }
    }

    /// Apply the query the way the remote API would
    pub fn filter(&self, query: &ListingQuery) -> Vec<Property> {
        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        self.listings
            .iter()
            .filter(|p| matches(query, p))
            .skip(offset)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for MockListingSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for MockListingSource {
    async fn search(&self, query: &ListingQuery) -> Result<Vec<Property>> {
        let results = self.filter(query);
        info!("📋 Mock source matched {} of {} listings", results.len(), self.listings.len());
        Ok(results)
    }

    fn source_name(&self) -> &'static str {
        "Mock"
    }
}

/// City is a case-insensitive substring; state and type match exactly
/// (ignoring case); numeric fields are thresholds.
pub(crate) fn matches(query: &ListingQuery, property: &Property) -> bool {
    if let Some(city) = &query.city {
        if !property.city.to_lowercase().contains(&city.to_lowercase()) {
            return false;
        }
    }
    if let Some(state) = &query.state {
        if !property.state.eq_ignore_ascii_case(state) {
            return false;
        }
    }
    if let Some(zip) = &query.zip_code {
        if property.zip_code.as_deref() != Some(zip.as_str()) {
            return false;
        }
    }
    if let Some(min) = query.min_price {
        if property.price < min {
            return false;
        }
    }
    if let Some(max) = query.max_price {
        if property.price > max {
            return false;
        }
    }
    if let Some(beds) = query.bedrooms {
        if property.bedrooms < beds {
            return false;
        }
    }
    if let Some(baths) = query.bathrooms {
        if property.bathrooms < baths {
            return false;
        }
    }
    if let Some(kind) = &query.property_type {
        if !property.property_type.eq_ignore_ascii_case(kind) {
            return false;
        }
    }
    debug!("Mock listing {} matches", property.id);
    true
}

#[allow(clippy::too_many_arguments)]
fn listing(
    id: &str,
    address: &str,
    (city, state, zip): (&str, &str, &str),
    property_type: &str,
    price: f64,
    (bedrooms, bathrooms, size): (u32, u32, f64),
    year_built: i32,
    amenities: &[&str],
    (latitude, longitude): (f64, f64),
) -> Property {
    Property {
        id: id.to_string(),
        source: Source::Mock,
        price,
        address: address.to_string(),
        city: city.to_string(),
        state: state.to_string(),
        zip_code: Some(zip.to_string()),
        property_type: property_type.to_string(),
        bedrooms,
        bathrooms,
        size,
        year_built: Some(year_built),
        amenities: amenities.iter().map(|a| a.to_string()).collect(),
        photos: vec![],
        description: Some(format!(
            "{} bed, {} bath {} in {}, {}.",
            bedrooms, bathrooms, property_type, city, state
        )),
        location: Some(Coordinates { latitude, longitude }),
    }
}

fn sample_listings() -> Vec<Property> {
    vec![
        listing(
            "1",
            "742 Evergreen Terrace",
            ("Springfield", "IL", "62704"),
            "Single Family",
            425_000.0,
            (4, 2, 2_200.0),
            1989,
            &["Swimming Pool", "Garage", "Fireplace"],
            (39.7817, -89.6501),
        ),
        listing(
            "2",
            "1600 Lakeshore Dr",
            ("Chicago", "IL", "60611"),
            "Condo",
            689_000.0,
            (2, 2, 1_350.0),
            2008,
            &["Gym", "Doorman", "Balcony"],
            (41.8947, -87.6167),
        ),
        listing(
            "3",
            "88 Congress Ave",
            ("Austin", "TX", "78701"),
            "Townhouse",
            515_000.0,
            (3, 3, 1_900.0),
            2015,
            &["Garage", "Rooftop Deck"],
            (30.2640, -97.7437),
        ),
        listing(
            "4",
            "12 Orchard Ln",
            ("Springfield", "MO", "65806"),
            "Single Family",
            289_000.0,
            (3, 1, 1_600.0),
            1974,
            &["Garden", "Garage"],
            (37.2090, -93.2923),
        ),
        listing(
            "5",
            "410 Pearl St",
            ("Denver", "CO", "80203"),
            "Apartment",
            375_000.0,
            (1, 1, 780.0),
            2019,
            &["Gymnastics Room", "In-Unit Laundry"],
            (39.7294, -104.9819),
        ),
        listing(
            "6",
            "5 Harbor View",
            ("San Diego", "CA", "92101"),
            "Condo",
            1_150_000.0,
            (3, 2, 1_750.0),
            2012,
            &["Pool", "Ocean View", "Parking"],
            (32.7157, -117.1611),
        ),
    ]
}
