use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

/// Raw search form state, exactly as the user typed it
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterForm {
    pub location: String,
    pub min_price: String,
    pub max_price: String,
    pub property_type: String,
    pub min_bedrooms: String,
    pub min_bathrooms: String,
    pub amenities: BTreeSet<String>,
}

/// Canonical filter with every default resolved
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Free text; empty means any location
    pub location: String,
    pub min_price: f64,
    /// `None` is unbounded
    pub max_price: Option<f64>,
    /// Empty means any type
    pub property_type: String,
    pub min_bedrooms: u32,
    pub min_bathrooms: u32,
    /// Required tags; empty means no constraint
    pub amenities: BTreeSet<String>,
}

impl FilterForm {
    /// Resolve the form into a canonical filter.
    ///
    /// Never fails: any field that does not parse falls back to its
    /// unconstrained default. A min price above the max price is passed
    /// through as-is and simply matches nothing.
    pub fn normalize(&self) -> SearchFilters {
        SearchFilters {
            location: self.location.trim().to_string(),
            min_price: parse_price(&self.min_price).unwrap_or(0.0),
            max_price: parse_price(&self.max_price),
            property_type: self.property_type.trim().to_string(),
            min_bedrooms: parse_count(&self.min_bedrooms),
            min_bathrooms: parse_count(&self.min_bathrooms),
            amenities: self
                .amenities
                .iter()
                .map(|a| a.trim())
                .filter(|a| !a.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }

    /// Select the tag if absent, deselect it if present
    pub fn toggle_amenity(&mut self, tag: &str) {
        let tag = tag.trim();
        if tag.is_empty() {
            return;
        }
        if !self.amenities.remove(tag) {
            self.amenities.insert(tag.to_string());
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn parse_price(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match f64::from_str(raw) {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => {
            debug!("Ignoring unparseable price '{}'", raw);
            None
        }
    }
}

fn parse_count(raw: &str) -> u32 {
    let raw = raw.trim();
    if raw.is_empty() {
        return 0;
    }
    match f64::from_str(raw) {
        Ok(value) if value.is_finite() && value >= 0.0 => value.floor() as u32,
        _ => {
            debug!("Ignoring unparseable count '{}'", raw);
            0
        }
    }
}
