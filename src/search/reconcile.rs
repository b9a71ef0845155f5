use crate::models::{Property, PropertyView};
use std::collections::{BTreeSet, HashSet};

/// Keep properties that satisfy every required amenity.
///
/// A requirement is met when any of the property's own tags contains it as a
/// case-insensitive substring ("pool" matches "Swimming Pool"). Input order
/// is preserved.
pub fn filter_by_amenities(properties: Vec<Property>, required: &BTreeSet<String>) -> Vec<Property> {
    if required.is_empty() {
        return properties;
    }

    let required: Vec<String> = required.iter().map(|r| r.to_lowercase()).collect();

    properties
        .into_iter()
        .filter(|property| {
            let tags: Vec<String> = property.amenities.iter().map(|t| t.to_lowercase()).collect();
            required
                .iter()
                .all(|req| tags.iter().any(|tag| tag.contains(req.as_str())))
        })
        .collect()
}

/// Attach favorite state to each property, preserving order
pub fn merge_favorites(properties: Vec<Property>, favorite_ids: &HashSet<String>) -> Vec<PropertyView> {
    properties
        .into_iter()
        .map(|property| {
            let is_favorite = favorite_ids.contains(&property.id);
            PropertyView {
                property,
                is_favorite,
            }
        })
        .collect()
}

pub fn reconcile(
    properties: Vec<Property>,
    required_amenities: &BTreeSet<String>,
    favorite_ids: &HashSet<String>,
) -> Vec<PropertyView> {
    merge_favorites(filter_by_amenities(properties, required_amenities), favorite_ids)
}
