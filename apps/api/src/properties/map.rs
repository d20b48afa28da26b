//! View models for the public pages: map markers, listing cards, detail page.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::insights::CityInvestmentInfo;
use crate::models::agent::AgentRow;
use crate::models::property::PropertyRow;
use crate::properties::repository::PropertyWithCategory;
use crate::storage::ObjectStorage;

/// Marker colours, handed out to categories in first-seen order.
pub const MARKER_PALETTE: [&str; 8] = [
    "#059669", "#dc2626", "#7c3aed", "#ea580c", "#2563eb", "#d97706", "#0891b2", "#9333ea",
];

/// Category label used when a property has none.
pub const DEFAULT_CATEGORY: &str = "Property";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapMarker {
    pub id: i64,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub street: String,
    pub city: String,
    pub zip_code: String,
    pub price: f64,
    pub contact_phone: String,
    pub contact_email: String,
    pub contact_name: String,
    pub short_description: String,
    pub image_url: Option<String>,
    pub property_type: String,
    pub nearby_landmarks: String,
    pub views: i32,
    pub seo_title: String,
    pub marker_color: String,
    pub full_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MapPageResponse {
    pub property_count: usize,
    pub properties: Vec<MapMarker>,
    pub category_colors: BTreeMap<String, String>,
    pub city_list: Vec<String>,
    pub selected_city: String,
    pub featured_properties: Vec<PropertyCard>,
    pub city_investment_info: Option<CityInvestmentInfo>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PropertyCard {
    pub id: i64,
    pub name: String,
    pub image_url: Option<String>,
    pub category: String,
    pub price: f64,
    pub plot_area: f64,
    pub price_per_sqft: f64,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingPageResponse {
    pub properties: Vec<PropertyCard>,
    pub search: String,
    pub city: String,
    pub zip_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDetailResponse {
    pub property: PropertyRow,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub gallery: Vec<String>,
    pub image_count: usize,
    pub agent: Option<AgentRow>,
}

/// Assigns palette colours to categories in the order they are first seen.
#[derive(Debug, Default)]
pub struct CategoryColors {
    assigned: HashMap<String, String>,
}

impl CategoryColors {
    pub fn color_for(&mut self, category: &str) -> String {
        let next = self.assigned.len();
        self.assigned
            .entry(category.to_string())
            .or_insert_with(|| MARKER_PALETTE[next % MARKER_PALETTE.len()].to_string())
            .clone()
    }

    pub fn into_map(self) -> BTreeMap<String, String> {
        self.assigned.into_iter().collect()
    }
}

/// Cover image if present, otherwise the first gallery image.
fn image_url(entry: &PropertyWithCategory, storage: &ObjectStorage) -> Option<String> {
    entry
        .property
        .image_key
        .as_deref()
        .or(entry.gallery_key.as_deref())
        .map(|key| storage.public_url(key))
}

pub fn full_address(property: &PropertyRow) -> String {
    [
        property.street.as_deref().unwrap_or_default(),
        property.city.as_str(),
        property.zip_code.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

/// Builds markers for geolocated properties; rows without coordinates are skipped.
pub fn build_markers(
    entries: &[PropertyWithCategory],
    storage: &ObjectStorage,
) -> (Vec<MapMarker>, BTreeMap<String, String>) {
    let mut colors = CategoryColors::default();
    let markers = entries
        .iter()
        .filter_map(|entry| {
            let p = &entry.property;
            let (latitude, longitude) = (p.latitude?, p.longitude?);
            let category = entry
                .category_name
                .clone()
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
            let marker_color = colors.color_for(&category);
            Some(MapMarker {
                id: p.id,
                name: p.name.clone(),
                latitude,
                longitude,
                street: p.street.clone().unwrap_or_default(),
                city: p.city.clone(),
                zip_code: p.zip_code.clone(),
                price: p.price,
                contact_phone: p.contact_phone.clone(),
                contact_email: p.contact_email.clone(),
                contact_name: p.contact_name.clone(),
                short_description: p.short_description.clone().unwrap_or_default(),
                image_url: image_url(entry, storage),
                property_type: category,
                nearby_landmarks: p.nearby_landmarks.clone(),
                views: p.views,
                seo_title: p.seo_title.clone(),
                marker_color,
                full_address: full_address(p),
            })
        })
        .collect();
    (markers, colors.into_map())
}

/// The selected city, if it is one of the cities with published listings.
pub fn known_city<'a>(selected: Option<&'a str>, city_list: &[String]) -> Option<&'a str> {
    selected.filter(|city| city_list.iter().any(|known| known == city))
}

pub fn build_card(entry: &PropertyWithCategory, storage: &ObjectStorage) -> PropertyCard {
    let p = &entry.property;
    PropertyCard {
        id: p.id,
        name: p.name.clone(),
        image_url: p.image_key.as_deref().map(|key| storage.public_url(key)),
        category: entry.category_name.clone().unwrap_or_default(),
        price: p.price,
        plot_area: p.plot_area,
        price_per_sqft: p.price_per_sqft,
        city: p.city.clone(),
        zip_code: p.zip_code.clone(),
    }
}
