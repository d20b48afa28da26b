use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::geo::Address;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FacingDirection {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl FacingDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            FacingDirection::North => "north",
            FacingDirection::South => "south",
            FacingDirection::East => "east",
            FacingDirection::West => "west",
            FacingDirection::Northeast => "northeast",
            FacingDirection::Northwest => "northwest",
            FacingDirection::Southeast => "southeast",
            FacingDirection::Southwest => "southwest",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TitleStatus {
    Clear,
    Registered,
    Rera,
    Dtcp,
    Hmda,
    Patta,
    Pending,
}

impl TitleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleStatus::Clear => "clear",
            TitleStatus::Registered => "registered",
            TitleStatus::Rera => "rera",
            TitleStatus::Dtcp => "dtcp",
            TitleStatus::Hmda => "hmda",
            TitleStatus::Patta => "patta",
            TitleStatus::Pending => "pending",
        }
    }
}

/// A listed property as stored in `properties`.
///
/// `price_per_sqft` and `registration_amount` are derived (see `properties::pricing`)
/// and rewritten by every insert/update. `latitude`, `longitude` and
/// `date_localization` are set or cleared together by the geolocation pass.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyRow {
    pub id: i64,
    pub name: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub category_id: Option<i64>,
    pub is_featured: bool,

    pub price: f64,
    pub plot_area: f64,
    pub price_per_sqft: f64,
    pub currency: String,
    pub facing_direction: String,
    pub road_width: f64,
    pub title_status: String,
    pub property_website_url: Option<String>,
    pub image_key: Option<String>,

    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: String,
    pub zip_code: String,
    pub state: Option<String>,
    pub country: Option<String>,

    pub emi_available: bool,
    pub registration_charges: f64,
    pub registration_amount: f64,

    pub water_connection: bool,
    pub electricity_connection: bool,
    pub drainage_facility: bool,
    pub gated_community: bool,

    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub date_localization: Option<NaiveDate>,

    pub contact_name: String,
    pub contact_phone: String,
    pub contact_email: String,

    pub seo_title: String,
    pub seo_description: Option<String>,
    pub agent_id: Option<i64>,

    pub is_published: bool,
    pub views: i32,
    pub last_viewed: Option<DateTime<Utc>>,
    pub nearby_landmarks: String,

    // AI content: written together, only after a successful completion call.
    pub ai_key_highlights: Option<String>,
    pub ai_investment_data: Option<String>,
    pub ai_nearby_places: Option<String>,
    pub ai_unique_features: Option<String>,
    pub ai_lifestyle_benefits: Option<String>,
    pub ai_content_generated: bool,
    pub ai_generation_date: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PropertyRow {
    pub fn address(&self) -> Address {
        Address {
            street: self.street.clone(),
            street2: self.street2.clone(),
            city: Some(self.city.clone()),
            zip_code: Some(self.zip_code.clone()),
            state: self.state.clone(),
            country: self.country.clone(),
        }
    }
}

/// A gallery image attached to a property.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PropertyImageRow {
    pub id: i64,
    pub property_id: i64,
    pub s3_key: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_direction_round_trips_snake_case() {
        let d: FacingDirection = serde_json::from_str("\"northeast\"").unwrap();
        assert_eq!(d, FacingDirection::Northeast);
        assert_eq!(d.as_str(), "northeast");
    }

    #[test]
    fn test_unknown_title_status_rejected() {
        let result: Result<TitleStatus, _> = serde_json::from_str("\"freehold\"");
        assert!(result.is_err());
    }
}
