use chrono::Utc;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::property::{FacingDirection, PropertyRow, TitleStatus};
use crate::properties::pricing::{price_per_sqft, registration_amount};

fn default_true() -> bool {
    true
}

fn default_registration_charges() -> f64 {
    7.0
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePropertyRequest {
    #[validate(length(min = 1, message = "Property name is required"))]
    pub name: String,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub category_id: Option<i64>,
    #[serde(default)]
    pub is_featured: bool,

    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: f64,
    #[validate(range(min = 0.0, message = "Plot area cannot be negative"))]
    pub plot_area: f64,
    pub facing_direction: FacingDirection,
    #[validate(range(min = 0.0, message = "Road width cannot be negative"))]
    pub road_width: f64,
    pub title_status: TitleStatus,
    pub property_website_url: Option<String>,

    pub street: Option<String>,
    pub street2: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "ZIP code is required"))]
    pub zip_code: String,
    pub state: Option<String>,
    pub country: Option<String>,

    #[serde(default = "default_true")]
    pub emi_available: bool,
    #[serde(default = "default_registration_charges")]
    #[validate(range(min = 0.0, max = 100.0, message = "Registration charges must be a percentage"))]
    pub registration_charges: f64,

    #[serde(default = "default_true")]
    pub water_connection: bool,
    #[serde(default = "default_true")]
    pub electricity_connection: bool,
    #[serde(default = "default_true")]
    pub drainage_facility: bool,
    #[serde(default)]
    pub gated_community: bool,

    #[validate(length(min = 1, message = "Contact person is required"))]
    pub contact_name: String,
    #[validate(length(min = 1, message = "Contact phone is required"))]
    pub contact_phone: String,
    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: String,

    #[validate(length(min = 1, message = "SEO title is required"))]
    pub seo_title: String,
    pub seo_description: Option<String>,
    pub agent_id: Option<i64>,
    #[validate(length(min = 1, message = "Nearby landmarks are required"))]
    pub nearby_landmarks: String,
    #[serde(default)]
    pub is_published: bool,
}

impl CreatePropertyRequest {
    /// Builds an unsaved row with derived pricing filled in. `id` and the
    /// timestamps are placeholders replaced by the INSERT.
    pub fn into_draft(self, default_country: &str) -> PropertyRow {
        let now = Utc::now();
        let mut row = PropertyRow {
            id: 0,
            name: self.name,
            short_description: self.short_description,
            detailed_description: self.detailed_description,
            category_id: self.category_id,
            is_featured: self.is_featured,
            price: self.price,
            plot_area: self.plot_area,
            price_per_sqft: 0.0,
            currency: "INR".to_string(),
            facing_direction: self.facing_direction.as_str().to_string(),
            road_width: self.road_width,
            title_status: self.title_status.as_str().to_string(),
            property_website_url: self.property_website_url,
            image_key: None,
            street: self.street,
            street2: self.street2,
            city: self.city,
            zip_code: self.zip_code,
            state: self.state,
            country: self.country.or_else(|| Some(default_country.to_string())),
            emi_available: self.emi_available,
            registration_charges: self.registration_charges,
            registration_amount: 0.0,
            water_connection: self.water_connection,
            electricity_connection: self.electricity_connection,
            drainage_facility: self.drainage_facility,
            gated_community: self.gated_community,
            latitude: None,
            longitude: None,
            date_localization: None,
            contact_name: self.contact_name,
            contact_phone: self.contact_phone,
            contact_email: self.contact_email,
            seo_title: self.seo_title,
            seo_description: self.seo_description,
            agent_id: self.agent_id,
            is_published: self.is_published,
            views: 0,
            last_viewed: None,
            nearby_landmarks: self.nearby_landmarks,
            ai_key_highlights: None,
            ai_investment_data: None,
            ai_nearby_places: None,
            ai_unique_features: None,
            ai_lifestyle_benefits: None,
            ai_content_generated: false,
            ai_generation_date: None,
            created_at: now,
            updated_at: now,
        };
        recompute_pricing(&mut row);
        row
    }
}

/// Partial update. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 1, message = "Property name cannot be empty"))]
    pub name: Option<String>,
    pub short_description: Option<String>,
    pub detailed_description: Option<String>,
    pub category_id: Option<i64>,
    pub is_featured: Option<bool>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, message = "Plot area cannot be negative"))]
    pub plot_area: Option<f64>,
    pub facing_direction: Option<FacingDirection>,
    pub road_width: Option<f64>,
    pub title_status: Option<TitleStatus>,
    pub property_website_url: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "ZIP code cannot be empty"))]
    pub zip_code: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub emi_available: Option<bool>,
    #[validate(range(min = 0.0, max = 100.0, message = "Registration charges must be a percentage"))]
    pub registration_charges: Option<f64>,
    pub water_connection: Option<bool>,
    pub electricity_connection: Option<bool>,
    pub drainage_facility: Option<bool>,
    pub gated_community: Option<bool>,
    pub contact_name: Option<String>,
    pub contact_phone: Option<String>,
    #[validate(email(message = "Contact email is invalid"))]
    pub contact_email: Option<String>,
    pub seo_title: Option<String>,
    pub seo_description: Option<String>,
    pub agent_id: Option<i64>,
    pub nearby_landmarks: Option<String>,
}

/// What an update touched, so the caller knows which derived passes to rerun.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateEffects {
    pub address_changed: bool,
}

fn set<T: PartialEq>(target: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) if *target != v => {
            *target = v;
            true
        }
        _ => false,
    }
}

fn set_opt<T: PartialEq>(target: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(v) if target.as_ref() != Some(&v) => {
            *target = Some(v);
            true
        }
        _ => false,
    }
}

impl UpdatePropertyRequest {
    /// Merges the update into `row` and recomputes derived pricing.
    pub fn apply(self, row: &mut PropertyRow) -> UpdateEffects {
        set(&mut row.name, self.name);
        set_opt(&mut row.short_description, self.short_description);
        set_opt(&mut row.detailed_description, self.detailed_description);
        set_opt(&mut row.category_id, self.category_id);
        set(&mut row.is_featured, self.is_featured);
        set(&mut row.price, self.price);
        set(&mut row.plot_area, self.plot_area);
        set(
            &mut row.facing_direction,
            self.facing_direction.map(|d| d.as_str().to_string()),
        );
        set(&mut row.road_width, self.road_width);
        set(
            &mut row.title_status,
            self.title_status.map(|t| t.as_str().to_string()),
        );
        set_opt(&mut row.property_website_url, self.property_website_url);

        let mut address_changed = false;
        address_changed |= set_opt(&mut row.street, self.street);
        address_changed |= set_opt(&mut row.street2, self.street2);
        address_changed |= set(&mut row.city, self.city);
        address_changed |= set(&mut row.zip_code, self.zip_code);
        address_changed |= set_opt(&mut row.state, self.state);
        address_changed |= set_opt(&mut row.country, self.country);

        set(&mut row.emi_available, self.emi_available);
        set(&mut row.registration_charges, self.registration_charges);
        set(&mut row.water_connection, self.water_connection);
        set(&mut row.electricity_connection, self.electricity_connection);
        set(&mut row.drainage_facility, self.drainage_facility);
        set(&mut row.gated_community, self.gated_community);
        set(&mut row.contact_name, self.contact_name);
        set(&mut row.contact_phone, self.contact_phone);
        set(&mut row.contact_email, self.contact_email);
        set(&mut row.seo_title, self.seo_title);
        set_opt(&mut row.seo_description, self.seo_description);
        set_opt(&mut row.agent_id, self.agent_id);
        set(&mut row.nearby_landmarks, self.nearby_landmarks);

        recompute_pricing(row);
        UpdateEffects { address_changed }
    }
}

pub fn recompute_pricing(row: &mut PropertyRow) {
    row.price_per_sqft = price_per_sqft(row.price, row.plot_area);
    row.registration_amount = registration_amount(row.price, row.registration_charges);
}

/// Toast-style result of the regenerate action.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Notification {
    pub fn for_regeneration(success: bool) -> Self {
        if success {
            Self {
                title: "Success".into(),
                message: "AI content regenerated successfully!".into(),
                kind: "success".into(),
            }
        } else {
            Self {
                title: "Error".into(),
                message: "Failed to generate AI content. Check logs.".into(),
                kind: "danger".into(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::property_content::test_support::sample_property;

    #[test]
    fn test_price_change_recomputes_derived_fields() {
        let mut row = sample_property();
        let effects = UpdatePropertyRequest {
            price: Some(6_000_000.0),
            ..Default::default()
        }
        .apply(&mut row);

        assert!(!effects.address_changed);
        assert_eq!(row.price_per_sqft, 5000.0);
        assert_eq!(row.registration_amount, 420_000.0);
    }

    #[test]
    fn test_zero_area_update_zeroes_price_per_sqft() {
        let mut row = sample_property();
        UpdatePropertyRequest {
            plot_area: Some(0.0),
            ..Default::default()
        }
        .apply(&mut row);
        assert_eq!(row.price_per_sqft, 0.0);
    }

    #[test]
    fn test_address_change_detected() {
        let mut row = sample_property();
        let effects = UpdatePropertyRequest {
            street2: Some("Near Balewadi Stadium".into()),
            ..Default::default()
        }
        .apply(&mut row);
        assert!(effects.address_changed);
    }

    #[test]
    fn test_same_address_value_is_not_a_change() {
        let mut row = sample_property();
        let effects = UpdatePropertyRequest {
            city: Some("Pune".into()),
            ..Default::default()
        }
        .apply(&mut row);
        assert!(!effects.address_changed);
    }

    #[test]
    fn test_create_request_fills_defaults() {
        let request: CreatePropertyRequest = serde_json::from_value(serde_json::json!({
            "name": "Riverside Plot",
            "price": 2_000_000.0,
            "plot_area": 800.0,
            "facing_direction": "north",
            "road_width": 20.0,
            "title_status": "rera",
            "city": "Nashik",
            "zip_code": "422001",
            "contact_name": "A. Patil",
            "contact_phone": "9000000000",
            "contact_email": "patil@example.com",
            "seo_title": "Riverside plot in Nashik",
            "nearby_landmarks": "Godavari ghat"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let row = request.into_draft("India");
        assert_eq!(row.country.as_deref(), Some("India"));
        assert_eq!(row.registration_charges, 7.0);
        assert_eq!(row.price_per_sqft, 2500.0);
        assert_eq!(row.registration_amount, 140_000.0);
        assert!(row.emi_available && row.water_connection);
        assert!(!row.is_published);
        assert!(!row.ai_content_generated);
    }

    #[test]
    fn test_invalid_contact_email_rejected() {
        let update = UpdatePropertyRequest {
            contact_email: Some("not-an-email".into()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_regeneration_notifications() {
        assert_eq!(Notification::for_regeneration(true).kind, "success");
        assert_eq!(Notification::for_regeneration(false).kind, "danger");
    }
}
