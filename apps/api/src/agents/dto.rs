use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::agent::{Designation, ExpertiseLevel};

fn default_rating() -> f64 {
    5.0
}

fn default_true() -> bool {
    true
}

fn default_languages() -> Option<String> {
    Some("English, Hindi".to_string())
}

fn email_has_at(email: &str) -> Result<(), ValidationError> {
    if email.contains('@') {
        Ok(())
    } else {
        let mut err = ValidationError::new("email");
        err.message = Some("Please enter a valid email address".into());
        Err(err)
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAgentRequest {
    #[validate(length(min = 1, message = "Agent name is required"))]
    pub name: String,
    #[serde(default)]
    pub designation: Designation,
    #[serde(default)]
    pub expertise_level: ExpertiseLevel,
    #[validate(custom = "email_has_at")]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    pub whatsapp: Option<String>,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub license_number: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "Experience cannot be negative"))]
    pub experience_years: i32,
    #[serde(default)]
    pub total_sales_volume: f64,
    #[serde(default)]
    pub total_deals: i32,
    #[serde(default = "default_rating")]
    #[validate(range(min = 0.0, max = 5.0, message = "Rating must be between 0 and 5"))]
    pub avg_rating: f64,
    #[serde(default)]
    pub review_count: i32,
    pub short_bio: Option<String>,
    #[serde(default = "default_languages")]
    pub languages_spoken: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_accepting_clients: bool,
    pub linkedin_url: Option<String>,
    pub facebook_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(overrides: serde_json::Value) -> CreateAgentRequest {
        let mut base = json!({
            "name": "Meera Joshi",
            "email": "meera@example.com",
            "phone": "+91 98220 00000",
            "city": "Pune"
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), overrides.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        serde_json::from_value(base).unwrap()
    }

    #[test]
    fn test_defaults() {
        let req = request(json!({}));
        assert!(req.validate().is_ok());
        assert_eq!(req.designation, Designation::Agent);
        assert_eq!(req.expertise_level, ExpertiseLevel::Standard);
        assert_eq!(req.avg_rating, 5.0);
        assert_eq!(req.languages_spoken.as_deref(), Some("English, Hindi"));
        assert!(req.is_active && req.is_accepting_clients);
    }

    #[test]
    fn test_email_without_at_rejected() {
        let req = request(json!({"email": "meera.example.com"}));
        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("email"));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        assert!(request(json!({"avg_rating": 5.5})).validate().is_err());
        assert!(request(json!({"avg_rating": -0.1})).validate().is_err());
        assert!(request(json!({"avg_rating": 0.0})).validate().is_ok());
    }

    #[test]
    fn test_designation_parses_snake_case() {
        let req = request(json!({"designation": "principal_agent", "expertise_level": "luxury"}));
        assert_eq!(req.designation, Designation::PrincipalAgent);
        assert_eq!(req.expertise_level.as_str(), "luxury");
    }
}
