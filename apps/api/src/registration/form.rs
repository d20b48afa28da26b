use std::collections::HashMap;

use serde::Serialize;
use validator::Validate;

use crate::errors::AppError;
use crate::uploads::IMAGES_FIELD;

/// Text fields of a registration submission.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct RegistrationForm {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_number: String,
    pub place: Option<String>,
    pub category: Option<String>,
    #[validate(range(min = 0.0, message = "Area cannot be negative"))]
    pub sq_yards: Option<f64>,
    #[validate(range(min = 0.0, message = "Price cannot be negative"))]
    pub price: Option<f64>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
}

fn text(fields: &HashMap<String, String>, key: &str) -> Option<String> {
    fields
        .get(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn number(fields: &HashMap<String, String>, key: &str) -> Result<Option<f64>, AppError> {
    text(fields, key)
        .map(|v| {
            v.replace(',', "")
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .ok_or_else(|| AppError::Validation(format!("{key} must be a number, got '{v}'")))
        })
        .transpose()
}

impl RegistrationForm {
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, AppError> {
        let form = Self {
            customer_name: text(fields, "customer_name").unwrap_or_default(),
            phone_number: text(fields, "phone_number").unwrap_or_default(),
            place: text(fields, "place"),
            category: text(fields, "category"),
            sq_yards: number(fields, "sq_yards")?,
            price: number(fields, "price")?,
            location: text(fields, "location"),
            city: text(fields, "city"),
            state: text(fields, "state"),
        };
        form.validate()?;
        Ok(form)
    }
}

/// Describes the public registration form.
#[derive(Debug, Clone, Serialize)]
pub struct FormDescriptor {
    pub action: &'static str,
    pub method: &'static str,
    pub enctype: &'static str,
    pub fields: Vec<FormField>,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub name: &'static str,
    pub kind: &'static str,
    pub required: bool,
}

impl FormDescriptor {
    pub fn new(categories: Vec<String>) -> Self {
        let field = |name, kind, required| FormField {
            name,
            kind,
            required,
        };
        Self {
            action: "/property/submit",
            method: "POST",
            enctype: "multipart/form-data",
            fields: vec![
                field("customer_name", "text", true),
                field("phone_number", "tel", true),
                field("place", "text", false),
                field("category", "select", false),
                field("sq_yards", "number", false),
                field("price", "number", false),
                field("location", "text", false),
                field("city", "text", false),
                field("state", "text", false),
                field(IMAGES_FIELD, "file[]", false),
            ],
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parses_text_and_numbers() {
        let form = RegistrationForm::from_fields(&fields(&[
            ("customer_name", " Sunil Pawar "),
            ("phone_number", "9876543210"),
            ("sq_yards", "240"),
            ("price", "1,250,000"),
            ("city", "Satara"),
            ("place", ""),
        ]))
        .unwrap();

        assert_eq!(form.customer_name, "Sunil Pawar");
        assert_eq!(form.sq_yards, Some(240.0));
        assert_eq!(form.price, Some(1_250_000.0));
        assert_eq!(form.city.as_deref(), Some("Satara"));
        assert_eq!(form.place, None);
    }

    #[test]
    fn test_missing_customer_name_rejected() {
        let result = RegistrationForm::from_fields(&fields(&[("phone_number", "9876543210")]));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[test]
    fn test_non_numeric_price_rejected() {
        let result = RegistrationForm::from_fields(&fields(&[
            ("customer_name", "Sunil"),
            ("phone_number", "9876543210"),
            ("price", "twelve lakh"),
        ]));
        assert!(matches!(result, Err(AppError::Validation(msg)) if msg.contains("price")));
    }

    #[test]
    fn test_non_finite_numbers_rejected() {
        for bad in ["NaN", "inf", "-infinity"] {
            let result = RegistrationForm::from_fields(&fields(&[
                ("customer_name", "Sunil"),
                ("phone_number", "9876543210"),
                ("sq_yards", bad),
            ]));
            assert!(
                matches!(result, Err(AppError::Validation(ref msg)) if msg.contains("sq_yards")),
                "{bad} accepted"
            );
        }
    }
}
