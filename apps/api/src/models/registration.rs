use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationRow {
    pub id: i64,
    pub customer_name: String,
    pub phone_number: String,
    pub place: Option<String>,
    pub category: Option<String>,
    pub sq_yards: Option<f64>,
    pub price: Option<f64>,
    pub location: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub status: String,
    /// Object key of the primary image (first uploaded file).
    pub image_key: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A non-primary upload attached to a registration submission.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegistrationAttachmentRow {
    pub id: i64,
    pub registration_id: i64,
    pub file_name: String,
    pub s3_key: String,
    pub mime_type: Option<String>,
    pub created_at: DateTime<Utc>,
}
