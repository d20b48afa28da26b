use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Designation {
    #[default]
    Agent,
    SeniorAgent,
    PrincipalAgent,
    Broker,
}

impl Designation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Designation::Agent => "agent",
            Designation::SeniorAgent => "senior_agent",
            Designation::PrincipalAgent => "principal_agent",
            Designation::Broker => "broker",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ExpertiseLevel {
    #[default]
    Standard,
    Luxury,
}

impl ExpertiseLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpertiseLevel::Standard => "standard",
            ExpertiseLevel::Luxury => "luxury",
        }
    }
}

/// An agent together with `active_property_count`, which is never stored:
/// every query computes it from the published properties that reference the agent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AgentRow {
    pub id: i64,
    pub name: String,
    pub designation: String,
    pub expertise_level: String,
    pub email: String,
    pub phone: String,
    pub whatsapp: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub license_number: Option<String>,
    pub experience_years: i32,
    pub total_sales_volume: f64,
    pub total_deals: i32,
    pub avg_rating: f64,
    pub review_count: i32,
    pub short_bio: Option<String>,
    pub languages_spoken: Option<String>,
    pub is_active: bool,
    pub is_accepting_clients: bool,
    pub linkedin_url: Option<String>,
    pub facebook_url: Option<String>,
    pub active_property_count: i64,
    pub created_at: DateTime<Utc>,
}
