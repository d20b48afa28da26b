//! Per-property AI content: one completion call, five bullet sections,
//! persisted in a single write together with the generated flag and timestamp.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, info};

use super::html::property_bullets;
use super::prompts::PROPERTY_PROMPT_TEMPLATE;
use crate::llm_client::prompts::{ANALYST_SYSTEM, JSON_ONLY_INSTRUCTION};
use crate::llm_client::CompletionProvider;
use crate::models::property::PropertyRow;

/// The five generated HTML blocks plus the generation timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyAiContent {
    pub key_highlights: String,
    pub investment_data: String,
    pub nearby_places: String,
    pub unique_features: String,
    pub lifestyle_benefits: String,
    pub generated_at: DateTime<Utc>,
}

impl PropertyAiContent {
    pub fn from_sections(data: &Value) -> Self {
        Self {
            key_highlights: property_bullets(data.get("key_highlights")),
            investment_data: property_bullets(data.get("investment_data")),
            nearby_places: property_bullets(data.get("nearby_places")),
            unique_features: property_bullets(data.get("unique_features")),
            lifestyle_benefits: property_bullets(data.get("lifestyle_benefits")),
            generated_at: Utc::now(),
        }
    }
}

/// Where generated content is written. The write must set all five blocks,
/// the generated flag and the timestamp together.
#[async_trait]
pub trait PropertyContentStore: Send + Sync {
    async fn save_ai_content(&self, property_id: i64, content: &PropertyAiContent) -> Result<()>;
}

#[async_trait]
impl PropertyContentStore for PgPool {
    async fn save_ai_content(&self, property_id: i64, content: &PropertyAiContent) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE properties
            SET ai_key_highlights = $1,
                ai_investment_data = $2,
                ai_nearby_places = $3,
                ai_unique_features = $4,
                ai_lifestyle_benefits = $5,
                ai_content_generated = TRUE,
                ai_generation_date = $6,
                updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&content.key_highlights)
        .bind(&content.investment_data)
        .bind(&content.nearby_places)
        .bind(&content.unique_features)
        .bind(&content.lifestyle_benefits)
        .bind(content.generated_at)
        .bind(property_id)
        .execute(self)
        .await?;
        Ok(())
    }
}

/// Formats a price with comma-separated thousands and no decimals.
pub fn format_price(price: f64) -> String {
    let rounded = price.round();
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if rounded < 0.0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn build_property_prompt(property: &PropertyRow) -> String {
    PROPERTY_PROMPT_TEMPLATE
        .replace("{name}", &property.name)
        .replace("{city}", &property.city)
        .replace("{price}", &format_price(property.price))
        .replace("{area}", &property.plot_area.to_string())
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}

/// Generates and stores AI content for one property.
///
/// Returns `true` only when the content was generated and written. Every
/// failure (no key, transport, non-200, bad JSON, write error) is logged and
/// reported as `false`; on failure nothing is written.
pub async fn generate_property_content(
    store: &dyn PropertyContentStore,
    llm: &dyn CompletionProvider,
    property: &PropertyRow,
) -> bool {
    if !llm.is_configured() {
        error!("LLM API key not configured; skipping AI content for property {}", property.id);
        return false;
    }

    info!("Generating AI content for property: {}", property.name);

    let data = match llm
        .complete_json(&build_property_prompt(property), ANALYST_SYSTEM)
        .await
    {
        Ok(data) => data,
        Err(e) => {
            error!("AI content generation failed for property {}: {e}", property.id);
            return false;
        }
    };

    let Some(sections) = data.as_object() else {
        error!(
            "Malformed AI data for property {}: expected a JSON object, got {data}",
            property.id
        );
        return false;
    };
    info!("Parsed AI data with keys: {:?}", sections.keys().collect::<Vec<_>>());

    let content = PropertyAiContent::from_sections(&data);

    match store.save_ai_content(property.id, &content).await {
        Ok(()) => {
            info!("AI content saved for property: {}", property.name);
            true
        }
        Err(e) => {
            error!("Failed to save AI content for property {}: {e:#}", property.id);
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::Utc;

    use crate::models::property::PropertyRow;

    pub fn sample_property() -> PropertyRow {
        let now = Utc::now();
        PropertyRow {
            id: 7,
            name: "Green Meadows Plot".into(),
            short_description: Some("East-facing residential plot".into()),
            detailed_description: None,
            category_id: Some(1),
            is_featured: true,
            price: 4_500_000.0,
            plot_area: 1200.0,
            price_per_sqft: 3750.0,
            currency: "INR".into(),
            facing_direction: "east".into(),
            road_width: 30.0,
            title_status: "clear".into(),
            property_website_url: None,
            image_key: None,
            street: Some("Survey No. 42".into()),
            street2: None,
            city: "Pune".into(),
            zip_code: "411045".into(),
            state: Some("Maharashtra".into()),
            country: Some("India".into()),
            emi_available: true,
            registration_charges: 7.0,
            registration_amount: 315_000.0,
            water_connection: true,
            electricity_connection: true,
            drainage_facility: true,
            gated_community: false,
            latitude: Some(18.56),
            longitude: Some(73.77),
            date_localization: Some(now.date_naive()),
            contact_name: "R. Kulkarni".into(),
            contact_phone: "+91 90000 00000".into(),
            contact_email: "sales@example.com".into(),
            seo_title: "Plot in Baner".into(),
            seo_description: None,
            agent_id: None,
            is_published: true,
            views: 0,
            last_viewed: None,
            nearby_landmarks: "Baner Hill".into(),
            ai_key_highlights: None,
            ai_investment_data: None,
            ai_nearby_places: None,
            ai_unique_features: None,
            ai_lifestyle_benefits: None,
            ai_content_generated: false,
            ai_generation_date: None,
            created_at: now,
            updated_at: now,
        }
    }
}
