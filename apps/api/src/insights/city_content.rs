//! City investment copy: cache first, otherwise one completion call.
//!
//! Flow: blank city → None; cache hit → cached content; no API key →
//! placeholder payload (flag false); otherwise call → convert → cache → return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use super::cache::CityInsightCache;
use super::html::city_bullets;
use super::prompts::{
    CITY_NOT_CONFIGURED_GROWTH, CITY_NOT_CONFIGURED_OTHER, CITY_NOT_CONFIGURED_REASONS,
    CITY_PROMPT_TEMPLATE,
};
use crate::llm_client::prompts::{ANALYST_SYSTEM, JSON_ONLY_INSTRUCTION};
use crate::llm_client::CompletionProvider;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityInvestmentInfo {
    pub city: String,
    pub ai_investment_reasons: String,
    pub ai_growth_potential: String,
    pub ai_infrastructure: String,
    pub ai_market_trends: String,
    pub ai_content_generated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<DateTime<Utc>>,
}

impl CityInvestmentInfo {
    /// Success-shaped payload telling the reader the provider is not configured.
    pub fn not_configured(city: &str) -> Self {
        Self {
            city: city.to_string(),
            ai_investment_reasons: CITY_NOT_CONFIGURED_REASONS.to_string(),
            ai_growth_potential: CITY_NOT_CONFIGURED_GROWTH.to_string(),
            ai_infrastructure: CITY_NOT_CONFIGURED_OTHER.to_string(),
            ai_market_trends: CITY_NOT_CONFIGURED_OTHER.to_string(),
            ai_content_generated: false,
            generated_at: None,
        }
    }

    fn from_sections(city: &str, data: &Value) -> Self {
        Self {
            city: city.to_string(),
            ai_investment_reasons: city_bullets(data.get("investment_reasons")),
            ai_growth_potential: city_bullets(data.get("growth_potential")),
            ai_infrastructure: city_bullets(data.get("infrastructure")),
            ai_market_trends: city_bullets(data.get("market_trends")),
            ai_content_generated: true,
            generated_at: Some(Utc::now()),
        }
    }
}

pub fn build_city_prompt(city: &str) -> String {
    CITY_PROMPT_TEMPLATE
        .replace("{city}", city)
        .replace("{json_only}", JSON_ONLY_INSTRUCTION)
}

/// Returns investment copy for `city`, or `None` when the city is blank or
/// generation failed. Failures are logged, never returned.
pub async fn get_city_investment_info(
    cache: &dyn CityInsightCache,
    llm: &dyn CompletionProvider,
    city: &str,
) -> Option<CityInvestmentInfo> {
    if city.trim().is_empty() {
        return None;
    }

    match cache.get(city).await {
        Ok(Some(cached)) => {
            info!("Found cached city data for {city}");
            return Some(cached);
        }
        Ok(None) => {}
        Err(e) => warn!("City cache lookup failed for {city}, regenerating: {e:#}"),
    }

    if !llm.is_configured() {
        error!("LLM API key not configured");
        return Some(CityInvestmentInfo::not_configured(city));
    }

    info!("Generating city investment data for: {city}");

    let data = match llm
        .complete_json(&build_city_prompt(city), ANALYST_SYSTEM)
        .await
    {
        Ok(data) => data,
        Err(e) => {
            error!("City investment generation failed for {city}: {e}");
            return None;
        }
    };

    let Some(sections) = data.as_object() else {
        error!("Malformed city data for {city}: expected a JSON object, got {data}");
        return None;
    };
    info!(
        "Parsed city data with keys: {:?}",
        sections.keys().collect::<Vec<_>>()
    );

    let info = CityInvestmentInfo::from_sections(city, &data);

    match cache.put(city, &info).await {
        Ok(()) => info!("Cached city data for {city}"),
        Err(e) => warn!("Failed to cache city data for {city}: {e:#}"),
    }

    Some(info)
}


#[cfg(test)]
mod tests {
    use super::test_support::ScriptedProvider;
    use super::*;
    use crate::insights::cache::memory::MemoryCityInsightCache;
    use crate::insights::html::CITY_PLACEHOLDER;
    use crate::llm_client::LlmError;
    use serde_json::json;

    fn pune_sections() -> Result<Value, LlmError> {
        Ok(json!({
            "investment_reasons": ["IT hub", "Education centre"],
            "growth_potential": "Ring road and new airport",
            "infrastructure": ["Metro line 3", "Expressway access"]
        }))
    }

    #[tokio::test]
    async fn test_blank_city_is_noop() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(pune_sections);
        assert!(get_city_investment_info(&cache, &llm, "  ").await.is_none());
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_second_call_served_from_cache() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(pune_sections);

        let first = get_city_investment_info(&cache, &llm, "Pune").await.unwrap();
        let second = get_city_investment_info(&cache, &llm, "Pune").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(llm.call_count(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_precached_city_makes_no_call() {
        let cache = MemoryCityInsightCache::default();
        let cached = CityInvestmentInfo {
            city: "Pune".into(),
            ai_investment_reasons: "<ul><li>cached</li></ul>".into(),
            ai_growth_potential: "<p>cached</p>".into(),
            ai_infrastructure: "<p>cached</p>".into(),
            ai_market_trends: "<p>cached</p>".into(),
            ai_content_generated: true,
            generated_at: None,
        };
        cache.put("Pune", &cached).await.unwrap();

        let llm = ScriptedProvider::unconfigured();
        let info = get_city_investment_info(&cache, &llm, "Pune").await.unwrap();
        assert_eq!(info, cached);
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unconfigured_returns_placeholder_without_call() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::unconfigured();

        let info = get_city_investment_info(&cache, &llm, "Pune").await.unwrap();

        assert_eq!(info, CityInvestmentInfo::not_configured("Pune"));
        assert!(!info.ai_content_generated);
        assert_eq!(llm.call_count(), 0);
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_sections_converted_with_paragraph_placeholder() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(pune_sections);

        let info = get_city_investment_info(&cache, &llm, "Pune").await.unwrap();

        assert!(info.ai_content_generated);
        assert_eq!(
            info.ai_investment_reasons,
            "<ul><li>IT&#32;hub</li><li>Education&#32;centre</li></ul>"
        );
        assert_eq!(
            info.ai_growth_potential,
            "<p>Ring&#32;road&#32;and&#32;new&#32;airport</p>"
        );
        assert_eq!(info.ai_market_trends, CITY_PLACEHOLDER);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_none_and_caches_nothing() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(|| {
            Err(LlmError::Api {
                status: 500,
                message: "boom".into(),
            })
        });

        assert!(get_city_investment_info(&cache, &llm, "Pune").await.is_none());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test]
    async fn test_parse_failure_returns_none_and_caches_nothing() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(|| {
            let source = serde_json::from_str::<Value>("not json").unwrap_err();
            Err(LlmError::Parse {
                source,
                raw: "not json".into(),
            })
        });

        assert!(get_city_investment_info(&cache, &llm, "Pune").await.is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_city_prompt_names_all_sections() {
        let prompt = build_city_prompt("Nagpur");
        assert!(prompt.contains("Nagpur, India"));
        for key in [
            "investment_reasons",
            "growth_potential",
            "infrastructure",
            "market_trends",
        ] {
            assert!(prompt.contains(key), "missing {key}");
        }
        assert!(prompt.ends_with("Return ONLY valid JSON."));
    }

    #[tokio::test]
    async fn test_non_object_reply_returns_none_and_caches_nothing() {
        let cache = MemoryCityInsightCache::default();
        let llm = ScriptedProvider::new(|| Ok(json!(["Pune is growing", "IT hub"])));

        assert!(get_city_investment_info(&cache, &llm, "Pune").await.is_none());
        assert_eq!(llm.call_count(), 1);
        assert_eq!(cache.len(), 0);
    }
}
