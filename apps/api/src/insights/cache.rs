//! City investment cache: an explicit city name → generated content mapping.
//!
//! Entries never expire. A later generation for the same city overwrites the
//! previous one (last write wins).

use anyhow::{Context, Result};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use super::city_content::CityInvestmentInfo;

const KEY_PREFIX: &str = "city_investment:";

#[async_trait]
pub trait CityInsightCache: Send + Sync {
    /// Exact-match lookup on the city name.
    async fn get(&self, city: &str) -> Result<Option<CityInvestmentInfo>>;

    async fn put(&self, city: &str, info: &CityInvestmentInfo) -> Result<()>;
}

/// Redis-backed cache. Values are the JSON encoding of `CityInvestmentInfo`.
#[derive(Clone)]
pub struct RedisCityInsightCache {
    client: redis::Client,
}

impl RedisCityInsightCache {
    pub fn new(client: redis::Client) -> Self {
        Self { client }
    }
}

fn cache_key(city: &str) -> String {
    format!("{KEY_PREFIX}{city}")
}

#[async_trait]
impl CityInsightCache for RedisCityInsightCache {
    async fn get(&self, city: &str) -> Result<Option<CityInvestmentInfo>> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;
        let raw: Option<String> = conn.get(cache_key(city)).await?;
        debug!("City cache lookup for {city}: hit={}", raw.is_some());

        raw.map(|s| serde_json::from_str(&s).context("Corrupt city cache entry"))
            .transpose()
    }

    async fn put(&self, city: &str, info: &CityInvestmentInfo) -> Result<()> {
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("Failed to connect to Redis")?;
        let value = serde_json::to_string(info)?;
        conn.set::<_, _, ()>(cache_key(city), value).await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_exact_city_name() {
        assert_eq!(cache_key("Pune"), "city_investment:Pune");
        assert_ne!(cache_key("Pune"), cache_key("pune"));
    }
}
