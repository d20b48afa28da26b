use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::geo::Geocoder;
use crate::insights::CityInsightCache;
use crate::llm_client::CompletionProvider;
use crate::storage::ObjectStorage;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// External collaborators are held as trait objects and passed explicitly into
/// the generators; nothing reads configuration from ambient process state.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub storage: ObjectStorage,
    /// Completion provider. Carries the optional API key.
    pub llm: Arc<dyn CompletionProvider>,
    pub geocoder: Arc<dyn Geocoder>,
    /// City name → investment copy. Redis in production.
    pub city_cache: Arc<dyn CityInsightCache>,
    pub config: Config,
}
