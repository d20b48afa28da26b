use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use validator::Validate;

use crate::agents::dto::CreateAgentRequest;
use crate::agents::repository::{agent_properties, find_agent, insert_agent, list_agents};
use crate::errors::AppError;
use crate::models::agent::AgentRow;
use crate::models::property::PropertyRow;
use crate::state::AppState;

/// GET /api/v1/agents
pub async fn handle_list_agents(
    State(state): State<AppState>,
) -> Result<Json<Vec<AgentRow>>, AppError> {
    Ok(Json(list_agents(&state.db).await?))
}

/// POST /api/v1/agents
pub async fn handle_create_agent(
    State(state): State<AppState>,
    Json(req): Json<CreateAgentRequest>,
) -> Result<(StatusCode, Json<AgentRow>), AppError> {
    req.validate()?;

    let id = insert_agent(&state.db, &req).await?;
    info!("Created agent {id} ({})", req.name);

    let agent = find_agent(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Agent {id} not found")))?;
    Ok((StatusCode::CREATED, Json(agent)))
}

/// GET /api/v1/agents/:id
pub async fn handle_get_agent(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<AgentRow>, AppError> {
    find_agent(&state.db, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Agent {id} not found")))
}

/// GET /api/v1/agents/:id/properties
///
/// Every property assigned to the agent, published or not.
pub async fn handle_agent_properties(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<PropertyRow>>, AppError> {
    if find_agent(&state.db, id).await?.is_none() {
        return Err(AppError::NotFound(format!("Agent {id} not found")));
    }
    Ok(Json(agent_properties(&state.db, id).await?))
}
