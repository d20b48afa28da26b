use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use sqlx::PgPool;
use validator::Validate;

use crate::errors::AppError;
use crate::models::category::CategoryRow;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, max = 100, message = "Category name is required"))]
    pub name: String,
}

impl CreateCategoryRequest {
    /// Trims the name so whitespace-only input fails validation.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
        }
    }
}

pub async fn list_categories(pool: &PgPool) -> Result<Vec<CategoryRow>, AppError> {
    Ok(
        sqlx::query_as::<_, CategoryRow>("SELECT * FROM property_categories ORDER BY name")
            .fetch_all(pool)
            .await?,
    )
}

/// GET /api/v1/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRow>>, AppError> {
    Ok(Json(list_categories(&state.db).await?))
}

/// POST /api/v1/categories
pub async fn handle_create_category(
    State(state): State<AppState>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryRow>), AppError> {
    let req = req.normalized();
    req.validate()?;

    let row = sqlx::query_as::<_, CategoryRow>(
        "INSERT INTO property_categories (name) VALUES ($1)
         ON CONFLICT (name) DO NOTHING
         RETURNING *",
    )
    .bind(&req.name)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| AppError::Validation(format!("Category '{}' already exists", req.name)))?;

    Ok((StatusCode::CREATED, Json(row)))
}
