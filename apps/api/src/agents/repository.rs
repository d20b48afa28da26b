use anyhow::Result;
use sqlx::PgPool;

use crate::agents::dto::CreateAgentRequest;
use crate::models::agent::AgentRow;
use crate::models::property::PropertyRow;

/// Selects agents with `active_property_count` computed from published properties.
const SELECT_AGENT: &str = r#"
    SELECT a.*,
           (SELECT COUNT(*) FROM properties p
             WHERE p.agent_id = a.id AND p.is_published) AS active_property_count
    FROM agents a
"#;

pub async fn find_agent(pool: &PgPool, id: i64) -> Result<Option<AgentRow>> {
    let sql = format!("{SELECT_AGENT} WHERE a.id = $1");
    Ok(sqlx::query_as::<_, AgentRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// All agents, best performers first.
pub async fn list_agents(pool: &PgPool) -> Result<Vec<AgentRow>> {
    let sql = format!("{SELECT_AGENT} ORDER BY a.total_sales_volume DESC, a.total_deals DESC");
    Ok(sqlx::query_as::<_, AgentRow>(&sql).fetch_all(pool).await?)
}

pub async fn agent_properties(pool: &PgPool, agent_id: i64) -> Result<Vec<PropertyRow>> {
    Ok(sqlx::query_as::<_, PropertyRow>(
        "SELECT * FROM properties WHERE agent_id = $1 ORDER BY id",
    )
    .bind(agent_id)
    .fetch_all(pool)
    .await?)
}

pub async fn insert_agent(pool: &PgPool, req: &CreateAgentRequest) -> Result<i64> {
    Ok(sqlx::query_scalar(
        r#"
        INSERT INTO agents
            (name, designation, expertise_level, email, phone, whatsapp, city, state,
             zip_code, license_number, experience_years, total_sales_volume, total_deals,
             avg_rating, review_count, short_bio, languages_spoken, is_active,
             is_accepting_clients, linkedin_url, facebook_url)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21)
        RETURNING id
        "#,
    )
    .bind(&req.name)
    .bind(req.designation.as_str())
    .bind(req.expertise_level.as_str())
    .bind(&req.email)
    .bind(&req.phone)
    .bind(&req.whatsapp)
    .bind(&req.city)
    .bind(&req.state)
    .bind(&req.zip_code)
    .bind(&req.license_number)
    .bind(req.experience_years)
    .bind(req.total_sales_volume)
    .bind(req.total_deals)
    .bind(req.avg_rating)
    .bind(req.review_count)
    .bind(&req.short_bio)
    .bind(&req.languages_spoken)
    .bind(req.is_active)
    .bind(req.is_accepting_clients)
    .bind(&req.linkedin_url)
    .bind(&req.facebook_url)
    .fetch_one(pool)
    .await?)
}
