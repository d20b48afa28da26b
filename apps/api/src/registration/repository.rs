use anyhow::Result;
use sqlx::PgPool;

use crate::models::registration::{RegistrationAttachmentRow, RegistrationRow};
use crate::registration::form::RegistrationForm;

pub async fn insert_registration(pool: &PgPool, form: &RegistrationForm) -> Result<RegistrationRow> {
    Ok(sqlx::query_as::<_, RegistrationRow>(
        r#"
        INSERT INTO property_registrations
            (customer_name, phone_number, place, category, sq_yards, price,
             location, city, state, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'submitted')
        RETURNING *
        "#,
    )
    .bind(&form.customer_name)
    .bind(&form.phone_number)
    .bind(&form.place)
    .bind(&form.category)
    .bind(form.sq_yards)
    .bind(form.price)
    .bind(&form.location)
    .bind(&form.city)
    .bind(&form.state)
    .fetch_one(pool)
    .await?)
}

pub async fn set_image_key(pool: &PgPool, id: i64, key: &str) -> Result<()> {
    sqlx::query("UPDATE property_registrations SET image_key = $1 WHERE id = $2")
        .bind(key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn insert_attachment(
    pool: &PgPool,
    registration_id: i64,
    file_name: &str,
    s3_key: &str,
    mime_type: &str,
) -> Result<RegistrationAttachmentRow> {
    Ok(sqlx::query_as::<_, RegistrationAttachmentRow>(
        "INSERT INTO registration_attachments (registration_id, file_name, s3_key, mime_type)
         VALUES ($1, $2, $3, $4)
         RETURNING *",
    )
    .bind(registration_id)
    .bind(file_name)
    .bind(s3_key)
    .bind(mime_type)
    .fetch_one(pool)
    .await?)
}

/// Most recent submissions first.
pub async fn list_registrations(pool: &PgPool) -> Result<Vec<RegistrationRow>> {
    Ok(sqlx::query_as::<_, RegistrationRow>(
        "SELECT * FROM property_registrations ORDER BY created_at DESC, id DESC",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn find_registration(pool: &PgPool, id: i64) -> Result<Option<RegistrationRow>> {
    Ok(
        sqlx::query_as::<_, RegistrationRow>("SELECT * FROM property_registrations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn attachments(pool: &PgPool, registration_id: i64) -> Result<Vec<RegistrationAttachmentRow>> {
    Ok(sqlx::query_as::<_, RegistrationAttachmentRow>(
        "SELECT * FROM registration_attachments WHERE registration_id = $1 ORDER BY id",
    )
    .bind(registration_id)
    .fetch_all(pool)
    .await?)
}
