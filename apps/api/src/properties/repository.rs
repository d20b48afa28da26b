use anyhow::Result;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::geo::Geolocation;
use crate::models::property::{PropertyImageRow, PropertyRow};

/// A property joined with its category name and first gallery image.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct PropertyWithCategory {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub property: PropertyRow,
    pub category_name: Option<String>,
    pub gallery_key: Option<String>,
}

const SELECT_WITH_CATEGORY: &str = r#"
    SELECT p.*,
           c.name AS category_name,
           (SELECT i.s3_key FROM property_images i
             WHERE i.property_id = p.id
             ORDER BY i.position, i.id
             LIMIT 1) AS gallery_key
    FROM properties p
    LEFT JOIN property_categories c ON c.id = p.category_id
"#;

/// Filters for the public listing page. Each text filter is a
/// case-insensitive substring match.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub search: Option<String>,
    pub city: Option<String>,
    pub zip_code: Option<String>,
}

/// Wraps user input in `%…%` for ILIKE, escaping the LIKE wildcards.
pub fn like_pattern(input: &str) -> String {
    let escaped = input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<PropertyRow>> {
    Ok(
        sqlx::query_as::<_, PropertyRow>("SELECT * FROM properties WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?,
    )
}

pub async fn find_with_category(pool: &PgPool, id: i64) -> Result<Option<PropertyWithCategory>> {
    let sql = format!("{SELECT_WITH_CATEGORY} WHERE p.id = $1");
    Ok(sqlx::query_as::<_, PropertyWithCategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?)
}

/// Published, geolocated properties for the map, optionally limited to one city.
pub async fn map_properties(pool: &PgPool, city: Option<&str>) -> Result<Vec<PropertyWithCategory>> {
    let sql = format!(
        "{SELECT_WITH_CATEGORY}
         WHERE p.is_published
           AND p.latitude IS NOT NULL
           AND p.longitude IS NOT NULL
           AND ($1::TEXT IS NULL OR p.city = $1)
         ORDER BY p.id"
    );
    Ok(sqlx::query_as::<_, PropertyWithCategory>(&sql)
        .bind(city)
        .fetch_all(pool)
        .await?)
}

pub async fn featured_properties(
    pool: &PgPool,
    city: Option<&str>,
) -> Result<Vec<PropertyWithCategory>> {
    let sql = format!(
        "{SELECT_WITH_CATEGORY}
         WHERE p.is_published
           AND p.is_featured
           AND ($1::TEXT IS NULL OR p.city = $1)
         ORDER BY p.id"
    );
    Ok(sqlx::query_as::<_, PropertyWithCategory>(&sql)
        .bind(city)
        .fetch_all(pool)
        .await?)
}

/// Sorted distinct cities of published properties.
pub async fn published_cities(pool: &PgPool) -> Result<Vec<String>> {
    Ok(sqlx::query_scalar(
        "SELECT DISTINCT city FROM properties WHERE is_published AND city <> '' ORDER BY city",
    )
    .fetch_all(pool)
    .await?)
}

pub async fn search_listing(
    pool: &PgPool,
    filter: &ListingFilter,
) -> Result<Vec<PropertyWithCategory>> {
    let sql = format!(
        "{SELECT_WITH_CATEGORY}
         WHERE p.is_published
           AND ($1::TEXT IS NULL OR p.name ILIKE $1 OR p.city ILIKE $1 OR p.zip_code ILIKE $1)
           AND ($2::TEXT IS NULL OR p.city ILIKE $2)
           AND ($3::TEXT IS NULL OR p.zip_code ILIKE $3)
         ORDER BY p.id"
    );
    Ok(sqlx::query_as::<_, PropertyWithCategory>(&sql)
        .bind(non_blank(&filter.search).map(like_pattern))
        .bind(non_blank(&filter.city).map(like_pattern))
        .bind(non_blank(&filter.zip_code).map(like_pattern))
        .fetch_all(pool)
        .await?)
}

pub async fn gallery_images(pool: &PgPool, property_id: i64) -> Result<Vec<PropertyImageRow>> {
    Ok(sqlx::query_as::<_, PropertyImageRow>(
        "SELECT * FROM property_images WHERE property_id = $1 ORDER BY position, id",
    )
    .bind(property_id)
    .fetch_all(pool)
    .await?)
}

pub async fn set_cover_image(pool: &PgPool, id: i64, key: &str) -> Result<()> {
    sqlx::query("UPDATE properties SET image_key = $1, updated_at = NOW() WHERE id = $2")
        .bind(key)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Appends a gallery image after the existing ones.
pub async fn append_gallery_image(
    pool: &PgPool,
    property_id: i64,
    key: &str,
) -> Result<PropertyImageRow> {
    Ok(sqlx::query_as::<_, PropertyImageRow>(
        r#"
        INSERT INTO property_images (property_id, s3_key, position)
        VALUES ($1, $2,
                (SELECT COALESCE(MAX(position) + 1, 0) FROM property_images WHERE property_id = $1))
        RETURNING *
        "#,
    )
    .bind(property_id)
    .bind(key)
    .fetch_one(pool)
    .await?)
}

/// Increments the view counter and stamps `last_viewed`. Returns the new count.
pub async fn record_view(pool: &PgPool, id: i64) -> Result<i32> {
    Ok(sqlx::query_scalar(
        "UPDATE properties SET views = views + 1, last_viewed = NOW() WHERE id = $1 RETURNING views",
    )
    .bind(id)
    .fetch_one(pool)
    .await?)
}

pub async fn set_published(pool: &PgPool, id: i64, published: bool) -> Result<Option<PropertyRow>> {
    Ok(sqlx::query_as::<_, PropertyRow>(
        "UPDATE properties SET is_published = $1, updated_at = NOW() WHERE id = $2 RETURNING *",
    )
    .bind(published)
    .bind(id)
    .fetch_optional(pool)
    .await?)
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM properties WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts a draft row with its geolocation. `id` and timestamps are assigned here.
pub async fn insert(pool: &PgPool, draft: &PropertyRow, geo: &Geolocation) -> Result<PropertyRow> {
    Ok(sqlx::query_as::<_, PropertyRow>(
        r#"
        INSERT INTO properties
            (name, short_description, detailed_description, category_id, is_featured,
             price, plot_area, price_per_sqft, currency, facing_direction, road_width,
             title_status, property_website_url, street, street2, city, zip_code, state,
             country, emi_available, registration_charges, registration_amount,
             water_connection, electricity_connection, drainage_facility, gated_community,
             latitude, longitude, date_localization, contact_name, contact_phone,
             contact_email, seo_title, seo_description, agent_id, is_published,
             nearby_landmarks)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28, $29, $30, $31, $32,
                $33, $34, $35, $36, $37)
        RETURNING *
        "#,
    )
    .bind(&draft.name)
    .bind(&draft.short_description)
    .bind(&draft.detailed_description)
    .bind(draft.category_id)
    .bind(draft.is_featured)
    .bind(draft.price)
    .bind(draft.plot_area)
    .bind(draft.price_per_sqft)
    .bind(&draft.currency)
    .bind(&draft.facing_direction)
    .bind(draft.road_width)
    .bind(&draft.title_status)
    .bind(&draft.property_website_url)
    .bind(&draft.street)
    .bind(&draft.street2)
    .bind(&draft.city)
    .bind(&draft.zip_code)
    .bind(&draft.state)
    .bind(&draft.country)
    .bind(draft.emi_available)
    .bind(draft.registration_charges)
    .bind(draft.registration_amount)
    .bind(draft.water_connection)
    .bind(draft.electricity_connection)
    .bind(draft.drainage_facility)
    .bind(draft.gated_community)
    .bind(geo.latitude)
    .bind(geo.longitude)
    .bind(geo.date_localization)
    .bind(&draft.contact_name)
    .bind(&draft.contact_phone)
    .bind(&draft.contact_email)
    .bind(&draft.seo_title)
    .bind(&draft.seo_description)
    .bind(draft.agent_id)
    .bind(draft.is_published)
    .bind(&draft.nearby_landmarks)
    .fetch_one(pool)
    .await?)
}

/// Writes every editable column of `row`, including derived pricing and geolocation.
/// View counters and AI content are owned by their own writers and left alone.
pub async fn update(pool: &PgPool, row: &PropertyRow) -> Result<PropertyRow> {
    Ok(sqlx::query_as::<_, PropertyRow>(
        r#"
        UPDATE properties SET
            name = $1, short_description = $2, detailed_description = $3, category_id = $4,
            is_featured = $5, price = $6, plot_area = $7, price_per_sqft = $8,
            facing_direction = $9, road_width = $10, title_status = $11,
            property_website_url = $12, street = $13, street2 = $14, city = $15,
            zip_code = $16, state = $17, country = $18, emi_available = $19,
            registration_charges = $20, registration_amount = $21, water_connection = $22,
            electricity_connection = $23, drainage_facility = $24, gated_community = $25,
            latitude = $26, longitude = $27, date_localization = $28, contact_name = $29,
            contact_phone = $30, contact_email = $31, seo_title = $32, seo_description = $33,
            agent_id = $34, nearby_landmarks = $35, updated_at = NOW()
        WHERE id = $36
        RETURNING *
        "#,
    )
    .bind(&row.name)
    .bind(&row.short_description)
    .bind(&row.detailed_description)
    .bind(row.category_id)
    .bind(row.is_featured)
    .bind(row.price)
    .bind(row.plot_area)
    .bind(row.price_per_sqft)
    .bind(&row.facing_direction)
    .bind(row.road_width)
    .bind(&row.title_status)
    .bind(&row.property_website_url)
    .bind(&row.street)
    .bind(&row.street2)
    .bind(&row.city)
    .bind(&row.zip_code)
    .bind(&row.state)
    .bind(&row.country)
    .bind(row.emi_available)
    .bind(row.registration_charges)
    .bind(row.registration_amount)
    .bind(row.water_connection)
    .bind(row.electricity_connection)
    .bind(row.drainage_facility)
    .bind(row.gated_community)
    .bind(row.latitude)
    .bind(row.longitude)
    .bind(row.date_localization)
    .bind(&row.contact_name)
    .bind(&row.contact_phone)
    .bind(&row.contact_email)
    .bind(&row.seo_title)
    .bind(&row.seo_description)
    .bind(row.agent_id)
    .bind(&row.nearby_landmarks)
    .bind(row.id)
    .fetch_one(pool)
    .await?)
}
