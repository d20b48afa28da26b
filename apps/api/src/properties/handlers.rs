//! Axum route handlers for the public pages and the property back office.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::{error, info};
use validator::Validate;

use crate::agents::repository::find_agent;
use crate::errors::AppError;
use crate::geo::compute_geolocation;
use crate::insights::{generate_property_content, get_city_investment_info};
use crate::models::property::PropertyRow;
use crate::properties::dto::{CreatePropertyRequest, Notification, UpdatePropertyRequest};
use crate::properties::map::{
    build_card, build_markers, known_city, ListingPageResponse, MapPageResponse,
    PropertyDetailResponse,
};
use crate::properties::media::{plan_media, MediaUploadResponse};
use crate::properties::repository::{self, ListingFilter};
use crate::state::AppState;
use crate::storage::property_object_key;
use crate::uploads::read_multipart;

#[derive(Debug, Default, Deserialize)]
pub struct MapQuery {
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub zip_code: String,
}

async fn load_property(state: &AppState, id: i64) -> Result<PropertyRow, AppError> {
    repository::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Property {id} not found")))
}

// ────────────────────────────────────────────────────────────────────────────
// Public pages
// ────────────────────────────────────────────────────────────────────────────

/// GET /
///
/// Map page: published geolocated markers, city filter options, featured
/// properties and, when a city is selected, its investment copy.
pub async fn handle_map_page(
    State(state): State<AppState>,
    Query(query): Query<MapQuery>,
) -> Result<Json<MapPageResponse>, AppError> {
    let selected_city = query.city.trim().to_string();
    let city_filter = Some(selected_city.as_str()).filter(|c| !c.is_empty());

    let city_list = repository::published_cities(&state.db).await?;
    let entries = repository::map_properties(&state.db, city_filter).await?;
    let featured = repository::featured_properties(&state.db, city_filter).await?;

    // Copy is only generated and cached for cities that have listings.
    let city_investment_info = match known_city(city_filter, &city_list) {
        Some(city) => {
            get_city_investment_info(state.city_cache.as_ref(), state.llm.as_ref(), city).await
        }
        None => None,
    };

    let (properties, category_colors) = build_markers(&entries, &state.storage);

    Ok(Json(MapPageResponse {
        property_count: properties.len(),
        properties,
        category_colors,
        city_list,
        selected_city,
        featured_properties: featured
            .iter()
            .map(|e| build_card(e, &state.storage))
            .collect(),
        city_investment_info,
    }))
}

/// GET /property/:id
///
/// Detail page for a published property. Generates AI content on first view;
/// a failed generation is ignored and the page renders without it.
pub async fn handle_property_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyDetailResponse>, AppError> {
    let mut entry = repository::find_with_category(&state.db, id)
        .await?
        .filter(|e| e.property.is_published)
        .ok_or_else(|| AppError::NotFound(format!("Property {id} not found")))?;

    if !entry.property.ai_content_generated
        && generate_property_content(&state.db, state.llm.as_ref(), &entry.property).await
    {
        if let Some(fresh) = repository::find_with_category(&state.db, id).await? {
            entry = fresh;
        }
    }

    match repository::record_view(&state.db, id).await {
        Ok(views) => entry.property.views = views,
        Err(e) => error!("Failed to update views for property {id}: {e:#}"),
    }

    let gallery = repository::gallery_images(&state.db, id)
        .await?
        .iter()
        .map(|img| state.storage.public_url(&img.s3_key))
        .collect::<Vec<_>>();

    let agent = match entry.property.agent_id {
        Some(agent_id) => find_agent(&state.db, agent_id).await?,
        None => None,
    };

    Ok(Json(PropertyDetailResponse {
        image_url: entry
            .property
            .image_key
            .as_deref()
            .map(|key| state.storage.public_url(key)),
        image_count: gallery.len(),
        gallery,
        category: entry.category_name,
        property: entry.property,
        agent,
    }))
}

/// GET /properties
pub async fn handle_listing_page(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Result<Json<ListingPageResponse>, AppError> {
    let filter = ListingFilter {
        search: Some(query.search.clone()),
        city: Some(query.city.clone()),
        zip_code: Some(query.zip_code.clone()),
    };
    let entries = repository::search_listing(&state.db, &filter).await?;

    Ok(Json(ListingPageResponse {
        properties: entries
            .iter()
            .map(|e| build_card(e, &state.storage))
            .collect(),
        search: query.search,
        city: query.city,
        zip_code: query.zip_code,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Back office
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/properties
pub async fn handle_create_property(
    State(state): State<AppState>,
    Json(req): Json<CreatePropertyRequest>,
) -> Result<(StatusCode, Json<PropertyRow>), AppError> {
    req.validate()?;

    let draft = req.into_draft(&state.config.default_country);
    let geo = compute_geolocation(state.geocoder.as_ref(), &draft.name, &draft.address()).await;
    let row = repository::insert(&state.db, &draft, &geo).await?;

    info!("Created property {} ({})", row.id, row.name);
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/properties/:id
pub async fn handle_get_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyRow>, AppError> {
    Ok(Json(load_property(&state, id).await?))
}

/// PATCH /api/v1/properties/:id
///
/// Derived pricing is always recomputed; geolocation only when an address
/// component actually changed.
pub async fn handle_update_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdatePropertyRequest>,
) -> Result<Json<PropertyRow>, AppError> {
    req.validate()?;

    let mut row = load_property(&state, id).await?;
    let effects = req.apply(&mut row);

    if effects.address_changed {
        let geo = compute_geolocation(state.geocoder.as_ref(), &row.name, &row.address()).await;
        row.latitude = geo.latitude;
        row.longitude = geo.longitude;
        row.date_localization = geo.date_localization;
    }

    Ok(Json(repository::update(&state.db, &row).await?))
}

/// POST /api/v1/properties/:id/publish
pub async fn handle_publish_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyRow>, AppError> {
    repository::set_published(&state.db, id, true)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Property {id} not found")))
}

/// POST /api/v1/properties/:id/unpublish
pub async fn handle_unpublish_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PropertyRow>, AppError> {
    repository::set_published(&state.db, id, false)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Property {id} not found")))
}

/// POST /api/v1/properties/:id/regenerate
///
/// Forces a new AI generation regardless of the generated flag.
pub async fn handle_regenerate_content(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, AppError> {
    let row = load_property(&state, id).await?;
    let success = generate_property_content(&state.db, state.llm.as_ref(), &row).await;
    Ok(Json(Notification::for_regeneration(success)))
}

/// POST /api/v1/properties/:id/images
///
/// Multipart upload of `images` parts. The first file becomes the cover when
/// the property has none; the rest are appended to the gallery.
pub async fn handle_upload_images(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<MediaUploadResponse>), AppError> {
    let row = load_property(&state, id).await?;
    let (_, files) = read_multipart(multipart).await?;
    let (cover, gallery) = plan_media(row.image_key.is_some(), files);
    if cover.is_none() && gallery.is_empty() {
        return Err(AppError::Validation("No images uploaded".to_string()));
    }

    let mut image_key = row.image_key;
    if let Some(cover) = cover {
        let key = property_object_key(id, &cover.file_name);
        state.storage.put(&key, cover.data, &cover.content_type).await?;
        repository::set_cover_image(&state.db, id, &key).await?;
        image_key = Some(key);
    }

    for file in gallery {
        let key = property_object_key(id, &file.file_name);
        state.storage.put(&key, file.data, &file.content_type).await?;
        repository::append_gallery_image(&state.db, id, &key).await?;
    }

    let gallery = repository::gallery_images(&state.db, id)
        .await?
        .iter()
        .map(|img| state.storage.public_url(&img.s3_key))
        .collect::<Vec<_>>();

    info!("Stored images for property {id}; gallery now has {}", gallery.len());
    Ok((
        StatusCode::CREATED,
        Json(MediaUploadResponse {
            image_url: image_key.as_deref().map(|key| state.storage.public_url(key)),
            image_count: gallery.len(),
            gallery,
        }),
    ))
}

/// DELETE /api/v1/properties/:id
pub async fn handle_delete_property(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if !repository::delete(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Property {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}
