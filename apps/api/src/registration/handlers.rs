use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, info};

use crate::errors::AppError;
use crate::models::registration::{RegistrationAttachmentRow, RegistrationRow};
use crate::properties::categories::list_categories;
use crate::registration::form::{FormDescriptor, RegistrationForm};
use crate::registration::repository;
use crate::state::AppState;
use crate::storage::registration_object_key;
use crate::uploads::{read_multipart, split_uploads};

/// Outcome of a public submission. Serialized with a `status` tag so the
/// form page can tell success from failure without inspecting the HTTP code.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionResponse {
    Submitted {
        registration_id: i64,
        image_url: Option<String>,
        attachments: usize,
    },
    Error {
        error: String,
    },
}

#[derive(Debug, Serialize)]
pub struct RegistrationDetail {
    #[serde(flatten)]
    pub registration: RegistrationRow,
    pub image_url: Option<String>,
    pub attachments: Vec<AttachmentView>,
}

#[derive(Debug, Serialize)]
pub struct AttachmentView {
    #[serde(flatten)]
    pub attachment: RegistrationAttachmentRow,
    pub url: String,
}

/// GET /property/register
pub async fn handle_registration_form(
    State(state): State<AppState>,
) -> Result<Json<FormDescriptor>, AppError> {
    let categories = list_categories(&state.db)
        .await?
        .into_iter()
        .map(|c| c.name)
        .collect();
    Ok(Json(FormDescriptor::new(categories)))
}

/// POST /property/submit
///
/// Failures are reported with the error payload rather than the generic
/// API error envelope; the status code still follows the error kind.
pub async fn handle_submit_registration(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Response {
    match submit(&state, multipart).await {
        Ok(response) => (StatusCode::CREATED, Json(response)).into_response(),
        Err(e) => {
            error!("Registration submission failed: {e}");
            let status = e.status();
            let message = match e {
                AppError::Validation(msg) | AppError::NotFound(msg) => msg,
                _ => "Could not submit the registration, please try again".to_string(),
            };
            (status, Json(SubmissionResponse::Error { error: message })).into_response()
        }
    }
}

async fn submit(state: &AppState, multipart: Multipart) -> Result<SubmissionResponse, AppError> {
    let (fields, files) = read_multipart(multipart).await?;
    let form = RegistrationForm::from_fields(&fields)?;
    let (cover, rest) = split_uploads(files);

    let registration = repository::insert_registration(&state.db, &form).await?;
    let id = registration.id;

    let mut image_url = None;
    if let Some(cover) = cover {
        let key = registration_object_key(id, &cover.file_name);
        state.storage.put(&key, cover.data, &cover.content_type).await?;
        repository::set_image_key(&state.db, id, &key).await?;
        image_url = Some(state.storage.public_url(&key));
    }

    for file in &rest {
        let key = registration_object_key(id, &file.file_name);
        state
            .storage
            .put(&key, file.data.clone(), &file.content_type)
            .await?;
        repository::insert_attachment(&state.db, id, &file.file_name, &key, &file.content_type)
            .await?;
    }

    info!(
        "Registration {id} submitted by {} with {} attachment(s)",
        form.customer_name,
        rest.len()
    );

    Ok(SubmissionResponse::Submitted {
        registration_id: id,
        image_url,
        attachments: rest.len(),
    })
}

/// GET /api/v1/registrations
pub async fn handle_list_registrations(
    State(state): State<AppState>,
) -> Result<Json<Vec<RegistrationRow>>, AppError> {
    Ok(Json(repository::list_registrations(&state.db).await?))
}

/// GET /api/v1/registrations/:id
pub async fn handle_get_registration(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RegistrationDetail>, AppError> {
    let registration = repository::find_registration(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Registration {id} not found")))?;

    let attachments = repository::attachments(&state.db, id)
        .await?
        .into_iter()
        .map(|attachment| AttachmentView {
            url: state.storage.public_url(&attachment.s3_key),
            attachment,
        })
        .collect();

    Ok(Json(RegistrationDetail {
        image_url: registration
            .image_key
            .as_deref()
            .map(|key| state.storage.public_url(key)),
        registration,
        attachments,
    }))
}
