use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::{set_flash, take_flash};
use super::{ApiError, ApiResponse, AppState, DashboardDto, EditFormDto, validation};
use crate::constants::NATIONALITIES;
use crate::models::inmate::{
    NewInmate, compose_name, partition_by_query, security_level_label,
};

#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Text fields and optional upload extracted from the record form.
#[derive(Default)]
struct InmateForm {
    last: String,
    first: String,
    initial: String,
    age: Option<String>,
    gender: Option<String>,
    nationality: Option<String>,
    security_level: Option<String>,
    apprehended: Option<String>,
    current_date: Option<String>,
    upload: Option<Upload>,
}

struct Upload {
    original_name: String,
    bytes: axum::body::Bytes,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /dashboard
/// Full record listing, most recent first, plus everything the forms need.
pub async fn list_inmates(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let inmates = state
        .store()
        .list_inmates()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let flash = take_flash(&session).await;

    Ok(Json(ApiResponse::success(DashboardDto {
        inmates: inmates.into_iter().map(Into::into).collect(),
        nationalities: NATIONALITIES,
        flash,
    })))
}

/// POST /dashboard
/// Creates a record from the multipart form and bounces back to the listing.
pub async fn create_inmate(
    State(state): State<Arc<AppState>>,
    session: Session,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let form = read_inmate_form(multipart).await?;
    let fields = parse_inmate_fields(&form)?;

    // Only persist the upload once the rest of the form is known-good,
    // so invalid submissions never leave orphan files behind.
    let evidence_file = match &form.upload {
        Some(upload) => Some(
            state
                .evidence()
                .save(&upload.original_name, &upload.bytes)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to store evidence file: {e}")))?,
        ),
        None => None,
    };

    state
        .store()
        .add_inmate(fields, evidence_file)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    set_flash(&session, "Inmate added successfully!").await;
    Ok(Redirect::to("/dashboard").into_response())
}

/// GET /search?q=
/// Reorders rather than filters: matching records first, everything else
/// after, so the listing stays complete at a glance.
pub async fn search_inmates(
    State(state): State<Arc<AppState>>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<DashboardDto>>, ApiError> {
    let inmates = state
        .store()
        .list_inmates()
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    let inmates = partition_by_query(inmates, &query.q);
    let flash = take_flash(&session).await;

    Ok(Json(ApiResponse::success(DashboardDto {
        inmates: inmates.into_iter().map(Into::into).collect(),
        nationalities: NATIONALITIES,
        flash,
    })))
}

/// GET /inmate/edit/{id}
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EditFormDto>>, ApiError> {
    let inmate = state
        .store()
        .get_inmate(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::inmate_not_found(id))?;

    Ok(Json(ApiResponse::success(EditFormDto::new(inmate))))
}

/// POST /inmate/edit/{id}
/// Overwrites every field from the form. The evidence file is replaced only
/// when a new one was uploaded; the replaced file is cleaned up afterwards.
pub async fn update_inmate(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let existing = state
        .store()
        .get_inmate(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::inmate_not_found(id))?;

    let form = read_inmate_form(multipart).await?;
    let fields = parse_inmate_fields(&form)?;

    let new_evidence_file = match &form.upload {
        Some(upload) => Some(
            state
                .evidence()
                .save(&upload.original_name, &upload.bytes)
                .await
                .map_err(|e| ApiError::internal(format!("Failed to store evidence file: {e}")))?,
        ),
        None => None,
    };

    let replaced = new_evidence_file.is_some();

    state
        .store()
        .update_inmate(id, fields, new_evidence_file)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::inmate_not_found(id))?;

    // The old file has no remaining reference once replaced
    if replaced && let Some(old_file) = existing.evidence_file {
        state.evidence().remove(&old_file).await;
    }

    set_flash(&session, "Inmate updated successfully!").await;
    Ok(Redirect::to("/dashboard").into_response())
}

/// POST /inmate/delete/{id}
/// Removes the row and, best-effort, its stored file. A file already gone
/// from disk never fails the delete; the row is the source of truth.
pub async fn delete_inmate(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Response, ApiError> {
    let inmate = state
        .store()
        .get_inmate(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| ApiError::inmate_not_found(id))?;

    if let Some(evidence_file) = &inmate.evidence_file {
        state.evidence().remove(evidence_file).await;
    }

    state
        .store()
        .remove_inmate(id)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?;

    set_flash(&session, "Inmate deleted successfully!").await;
    Ok(Redirect::to("/dashboard").into_response())
}

// ============================================================================
// Form parsing
// ============================================================================

async fn read_inmate_form(mut multipart: Multipart) -> Result<InmateForm, ApiError> {
    let mut form = InmateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "evidence_file" {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::validation(format!("Failed to read upload: {e}")))?;

            // A file input submitted empty arrives with no filename
            if !original_name.is_empty() {
                form.upload = Some(Upload {
                    original_name,
                    bytes,
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::validation(format!("Malformed form field '{name}': {e}")))?;

        match name.as_str() {
            "last" => form.last = value,
            "first" => form.first = value,
            "initial" => form.initial = value,
            "age" => form.age = Some(value),
            "gender" => form.gender = Some(value),
            "nationality" => form.nationality = Some(value),
            "security_level" => form.security_level = Some(value),
            "Apprehended" => form.apprehended = Some(value),
            "current_date" => form.current_date = Some(value),
            _ => {}
        }
    }

    Ok(form)
}

fn parse_inmate_fields(form: &InmateForm) -> Result<NewInmate, ApiError> {
    let age_raw = form
        .age
        .as_deref()
        .ok_or_else(|| ApiError::validation("Missing form field: age"))?;
    let gender = form
        .gender
        .clone()
        .ok_or_else(|| ApiError::validation("Missing form field: gender"))?;
    let nationality = form
        .nationality
        .clone()
        .ok_or_else(|| ApiError::validation("Missing form field: nationality"))?;
    let security_raw = form
        .security_level
        .as_deref()
        .ok_or_else(|| ApiError::validation("Missing form field: security_level"))?;

    let security_code = validation::parse_security_code(security_raw)?;

    Ok(NewInmate {
        name: compose_name(&form.last, &form.first, &form.initial),
        age: validation::parse_age(age_raw)?,
        gender,
        nationality,
        security_level: security_level_label(security_code).to_string(),
        date_apprehended: validation::parse_optional_date(
            form.apprehended.as_deref(),
            "Apprehended",
        )?,
        date_added: validation::parse_optional_date(form.current_date.as_deref(), "current_date")?
            .unwrap_or_else(|| chrono::Utc::now().date_naive()),
    })
}
