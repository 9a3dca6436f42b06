use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::instrument;

use super::AppState;
use crate::error::ApiError;
use crate::model::{Contact, ContactPatch, NewContact};

/// Decodes a JSON body whatever its `Content-Type`, so a bad payload is
/// always a 400 rather than axum's 415/422 rejections.
fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    Ok(serde_json::from_slice(body)?)
}

/// Ids that are not positive integers can never match a row.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or(ApiError::NotFound)
}

/// Any failed lookup, store errors included, reads as a missing contact.
async fn find_live(state: &AppState, raw_id: &str) -> Result<Contact, ApiError> {
    let id = parse_id(raw_id)?;
    match state.contacts.find_by_id(id).await {
        Ok(Some(contact)) => Ok(contact),
        Ok(None) => Err(ApiError::NotFound),
        Err(err) => {
            tracing::error!(error = ?err, id, "contact lookup failed");
            Err(ApiError::NotFound)
        }
    }
}

#[instrument(skip(state))]
pub async fn get_all_contacts(
    State(state): State<AppState>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let contacts = state.contacts.find_all().await?;
    Ok(Json(contacts))
}

#[instrument(skip(state, body))]
pub async fn create_contact(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let new_contact: NewContact = decode(&body)?;
    let created = state.contacts.insert(new_contact).await?;

    tracing::info!(id = created.id, "created contact");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let contact = find_live(&state, &id).await?;
    Ok(Json(contact))
}

#[instrument(skip(state, body))]
pub async fn edit_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Contact>, ApiError> {
    let existing = find_live(&state, &id).await?;

    let patch: ContactPatch = decode(&body)?;
    let updated = state
        .contacts
        .update_fields(&existing, &patch)
        .await?
        .ok_or(ApiError::NotFound)?;

    tracing::info!(id = updated.id, "updated contact");
    Ok(Json(updated))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let id = parse_id(&id)?;
    if state.contacts.delete_by_id(id).await? == 0 {
        return Err(ApiError::NotFound);
    }

    tracing::info!(id, "deleted contact");
    Ok(Json(json!({ "message": "Contact deleted" })))
}
