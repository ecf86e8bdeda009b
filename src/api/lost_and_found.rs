//! Lost-and-found items.
//!
//! Listing is public. Creating, updating and deleting require a bearer token;
//! created items are stamped with the caller's user id.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::error::{ApiError, ResultExt};
use crate::auth::{Auth, AuthSettings};
use crate::db::{Database, LostAndFoundPatch, NewLostAndFoundItem};
use crate::impl_has_auth_backend;

#[derive(Clone)]
pub struct LostAndFoundState {
    pub db: Database,
    pub auth: Arc<AuthSettings>,
}

impl_has_auth_backend!(LostAndFoundState);

pub fn router(state: LostAndFoundState) -> Router {
    Router::new()
        .route("/", get(list_items).post(create_item))
        .route("/{id}", put(update_item).delete(delete_item))
        .with_state(state)
}

#[derive(Deserialize)]
struct CreateItemRequest {
    item_name: String,
    #[serde(default)]
    description: String,
    date_found: String,
    location_found: String,
    #[serde(default)]
    status: i64,
}

/// Every field is optional; absent fields keep their stored value.
#[derive(Deserialize)]
struct UpdateItemRequest {
    item_name: Option<String>,
    description: Option<String>,
    date_found: Option<String>,
    location_found: Option<String>,
    status: Option<i64>,
}

#[derive(Serialize)]
struct CreateItemResponse {
    status: &'static str,
    message: &'static str,
    id: i64,
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} cannot be empty", field)));
    }
    Ok(())
}

async fn list_items(State(state): State<LostAndFoundState>) -> Result<impl IntoResponse, ApiError> {
    let items = state
        .db
        .lost_and_found()
        .list()
        .await
        .db_err("Failed to list lost and found items")?;
    Ok(Json(serde_json::json!({ "items": items })))
}

async fn create_item(
    State(state): State<LostAndFoundState>,
    Auth(user): Auth,
    Json(payload): Json<CreateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_non_empty(&payload.item_name, "item_name")?;
    require_non_empty(&payload.date_found, "date_found")?;
    require_non_empty(&payload.location_found, "location_found")?;

    let id = state
        .db
        .lost_and_found()
        .create(&NewLostAndFoundItem {
            item_name: &payload.item_name,
            description: &payload.description,
            date_found: &payload.date_found,
            location_found: &payload.location_found,
            status: payload.status,
            submitter_id: user.id,
        })
        .await
        .db_err("Failed to create lost and found item")?;

    info!(item_id = id, user_id = user.id, "Lost and found item created");

    Ok((
        StatusCode::CREATED,
        Json(CreateItemResponse {
            status: "success",
            message: "Item added",
            id,
        }),
    ))
}

async fn update_item(
    State(state): State<LostAndFoundState>,
    Auth(user): Auth,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateItemRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(name) = &payload.item_name {
        require_non_empty(name, "item_name")?;
    }
    if let Some(date) = &payload.date_found {
        require_non_empty(date, "date_found")?;
    }
    if let Some(location) = &payload.location_found {
        require_non_empty(location, "location_found")?;
    }

    let patch = LostAndFoundPatch {
        item_name: payload.item_name.as_deref(),
        description: payload.description.as_deref(),
        date_found: payload.date_found.as_deref(),
        location_found: payload.location_found.as_deref(),
        status: payload.status,
    };

    let store = state.db.lost_and_found();
    let updated = store
        .update(id, &patch)
        .await
        .db_err("Failed to update lost and found item")?;
    if !updated {
        return Err(ApiError::not_found("Item not found"));
    }

    let item = store
        .get(id)
        .await
        .db_err("Failed to load lost and found item")?
        .ok_or_else(|| ApiError::not_found("Item not found"))?;

    info!(item_id = id, user_id = user.id, "Lost and found item updated");
    Ok(Json(item))
}

async fn delete_item(
    State(state): State<LostAndFoundState>,
    Auth(user): Auth,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, ApiError> {
    let deleted = state
        .db
        .lost_and_found()
        .delete(id)
        .await
        .db_err("Failed to delete lost and found item")?;

    if !deleted {
        return Err(ApiError::not_found("Item not found"));
    }

    info!(item_id = id, user_id = user.id, "Lost and found item deleted");
    Ok(StatusCode::NO_CONTENT)
}
