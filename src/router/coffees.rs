//! Log and pay coffees.
//!
//! Both handlers answer with the refreshed state snapshot; store failures
//! show up in its error slot rather than as error responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::context::Snapshot;
use crate::error::Result;

#[derive(Debug, Serialize, Deserialize)]
pub struct Body {
    /// Should name an existing person; the operation does not check, and an
    /// unknown id only ever produces an orphan record.
    pub user_id: String,
}

/// Handler to log one coffee owed by `user_id`.
pub async fn add(
    State(state): State<AppState>,
    body: std::result::Result<Json<Body>, JsonRejection>,
) -> Result<Json<Snapshot>> {
    let Json(body) = body?;
    state.context.add_coffee_record(&body.user_id).await;
    Ok(Json(state.context.snapshot().await))
}

/// Handler to mark one record as paid.
pub async fn pay(
    State(state): State<AppState>,
    Path(record_id): Path<String>,
) -> Json<Snapshot> {
    state.context.pay_coffee(&record_id).await;
    Json(state.context.snapshot().await)
}
