//! Navigation state: pure local assignments, no remote effect.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::context::Snapshot;
use crate::error::Result;
use crate::model::View;

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewBody {
    pub view: View,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SelectBody {
    /// `null` clears the selection.
    pub user_id: Option<String>,
}

pub async fn set_view(
    State(state): State<AppState>,
    body: std::result::Result<Json<ViewBody>, JsonRejection>,
) -> Result<Json<Snapshot>> {
    let Json(body) = body?;
    state.context.set_view(body.view).await;
    Ok(Json(state.context.snapshot().await))
}

pub async fn select_user(
    State(state): State<AppState>,
    body: std::result::Result<Json<SelectBody>, JsonRejection>,
) -> Result<Json<Snapshot>> {
    let Json(body) = body?;
    state.context.select_user(body.user_id).await;
    Ok(Json(state.context.snapshot().await))
}
