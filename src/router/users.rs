//! Add a person to the ledger.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::context::Snapshot;
use crate::model::NewUser;
use crate::router::Valid;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct Body {
    #[validate(length(min = 1, max = 60, message = "Name must not be empty."))]
    pub name: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(url(message = "Avatar must be a URL."))]
    pub avatar_url: Option<String>,
    pub department: Option<String>,
}

/// Handler to create a user.
///
/// On success the store-assigned row lands in local state, the new person
/// is selected and the surface navigates to their detail view; the
/// returned snapshot reflects all of it.
pub async fn handler(
    State(state): State<AppState>,
    Valid(body): Valid<Body>,
) -> Json<Snapshot> {
    state
        .context
        .add_user(NewUser {
            name: body.name,
            email: body.email,
            avatar_url: body.avatar_url,
            department: body.department,
        })
        .await;

    Json(state.context.snapshot().await)
}
