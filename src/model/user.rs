use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User as saved on the remote `users` table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar_url: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Insert body for `users`. `id` and `created_at` are store-assigned.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl User {
    /// A usable row has a non-empty id and name. Rows failing this are
    /// never merged into local state.
    pub fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.name.trim().is_empty()
    }
}
