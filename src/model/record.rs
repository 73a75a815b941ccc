use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coffee debt as saved on the remote `coffee_records` table.
///
/// `date` travels as an ISO-8601 string and is held as a structured
/// timestamp here. `paid` only ever flips from false to true; records are
/// never deleted or otherwise edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CoffeeRecord {
    pub id: String,
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub paid: bool,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
}

/// Insert body for `coffee_records`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NewCoffeeRecord {
    pub user_id: String,
    pub date: DateTime<Utc>,
    pub paid: bool,
}

impl NewCoffeeRecord {
    /// A freshly logged, unpaid coffee for `user_id`, dated now.
    pub fn owed_by(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            date: Utc::now(),
            paid: false,
        }
    }
}
