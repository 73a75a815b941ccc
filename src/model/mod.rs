//! Rows mirrored from the remote store, and the in-memory projection.

mod person;
mod record;
mod user;

pub use person::*;
pub use record::*;
pub use user::*;

use serde::{Deserialize, Serialize};

/// Navigation state of the single-page surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    #[default]
    Home,
    Log,
    Profile,
}
