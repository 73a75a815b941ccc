//! View layer: handlers read one state snapshot and render it, or invoke a
//! state-container operation. No business logic lives here.

pub mod coffees;
pub mod navigate;
pub mod page;
pub mod status;
pub mod users;

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::ServerError;

/// JSON body extractor running field validation before the handler.
pub struct Valid<T>(pub T);

impl<S, T> FromRequest<S> for Valid<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ServerError;

    async fn from_request(
        req: Request,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(Self(value))
    }
}

#[cfg(test)]
pub(crate) fn state(store: crate::store::Store) -> crate::AppState {
    use std::sync::Arc;

    use crate::config::{ConfigError, Configuration, STORE_URL};
    use crate::context::AppContext;

    crate::AppState {
        config: Arc::new(Configuration {
            name: "tazza".into(),
            port: 0,
            version: env!("CARGO_PKG_VERSION"),
            store: Err(ConfigError::MissingVar(STORE_URL)),
        }),
        context: Arc::new(AppContext::new(store)),
        metrics: None,
    }
}
