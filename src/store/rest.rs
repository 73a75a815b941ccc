//! REST backend for the hosted data API.
//!
//! Speaks the PostgREST dialect: resources live under `/rest/v1/`, row
//! filters are query parameters (`id=eq.<id>`) and `Prefer:
//! return=representation` asks an insert to echo the created row.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Deserialize;

use crate::model::{CoffeeRecord, NewCoffeeRecord, NewUser, User};
use crate::store::{Backend, StoreError};

const USERS: &str = "users";
const COFFEE_RECORDS: &str = "coffee_records";

const PREFER: &str = "prefer";
const RETURN_ROW: &str = "return=representation";

/// Client for one hosted store instance.
pub struct Rest {
    http: reqwest::Client,
    base: String,
}

impl Rest {
    /// Build a client holding the access key in its default headers.
    pub fn connect(url: &str, key: &str) -> Result<Self, StoreError> {
        let token = HeaderValue::from_str(&format!("Bearer {key}"))
            .map_err(|_| {
                StoreError::Unavailable(
                    "access key contains invalid characters".to_owned(),
                )
            })?;
        let mut api_key = HeaderValue::from_str(key).map_err(|_| {
            StoreError::Unavailable(
                "access key contains invalid characters".to_owned(),
            )
        })?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(header::AUTHORIZATION, token);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            http,
            base: url.trim_end_matches('/').to_owned(),
        })
    }

    fn endpoint(&self, resource: &str) -> String {
        format!("{}/rest/v1/{resource}", self.base)
    }

    async fn select_all<T: for<'de> Deserialize<'de>>(
        &self,
        resource: &str,
    ) -> Result<Vec<T>, StoreError> {
        let response = self
            .http
            .get(self.endpoint(resource))
            .query(&[("select", "*")])
            .send()
            .await?;

        Ok(ok(response).await?.json().await?)
    }
}

/// Reject non-2xx answers with the store's own message when it has one.
async fn ok(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let detail = response.text().await.unwrap_or_default();
    Err(StoreError::Rejected {
        status: status.as_u16(),
        detail: rejection_detail(detail),
    })
}

/// PostgREST wraps errors as `{"message": ...}`; fall back to the raw body.
fn rejection_detail(body: String) -> String {
    #[derive(Deserialize)]
    struct Rejection {
        message: String,
    }

    match serde_json::from_str::<Rejection>(&body) {
        Ok(rejection) => rejection.message,
        Err(_) if body.is_empty() => "no details provided".to_owned(),
        Err(_) => body,
    }
}

#[async_trait]
impl Backend for Rest {
    async fn select_users(&self) -> Result<Vec<User>, StoreError> {
        self.select_all(USERS).await
    }

    async fn insert_user(&self, user: &NewUser) -> Result<Option<User>, StoreError> {
        let response = self
            .http
            .post(self.endpoint(USERS))
            .header(PREFER, RETURN_ROW)
            .json(std::slice::from_ref(user))
            .send()
            .await?;

        let mut rows: Vec<User> = ok(response).await?.json().await?;
        Ok(if rows.is_empty() { None } else { Some(rows.remove(0)) })
    }

    async fn select_records(&self) -> Result<Vec<CoffeeRecord>, StoreError> {
        self.select_all(COFFEE_RECORDS).await
    }

    async fn insert_record(&self, record: &NewCoffeeRecord) -> Result<(), StoreError> {
        let response = self
            .http
            .post(self.endpoint(COFFEE_RECORDS))
            .json(std::slice::from_ref(record))
            .send()
            .await?;

        ok(response).await?;
        Ok(())
    }

    async fn mark_paid(&self, record_id: &str) -> Result<(), StoreError> {
        let response = self
            .http
            .patch(self.endpoint(COFFEE_RECORDS))
            .query(&[("id", format!("eq.{record_id}"))])
            .json(&serde_json::json!({ "paid": true }))
            .send()
            .await?;

        ok(response).await?;
        Ok(())
    }
}
