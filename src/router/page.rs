//! `GET /`: render the current view from one state snapshot.
//!
//! Mirrors the navigation contract: `home` and `profile` render directly;
//! `log` shows the add-coffee form, or the selected person's detail when a
//! selection exists. A selection matching no person falls back to the home
//! render instead of failing.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::AppState;
use crate::context::{Phase, Snapshot};
use crate::helpers::format::{contrast_color, format_date_time};
use crate::model::{CoffeeRecord, Person, View};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    phase: Phase,
    /// Shared error slot, rendered as a banner by the front-end.
    error: Option<String>,
    #[serde(flatten)]
    body: Body,
}

#[derive(Debug, Serialize)]
#[serde(tag = "page", rename_all = "lowercase")]
enum Body {
    /// Distinct screen shown while store credentials are unusable.
    #[serde(rename_all = "camelCase")]
    Setup { detail: String },
    #[serde(rename_all = "camelCase")]
    Home { people: Vec<Card> },
    #[serde(rename_all = "camelCase")]
    Log {
        people: Vec<Choice>,
        selected_user: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Person { person: Card, history: Vec<HistoryEntry> },
    #[serde(rename_all = "camelCase")]
    Profile {
        total_coffees: usize,
        outstanding: usize,
        top_debtor: Option<Card>,
    },
}

/// One person card: projection fields plus a readable text color.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Card {
    id: String,
    name: String,
    avatar: Option<String>,
    coffees_owed: usize,
    color: String,
    text_color: &'static str,
}

impl From<&Person> for Card {
    fn from(person: &Person) -> Self {
        Self {
            id: person.id.clone(),
            name: person.name.clone(),
            avatar: person.avatar.clone(),
            coffees_owed: person.coffees_owed,
            color: person.color.clone(),
            text_color: contrast_color(&person.color),
        }
    }
}

/// Dropdown entry on the add-coffee form.
#[derive(Debug, Serialize)]
struct Choice {
    id: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct HistoryEntry {
    id: String,
    date: String,
    paid: bool,
}

pub async fn handler(State(state): State<AppState>) -> Json<Page> {
    let snapshot = state.context.snapshot().await;

    if snapshot.phase == Phase::Unconfigured {
        let detail = snapshot.error.clone().unwrap_or_else(|| {
            "store credentials are missing".to_owned()
        });
        return Json(page(&snapshot, Body::Setup { detail }));
    }

    let body = match snapshot.current_view {
        View::Home => home(&snapshot),
        View::Profile => profile(&snapshot),
        View::Log => match snapshot.selected_user.as_deref() {
            None => log(&snapshot),
            Some(user_id) => match person_details(&snapshot, user_id) {
                Some(details) => details,
                None => {
                    state.context.set_view(View::Home).await;
                    home(&snapshot)
                },
            },
        },
    };

    Json(page(&snapshot, body))
}

fn page(snapshot: &Snapshot, body: Body) -> Page {
    Page {
        phase: snapshot.phase,
        error: snapshot.error.clone(),
        body,
    }
}

/// Outstanding coffees, biggest debtor first.
fn home(snapshot: &Snapshot) -> Body {
    let mut debtors: Vec<&Person> = snapshot
        .people
        .iter()
        .filter(|person| person.coffees_owed > 0)
        .collect();
    debtors.sort_by(|a, b| b.coffees_owed.cmp(&a.coffees_owed));

    Body::Home {
        people: debtors.into_iter().map(Card::from).collect(),
    }
}

fn log(snapshot: &Snapshot) -> Body {
    Body::Log {
        people: snapshot
            .people
            .iter()
            .map(|person| Choice {
                id: person.id.clone(),
                name: person.name.clone(),
            })
            .collect(),
        selected_user: snapshot.selected_user.clone(),
    }
}

/// Detail view: the person's card plus their history, newest first.
fn person_details(snapshot: &Snapshot, user_id: &str) -> Option<Body> {
    let person =
        snapshot.people.iter().find(|person| person.id == user_id)?;

    let mut history: Vec<&CoffeeRecord> = snapshot
        .records
        .iter()
        .filter(|record| record.user_id == user_id)
        .collect();
    history.sort_by(|a, b| b.date.cmp(&a.date));

    Some(Body::Person {
        person: Card::from(person),
        history: history
            .into_iter()
            .map(|record| HistoryEntry {
                id: record.id.clone(),
                date: format_date_time(&record.date),
                paid: record.paid,
            })
            .collect(),
    })
}

fn profile(snapshot: &Snapshot) -> Body {
    Body::Profile {
        total_coffees: snapshot.records.len(),
        outstanding: snapshot
            .people
            .iter()
            .map(|person| person.coffees_owed)
            .sum(),
        top_debtor: snapshot
            .people
            .iter()
            .filter(|person| person.coffees_owed > 0)
            .max_by_key(|person| person.coffees_owed)
            .map(Card::from),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;
    use crate::model::{User, project};
    use crate::store::memory::Memory;
    use crate::store::Store;
    use crate::{app, make_request, router};

    fn user(id: &str, name: &str) -> User {
        User {
            id: id.into(),
            name: name.into(),
            email: format!("{name}@example.com"),
            ..Default::default()
        }
    }

    fn record(id: &str, user_id: &str, paid: bool) -> CoffeeRecord {
        CoffeeRecord {
            id: id.into(),
            user_id: user_id.into(),
            date: Utc::now(),
            paid,
            created_at: Utc::now(),
        }
    }

    fn snapshot(users: Vec<User>, records: Vec<CoffeeRecord>) -> Snapshot {
        let people = project(&users, &records);
        Snapshot {
            users,
            records,
            people,
            ..Default::default()
        }
    }

    async fn body_json(
        response: axum::http::Response<axum::body::Body>,
    ) -> Value {
        let bytes =
            response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn home_lists_debtors_biggest_first() {
        let snapshot = snapshot(
            vec![user("1", "Al"), user("2", "Bo"), user("3", "Cy")],
            vec![
                record("r1", "1", false),
                record("r2", "2", false),
                record("r3", "2", false),
                record("r4", "3", true),
            ],
        );

        let Body::Home { people } = home(&snapshot) else {
            panic!("expected home body");
        };
        let names: Vec<&str> =
            people.iter().map(|card| card.name.as_str()).collect();
        assert_eq!(names, ["Bo", "Al"]);
    }

    #[test]
    fn person_details_sorts_history_newest_first() {
        let old = CoffeeRecord {
            date: Utc::now() - Duration::days(3),
            ..record("r-old", "1", true)
        };
        let new = record("r-new", "1", false);
        let snapshot = snapshot(vec![user("1", "Al")], vec![old, new]);

        let Some(Body::Person { person, history }) =
            person_details(&snapshot, "1")
        else {
            panic!("expected person body");
        };
        assert_eq!(person.coffees_owed, 1);
        assert_eq!(history[0].id, "r-new");
        assert!(!history[0].paid);
        assert_eq!(history[1].id, "r-old");
        // display format, not the wire timestamp.
        assert!(history[0].date.contains(" - "));
    }

    #[test]
    fn person_details_is_none_for_unknown_ids() {
        let snapshot = snapshot(vec![user("1", "Al")], vec![]);
        assert!(person_details(&snapshot, "ghost").is_none());
    }

    #[test]
    fn profile_aggregates_counts_and_top_debtor() {
        let snapshot = snapshot(
            vec![user("1", "Al"), user("2", "Bo")],
            vec![
                record("r1", "1", false),
                record("r2", "1", false),
                record("r3", "2", true),
            ],
        );

        let Body::Profile {
            total_coffees,
            outstanding,
            top_debtor,
        } = profile(&snapshot)
        else {
            panic!("expected profile body");
        };
        assert_eq!(total_coffees, 3);
        assert_eq!(outstanding, 2);
        assert_eq!(top_debtor.unwrap().name, "Al");
    }

    #[tokio::test]
    async fn unknown_selection_falls_back_to_home() {
        let memory = Arc::new(Memory::default());
        memory.seed_users(vec![user("1", "Al")]);

        let state = router::state(Store::Available(memory));
        state.context.init().await;
        state.context.set_view(View::Log).await;
        state.context.select_user(Some("ghost".into())).await;

        let response = make_request(
            app(state.clone()),
            Method::GET,
            "/",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["page"], "home");
        // the fallback also resets the navigation state.
        assert_eq!(
            state.context.snapshot().await.current_view,
            View::Home
        );
    }

    #[tokio::test]
    async fn unconfigured_store_renders_the_setup_screen() {
        let state = router::state(Store::Unavailable(
            "missing `STORE_URL` environment variable".into(),
        ));
        state.context.init().await;

        let response = make_request(
            app(state),
            Method::GET,
            "/",
            String::default(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["page"], "setup");
        assert_eq!(body["phase"], "unconfigured");
        assert!(
            body["detail"].as_str().unwrap().contains("STORE_URL")
        );
    }

    #[tokio::test]
    async fn selected_person_renders_their_detail_view() {
        let memory = Arc::new(Memory::default());
        memory.seed_users(vec![user("1", "Al")]);
        memory.seed_records(vec![record("r1", "1", false)]);

        let state = router::state(Store::Available(memory));
        state.context.init().await;
        state.context.set_view(View::Log).await;
        state.context.select_user(Some("1".into())).await;

        let body = body_json(
            make_request(app(state), Method::GET, "/", String::default())
                .await,
        )
        .await;
        assert_eq!(body["page"], "person");
        assert_eq!(body["person"]["coffeesOwed"], 1);
        assert_eq!(body["history"][0]["id"], "r1");
    }
}
