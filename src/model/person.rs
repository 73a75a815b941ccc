//! Derived view of a user and their unpaid coffees.

use serde::Serialize;

use crate::model::{CoffeeRecord, User};

/// Card colors, picked per user. Stable across recomputations since the
/// choice only depends on the user id.
const PALETTE: [&str; 5] = ["#f87171", "#60a5fa", "#4ade80", "#facc15", "#c084fc"];

/// In-memory aggregate of a [`User`] plus their unpaid record count.
///
/// Never persisted; recomputed from the mirrored collections whenever one
/// of them changes.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    pub coffees_owed: usize,
    pub color: String,
}

/// Derive the people list by joining users with their unpaid records.
///
/// Records whose `user_id` matches no user are silently dropped. Empty
/// input yields empty output.
pub fn project(users: &[User], records: &[CoffeeRecord]) -> Vec<Person> {
    users
        .iter()
        .map(|user| {
            let coffees_owed = records
                .iter()
                .filter(|record| record.user_id == user.id && !record.paid)
                .count();

            Person {
                id: user.id.clone(),
                name: user.name.clone(),
                email: user.email.clone(),
                avatar: user.avatar_url.clone(),
                coffees_owed,
                color: color_for(&user.id).to_owned(),
            }
        })
        .collect()
}

fn color_for(id: &str) -> &'static str {
    let sum: usize = id.bytes().map(usize::from).sum();
    PALETTE[sum % PALETTE.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

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
            date: chrono::Utc::now(),
            paid,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn counts_only_unpaid_records() {
        let users = [user("1", "Al")];
        let records =
            [record("r1", "1", false), record("r2", "1", true)];

        let people = project(&users, &records);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].id, "1");
        assert_eq!(people[0].coffees_owed, 1);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(project(&[], &[]).is_empty());
        assert!(project(&[], &[record("r1", "ghost", false)]).is_empty());
    }

    #[test]
    fn orphan_records_produce_no_person() {
        let users = [user("1", "Al")];
        let records = [record("r1", "nobody", false)];

        let people = project(&users, &records);
        assert_eq!(people.len(), 1);
        assert_eq!(people[0].coffees_owed, 0);
    }

    #[test]
    fn user_without_records_owes_zero() {
        let people = project(&[user("7", "Dana")], &[]);
        assert_eq!(people[0].coffees_owed, 0);
    }

    #[test]
    fn color_is_stable_per_user() {
        assert_eq!(color_for("abc"), color_for("abc"));
        assert!(PALETTE.contains(&color_for("anything")));
    }
}
