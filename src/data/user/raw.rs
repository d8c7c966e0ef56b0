use serde::{Deserialize, Serialize};

use super::User;
use crate::role::Role;
use crate::util;

/// A user record as it may arrive from account creation or an older snapshot.
/// Every field is optional; [`normalize_user`] fills the gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl From<User> for RawUser {
    fn from(user: User) -> Self {
        RawUser {
            id: Some(user.id),
            name: Some(user.name),
            display_name: None,
            role: Some(user.role.to_string()),
        }
    }
}

fn placeholder_name(id: &str) -> String {
    format!("User {}", id)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|it| it.trim().to_string())
        .filter(|it| !it.is_empty())
}

/// Coerces `raw` into a canonical [`User`]. Never fails and is idempotent.
pub fn normalize_user(raw: RawUser) -> User {
    let id = raw
        .id
        .filter(|it| !it.trim().is_empty())
        .unwrap_or_else(|| util::new_id("u"));

    let role = raw.role.map(Role::from_tag).unwrap_or_default();

    let name = non_blank(raw.name)
        .or_else(|| non_blank(raw.display_name))
        .unwrap_or_else(|| placeholder_name(&id));

    User { id, name, role }
}

pub fn normalize_users(raw: impl IntoIterator<Item = RawUser>) -> Vec<User> {
    raw.into_iter().map(normalize_user).collect()
}
