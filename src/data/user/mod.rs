use serde::{Deserialize, Serialize};

use super::UserId;
use crate::role::Role;

mod raw;

pub use raw::{normalize_user, normalize_users, RawUser};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl ToString, name: impl ToString, role: Role) -> User {
        User {
            id: id.to_string(),
            name: name.to_string(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.can_manage()
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }
}

/// Up to two uppercase initials taken from the words of `name`.
pub fn initials(name: impl AsRef<str>) -> String {
    name.as_ref()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect()
}

pub fn find_user<'a>(users: &'a [User], id: &str) -> Option<&'a User> {
    users.iter().find(|u| u.id == id)
}

/// Normalizes `raw` and appends it. When the resulting id is already taken the
/// list is returned as is, together with the existing record.
pub fn create_user(users: &[User], raw: RawUser) -> (Vec<User>, User) {
    let user = normalize_user(raw);

    if let Some(existing) = find_user(users, &user.id) {
        tracing::debug!("User '{}' already exists, keeping existing record", user.id);
        return (users.to_vec(), existing.clone());
    }

    tracing::info!("Creating a new {} with id: {}", user.role, user.id);

    let mut next = users.to_vec();
    next.push(user.clone());
    (next, user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_take_first_two_words() {
        assert_eq!(initials("Dr. Ada Lovelace"), "DA");
        assert_eq!(initials("alice"), "A");
        assert_eq!(initials("   "), "");
    }

    #[test]
    fn create_user_appends_normalized_record() {
        let users = vec![User::new("u1", "Prof", Role::Admin)];
        let (next, created) = create_user(
            &users,
            RawUser {
                name: Some("Alice".into()),
                role: Some("student".into()),
                ..Default::default()
            },
        );

        assert_eq!(next.len(), 2);
        assert_eq!(users.len(), 1);
        assert_eq!(next[1], created);
        assert_eq!(created.role, Role::Student);
        assert!(!created.id.is_empty());
    }

    #[test]
    fn create_user_keeps_existing_id() {
        let users = vec![User::new("u1", "Prof", Role::Admin)];
        let (next, created) = create_user(
            &users,
            RawUser {
                id: Some("u1".into()),
                name: Some("Impostor".into()),
                ..Default::default()
            },
        );

        assert_eq!(next, users);
        assert_eq!(created.name, "Prof");
    }
}
