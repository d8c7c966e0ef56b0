use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Admin,
}

impl Role {
    /// Indicates whether user with role can create and manage courses and assignments
    pub fn can_manage(self) -> bool {
        self >= Role::Admin
    }

    /// Lenient parse used by the normalizer. Unrecognized tags fall back to
    /// [`Role::Student`].
    pub fn from_tag(tag: impl AsRef<str>) -> Role {
        match tag.as_ref().trim().to_ascii_lowercase().as_str() {
            "admin" | "instructor" => Role::Admin,
            _ => Role::Student,
        }
    }
}

impl std::default::Default for Role {
    fn default() -> Self {
        Role::Student
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "student"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}
