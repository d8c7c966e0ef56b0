use std::collections::HashMap;

use derive_more::Deref;
use serde::{Deserialize, Serialize};

use super::UserId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    #[default]
    Grid,
    List,
}

impl Layout {
    pub fn toggled(self) -> Layout {
        match self {
            Layout::Grid => Layout::List,
            Layout::List => Layout::Grid,
        }
    }
}

/// Effective display preferences of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prefs {
    pub dark: bool,
    pub layout: Layout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

pub const DEFAULT_PREFS: Prefs = Prefs {
    dark: false,
    layout: Layout::Grid,
    sort_by: None,
};

impl Default for Prefs {
    fn default() -> Self {
        DEFAULT_PREFS
    }
}

/// A stored, possibly partial, preference entry. Also used as the payload of
/// an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrefsUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
}

impl PrefsUpdate {
    pub fn dark(dark: bool) -> PrefsUpdate {
        PrefsUpdate {
            dark: Some(dark),
            ..Default::default()
        }
    }

    pub fn layout(layout: Layout) -> PrefsUpdate {
        PrefsUpdate {
            layout: Some(layout),
            ..Default::default()
        }
    }

    /// Fields set in `update` win over the ones in `self`.
    fn merged(&self, update: PrefsUpdate) -> PrefsUpdate {
        PrefsUpdate {
            dark: update.dark.or(self.dark),
            layout: update.layout.or(self.layout),
            sort_by: update.sort_by.or_else(|| self.sort_by.clone()),
        }
    }

    fn overlay(&self, base: Prefs) -> Prefs {
        Prefs {
            dark: self.dark.unwrap_or(base.dark),
            layout: self.layout.unwrap_or(base.layout),
            sort_by: self.sort_by.clone().or(base.sort_by),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deref, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefsByUser(HashMap<UserId, PrefsUpdate>);

impl PrefsByUser {
    pub fn resolve(&self, user_id: &str) -> Prefs {
        match self.0.get(user_id) {
            Some(entry) => entry.overlay(DEFAULT_PREFS),
            None => DEFAULT_PREFS,
        }
    }

    pub fn updated(&self, user_id: &str, update: PrefsUpdate) -> PrefsByUser {
        let mut next = self.0.clone();
        let entry = next
            .get(user_id)
            .map(|existing| existing.merged(update.clone()))
            .unwrap_or(update);
        next.insert(user_id.to_string(), entry);
        PrefsByUser(next)
    }

    pub fn without(&self, user_id: &str) -> PrefsByUser {
        let mut next = self.0.clone();
        next.remove(user_id);
        PrefsByUser(next)
    }
}

impl FromIterator<(UserId, PrefsUpdate)> for PrefsByUser {
    fn from_iter<T: IntoIterator<Item = (UserId, PrefsUpdate)>>(iter: T) -> Self {
        PrefsByUser(iter.into_iter().collect())
    }
}

/// Effective preferences for `user_id`, defaulted where nothing is stored.
pub fn resolve_prefs(prefs_by_user: &PrefsByUser, user_id: &str) -> Prefs {
    prefs_by_user.resolve(user_id)
}

/// Merges `update` into the entry of `user_id` only.
pub fn update_prefs(prefs_by_user: &PrefsByUser, user_id: &str, update: PrefsUpdate) -> PrefsByUser {
    prefs_by_user.updated(user_id, update)
}
