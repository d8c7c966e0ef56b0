use serde::{Deserialize, Serialize};

use super::{GroupId, UserId};
use crate::error::Rejection;
use crate::util;

/// A project group. `leader_id` is always `None` or one of `member_ids`, and a
/// group in a collection always has at least one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    #[serde(default)]
    pub id: GroupId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub member_ids: Vec<UserId>,
    #[serde(default)]
    pub leader_id: Option<UserId>,
}

impl Group {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.member_ids.iter().any(|m| m == user_id)
    }

    /// Removes `user_id` from the group. Leadership passes to the new first
    /// member; `None` means the group is now empty and must be dropped.
    pub(crate) fn without_member(&self, user_id: &str) -> Option<Group> {
        let member_ids: Vec<UserId> = self
            .member_ids
            .iter()
            .filter(|m| m.as_str() != user_id)
            .cloned()
            .collect();

        if member_ids.is_empty() {
            return None;
        }

        let leader_id = match &self.leader_id {
            Some(leader) if leader == user_id => member_ids.first().cloned(),
            other => other.clone(),
        };

        Some(Group {
            member_ids,
            leader_id,
            ..self.clone()
        })
    }

    /// Drops duplicate members and replaces a leader who isn't a member with
    /// the first member. `None` when no members remain.
    pub fn normalized(self) -> Option<Group> {
        let mut member_ids: Vec<UserId> = Vec::with_capacity(self.member_ids.len());
        for id in self.member_ids {
            if !member_ids.contains(&id) {
                member_ids.push(id);
            }
        }

        if member_ids.is_empty() {
            return None;
        }

        let leader_id = match self.leader_id {
            Some(leader) if member_ids.contains(&leader) => Some(leader),
            Some(_) => member_ids.first().cloned(),
            None => None,
        };

        Some(Group {
            member_ids,
            leader_id,
            ..self
        })
    }
}

/// Appends `group` after restoring its invariants. See [`Group::normalized`].
pub fn add_group(groups: &[Group], group: Group) -> Result<Vec<Group>, Rejection> {
    let mut group = group.normalized().ok_or(Rejection::EmptyGroup)?;

    if group.id.is_empty() || groups.iter().any(|g| g.id == group.id) {
        group.id = util::new_id("g");
    }

    tracing::debug!("Adding group {} with {} members", group.id, group.member_ids.len());

    let mut next = groups.to_vec();
    next.push(group);
    Ok(next)
}
