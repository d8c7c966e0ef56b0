use std::collections::HashMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::user::User;
use super::{AssignmentId, CourseId, UserId};
use crate::error::Rejection;

mod draft;

pub use draft::{create_assignment, AssignmentDraft};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    #[default]
    Individual,
    Group,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub submitted: bool,
    /// Kept as the text that was stored. Older snapshots may hold
    /// locale-formatted dates, which must load unchanged.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl Submission {
    pub fn new(submitted: bool, now: DateTime<Utc>) -> Submission {
        Submission {
            submitted,
            timestamp: if submitted {
                Some(now.to_rfc3339_opts(SecondsFormat::Millis, true))
            } else {
                None
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: AssignmentId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub drive_link: String,
    /// Soft reference to the admin who created the assignment.
    pub created_by: UserId,
    #[serde(default)]
    pub submission_type: SubmissionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<CourseId>,
    #[serde(default)]
    pub assigned_to: Vec<UserId>,
    /// Keyed by student id for individual work and by group id for group work.
    #[serde(default)]
    pub submissions: HashMap<String, Submission>,
}

impl Assignment {
    /// Submission state of `key`. Keys without an entry, such as students
    /// enrolled after the assignment was created, read as not submitted.
    pub fn submission_for(&self, key: &str) -> Submission {
        self.submissions.get(key).cloned().unwrap_or_default()
    }

    pub fn progress_percent(&self, key: &str) -> u8 {
        if self.submission_for(key).submitted {
            100
        } else {
            0
        }
    }

    pub fn with_submission(&self, key: &str, submitted: bool, now: DateTime<Utc>) -> Assignment {
        let mut submissions = self.submissions.clone();
        submissions.insert(key.to_string(), Submission::new(submitted, now));
        Assignment {
            submissions,
            ..self.clone()
        }
    }

    /// Drops `user_id` from `assigned_to` and `submissions`. Group assignments
    /// are keyed by group and pass through unchanged.
    pub(crate) fn without_user(&self, user_id: &str) -> Assignment {
        if self.submission_type != SubmissionType::Individual {
            return self.clone();
        }

        let mut submissions = self.submissions.clone();
        submissions.remove(user_id);

        Assignment {
            assigned_to: self
                .assigned_to
                .iter()
                .filter(|s| s.as_str() != user_id)
                .cloned()
                .collect(),
            submissions,
            ..self.clone()
        }
    }
}

pub fn find_assignment<'a>(assignments: &'a [Assignment], id: &str) -> Option<&'a Assignment> {
    assignments.iter().find(|a| a.id == id)
}

/// Records the submission state of `student_id`. Other entries are untouched
/// and repeating the same call yields the same assignment.
pub fn toggle_submission(
    assignment: &Assignment,
    student_id: &str,
    submitted: bool,
    now: DateTime<Utc>,
) -> Assignment {
    assignment.with_submission(student_id, submitted, now)
}

/// Replaces the assignment with the id of `updated`. Only its creator may do
/// this; for anyone else the list is left unchanged and a rejection returned.
///
/// An `updated` whose id matches nothing is a no-op.
pub fn edit_assignment(
    assignments: &[Assignment],
    updated: Assignment,
    acting: &User,
) -> Result<Vec<Assignment>, Rejection> {
    let existing = match find_assignment(assignments, &updated.id) {
        Some(existing) => existing,
        None => {
            tracing::debug!("Ignoring edit of missing assignment '{}'", updated.id);
            return Ok(assignments.to_vec());
        }
    };

    if existing.created_by != acting.id {
        tracing::warn!(
            "User '{}' attempted to edit assignment '{}' owned by '{}'",
            acting.id,
            existing.id,
            existing.created_by
        );
        return Err(Rejection::NotCreator {
            actor: acting.id.clone(),
            assignment: existing.id.clone(),
        });
    }

    let replacement = Assignment {
        created_by: existing.created_by.clone(),
        ..updated
    };

    Ok(assignments
        .iter()
        .map(|a| {
            if a.id == replacement.id {
                replacement.clone()
            } else {
                a.clone()
            }
        })
        .collect())
}
