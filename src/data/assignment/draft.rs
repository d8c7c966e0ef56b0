use serde::{Deserialize, Serialize};

use super::{Assignment, Submission, SubmissionType};
use crate::data::{CourseId, UserId};
use crate::util;

/// Form input for a new assignment. Only `created_by` is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDraft {
    pub created_by: UserId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub drive_link: Option<String>,
    #[serde(default)]
    pub submission_type: SubmissionType,
    #[serde(default)]
    pub course_id: Option<CourseId>,
}

/// Builds a new assignment with a fresh id.
///
/// `enrolled` is the roster at creation time. Individual assignments are
/// assigned to exactly that roster; every key in it gets a not-submitted
/// entry. Nobody enrolled later gets an entry here.
pub fn create_assignment(draft: AssignmentDraft, enrolled: &[String]) -> Assignment {
    let mut roster: Vec<String> = Vec::with_capacity(enrolled.len());
    for id in enrolled {
        if !roster.contains(id) {
            roster.push(id.clone());
        }
    }

    let submissions = roster
        .iter()
        .map(|id| (id.clone(), Submission::default()))
        .collect();

    let assigned_to = match draft.submission_type {
        SubmissionType::Individual => roster,
        SubmissionType::Group => vec![],
    };

    Assignment {
        id: util::new_id("a"),
        title: draft
            .title
            .filter(|it| !it.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        description: draft.description.unwrap_or_default(),
        due_date: draft.due_date.unwrap_or_default(),
        drive_link: draft.drive_link.unwrap_or_default(),
        created_by: draft.created_by,
        submission_type: draft.submission_type,
        course_id: draft.course_id,
        assigned_to,
        submissions,
    }
}
