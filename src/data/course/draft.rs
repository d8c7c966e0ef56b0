use serde::{Deserialize, Serialize};

use super::Course;
use crate::data::user::User;
use crate::data::UserId;
use crate::util;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub instructor_id: Option<UserId>,
    #[serde(default)]
    pub student_ids: Vec<UserId>,
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|it| !it.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Builds a course from `draft` and appends it. Missing fields are defaulted,
/// the instructor defaults to `acting`.
pub fn add_course(courses: &[Course], draft: CourseDraft, acting: &User) -> (Vec<Course>, Course) {
    let course = Course {
        id: util::new_id("c"),
        title: or_default(draft.title, "Untitled Course"),
        code: or_default(draft.code, "CXXX"),
        term: or_default(draft.term, "Fall 2025"),
        instructor_id: draft
            .instructor_id
            .filter(|it| !it.is_empty())
            .unwrap_or_else(|| acting.id.clone()),
        student_ids: draft.student_ids,
    }
    .normalized();

    tracing::info!("Adding course '{}' ({})", course.title, course.id);

    let mut next = courses.to_vec();
    next.push(course.clone());
    (next, course)
}
