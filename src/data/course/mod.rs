use serde::{Deserialize, Serialize};

use super::user::{find_user, User};
use super::{CourseId, UserId};
use crate::role::Role;

mod draft;

pub use draft::{add_course, CourseDraft};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub code: String,
    pub term: String,
    /// Soft reference. May point to a user that no longer exists.
    pub instructor_id: UserId,
    #[serde(default)]
    pub student_ids: Vec<UserId>,
}

impl Course {
    pub fn has_student(&self, student_id: &str) -> bool {
        self.student_ids.iter().any(|s| s == student_id)
    }

    fn with_student(&self, student_id: &str) -> Course {
        let mut next = self.clone();
        if !next.has_student(student_id) {
            next.student_ids.push(student_id.to_string());
        }
        next
    }

    /// Drops repeated roster entries, keeping the first occurrence.
    pub fn normalized(self) -> Course {
        let mut student_ids: Vec<UserId> = Vec::with_capacity(self.student_ids.len());
        for id in self.student_ids {
            if !student_ids.contains(&id) {
                student_ids.push(id);
            }
        }
        Course {
            student_ids,
            ..self
        }
    }

    pub(crate) fn without_student(&self, student_id: &str) -> Course {
        Course {
            student_ids: self
                .student_ids
                .iter()
                .filter(|s| s.as_str() != student_id)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Adds `student_id` to every course listed in `course_ids`. Enrolling twice
/// is a no-op.
pub fn enroll_student(courses: &[Course], student_id: &str, course_ids: &[CourseId]) -> Vec<Course> {
    courses
        .iter()
        .map(|c| {
            if course_ids.contains(&c.id) {
                c.with_student(student_id)
            } else {
                c.clone()
            }
        })
        .collect()
}

/// Display name of the course instructor, or an empty string when the
/// instructor record is gone.
pub fn instructor_name(users: &[User], course: &Course) -> String {
    find_user(users, &course.instructor_id)
        .map(|u| u.display_name().to_string())
        .unwrap_or_default()
}

/// Courses visible to `user`: the ones an admin teaches, or the ones a student
/// is enrolled in.
///
/// Admin courses also match on instructor display name, so that a course whose
/// instructor was re-created under a different id still shows up.
pub fn courses_for<'a>(user: &User, courses: &'a [Course], users: &[User]) -> Vec<&'a Course> {
    match user.role {
        Role::Admin => courses
            .iter()
            .filter(|c| {
                c.instructor_id == user.id || instructor_name(users, c) == user.display_name()
            })
            .collect(),
        Role::Student => courses.iter().filter(|c| c.has_student(&user.id)).collect(),
    }
}
