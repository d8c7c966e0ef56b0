//! The complete application state and the cascades that keep it consistent.

use serde::{Deserialize, Deserializer, Serialize};

use crate::data::assignment::SubmissionType;
use crate::data::user::{normalize_users, RawUser};
use crate::data::{Assignment, Course, Group, PrefsByUser, Submission, User, UserId};
use crate::role::Role;

fn normalized_users<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<User>, D::Error> {
    let raw: Vec<RawUser> = Deserialize::deserialize(deserializer)?;
    Ok(normalize_users(raw))
}

fn normalized_courses<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Course>, D::Error> {
    let courses: Vec<Course> = Deserialize::deserialize(deserializer)?;
    Ok(courses.into_iter().map(Course::normalized).collect())
}

/// Groups left without members are dropped.
fn normalized_groups<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Group>, D::Error> {
    let groups: Vec<Group> = Deserialize::deserialize(deserializer)?;
    Ok(groups.into_iter().filter_map(Group::normalized).collect())
}

/// One immutable value of every collection. Operations return a new snapshot
/// and never modify the one they were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default, deserialize_with = "normalized_users")]
    pub users: Vec<User>,
    #[serde(default)]
    pub assignments: Vec<Assignment>,
    #[serde(default)]
    pub current_user_id: Option<UserId>,
    #[serde(default)]
    pub prefs_by_user: PrefsByUser,
    #[serde(default, deserialize_with = "normalized_courses")]
    pub courses: Vec<Course>,
    #[serde(default, deserialize_with = "normalized_groups")]
    pub groups: Vec<Group>,
}

impl Snapshot {
    pub fn current_user(&self) -> Option<&User> {
        let id = self.current_user_id.as_deref()?;
        self.users.iter().find(|u| u.id == id)
    }

    pub fn students(&self) -> impl Iterator<Item = &User> {
        self.users.iter().filter(|u| u.role == Role::Student)
    }

    /// Removes every trace of `user_id`.
    ///
    /// Each collection is derived from `self` alone, so the result doesn't
    /// depend on the order of the individual steps. Deleting an unknown id
    /// returns an equal snapshot.
    pub fn delete_user(&self, user_id: &str) -> Snapshot {
        let users = self
            .users
            .iter()
            .filter(|u| u.id != user_id)
            .cloned()
            .collect();

        let courses = self
            .courses
            .iter()
            .map(|c| c.without_student(user_id))
            .collect();

        let groups = self
            .groups
            .iter()
            .filter_map(|g| g.without_member(user_id))
            .collect();

        let assignments = self
            .assignments
            .iter()
            .map(|a| a.without_user(user_id))
            .collect();

        let prefs_by_user = self.prefs_by_user.without(user_id);

        let current_user_id = self
            .current_user_id
            .clone()
            .filter(|current| current != user_id);

        Snapshot {
            users,
            assignments,
            current_user_id,
            prefs_by_user,
            courses,
            groups,
        }
    }

    /// Demo data used when nothing is stored yet.
    pub fn seed() -> Snapshot {
        SEED.clone()
    }
}

/// Removes every trace of `user_id` from `snapshot`. See [`Snapshot::delete_user`].
pub fn delete_user(snapshot: &Snapshot, user_id: &str) -> Snapshot {
    snapshot.delete_user(user_id)
}

fn seed_assignment(
    id: &str,
    title: &str,
    due_date: &str,
    submission_type: SubmissionType,
    keys: &[&str],
) -> Assignment {
    Assignment {
        id: id.to_string(),
        title: title.to_string(),
        description: String::new(),
        due_date: due_date.to_string(),
        drive_link: String::new(),
        created_by: "u_admin_1".to_string(),
        submission_type,
        course_id: Some("c1".to_string()),
        assigned_to: match submission_type {
            SubmissionType::Individual => keys.iter().map(|k| k.to_string()).collect(),
            SubmissionType::Group => vec![],
        },
        submissions: keys
            .iter()
            .map(|k| (k.to_string(), Submission::default()))
            .collect(),
    }
}

lazy_static! {
    static ref SEED: Snapshot = {
        let students = ["u_student_1", "u_student_2", "u_student_3"];
        Snapshot {
            users: vec![
                User::new("u_admin_1", "Prof. Ada Byron", Role::Admin),
                User::new("u_student_1", "Alice Johnson", Role::Student),
                User::new("u_student_2", "Bob Smith", Role::Student),
                User::new("u_student_3", "Carol Diaz", Role::Student),
            ],
            assignments: vec![
                seed_assignment(
                    "a1",
                    "Lab 1: Processes",
                    "2025-11-01",
                    SubmissionType::Individual,
                    &students,
                ),
                seed_assignment(
                    "a2",
                    "Team Project Proposal",
                    "2025-11-15",
                    SubmissionType::Group,
                    &["g1"],
                ),
            ],
            current_user_id: None,
            prefs_by_user: PrefsByUser::default(),
            courses: vec![Course {
                id: "c1".to_string(),
                title: "Intro to Systems".to_string(),
                code: "CS101".to_string(),
                term: "Fall 2025".to_string(),
                instructor_id: "u_admin_1".to_string(),
                student_ids: students.iter().map(|s| s.to_string()).collect(),
            }],
            groups: vec![Group {
                id: "g1".to_string(),
                name: "Team Kernel".to_string(),
                member_ids: vec!["u_student_1".to_string(), "u_student_2".to_string()],
                leader_id: Some("u_student_1".to_string()),
            }],
        }
    };
}
