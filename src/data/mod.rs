pub mod assignment;
pub mod course;
pub mod group;
pub mod prefs;
pub mod user;

pub type UserId = String;
pub type CourseId = String;
pub type GroupId = String;
pub type AssignmentId = String;

pub use assignment::{Assignment, AssignmentDraft, Submission, SubmissionType};
pub use course::{Course, CourseDraft};
pub use group::Group;
pub use prefs::{Layout, Prefs, PrefsByUser, PrefsUpdate};
pub use user::{RawUser, User};
