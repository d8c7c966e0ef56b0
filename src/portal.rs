//! The session that owns the current [`Snapshot`].
//!
//! Every accepted intent produces a new snapshot which replaces the old one
//! and is handed to the store. Store failures are logged and otherwise
//! ignored; the in-memory snapshot stays authoritative.

use chrono::Utc;

use crate::config::Config;
use crate::data::assignment::{self, find_assignment};
use crate::data::course::{self, CourseDraft};
use crate::data::group;
use crate::data::user::{self, find_user, RawUser};
use crate::data::{
    Assignment, AssignmentDraft, AssignmentId, Course, CourseId, Group, Layout, Prefs,
    PrefsUpdate, SubmissionType, User, UserId,
};
use crate::error::Rejection;
use crate::pending::{DeleteCoordinator, DeleteStatus};
use crate::snapshot::Snapshot;
use crate::store::SnapshotStore;

pub struct Portal<S: SnapshotStore> {
    store: S,
    state: Snapshot,
    deletes: DeleteCoordinator,
    user_delete: Option<UserId>,
    dark_preview: bool,
}

impl<S: SnapshotStore> Portal<S> {
    pub fn new(store: S, config: &Config) -> Portal<S> {
        let loaded = match store.load() {
            Ok(loaded) => loaded,
            Err(err) => {
                tracing::warn!("Unable to load stored snapshot, starting fresh: {}", err);
                None
            }
        };

        let state = match loaded {
            Some(state) => {
                tracing::info!("Loaded snapshot with {} users", state.users.len());
                state
            }
            None if config.seed_demo_data => {
                tracing::info!("No stored snapshot, seeding demo data");
                Snapshot::seed()
            }
            None => Snapshot::default(),
        };

        let dark_preview = match &state.current_user_id {
            Some(id) => state.prefs_by_user.resolve(id).dark,
            None => store.default_prefs().dark,
        };

        Portal {
            store,
            state,
            deletes: DeleteCoordinator::new(config.undo_window()),
            user_delete: None,
            dark_preview,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn current_user(&self) -> Option<&User> {
        self.state.current_user()
    }

    /// Preferences of the signed-in user, or the login-screen preview.
    pub fn prefs(&self) -> Prefs {
        match &self.state.current_user_id {
            Some(id) => self.state.prefs_by_user.resolve(id),
            None => Prefs {
                dark: self.dark_preview,
                ..self.store.default_prefs()
            },
        }
    }

    fn commit(&mut self, next: Snapshot) {
        self.state = next;
        if let Err(err) = self.store.save(&self.state) {
            tracing::warn!("Unable to persist snapshot: {}", err);
        }
    }

    fn acting_user(&self) -> Result<User, Rejection> {
        self.current_user().cloned().ok_or(Rejection::NotSignedIn)
    }

    fn acting_admin(&self) -> Result<User, Rejection> {
        let user = self.acting_user()?;
        if !user.is_admin() {
            tracing::warn!("User '{}' attempted an admin-only action", user.id);
            return Err(Rejection::NotAdmin(user.id));
        }
        Ok(user)
    }

    // Session

    /// Signs in as `user_id`. The dark preview chosen on the login screen
    /// carries over into the user's preferences.
    pub fn login(&mut self, user_id: &str) -> Result<(), Rejection> {
        if find_user(&self.state.users, user_id).is_none() {
            return Err(Rejection::UnknownUser(user_id.to_string()));
        }

        tracing::info!("Signing in as '{}'", user_id);
        self.close_undo_window();

        let next = Snapshot {
            current_user_id: Some(user_id.to_string()),
            prefs_by_user: self
                .state
                .prefs_by_user
                .updated(user_id, PrefsUpdate::dark(self.dark_preview)),
            ..self.state.clone()
        };
        self.commit(next);
        Ok(())
    }

    pub fn switch_user(&mut self, user_id: &str) -> Result<(), Rejection> {
        if find_user(&self.state.users, user_id).is_none() {
            return Err(Rejection::UnknownUser(user_id.to_string()));
        }
        self.close_undo_window();
        self.dark_preview = self.state.prefs_by_user.resolve(user_id).dark;
        let next = Snapshot {
            current_user_id: Some(user_id.to_string()),
            ..self.state.clone()
        };
        self.commit(next);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.close_undo_window();
        let next = Snapshot {
            current_user_id: None,
            ..self.state.clone()
        };
        self.commit(next);
    }

    /// Flips the login-screen theme. Not persisted until someone signs in.
    pub fn toggle_dark_preview(&mut self) -> bool {
        self.dark_preview = !self.dark_preview;
        self.dark_preview
    }

    pub fn toggle_dark(&mut self) -> Result<bool, Rejection> {
        let user = self.acting_user()?;
        let dark = !self.state.prefs_by_user.resolve(&user.id).dark;
        self.dark_preview = dark;
        self.update_prefs(&user.id, PrefsUpdate::dark(dark));
        Ok(dark)
    }

    /// Sets `target`, or toggles the current layout when `None`.
    pub fn set_layout(&mut self, target: Option<Layout>) -> Result<Layout, Rejection> {
        let user = self.acting_user()?;
        let layout =
            target.unwrap_or_else(|| self.state.prefs_by_user.resolve(&user.id).layout.toggled());
        self.update_prefs(&user.id, PrefsUpdate::layout(layout));
        Ok(layout)
    }

    fn update_prefs(&mut self, user_id: &str, update: PrefsUpdate) {
        let next = Snapshot {
            prefs_by_user: self.state.prefs_by_user.updated(user_id, update),
            ..self.state.clone()
        };
        self.commit(next);
    }

    // Users

    /// Creates an account and signs in with it. Students are enrolled into
    /// `enroll_course_ids`.
    pub fn create_user(&mut self, raw: RawUser, enroll_course_ids: &[CourseId]) -> User {
        self.close_undo_window();
        let (users, created) = user::create_user(&self.state.users, raw);

        let courses = if created.role.can_manage() || enroll_course_ids.is_empty() {
            self.state.courses.clone()
        } else {
            course::enroll_student(&self.state.courses, &created.id, enroll_course_ids)
        };

        let next = Snapshot {
            users,
            courses,
            current_user_id: Some(created.id.clone()),
            ..self.state.clone()
        };
        self.commit(next);
        created
    }

    pub fn request_user_delete(&mut self, user_id: &str) {
        self.user_delete = Some(user_id.to_string());
    }

    pub fn cancel_user_delete(&mut self) {
        self.user_delete = None;
    }

    pub fn user_delete_target(&self) -> Option<&str> {
        self.user_delete.as_deref()
    }

    /// Runs the cascade for the user awaiting confirmation. Returns the id
    /// that was deleted.
    ///
    /// A pending assignment delete becomes permanent first, since its undo
    /// copy still holds the user's entries.
    pub fn confirm_user_delete(&mut self) -> Option<UserId> {
        let user_id = self.user_delete.take()?;
        tracing::info!("Deleting user '{}'", user_id);
        self.close_undo_window();
        let next = self.state.delete_user(&user_id);
        self.commit(next);
        Some(user_id)
    }

    // Courses and groups

    pub fn add_course(&mut self, draft: CourseDraft) -> Result<Course, Rejection> {
        let admin = self.acting_admin()?;
        let (courses, created) = course::add_course(&self.state.courses, draft, &admin);
        let next = Snapshot {
            courses,
            ..self.state.clone()
        };
        self.commit(next);
        Ok(created)
    }

    pub fn visible_courses(&self) -> Vec<&Course> {
        match self.current_user() {
            Some(user) => course::courses_for(user, &self.state.courses, &self.state.users),
            None => vec![],
        }
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), Rejection> {
        self.acting_user()?;
        let groups = group::add_group(&self.state.groups, group)?;
        let next = Snapshot {
            groups,
            ..self.state.clone()
        };
        self.commit(next);
        Ok(())
    }

    // Assignments

    /// Submission keys an assignment is created for: the course roster (or
    /// every student without a course) for individual work, the groups with
    /// a member on that roster for group work.
    fn roster_for(&self, draft: &AssignmentDraft) -> Vec<String> {
        let students: Vec<UserId> = match draft
            .course_id
            .as_deref()
            .and_then(|id| self.state.courses.iter().find(|c| c.id == id))
        {
            Some(course) => course.student_ids.clone(),
            None => self.state.students().map(|s| s.id.clone()).collect(),
        };

        match draft.submission_type {
            SubmissionType::Individual => students,
            SubmissionType::Group => self
                .state
                .groups
                .iter()
                .filter(|g| g.member_ids.iter().any(|m| students.contains(m)))
                .map(|g| g.id.clone())
                .collect(),
        }
    }

    pub fn create_assignment(&mut self, draft: AssignmentDraft) -> Result<Assignment, Rejection> {
        let admin = self.acting_admin()?;
        let draft = AssignmentDraft {
            created_by: admin.id,
            ..draft
        };
        let roster = self.roster_for(&draft);
        let created = assignment::create_assignment(draft, &roster);

        tracing::info!("Created assignment '{}' ({})", created.title, created.id);

        let mut assignments = self.state.assignments.clone();
        assignments.push(created.clone());
        let next = Snapshot {
            assignments,
            ..self.state.clone()
        };
        self.commit(next);
        Ok(created)
    }

    pub fn edit_assignment(&mut self, updated: Assignment) -> Result<(), Rejection> {
        let acting = self.acting_user()?;
        let assignments = assignment::edit_assignment(&self.state.assignments, updated, &acting)?;
        let next = Snapshot {
            assignments,
            ..self.state.clone()
        };
        self.commit(next);
        Ok(())
    }

    /// Marks the current user's work on `assignment_id` as (not) submitted.
    /// Group work is recorded under the user's group.
    pub fn set_submission(&mut self, assignment_id: &str, submitted: bool) -> Result<(), Rejection> {
        let acting = self.acting_user()?;

        let target = match find_assignment(&self.state.assignments, assignment_id) {
            Some(target) => target,
            None => return Ok(()),
        };

        let key = match target.submission_type {
            SubmissionType::Individual => acting.id.clone(),
            SubmissionType::Group => self
                .state
                .groups
                .iter()
                .filter(|g| g.has_member(&acting.id))
                .map(|g| g.id.clone())
                .min_by_key(|id| !target.submissions.contains_key(id))
                .ok_or_else(|| Rejection::NoGroup(acting.id.clone()))?,
        };

        let updated = assignment::toggle_submission(target, &key, submitted, Utc::now());
        let assignments = self
            .state
            .assignments
            .iter()
            .map(|a| {
                if a.id == updated.id {
                    updated.clone()
                } else {
                    a.clone()
                }
            })
            .collect();

        let next = Snapshot {
            assignments,
            ..self.state.clone()
        };
        self.commit(next);
        Ok(())
    }

    /// Only the creator may delete an assignment. Unknown ids are ignored.
    pub fn request_assignment_delete(&mut self, assignment_id: &str) -> Result<(), Rejection> {
        let acting = self.acting_user()?;
        let target = match find_assignment(&self.state.assignments, assignment_id) {
            Some(target) => target.clone(),
            None => return Ok(()),
        };

        if target.created_by != acting.id {
            tracing::warn!(
                "User '{}' attempted to delete assignment '{}' owned by '{}'",
                acting.id,
                target.id,
                target.created_by
            );
            return Err(Rejection::NotCreator {
                actor: acting.id,
                assignment: target.id,
            });
        }

        self.deletes.request_delete(target);
        Ok(())
    }

    pub fn cancel_assignment_delete(&mut self) {
        self.deletes.cancel_request();
    }

    pub fn confirm_assignment_delete(&mut self) -> bool {
        match self.deletes.confirm_delete(&self.state.assignments) {
            Some(assignments) => {
                let next = Snapshot {
                    assignments,
                    ..self.state.clone()
                };
                self.commit(next);
                true
            }
            None => false,
        }
    }

    pub fn undo_assignment_delete(&mut self) -> bool {
        match self.deletes.undo() {
            Some(assignments) => {
                let next = Snapshot {
                    assignments,
                    ..self.state.clone()
                };
                self.commit(next);
                true
            }
            None => false,
        }
    }

    /// Makes a pending delete permanent and drops an unconfirmed request.
    /// Undo belongs to the session that deleted.
    fn close_undo_window(&mut self) {
        self.deletes.expire();
        self.deletes.cancel_request();
    }

    pub fn dismiss_undo(&mut self) {
        self.deletes.dismiss();
    }

    pub fn delete_status(&self) -> DeleteStatus {
        self.deletes.status()
    }

    pub fn pending_delete(&self) -> Option<Assignment> {
        self.deletes.pending_item()
    }

    pub fn assignment(&self, id: &AssignmentId) -> Option<&Assignment> {
        find_assignment(&self.state.assignments, id)
    }

    /// Wipes the store and restores the demo data, signed in as its first
    /// user.
    pub fn reset_demo_data(&mut self) {
        if let Err(err) = self.store.clear() {
            tracing::warn!("Unable to clear stored snapshot: {}", err);
        }
        self.close_undo_window();
        self.user_delete = None;

        let mut next = Snapshot::seed();
        next.current_user_id = next.users.first().map(|u| u.id.clone());
        self.commit(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::role::Role;
    use crate::store::MemoryStore;
    use std::time::Duration;

    fn config() -> Config {
        Config {
            seed_demo_data: true,
            undo_window_ms: 6000,
            ..Default::default()
        }
    }

    fn portal() -> Portal<MemoryStore> {
        Portal::new(MemoryStore::new(), &config())
    }

    struct FailingStore;

    impl SnapshotStore for FailingStore {
        fn load(&self) -> Result<Option<Snapshot>, StoreError> {
            Err(StoreError::Json(
                serde_json::from_str::<Snapshot>("nope").unwrap_err(),
            ))
        }

        fn save(&self, _: &Snapshot) -> Result<(), StoreError> {
            Err(StoreError::Io {
                path: "/dev/null/portal.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn clear(&self) -> Result<(), StoreError> {
            self.save(&Snapshot::default())
        }
    }

    #[test]
    fn starts_signed_out_with_seed_data() {
        let p = portal();
        assert!(p.current_user().is_none());
        assert!(!p.snapshot().users.is_empty());
        assert!(p.store().raw().is_none());
    }

    #[test]
    fn starts_empty_without_seeding() {
        let p = Portal::new(
            MemoryStore::new(),
            &Config {
                seed_demo_data: false,
                ..Default::default()
            },
        );
        assert_eq!(p.snapshot(), &Snapshot::default());
    }

    #[test]
    fn every_change_is_persisted() {
        let mut p = portal();
        p.login("u_admin_1").unwrap();

        let stored = p.store().load().unwrap().unwrap();
        assert_eq!(&stored, p.snapshot());
        assert_eq!(stored.current_user_id.as_deref(), Some("u_admin_1"));
    }

    #[test]
    fn reload_resumes_session() {
        let mut p = portal();
        p.login("u_student_1").unwrap();
        let stored = p.store().raw().unwrap();

        let store = MemoryStore::new();
        store.save(&serde_json::from_str(&stored).unwrap()).unwrap();
        let resumed = Portal::new(store, &config());
        assert_eq!(resumed.current_user().unwrap().id, "u_student_1");
    }

    #[test]
    fn store_failures_do_not_block_changes() {
        let mut p = Portal::new(FailingStore, &config());
        p.login("u_admin_1").unwrap();
        let created = p
            .create_assignment(AssignmentDraft {
                title: Some("Still works".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(p.assignment(&created.id).is_some());
        p.reset_demo_data();
        assert_eq!(p.current_user().unwrap().id, "u_admin_1");
    }

    #[test]
    fn dark_preview_carries_into_login() {
        let mut p = portal();
        assert!(p.toggle_dark_preview());
        assert!(p.prefs().dark);

        p.login("u_student_2").unwrap();
        assert!(p.prefs().dark);
        assert_eq!(
            p.snapshot().prefs_by_user.get("u_student_2"),
            Some(&PrefsUpdate::dark(true))
        );
    }

    #[test]
    fn prefs_are_per_user() {
        let mut p = portal();
        p.login("u_student_1").unwrap();
        assert_eq!(p.set_layout(None).unwrap(), Layout::List);
        assert!(p.toggle_dark().unwrap());

        p.switch_user("u_student_2").unwrap();
        assert_eq!(p.prefs().layout, Layout::Grid);
        assert!(!p.prefs().dark);

        p.switch_user("u_student_1").unwrap();
        assert_eq!(p.prefs().layout, Layout::List);
        assert!(p.prefs().dark);
    }

    #[test]
    fn signed_out_prefs_changes_are_rejected() {
        let mut p = portal();
        assert_eq!(p.toggle_dark(), Err(Rejection::NotSignedIn));
        assert_eq!(p.login("ghost"), Err(Rejection::UnknownUser("ghost".into())));
    }

    #[test]
    fn created_student_is_enrolled_and_signed_in() {
        let mut p = portal();
        let created = p.create_user(
            RawUser {
                name: Some("Dana".into()),
                role: Some("student".into()),
                ..Default::default()
            },
            &["c1".to_string(), "c1".to_string()],
        );

        assert_eq!(p.current_user(), Some(&created));
        let c1 = &p.snapshot().courses[0];
        assert_eq!(c1.student_ids.iter().filter(|s| **s == created.id).count(), 1);
        assert_eq!(p.visible_courses().len(), 1);
    }

    #[test]
    fn created_admin_is_not_enrolled() {
        let mut p = portal();
        let created = p.create_user(
            RawUser {
                name: Some("Dr. New".into()),
                role: Some("admin".into()),
                ..Default::default()
            },
            &["c1".to_string()],
        );
        assert_eq!(created.role, Role::Admin);
        assert!(!p.snapshot().courses[0].has_student(&created.id));
    }

    #[test]
    fn user_delete_needs_confirmation() {
        let mut p = portal();
        p.login("u_student_1").unwrap();

        p.request_user_delete("u_student_1");
        p.cancel_user_delete();
        assert_eq!(p.confirm_user_delete(), None);
        assert!(p.current_user().is_some());

        p.request_user_delete("u_student_1");
        assert_eq!(p.confirm_user_delete().as_deref(), Some("u_student_1"));
        assert!(p.current_user().is_none());
        assert!(!p.snapshot().courses[0].has_student("u_student_1"));
    }

    #[test]
    fn only_admins_create() {
        let mut p = portal();
        p.login("u_student_1").unwrap();
        assert_eq!(
            p.add_course(CourseDraft::default()),
            Err(Rejection::NotAdmin("u_student_1".into()))
        );
        assert!(p.create_assignment(AssignmentDraft::default()).is_err());
        assert_eq!(p.snapshot().assignments.len(), 2);
    }

    #[test]
    fn course_assignment_seeds_course_roster() {
        let mut p = portal();
        p.login("u_admin_1").unwrap();
        let course = p
            .add_course(CourseDraft {
                title: Some("Compilers".into()),
                student_ids: vec!["u_student_2".into()],
                ..Default::default()
            })
            .unwrap();
        assert_eq!(course.instructor_id, "u_admin_1");

        let created = p
            .create_assignment(AssignmentDraft {
                title: Some("Parser".into()),
                course_id: Some(course.id.clone()),
                created_by: "spoofed".into(),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(created.created_by, "u_admin_1");
        assert_eq!(created.assigned_to, vec!["u_student_2"]);
        assert_eq!(created.submissions.len(), 1);
    }

    #[test]
    fn group_assignment_seeds_course_groups() {
        let mut p = portal();
        p.login("u_admin_1").unwrap();
        let created = p
            .create_assignment(AssignmentDraft {
                submission_type: SubmissionType::Group,
                course_id: Some("c1".into()),
                ..Default::default()
            })
            .unwrap();
        assert!(created.assigned_to.is_empty());
        assert_eq!(created.submissions.keys().collect::<Vec<_>>(), vec!["g1"]);
    }

    #[test]
    fn student_marks_and_unmarks() {
        let mut p = portal();
        p.login("u_student_1").unwrap();
        let a1 = "a1".to_string();

        assert!(!p.assignment(&a1).unwrap().submission_for("u_student_1").submitted);

        p.set_submission("a1", true).unwrap();
        let marked = p.assignment(&a1).unwrap().submission_for("u_student_1");
        assert!(marked.submitted);
        assert!(marked.timestamp.is_some());

        p.set_submission("a1", false).unwrap();
        let unmarked = p.assignment(&a1).unwrap().submission_for("u_student_1");
        assert!(!unmarked.submitted);
        assert_eq!(unmarked.timestamp, None);
    }

    #[test]
    fn group_work_is_recorded_for_the_group() {
        let mut p = portal();
        p.login("u_student_2").unwrap();
        p.set_submission("a2", true).unwrap();

        let a2 = p.assignment(&"a2".to_string()).unwrap();
        assert!(a2.submission_for("g1").submitted);
        assert!(!a2.submissions.contains_key("u_student_2"));

        p.switch_user("u_student_3").unwrap();
        assert_eq!(
            p.set_submission("a2", true),
            Err(Rejection::NoGroup("u_student_3".into()))
        );
    }

    #[test]
    fn non_creator_edit_leaves_list_unchanged() {
        let mut p = portal();
        let other = p.create_user(
            RawUser {
                name: Some("Dr. Other".into()),
                role: Some("admin".into()),
                ..Default::default()
            },
            &[],
        );
        let before = p.snapshot().assignments.clone();

        let mut changed = before[0].clone();
        changed.title = "Mine now".into();
        assert_eq!(
            p.edit_assignment(changed),
            Err(Rejection::NotCreator {
                actor: other.id,
                assignment: "a1".into()
            })
        );
        assert_eq!(p.snapshot().assignments, before);
    }

    #[test]
    fn non_creator_cannot_request_delete() {
        let mut p = portal();
        p.login("u_student_1").unwrap();
        assert!(p.request_assignment_delete("a1").is_err());
        assert_eq!(p.delete_status(), DeleteStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn admin_deletes_and_undoes() {
        let mut p = Portal::new(MemoryStore::new(), &config());
        p.login("u_admin_1").unwrap();
        let before = p.snapshot().assignments.clone();

        p.request_assignment_delete("a1").unwrap();
        assert_eq!(p.delete_status(), DeleteStatus::Confirming("a1".into()));
        assert!(p.confirm_assignment_delete());
        assert_eq!(p.snapshot().assignments.len(), before.len() - 1);
        assert_eq!(p.store().load().unwrap().unwrap().assignments.len(), 1);
        assert_eq!(p.pending_delete().unwrap().title, "Lab 1: Processes");

        tokio::time::sleep(Duration::from_secs(5)).await;

        assert!(p.undo_assignment_delete());
        assert_eq!(p.snapshot().assignments, before);
        assert_eq!(p.store().load().unwrap().unwrap().assignments, before);
        assert_eq!(p.delete_status(), DeleteStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_is_permanent_after_window() {
        let mut p = Portal::new(MemoryStore::new(), &config());
        p.login("u_admin_1").unwrap();

        p.request_assignment_delete("a2").unwrap();
        assert!(p.confirm_assignment_delete());

        tokio::time::sleep(Duration::from_secs(7)).await;

        assert!(!p.undo_assignment_delete());
        assert!(p.assignment(&"a2".to_string()).is_none());
    }

    #[test]
    fn reset_restores_seed_and_signs_in() {
        let mut p = portal();
        p.login("u_admin_1").unwrap();
        p.request_user_delete("u_student_1");
        p.confirm_user_delete();

        p.reset_demo_data();
        let mut expected = Snapshot::seed();
        expected.current_user_id = Some("u_admin_1".into());
        assert_eq!(p.snapshot(), &expected);
        assert_eq!(p.store().load().unwrap(), Some(expected));
    }

    #[tokio::test(start_paused = true)]
    async fn user_delete_makes_pending_delete_final() {
        let mut p = Portal::new(MemoryStore::new(), &config());
        p.login("u_admin_1").unwrap();

        p.request_assignment_delete("a2").unwrap();
        assert!(p.confirm_assignment_delete());

        p.request_user_delete("u_student_1");
        assert_eq!(p.confirm_user_delete().as_deref(), Some("u_student_1"));

        assert_eq!(p.delete_status(), DeleteStatus::Idle);
        assert!(!p.undo_assignment_delete());
        assert!(p.assignment(&"a2".to_string()).is_none());

        let stored = p.store().load().unwrap().unwrap();
        for s in [p.snapshot(), &stored] {
            assert!(s.users.iter().all(|u| u.id != "u_student_1"));
            assert!(s.assignments.iter().all(|a| {
                !a.assigned_to.iter().any(|id| id == "u_student_1")
                    && !a.submissions.contains_key("u_student_1")
            }));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn session_change_closes_undo_window() {
        let mut p = Portal::new(MemoryStore::new(), &config());
        p.login("u_admin_1").unwrap();
        p.request_assignment_delete("a1").unwrap();
        assert!(p.confirm_assignment_delete());

        p.switch_user("u_student_2").unwrap();
        assert_eq!(p.delete_status(), DeleteStatus::Idle);
        assert!(!p.undo_assignment_delete());
        assert!(p.assignment(&"a1".to_string()).is_none());

        p.login("u_admin_1").unwrap();
        p.request_assignment_delete("a2").unwrap();
        assert!(p.confirm_assignment_delete());
        p.logout();
        assert!(!p.undo_assignment_delete());
        assert!(p.snapshot().assignments.is_empty());
    }

    #[test]
    fn stored_browser_snapshot_loads_as_is() {
        let stored = r#"{
            "users": [
                {"id":"u_admin_1","name":"Prof. Ada Byron","role":"admin"},
                {"id":"u9","name":"Nine","role":"student"}
            ],
            "assignments": [{
                "id":"a9","title":"Essay","description":"","dueDate":"2025-11-30",
                "driveLink":"","createdBy":"u_admin_1","submissionType":"individual",
                "assignedTo":["u9"],
                "submissions":{"u9":{"submitted":true,"timestamp":"11/1/2025, 10:00:00 AM"}}
            }],
            "currentUserId":"u9",
            "prefsByUser":{"u9":{"dark":true,"layout":"list","sortBy":"dueDate"}},
            "courses":[],
            "groups":[]
        }"#;

        let p = Portal::new(MemoryStore::from_text(stored), &config());
        assert_eq!(p.current_user().map(|u| u.id.as_str()), Some("u9"));
        assert!(p.snapshot().users.iter().all(|u| u.id != "u_student_1"));

        let a9 = p.assignment(&"a9".to_string()).unwrap();
        assert_eq!(
            a9.submission_for("u9").timestamp.as_deref(),
            Some("11/1/2025, 10:00:00 AM")
        );
        assert!(p.prefs().dark);
    }
}
