use std::path::{Path, PathBuf};

use log::warn;

use crate::{
    models::{notification::Notification, project::Project, user::User},
    services::auth,
    storage::{find_by_identity, json::JsonDocument, upsert},
};

/// Locations of the three collection documents. Built once in `main` and
/// handed to the store; nothing reads paths from ambient state.
#[derive(Debug, Clone)]
pub struct DataConfig {
    pub projects_file: PathBuf,
    pub users_file: PathBuf,
    pub notifications_file: PathBuf,
}

impl DataConfig {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            projects_file: dir.join("projects.json"),
            users_file: dir.join("users.json"),
            notifications_file: dir.join("notifications.json"),
        }
    }
}

/// The flat-file record store: whole-collection reads and rewrites over the
/// projects, users and notifications documents.
///
/// Identity uniqueness is deliberately not enforced here; registration and
/// project creation check for duplicates at their own boundary and the store
/// stays permissive.
pub struct RecordStore {
    projects: JsonDocument,
    users: JsonDocument,
    notifications: JsonDocument,
}

impl RecordStore {
    pub fn new(config: DataConfig) -> Self {
        Self {
            projects: JsonDocument::new(config.projects_file),
            users: JsonDocument::new(config.users_file),
            notifications: JsonDocument::new(config.notifications_file),
        }
    }

    pub fn all_projects(&self) -> Vec<Project> {
        self.projects.load()
    }

    pub fn all_users(&self) -> Vec<User> {
        self.users.load()
    }

    pub fn project_by_id(&self, project_id: &str) -> Option<Project> {
        find_by_identity(&self.all_projects(), project_id).cloned()
    }

    pub fn user_by_username(&self, username: &str) -> Option<User> {
        find_by_identity(&self.all_users(), username).cloned()
    }

    /// Appends without any duplicate check; callers that care about identity
    /// uniqueness verify it before calling.
    pub fn add_project(&self, project: Project) -> bool {
        let mut projects = self.all_projects();
        projects.push(project);
        self.projects.save(&projects)
    }

    /// Replaces the project sharing the same id, or appends it.
    pub fn save_project(&self, project: Project) -> bool {
        let mut projects = self.all_projects();
        upsert(&mut projects, project);
        self.projects.save(&projects)
    }

    pub fn save_all_projects(&self, projects: &[Project]) -> bool {
        self.projects.save(projects)
    }

    /// Removes every project with the given id and persists the remainder.
    /// Returns false when nothing matched or the rewrite failed.
    pub fn remove_project(&self, project_id: &str) -> bool {
        let mut projects = self.all_projects();
        let before = projects.len();
        projects.retain(|p| p.project_id != project_id);
        if projects.len() == before {
            return false;
        }
        self.projects.save(&projects)
    }

    /// Hashes the password and appends the account. Username and email
    /// uniqueness are the registration boundary's concern, not the store's.
    pub fn add_user(&self, mut user: User) -> bool {
        user.password = auth::hash_password(&user.password);
        let mut users = self.all_users();
        users.push(user);
        self.users.save(&users)
    }

    /// Digest-compares the supplied password against the stored one.
    /// No lockout state lives here; attempt counters are caller-local.
    pub fn login(&self, username: &str, password: &str) -> Option<User> {
        let digest = auth::hash_password(password);
        self.all_users()
            .into_iter()
            .find(|u| u.username == username && u.password == digest)
    }

    /// Re-hashes and stores a new password for the account with the given
    /// email (compared trimmed and lowercased). False when no account
    /// matches or the rewrite fails.
    pub fn update_password(&self, email: &str, new_password: &str) -> bool {
        let normalized = email.trim().to_lowercase();
        let mut users = self.all_users();

        let Some(user) = users
            .iter_mut()
            .find(|u| u.email.trim().to_lowercase() == normalized)
        else {
            warn!("no account matches email '{}'", email);
            return false;
        };

        user.password = auth::hash_password(new_password);
        self.users.save(&users)
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.load()
    }

    pub fn save_notifications(&self, notifications: &[Notification]) -> bool {
        self.notifications.save(notifications)
    }

    pub fn push_notification(&self, notification: Notification) -> bool {
        let mut notifications = self.notifications();
        notifications.push(notification);
        self.notifications.save(&notifications)
    }

    /// Next identifier in the "PRJ" + zero-padded ordinal convention:
    /// highest existing ordinal plus one, e.g. PRJ006 -> PRJ007.
    pub fn next_project_id(&self) -> String {
        let highest = self
            .all_projects()
            .iter()
            .filter_map(|p| {
                p.project_id
                    .strip_prefix(crate::models::project::PROJECT_ID_PREFIX)
            })
            .filter_map(|ordinal| ordinal.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!(
            "{}{:03}",
            crate::models::project::PROJECT_ID_PREFIX,
            highest + 1
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::models::project::ProjectStatus;

    fn test_store(name: &str) -> RecordStore {
        let dir = PathBuf::from(format!("/tmp/procheck_store_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        RecordStore::new(DataConfig::in_dir(&dir))
    }

    fn sample_project(id: &str, name: &str) -> Project {
        Project {
            project_id: id.to_string(),
            name: name.to_string(),
            assignment: vec![],
            manager: String::from("carol"),
            status: ProjectStatus::Open,
            progress: 0,
            start_date: String::from("2025-03-01"),
            end_date: String::from("2025-03-05"),
            color: String::from("#FF6B6B"),
            priority: String::from("Normal"),
            description: String::new(),
            attachments: vec![],
            dependency: String::new(),
            estimated_time: String::new(),
            view_gantt: false,
            view_kanban: false,
            drag_and_drop: false,
        }
    }

    fn sample_user(username: &str, email: &str) -> User {
        User {
            name: String::from("Alice"),
            email: email.to_string(),
            phone: String::from("0123456789"),
            username: username.to_string(),
            password: String::from("secret123"),
            avatar: String::from("assets/avatar-default.png"),
        }
    }

    #[test]
    fn test_save_project_upserts() {
        let store = test_store("upsert");
        assert!(store.add_project(sample_project("PRJ001", "First")));

        let mut updated = sample_project("PRJ001", "First, renamed");
        updated.progress = 50;
        assert!(store.save_project(updated));

        let projects = store.all_projects();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "First, renamed");
        assert_eq!(projects[0].progress, 50);

        assert!(store.save_project(sample_project("PRJ002", "Second")));
        assert_eq!(store.all_projects().len(), 2);
    }

    #[test]
    fn test_duplicate_ids_resolve_to_first() {
        // The store does not enforce identity uniqueness; lookups after a
        // raw double-append return the first occurrence.
        let store = test_store("dupes");
        assert!(store.add_project(sample_project("PRJ001", "First copy")));
        assert!(store.add_project(sample_project("PRJ001", "Second copy")));

        assert_eq!(store.all_projects().len(), 2);
        assert_eq!(store.project_by_id("PRJ001").unwrap().name, "First copy");
    }

    #[test]
    fn test_remove_project() {
        let store = test_store("remove");
        store.add_project(sample_project("PRJ001", "Keep"));
        store.add_project(sample_project("PRJ002", "Drop"));

        assert!(store.remove_project("PRJ002"));
        assert!(!store.remove_project("PRJ002"));
        assert_eq!(store.all_projects().len(), 1);
    }

    #[test]
    fn test_login_against_digest() {
        let store = test_store("login");
        assert!(store.add_user(sample_user("alice", "alice@example.com")));

        let stored = store.user_by_username("alice").unwrap();
        assert_ne!(stored.password, "secret123");

        assert!(store.login("alice", "secret123").is_some());
        assert!(store.login("alice", "secret124").is_none());
        assert!(store.login("bob", "secret123").is_none());
    }

    #[test]
    fn test_update_password_by_normalized_email() {
        let store = test_store("reset");
        store.add_user(sample_user("alice", "Alice@Example.com"));

        assert!(store.update_password("  alice@example.com ", "newpass"));
        assert!(store.login("alice", "newpass").is_some());
        assert!(store.login("alice", "secret123").is_none());

        assert!(!store.update_password("nobody@example.com", "x"));
    }

    #[test]
    fn test_next_project_id_zero_pads() {
        let store = test_store("ids");
        assert_eq!(store.next_project_id(), "PRJ001");

        store.add_project(sample_project("PRJ006", "Six"));
        store.add_project(sample_project("PRJ002", "Two"));
        assert_eq!(store.next_project_id(), "PRJ007");
    }

    #[test]
    fn test_notifications_append() {
        use crate::models::notification::{Notification, NotificationAction};

        let store = test_store("notifications");
        assert!(store.push_notification(Notification::now(
            "alice",
            NotificationAction::Added,
            "PRJ001"
        )));
        assert!(store.push_notification(Notification::now(
            "bob",
            NotificationAction::Deleted,
            "PRJ001"
        )));

        let log = store.notifications();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].username, "alice");
        assert_eq!(log[1].action, NotificationAction::Deleted);
    }
}
