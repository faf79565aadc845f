use log::warn;
use thiserror::Error;

use crate::{
    models::{
        notification::{Notification, NotificationAction},
        project::{DEFAULT_PRIORITY, DEFAULT_PROJECT_COLOR, Project, ProjectStatus},
    },
    services::email::{Mailer, assignment_message},
    storage::connector::RecordStore,
};

#[derive(Debug, Error)]
pub enum CreateProjectError {
    #[error("Failed to persist project '{0}'")]
    SaveFailed(String),
}

pub struct CreateProjectParameters {
    pub name: String,
    pub manager: String,
    pub assignees: Vec<String>,
    pub status: ProjectStatus,
    pub progress: i64,
    pub start_date: String,
    pub end_date: String,
    pub color: Option<String>,
    pub priority: Option<String>,
    pub description: String,
    pub dependency: String,
    pub estimated_time: String,
}

/// Creates a project under the next PRJ identifier, records an "added"
/// notification and emails every resolvable assignee.
pub fn create_project(
    store: &RecordStore,
    mailer: &impl Mailer,
    actor: &str,
    parameters: CreateProjectParameters,
) -> Result<Project, CreateProjectError> {
    let project = Project {
        project_id: store.next_project_id(),
        name: parameters.name,
        assignment: parameters.assignees,
        manager: parameters.manager,
        status: parameters.status,
        progress: parameters.progress,
        start_date: parameters.start_date,
        end_date: parameters.end_date,
        color: parameters
            .color
            .unwrap_or_else(|| DEFAULT_PROJECT_COLOR.to_string()),
        priority: parameters
            .priority
            .unwrap_or_else(|| DEFAULT_PRIORITY.to_string()),
        description: parameters.description,
        attachments: vec![],
        dependency: parameters.dependency,
        estimated_time: parameters.estimated_time,
        view_gantt: false,
        view_kanban: false,
        drag_and_drop: false,
    };

    if !store.add_project(project.clone()) {
        return Err(CreateProjectError::SaveFailed(project.project_id));
    }

    record_notification(store, actor, NotificationAction::Added, &project.project_id);
    notify_assignees(store, mailer, &project);

    Ok(project)
}

#[derive(Debug, Error)]
pub enum UpdateProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Failed to persist project '{0}'")]
    SaveFailed(String),
}

/// Fields left as None keep their current value.
#[derive(Default)]
pub struct UpdateProjectParameters {
    pub project_id: String,
    pub name: Option<String>,
    pub manager: Option<String>,
    pub assignees: Option<Vec<String>>,
    pub status: Option<ProjectStatus>,
    pub progress: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub color: Option<String>,
    pub priority: Option<String>,
    pub description: Option<String>,
    pub dependency: Option<String>,
    pub estimated_time: Option<String>,
}

pub fn update_project(
    store: &RecordStore,
    actor: &str,
    parameters: UpdateProjectParameters,
) -> Result<Project, UpdateProjectError> {
    let Some(mut project) = store.project_by_id(&parameters.project_id) else {
        return Err(UpdateProjectError::ProjectNotFound(parameters.project_id));
    };

    if let Some(name) = parameters.name {
        project.name = name;
    }
    if let Some(manager) = parameters.manager {
        project.manager = manager;
    }
    if let Some(assignees) = parameters.assignees {
        project.assignment = assignees;
    }
    if let Some(status) = parameters.status {
        project.status = status;
    }
    if let Some(progress) = parameters.progress {
        project.progress = progress;
    }
    if let Some(start_date) = parameters.start_date {
        project.start_date = start_date;
    }
    if let Some(end_date) = parameters.end_date {
        project.end_date = end_date;
    }
    if let Some(color) = parameters.color {
        project.color = color;
    }
    if let Some(priority) = parameters.priority {
        project.priority = priority;
    }
    if let Some(description) = parameters.description {
        project.description = description;
    }
    if let Some(dependency) = parameters.dependency {
        project.dependency = dependency;
    }
    if let Some(estimated_time) = parameters.estimated_time {
        project.estimated_time = estimated_time;
    }

    if !store.save_project(project.clone()) {
        return Err(UpdateProjectError::SaveFailed(project.project_id));
    }

    record_notification(
        store,
        actor,
        NotificationAction::Updated,
        &project.project_id,
    );

    Ok(project)
}

#[derive(Debug, Error)]
pub enum DeleteProjectError {
    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Failed to persist removal of project '{0}'")]
    SaveFailed(String),
}

pub fn delete_project(
    store: &RecordStore,
    actor: &str,
    project_id: &str,
) -> Result<Project, DeleteProjectError> {
    let Some(project) = store.project_by_id(project_id) else {
        return Err(DeleteProjectError::ProjectNotFound(project_id.to_string()));
    };

    if !store.remove_project(project_id) {
        return Err(DeleteProjectError::SaveFailed(project_id.to_string()));
    }

    record_notification(store, actor, NotificationAction::Deleted, project_id);

    Ok(project)
}

/// Notification append failures never fail the project operation itself.
fn record_notification(store: &RecordStore, actor: &str, action: NotificationAction, id: &str) {
    if !store.push_notification(Notification::now(actor, action, id)) {
        warn!("could not record '{}' notification for {}", action, id);
    }
}

fn notify_assignees(store: &RecordStore, mailer: &impl Mailer, project: &Project) {
    let (subject, body) = assignment_message(project);
    for username in &project.assignment {
        match store.user_by_username(username) {
            Some(user) => {
                if !mailer.send(&user.email, &subject, &body) {
                    warn!("assignment mail to '{}' failed", username);
                }
            }
            None => warn!("assignee '{}' has no account, skipping mail", username),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::PathBuf;

    use super::*;
    use crate::{models::user::User, storage::connector::DataConfig};

    struct RecordingMailer {
        sent: RefCell<Vec<(String, String)>>,
    }

    impl RecordingMailer {
        fn new() -> Self {
            Self {
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Mailer for RecordingMailer {
        fn send(&self, to: &str, subject: &str, _body: &str) -> bool {
            self.sent
                .borrow_mut()
                .push((to.to_string(), subject.to_string()));
            true
        }
    }

    fn test_store(name: &str) -> RecordStore {
        let dir = PathBuf::from(format!("/tmp/procheck_projects_{}", name));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        RecordStore::new(DataConfig::in_dir(&dir))
    }

    fn parameters(name: &str, assignees: Vec<String>) -> CreateProjectParameters {
        CreateProjectParameters {
            name: name.to_string(),
            manager: String::from("carol"),
            assignees,
            status: ProjectStatus::Open,
            progress: 0,
            start_date: String::from("2025-03-01"),
            end_date: String::from("2025-03-05"),
            color: None,
            priority: None,
            description: String::new(),
            dependency: String::new(),
            estimated_time: String::new(),
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids_and_notifies() {
        let store = test_store("create");
        let mailer = RecordingMailer::new();

        store.add_user(User {
            name: String::from("Alice"),
            email: String::from("alice@example.com"),
            phone: String::from("0123"),
            username: String::from("alice"),
            password: String::from("pw"),
            avatar: String::from("assets/avatar-default.png"),
        });

        let first = create_project(
            &store,
            &mailer,
            "carol",
            parameters("First", vec![String::from("alice")]),
        )
        .unwrap();
        assert_eq!(first.project_id, "PRJ001");
        assert_eq!(first.color, DEFAULT_PROJECT_COLOR);

        let second = create_project(&store, &mailer, "carol", parameters("Second", vec![]))
            .unwrap();
        assert_eq!(second.project_id, "PRJ002");

        // One assignment mail, for the resolvable assignee of the first project
        let sent = mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "alice@example.com");

        let log = store.notifications();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].action, NotificationAction::Added);
        assert_eq!(log[0].project_id, "PRJ001");
    }

    #[test]
    fn test_unknown_assignee_is_skipped() {
        let store = test_store("unknown_assignee");
        let mailer = RecordingMailer::new();

        let project = create_project(
            &store,
            &mailer,
            "carol",
            parameters("Solo", vec![String::from("ghost")]),
        )
        .unwrap();
        assert_eq!(project.assignment, vec![String::from("ghost")]);
        assert!(mailer.sent.borrow().is_empty());
    }

    #[test]
    fn test_update_touches_only_given_fields() {
        let store = test_store("update");
        let mailer = RecordingMailer::new();
        let created =
            create_project(&store, &mailer, "carol", parameters("Site", vec![])).unwrap();

        let updated = update_project(
            &store,
            "carol",
            UpdateProjectParameters {
                project_id: created.project_id.clone(),
                progress: Some(60),
                status: Some(ProjectStatus::Ongoing),
                ..UpdateProjectParameters::default()
            },
        )
        .unwrap();

        assert_eq!(updated.progress, 60);
        assert_eq!(updated.status, ProjectStatus::Ongoing);
        assert_eq!(updated.name, "Site");
        assert_eq!(updated.start_date, "2025-03-01");

        let log = store.notifications();
        assert_eq!(log.last().unwrap().action, NotificationAction::Updated);
    }

    #[test]
    fn test_update_missing_project() {
        let store = test_store("update_missing");
        let result = update_project(
            &store,
            "carol",
            UpdateProjectParameters {
                project_id: String::from("PRJ999"),
                ..UpdateProjectParameters::default()
            },
        );
        assert!(matches!(
            result,
            Err(UpdateProjectError::ProjectNotFound(_))
        ));
    }

    #[test]
    fn test_delete_removes_and_logs() {
        let store = test_store("delete");
        let mailer = RecordingMailer::new();
        let created =
            create_project(&store, &mailer, "carol", parameters("Doomed", vec![])).unwrap();

        let deleted = delete_project(&store, "carol", &created.project_id).unwrap();
        assert_eq!(deleted.name, "Doomed");
        assert!(store.project_by_id(&created.project_id).is_none());

        let log = store.notifications();
        assert_eq!(log.last().unwrap().action, NotificationAction::Deleted);

        assert!(matches!(
            delete_project(&store, "carol", &created.project_id),
            Err(DeleteProjectError::ProjectNotFound(_))
        ));
    }
}
