use std::fmt;

use serde::{Deserialize, Serialize};

/// `time_str` wire format, e.g. "14:03:27 - 21/03/2025"
pub const TIME_FORMAT: &str = "%H:%M:%S - %d/%m/%Y";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationAction {
    Added,
    Updated,
    Deleted,
}

impl fmt::Display for NotificationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            NotificationAction::Added => "added",
            NotificationAction::Updated => "updated",
            NotificationAction::Deleted => "deleted",
        };
        write!(f, "{}", verb)
    }
}

/// An append-only log entry recording who did what to which project.
/// Entries are never updated in place; the collection is rewritten whole.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Notification {
    pub username: String,
    pub action: NotificationAction,
    pub project_id: String,
    pub time_str: String,
}

impl Notification {
    pub fn now(username: &str, action: NotificationAction, project_id: &str) -> Self {
        Self {
            username: username.to_string(),
            action,
            project_id: project_id.to_string(),
            time_str: jiff::Zoned::now().strftime(TIME_FORMAT).to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_format() {
        let entry = Notification::now("alice", NotificationAction::Added, "PRJ001");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["action"], "added");
        // "HH:MM:SS - DD/MM/YYYY" is always 21 characters
        assert_eq!(entry.time_str.len(), 21);
        assert_eq!(&entry.time_str[8..11], " - ");
    }

    #[test]
    fn test_lenient_decode_keeps_extra_keys_harmless() {
        let json = r#"{
            "username": "alice",
            "action": "deleted",
            "project_id": "PRJ002",
            "time_str": "10:00:00 - 01/01/2025",
            "source": "legacy"
        }"#;
        let entry: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(entry.action, NotificationAction::Deleted);
    }
}
