use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::Record;

/// Fallback bar color when a project carries no explicit override
pub const DEFAULT_PROJECT_COLOR: &str = "#FF6B6B";
pub const DEFAULT_PRIORITY: &str = "Normal";

/// Project identifiers are the prefix plus a zero-padded ordinal ("PRJ007")
pub const PROJECT_ID_PREFIX: &str = "PRJ";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectStatus {
    #[default]
    Open,
    Pending,
    Ongoing,
    Completed,
    Canceled,
}

impl ProjectStatus {
    /// All statuses, in the order the kanban columns are shown
    pub fn all() -> [ProjectStatus; 5] {
        [
            ProjectStatus::Open,
            ProjectStatus::Pending,
            ProjectStatus::Ongoing,
            ProjectStatus::Completed,
            ProjectStatus::Canceled,
        ]
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProjectStatus::Open => "Open",
            ProjectStatus::Pending => "Pending",
            ProjectStatus::Ongoing => "Ongoing",
            ProjectStatus::Completed => "Completed",
            ProjectStatus::Canceled => "Canceled",
        };
        write!(f, "{}", label)
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(ProjectStatus::Open),
            "pending" => Ok(ProjectStatus::Pending),
            "ongoing" => Ok(ProjectStatus::Ongoing),
            "completed" => Ok(ProjectStatus::Completed),
            "canceled" | "cancelled" => Ok(ProjectStatus::Canceled),
            other => Err(format!(
                "unknown status '{}' (expected Open, Pending, Ongoing, Completed or Canceled)",
                other
            )),
        }
    }
}

/// A project as persisted in the projects document.
///
/// The fields without a `#[serde(default)]` mirror the required constructor
/// parameters of the original record shape; an element missing any of them
/// (or carrying unknown keys) does not reconstruct and is skipped by the
/// loader. `progress` is not clamped here; 0-100 is a caller convention.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Project {
    pub project_id: String,
    pub name: String,
    pub assignment: Vec<String>,
    pub manager: String,
    pub status: ProjectStatus,
    #[serde(deserialize_with = "progress_from_number_or_string")]
    pub progress: i64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub attachments: Vec<String>,
    #[serde(default)]
    pub dependency: String,
    #[serde(default)]
    pub estimated_time: String,
    #[serde(default)]
    pub view_gantt: bool,
    #[serde(default)]
    pub view_kanban: bool,
    #[serde(default)]
    pub drag_and_drop: bool,
}

impl Record for Project {
    fn identity(&self) -> &str {
        &self.project_id
    }
}

fn default_color() -> String {
    DEFAULT_PROJECT_COLOR.to_string()
}

fn default_priority() -> String {
    DEFAULT_PRIORITY.to_string()
}

/// Older documents stored progress as a string ("40"); accept both shapes.
fn progress_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(i64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
