use serde::{Deserialize, Serialize};

/// Fixed status set, in the intended (but unenforced) progression order.
pub const STATUS_OPTIONS: [TaskStatus; 4] = [
    TaskStatus::InProgress,
    TaskStatus::VeForChecking,
    TaskStatus::ExecsForChecking,
    TaskStatus::Done,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "VE For Checking")]
    VeForChecking,
    #[serde(rename = "Execs For Checking")]
    ExecsForChecking,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::VeForChecking => "VE For Checking",
            Self::ExecsForChecking => "Execs For Checking",
            Self::Done => "Done",
        }
    }

    /// Exact-match lookup against the chat labels. Anything else is not a
    /// valid status reply.
    pub fn from_label(label: &str) -> Option<Self> {
        STATUS_OPTIONS
            .into_iter()
            .find(|status| status.label() == label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "Task Name")]
    pub name: String,
    /// Space-joined "@username" tokens, kept as a single string for store
    /// fidelity. Use `assignees()` instead of splitting at call sites.
    #[serde(rename = "Assigned To")]
    pub assigned_to: String,
    /// RFC3339.
    #[serde(rename = "Deadline")]
    pub deadline: String,
    #[serde(rename = "Status")]
    pub status: TaskStatus,
    /// RFC3339, set only while the task is Done.
    #[serde(rename = "Completion Time", default)]
    pub completed_at: Option<String>,
}

impl Task {
    pub fn assignees(&self) -> impl Iterator<Item = &str> {
        self.assigned_to.split_whitespace()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    #[serde(rename = "List")]
    pub name: String,
    #[serde(rename = "Tasks", default)]
    pub tasks: Vec<Task>,
}
