//! To-do tasks, as exchanged with the task service

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;
use chrono::NaiveDate;

/// How urgent a task is
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Low
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}


/// The identifier of a task.
///
/// New tasks get a random UUID. Tasks created by older clients of the same service
/// may carry a numeric (timestamp) identifier, which is accepted and kept as its decimal string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId {
    content: String,
}

impl TaskId {
    /// Generate a random TaskId.
    pub fn random() -> Self {
        let random = Uuid::new_v4().to_hyphenated().to_string();
        Self { content: random }
    }

    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl From<String> for TaskId {
    fn from(content: String) -> Self {
        Self { content }
    }
}
impl From<&str> for TaskId {
    fn from(content: &str) -> Self {
        Self { content: content.to_string() }
    }
}
impl From<u64> for TaskId {
    fn from(number: u64) -> Self {
        Self { content: number.to_string() }
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.content)
    }
}

/// Used to support serde
impl Serialize for TaskId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.content)
    }
}
/// Used to support serde. Both JSON strings and JSON integers are valid identifiers
impl<'de> Deserialize<'de> for TaskId {
    fn deserialize<D>(deserializer: D) -> Result<TaskId, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(s) => Ok(TaskId::from(s)),
            RawId::Number(n) => Ok(TaskId::from(n)),
        }
    }
}



/// The user input of the creation form, before it is validated
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl TaskDraft {
    pub fn new<T: ToString, U: ToString>(title: T, description: U, priority: Priority) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            priority,
        }
    }
}


/// A to-do task
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireTask")]
pub struct Task {
    id: TaskId,
    title: String,
    description: String,
    priority: Priority,
    completed: bool,
    /// The day this task belongs to
    date: NaiveDate,
}

/// A task record, as listed by the service.
///
/// The service stores the completion flag as `completed` for new tasks, but toggles `isCompleted`.
/// When both are present, `isCompleted` wins.
#[derive(Deserialize)]
struct WireTask {
    id: TaskId,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default, rename = "isCompleted")]
    is_completed: Option<bool>,
    date: NaiveDate,
}

impl From<WireTask> for Task {
    fn from(wire: WireTask) -> Self {
        let completed = wire.is_completed.or(wire.completed).unwrap_or(false);
        Task::new_with_parameters(wire.id, wire.title, wire.description, wire.priority, completed, wire.date)
    }
}

impl Task {
    /// Create a brand new Task that is not on the service yet.
    /// This will pick a new (random) task ID.
    pub fn new(draft: TaskDraft, date: NaiveDate) -> Self {
        Self::new_with_parameters(TaskId::random(), draft.title, draft.description, draft.priority, false, date)
    }

    /// Create a new Task instance, that may be known by the service already
    pub fn new_with_parameters(id: TaskId, title: String, description: String,
                               priority: Priority, completed: bool, date: NaiveDate) -> Self
    {
        Self { id, title, description, priority, completed, date }
    }

    pub fn id(&self) -> &TaskId          { &self.id          }
    pub fn title(&self) -> &str          { &self.title       }
    pub fn description(&self) -> &str    { &self.description }
    pub fn priority(&self) -> Priority   { self.priority     }
    pub fn completed(&self) -> bool      { self.completed    }
    pub fn date(&self) -> NaiveDate      { self.date         }

    /// The human-readable completion status, as displayed in tables and exports
    pub fn status_label(&self) -> &'static str {
        if self.completed { "Completed" } else { "Not Completed" }
    }

    pub fn set_title(&mut self, new_title: String) {
        self.title = new_title;
    }

    pub fn set_description(&mut self, new_description: String) {
        self.description = new_description;
    }

    pub fn set_priority(&mut self, new_priority: Priority) {
        self.priority = new_priority;
    }

    /// Flip the completion flag.
    /// This mirrors what the service does on a `markComplete` request
    pub fn toggle_completed(&mut self) {
        self.completed = !self.completed;
    }
}
