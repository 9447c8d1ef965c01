//! Utilities to notify a presentation layer about changes of a [`TaskStore`](crate::store::TaskStore)

use std::fmt::{Display, Error, Formatter};

use chrono::NaiveDate;

use crate::task::TaskId;

/// Something that changed in a store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// Nothing happened yet
    Idle,
    /// The tasks of a day are being fetched
    Loading { date: NaiveDate },
    /// The whole task list has been replaced by the listing of a day
    TasksReplaced { date: NaiveDate, count: usize },
    /// A task has been created on the service (the list will be refreshed)
    TaskAdded(TaskId),
    TaskRemoved(TaskId),
    TaskUpdated(TaskId),
    CompletionToggled { id: TaskId, completed: bool },
    /// The search term, the forms or the dialogs changed
    ViewChanged,
    /// An operation failed. The task list has not been modified
    Failed { operation: &'static str, details: String },
}

impl Display for StoreEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        match self {
            StoreEvent::Idle => write!(f, "Idle"),
            StoreEvent::Loading{date} => write!(f, "Loading tasks of {}...", date),
            StoreEvent::TasksReplaced{date, count} => write!(f, "Loaded {} tasks of {}", count, date),
            StoreEvent::TaskAdded(id) => write!(f, "Task {} added", id),
            StoreEvent::TaskRemoved(id) => write!(f, "Task {} removed", id),
            StoreEvent::TaskUpdated(id) => write!(f, "Task {} updated", id),
            StoreEvent::CompletionToggled{id, completed} => match completed {
                true => write!(f, "Task {} completed", id),
                false => write!(f, "Task {} not completed anymore", id),
            },
            StoreEvent::ViewChanged => write!(f, "View changed"),
            StoreEvent::Failed{operation, details} => write!(f, "Unable to {}: {}", operation, details),
        }
    }
}

impl Default for StoreEvent {
    fn default() -> Self {
        Self::Idle
    }
}



/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<StoreEvent>;
/// See [`feedback_channel`]
pub type FeedbackReceiver = tokio::sync::watch::Receiver<StoreEvent>;

/// Create a feeback channel, that can be used to be notified whenever the state of a store changes
pub fn feedback_channel() -> (FeedbackSender, FeedbackReceiver) {
    tokio::sync::watch::channel(StoreEvent::default())
}



/// Logs what happens in a store, and forwards it to the listener (if any)
pub struct Feedback {
    feedback_channel: Option<FeedbackSender>,
}

impl Feedback {
    pub fn new() -> Self {
        Self { feedback_channel: None }
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { feedback_channel: Some(channel) }
    }

    /// Log a failed operation, and notify the listener
    pub fn failure(&self, operation: &'static str, err: &crate::service::ServiceError) {
        if err.is_rejection() {
            log::warn!("Unable to {}: {}", operation, err);
        } else {
            log::error!("Unable to {}: {}", operation, err);
        }
        self.send(StoreEvent::Failed{ operation, details: err.to_string() });
    }

    /// Send an event to the listener (if any).
    pub fn send(&self, event: StoreEvent) {
        log::trace!("{}", event);
        if let Some(sender) = &self.feedback_channel {
            // A listener that went away is not an error
            let _ = sender.send(event);
        }
    }
}

impl Default for Feedback {
    fn default() -> Self {
        Self::new()
    }
}
