use async_trait::async_trait;
use chrono::NaiveDate;

use crate::task::{Task, TaskId};
use crate::service::ServiceError;

/// A remote store of tasks
///
/// Every method only returns `Ok` once the service has confirmed the operation.
/// Implementors normalize the various reply shapes of the service, so that a business failure is an `Err` as well.
#[async_trait]
pub trait TaskService {
    /// Returns the tasks of a given day, in the order the service lists them
    async fn list_tasks(&self, date: NaiveDate) -> Result<Vec<Task>, ServiceError>;
    /// Store a new task
    async fn add_task(&self, task: &Task) -> Result<(), ServiceError>;
    /// Remove a task
    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError>;
    /// Flip the completion flag of a task.
    /// This is not idempotent, and should never be retried blindly
    async fn mark_complete(&self, id: &TaskId) -> Result<(), ServiceError>;
    /// Replace a whole task record
    async fn update_task(&self, task: &Task) -> Result<(), ServiceError>;
}
