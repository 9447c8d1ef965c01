//! An in-memory task service, used to test code that talks to a task service without a server
#![cfg(any(test, feature = "mocks"))]

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Notify;

use crate::mock_behaviour::MockBehaviour;
use crate::service::{Endpoint, ServiceError};
use crate::task::{Task, TaskId};
use crate::traits::TaskService;

/// A [`TaskService`] that stores its tasks in memory.
///
/// It records every call it receives, can be told to fail (see [`MockBehaviour`]),
/// and can hold the listing of a given day until the test releases it.
#[derive(Default)]
pub struct MockTaskService {
    tasks: Mutex<BTreeMap<NaiveDate, Vec<Task>>>,
    behaviour: Mutex<MockBehaviour>,
    calls: Mutex<Vec<Endpoint>>,
    held_dates: Mutex<HashMap<NaiveDate, Arc<Notify>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockTaskService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service that already stores some tasks
    pub fn with_tasks<I: IntoIterator<Item = Task>>(tasks: I) -> Self {
        let service = Self::new();
        {
            let mut stored = lock(&service.tasks);
            for task in tasks {
                stored.entry(task.date()).or_default().push(task);
            }
        }
        service
    }

    pub fn set_behaviour(&self, behaviour: MockBehaviour) {
        *lock(&self.behaviour) = behaviour;
    }

    /// The tasks this service currently stores for a day
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<Task> {
        lock(&self.tasks).get(&date).cloned().unwrap_or_default()
    }

    /// Every request received so far, in order
    pub fn calls(&self) -> Vec<Endpoint> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Listings of this day will not complete until [`Self::release_date`] is called
    pub fn hold_date(&self, date: NaiveDate) {
        lock(&self.held_dates).insert(date, Arc::new(Notify::new()));
    }

    /// Let the (current or future) listing of a held day complete
    pub fn release_date(&self, date: NaiveDate) {
        if let Some(gate) = lock(&self.held_dates).remove(&date) {
            gate.notify_one();
        }
    }

    fn record(&self, endpoint: Endpoint) {
        lock(&self.calls).push(endpoint);
    }

    fn find_mut<'a>(tasks: &'a mut BTreeMap<NaiveDate, Vec<Task>>, id: &TaskId) -> Option<&'a mut Task> {
        tasks.values_mut()
            .flat_map(|day| day.iter_mut())
            .find(|task| task.id() == id)
    }
}

#[async_trait]
impl TaskService for MockTaskService {
    async fn list_tasks(&self, date: NaiveDate) -> Result<Vec<Task>, ServiceError> {
        self.record(Endpoint::GetData);
        lock(&self.behaviour).can_list_tasks().map_err(ServiceError::Rejected)?;

        let gate = lock(&self.held_dates).get(&date).cloned();
        if let Some(gate) = gate {
            log::debug!("Mock service: holding the listing of {}", date);
            gate.notified().await;
        }

        Ok(self.tasks_on(date))
    }

    async fn add_task(&self, task: &Task) -> Result<(), ServiceError> {
        self.record(Endpoint::AddTask);
        lock(&self.behaviour).can_add_task().map_err(ServiceError::Rejected)?;

        let mut tasks = lock(&self.tasks);
        if Self::find_mut(&mut tasks, task.id()).is_some() {
            return Err(ServiceError::Rejected(format!("Task {} already exists", task.id())));
        }
        tasks.entry(task.date()).or_default().push(task.clone());
        Ok(())
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        self.record(Endpoint::DeleteTask);
        lock(&self.behaviour).can_delete_task().map_err(ServiceError::Rejected)?;

        let mut tasks = lock(&self.tasks);
        for day in tasks.values_mut() {
            if let Some(position) = day.iter().position(|task| task.id() == id) {
                day.remove(position);
                return Ok(());
            }
        }
        Err(ServiceError::Rejected(format!("No task {}", id)))
    }

    async fn mark_complete(&self, id: &TaskId) -> Result<(), ServiceError> {
        self.record(Endpoint::MarkComplete);
        lock(&self.behaviour).can_mark_complete().map_err(ServiceError::Rejected)?;

        let mut tasks = lock(&self.tasks);
        match Self::find_mut(&mut tasks, id) {
            None => Err(ServiceError::Rejected(format!("No task {}", id))),
            Some(task) => {
                task.toggle_completed();
                Ok(())
            },
        }
    }

    async fn update_task(&self, task: &Task) -> Result<(), ServiceError> {
        self.record(Endpoint::UpdateTask);
        lock(&self.behaviour).can_update_task().map_err(ServiceError::Rejected)?;

        let mut tasks = lock(&self.tasks);
        let current_date = match Self::find_mut(&mut tasks, task.id()) {
            None => return Err(ServiceError::Rejected(format!("No task {}", task.id()))),
            Some(current) if current.date() == task.date() => {
                *current = task.clone();
                return Ok(());
            },
            Some(current) => current.date(),
        };

        // The task moved to another day
        if let Some(day) = tasks.get_mut(&current_date) {
            day.retain(|t| t.id() != task.id());
        }
        tasks.entry(task.date()).or_default().push(task.clone());
        Ok(())
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use crate::task::{Priority, TaskDraft};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
    }

    #[tokio::test]
    async fn stores_tasks_per_day() {
        let service = MockTaskService::new();
        let task = Task::new(TaskDraft::new("Buy milk", "Two bottles", Priority::Low), day(16));

        service.add_task(&task).await.unwrap();
        assert!(service.add_task(&task).await.unwrap_err().is_rejection());
        assert_eq!(service.list_tasks(day(16)).await.unwrap(), vec![task.clone()]);
        assert!(service.list_tasks(day(17)).await.unwrap().is_empty());

        service.mark_complete(task.id()).await.unwrap();
        assert!(service.tasks_on(day(16))[0].completed());

        let moved = Task::new_with_parameters(task.id().clone(), "Buy oat milk".to_string(), task.description().to_string(),
            task.priority(), true, day(17));
        service.update_task(&moved).await.unwrap();
        assert!(service.tasks_on(day(16)).is_empty());
        assert_eq!(service.tasks_on(day(17)), vec![moved.clone()]);

        service.delete_task(moved.id()).await.unwrap();
        assert!(service.delete_task(moved.id()).await.is_err());
        assert_eq!(service.call_count(), 8);
    }

    #[tokio::test]
    async fn scripted_failures() {
        let service = MockTaskService::new();
        service.set_behaviour(MockBehaviour { list_tasks_behaviour: (1, 1), ..MockBehaviour::default() });

        assert!(service.list_tasks(day(16)).await.is_ok());
        assert!(service.list_tasks(day(16)).await.is_err());
        assert!(service.list_tasks(day(16)).await.is_ok());
        assert_eq!(service.calls(), vec![Endpoint::GetData; 3]);
    }

    #[tokio::test]
    async fn held_listing_waits_for_release() {
        let service = MockTaskService::with_tasks(vec![
            Task::new(TaskDraft::new("Buy milk", "Two bottles", Priority::Low), day(16)),
        ]);
        service.hold_date(day(16));

        let (tasks, _) = tokio::join!(
            service.list_tasks(day(16)),
            async { service.release_date(day(16)) },
        );
        assert_eq!(tasks.unwrap().len(), 1);
    }
}
