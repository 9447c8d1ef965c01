//! This module keeps a local view of the tasks of a day in sync with a task service
//!
//! A [`TaskStore`] owns the task list, the search term and the form state of a task table.
//! Every change goes through its operations, that reconcile the local list with the service:
//! * a day change or a creation re-fetches the whole list from the service,
//! * deletions, updates and completion toggles are only applied locally once the service confirmed them.
//!
//! Failures never reach the caller as errors: they are logged (using the `log::*` macros), reported as
//! [`StoreEvent::Failed`], and leave the task list at its last known good value.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{NaiveDate, Utc};

use crate::export::{self, Export, RowDate};
use crate::filter;
use crate::task::{Priority, Task, TaskDraft, TaskId};
use crate::traits::TaskService;
use crate::validation::{self, Field, FormErrors};

pub mod feedback;
use feedback::{Feedback, FeedbackSender, StoreEvent};

/// Everything a task table displays
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreState {
    /// The tasks of `selected_date`, in the order the service listed them
    pub tasks: Vec<Task>,
    pub selected_date: NaiveDate,
    /// Always lower-cased
    pub search_term: String,
    /// The content of the creation form
    pub draft: TaskDraft,
    /// The validation errors of the creation form
    pub errors: FormErrors,
    pub add_dialog_open: bool,
    /// The task being edited, if the edition dialog is open
    pub editing: Option<Task>,
}

impl StoreState {
    fn new(selected_date: NaiveDate) -> Self {
        Self {
            tasks: Vec::new(),
            selected_date,
            search_term: String::new(),
            draft: TaskDraft::default(),
            errors: FormErrors::new(),
            add_dialog_open: false,
            editing: None,
        }
    }
}

/// The result of a task creation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    /// The draft is invalid, nothing was sent to the service
    Invalid(FormErrors),
    /// The service stored the task, and the list has been refreshed
    Saved,
    /// The service could not store the task. The draft is kept
    Failed,
}

/// The local view of the tasks of a day, kept in sync with a [`TaskService`]
///
/// Operations take `&self`, so that several of them can be in flight at the same time
/// (e.g. the user selects two days in a row before the first listing arrives).
/// In this case, only the listing of the most recently selected day is applied.
pub struct TaskStore<S: TaskService> {
    service: S,
    state: Mutex<StoreState>,
    /// The ticket of the most recent listing request
    latest_listing: AtomicU64,
    feedback: Feedback,
}

impl<S: TaskService> TaskStore<S> {
    /// Create a store for the tasks of `date`.
    ///
    /// The task list is empty until [`Self::load_tasks`] or [`Self::set_date`] is called
    pub fn new(service: S, date: NaiveDate) -> Self {
        Self::new_with_feedback_opt(service, date, Feedback::new())
    }

    /// Create a store that notifies every change to `feedback_sender`. See [`feedback::feedback_channel`]
    pub fn new_with_feedback(service: S, date: NaiveDate, feedback_sender: FeedbackSender) -> Self {
        Self::new_with_feedback_opt(service, date, Feedback::new_with_feedback_channel(feedback_sender))
    }

    /// Create a store for the tasks of the current (UTC) day
    pub fn for_today(service: S) -> Self {
        Self::new(service, Utc::now().date_naive())
    }

    fn new_with_feedback_opt(service: S, date: NaiveDate, feedback: Feedback) -> Self {
        Self {
            service,
            state: Mutex::new(StoreState::new(date)),
            latest_listing: AtomicU64::new(0),
            feedback,
        }
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the task service.
    pub fn service(&self) -> &S { &self.service }

    /// A copy of the whole current state
    pub fn snapshot(&self) -> StoreState { self.state().clone() }

    pub fn tasks(&self) -> Vec<Task>              { self.state().tasks.clone() }
    pub fn selected_date(&self) -> NaiveDate      { self.state().selected_date }
    pub fn search_term(&self) -> String           { self.state().search_term.clone() }
    pub fn draft(&self) -> TaskDraft              { self.state().draft.clone() }
    pub fn errors(&self) -> FormErrors            { self.state().errors.clone() }
    pub fn is_add_dialog_open(&self) -> bool      { self.state().add_dialog_open }
    pub fn editing(&self) -> Option<Task>         { self.state().editing.clone() }

    /// The tasks whose title matches the search term
    pub fn filtered_tasks(&self) -> Vec<Task> {
        let state = self.state();
        filter::filter(&state.tasks, &state.search_term).into_iter().cloned().collect()
    }

    /// The rows a task table should display. See [`filter::visible_rows`]
    pub fn visible_tasks(&self) -> Vec<Task> {
        let state = self.state();
        filter::visible_rows(&state.tasks, &state.search_term).into_iter().cloned().collect()
    }

    pub fn set_search_term(&self, search_term: &str) {
        self.state().search_term = search_term.to_lowercase();
        self.feedback.send(StoreEvent::ViewChanged);
    }


    /// Select another day, and replace the task list with the tasks of this day.
    ///
    /// Returns whether the listing has been applied (see [`Self::load_tasks`])
    pub async fn set_date(&self, date: NaiveDate) -> bool {
        self.state().selected_date = date;
        log::debug!("Selected day is now {}", date);
        self.load_tasks().await
    }

    /// Fetch the tasks of the selected day, and replace the task list with them.
    ///
    /// Returns whether the task list has been replaced. It is not when:
    /// * the service failed (the current list is kept),
    /// * another listing has been requested in the meantime (this one is outdated, and ignored).
    pub async fn load_tasks(&self) -> bool {
        let ticket = self.latest_listing.fetch_add(1, Ordering::SeqCst) + 1;
        let date = self.state().selected_date;
        self.feedback.send(StoreEvent::Loading{ date });

        let result = self.service.list_tasks(date).await;

        let mut state = self.state();
        if self.latest_listing.load(Ordering::SeqCst) != ticket {
            log::debug!("Ignoring the outdated listing of {}", date);
            return false;
        }

        match result {
            Err(err) => {
                drop(state);
                self.feedback.failure("load tasks", &err);
                false
            },
            Ok(tasks) => {
                let count = tasks.len();
                state.tasks = tasks;
                drop(state);
                log::info!("Loaded {} tasks for {}", count, date);
                self.feedback.send(StoreEvent::TasksReplaced{ date, count });
                true
            },
        }
    }


    pub fn open_add_dialog(&self) {
        self.state().add_dialog_open = true;
        self.feedback.send(StoreEvent::ViewChanged);
    }

    /// Close the creation dialog. Its draft is kept for the next time it is opened
    pub fn close_add_dialog(&self) {
        self.state().add_dialog_open = false;
        self.feedback.send(StoreEvent::ViewChanged);
    }

    /// Change a field of the creation draft.
    ///
    /// In case this field currently has a validation error, it is validated again, so that the error disappears as soon as it is fixed
    pub fn set_draft_field(&self, field: Field, value: &str) {
        {
            let mut state = self.state();
            match field {
                Field::Title => state.draft.title = value.to_string(),
                Field::Description => state.draft.description = value.to_string(),
            }
            if state.errors.has_error(field) {
                state.errors.set(field, validation::validate_field(field, value));
            }
        }
        self.feedback.send(StoreEvent::ViewChanged);
    }

    pub fn set_draft_priority(&self, priority: Priority) {
        self.state().draft.priority = priority;
        self.feedback.send(StoreEvent::ViewChanged);
    }

    /// Submit the current creation draft. See [`Self::add_task`]
    pub async fn submit_draft(&self) -> Submission {
        let draft = self.draft();
        self.add_task(draft).await
    }

    /// Validate a draft, and create the matching task on the service, for the selected day.
    ///
    /// An invalid draft is never sent. Once the service stored the task, the form is cleared, the dialog is closed
    /// and the whole list is fetched again (the new task is not inserted locally).
    /// If the service fails, the dialog stays as it is, with the draft in it.
    pub async fn add_task(&self, candidate: TaskDraft) -> Submission {
        let date = {
            let mut state = self.state();
            state.draft = candidate.clone();
            if let Err(errors) = validation::validate_form(&candidate) {
                state.errors = errors.clone();
                drop(state);
                log::debug!("Not submitting an invalid task: {}", errors);
                self.feedback.send(StoreEvent::ViewChanged);
                return Submission::Invalid(errors);
            }
            state.errors = FormErrors::new();
            state.selected_date
        };

        let task = Task::new(candidate, date);
        if let Err(err) = self.service.add_task(&task).await {
            self.feedback.failure("add a task", &err);
            return Submission::Failed;
        }

        {
            let mut state = self.state();
            state.draft = TaskDraft::default();
            state.add_dialog_open = false;
        }
        log::info!("Task {} added for {}", task.id(), date);
        self.feedback.send(StoreEvent::TaskAdded(task.id().clone()));

        self.load_tasks().await;
        Submission::Saved
    }

    /// Delete a task on the service, then from the local list.
    ///
    /// Returns whether the task has been deleted. The local list is not modified unless the service confirmed the deletion
    pub async fn delete_task(&self, id: &TaskId) -> bool {
        if let Err(err) = self.service.delete_task(id).await {
            self.feedback.failure("delete a task", &err);
            return false;
        }

        self.state().tasks.retain(|task| task.id() != id);
        log::info!("Task {} deleted", id);
        self.feedback.send(StoreEvent::TaskRemoved(id.clone()));
        true
    }

    /// Flip the completion flag of a task on the service, then in the local list.
    ///
    /// Returns whether the service confirmed the change. The local flag is not modified otherwise,
    /// even though the service might have applied it: there is no way to know.
    pub async fn toggle_complete(&self, id: &TaskId) -> bool {
        if let Err(err) = self.service.mark_complete(id).await {
            self.feedback.failure("toggle the completion of a task", &err);
            return false;
        }

        let completed = {
            let mut state = self.state();
            state.tasks.iter_mut()
                .find(|task| task.id() == id)
                .map(|task| {
                    task.toggle_completed();
                    task.completed()
                })
        };
        match completed {
            None => log::debug!("Task {} is not displayed anymore, nothing to toggle locally", id),
            Some(completed) => self.feedback.send(StoreEvent::CompletionToggled{ id: id.clone(), completed }),
        }
        true
    }


    /// Open the edition dialog for a task of the list.
    ///
    /// Returns `false` if there is no such task
    pub fn begin_edit(&self, id: &TaskId) -> bool {
        let found = {
            let mut state = self.state();
            let task = state.tasks.iter().find(|task| task.id() == id).cloned();
            let found = task.is_some();
            if found {
                state.editing = task;
            }
            found
        };
        if found {
            self.feedback.send(StoreEvent::ViewChanged);
        }
        found
    }

    /// Replace the content of the edition dialog
    pub fn set_editing(&self, edited: Task) {
        self.state().editing = Some(edited);
        self.feedback.send(StoreEvent::ViewChanged);
    }

    pub fn cancel_edit(&self) {
        self.state().editing = None;
        self.feedback.send(StoreEvent::ViewChanged);
    }

    /// Replace a whole task on the service, then in the local list.
    ///
    /// Once the service confirmed it, the local task with the same ID is replaced (no field is merged), and the edition dialog is closed.
    /// A task moved to another day than the selected one is removed from the local list instead.
    /// Otherwise, the local list is not modified and the dialog stays open with `edited` in it.
    pub async fn update_task(&self, edited: Task) -> bool {
        self.state().editing = Some(edited.clone());

        if let Err(err) = self.service.update_task(&edited).await {
            self.feedback.failure("update a task", &err);
            return false;
        }

        let moved_away = {
            let mut state = self.state();
            let moved_away = edited.date() != state.selected_date;
            if moved_away {
                state.tasks.retain(|task| task.id() != edited.id());
            } else if let Some(task) = state.tasks.iter_mut().find(|task| task.id() == edited.id()) {
                *task = edited.clone();
            }
            state.editing = None;
            moved_away
        };

        if moved_away {
            log::info!("Task {} moved to {}", edited.id(), edited.date());
            self.feedback.send(StoreEvent::TaskRemoved(edited.id().clone()));
        } else {
            log::info!("Task {} updated", edited.id());
            self.feedback.send(StoreEvent::TaskUpdated(edited.id().clone()));
        }
        true
    }

    /// Submit the content of the edition dialog. See [`Self::update_task`]
    ///
    /// Returns `false` if the dialog is not open
    pub async fn submit_edit(&self) -> bool {
        match self.editing() {
            None => false,
            Some(edited) => self.update_task(edited).await,
        }
    }


    /// Export the whole task list (regardless of the search term) as CSV
    pub fn export_csv(&self, row_date: RowDate) -> Export {
        let state = self.state();
        export::export_csv(&state.tasks, state.selected_date, row_date)
    }
}
