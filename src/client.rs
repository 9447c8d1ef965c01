//! This module provides a client to connect to a task service over HTTP

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use serde::Serialize;

use crate::service::{Endpoint, Outcome, ServiceError};
use crate::settings::Settings;
use crate::task::{Task, TaskId};
use crate::traits::TaskService;

/// The body of requests that only target a task by its ID
#[derive(Serialize)]
struct IdBody<'a> {
    id: &'a TaskId,
}

/// A task service reached over HTTP/JSON
pub struct Client {
    settings: Settings,
    http: reqwest::Client,
}

impl Client {
    /// Create a client. This does not start a connection
    pub fn new(settings: Settings) -> Result<Self, ServiceError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self { settings, http })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    async fn fetch_list(&self, date: NaiveDate) -> Result<Vec<Task>, ServiceError> {
        let url = self.settings.endpoint_url(Endpoint::GetData.name())?;
        let date = date.format("%Y-%m-%d").to_string();

        let response = self.http
            .get(url)
            .query(&[("date", date.as_str())])
            .header(USER_AGENT, crate::settings::user_agent())
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(ServiceError::Status(response.status()));
        }

        let text = response.text().await?;
        let tasks = serde_json::from_str(&text)?;
        Ok(tasks)
    }

    /// Send a mutation to the service, and turn its reply into a `Result`
    async fn post<B: Serialize + ?Sized>(&self, endpoint: Endpoint, body: &B) -> Result<(), ServiceError> {
        let url = self.settings.endpoint_url(endpoint.name())?;
        let body = serde_json::to_string(body)?;

        let response = self.http
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .header(USER_AGENT, crate::settings::user_agent())
            .body(body)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(ServiceError::Status(response.status()));
        }

        let text = response.text().await?;
        let shape = match endpoint.reply_shape() {
            Some(shape) => shape,
            None => return Err(ServiceError::Rejected(format!("{} is not a mutation endpoint", endpoint))),
        };
        Outcome::parse(&text, shape)?.into_result()
    }
}

#[async_trait]
impl TaskService for Client {
    async fn list_tasks(&self, date: NaiveDate) -> Result<Vec<Task>, ServiceError> {
        let mut attempt = 0;
        loop {
            match self.fetch_list(date).await {
                Ok(tasks) => {
                    log::debug!("Listed {} tasks for {}", tasks.len(), date);
                    return Ok(tasks);
                },
                Err(err) if attempt < self.settings.list_retries && err.is_rejection() == false => {
                    attempt += 1;
                    log::warn!("Unable to list tasks for {} ({}), retrying ({}/{})", date, err, attempt, self.settings.list_retries);
                },
                Err(err) => return Err(err),
            }
        }
    }

    async fn add_task(&self, task: &Task) -> Result<(), ServiceError> {
        log::debug!("Adding task {}", task.id());
        self.post(Endpoint::AddTask, task).await
    }

    async fn delete_task(&self, id: &TaskId) -> Result<(), ServiceError> {
        log::debug!("Deleting task {}", id);
        self.post(Endpoint::DeleteTask, &IdBody { id }).await
    }

    async fn mark_complete(&self, id: &TaskId) -> Result<(), ServiceError> {
        log::debug!("Toggling completion of task {}", id);
        self.post(Endpoint::MarkComplete, &IdBody { id }).await
    }

    async fn update_task(&self, task: &Task) -> Result<(), ServiceError> {
        log::debug!("Updating task {}", task.id());
        self.post(Endpoint::UpdateTask, task).await
    }
}
