//! The wire contract of the task service, and the normalization of its replies

use std::fmt::{Display, Formatter};

use reqwest::StatusCode;
use serde::Deserialize;

/// Everything that can go wrong when talking to the task service
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The request could not be sent or its reply could not be read (unreachable host, timeout...)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status code {0}")]
    Status(StatusCode),

    /// The reply is not the JSON document this endpoint is supposed to return
    #[error("malformed reply: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),

    /// The service understood the request, but refused it
    #[error("rejected by the service: {0}")]
    Rejected(String),
}

impl ServiceError {
    /// Whether this is a well-formed business failure, rather than a transport failure
    pub fn is_rejection(&self) -> bool {
        matches!(self, ServiceError::Rejected(_))
    }
}


/// The endpoints of the task service
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    GetData,
    AddTask,
    DeleteTask,
    MarkComplete,
    UpdateTask,
}

impl Endpoint {
    pub fn name(&self) -> &'static str {
        match self {
            Endpoint::GetData => "getData",
            Endpoint::AddTask => "addTask",
            Endpoint::DeleteTask => "deleteTask",
            Endpoint::MarkComplete => "markComplete",
            Endpoint::UpdateTask => "updateTask",
        }
    }

    /// How this endpoint reports the success of a mutation. Not every endpoint does it the same way.
    ///
    /// Returns `None` for `GetData`, which replies with a list of tasks
    pub fn reply_shape(&self) -> Option<ReplyShape> {
        match self {
            Endpoint::GetData => None,
            Endpoint::AddTask => Some(ReplyShape::Status),
            Endpoint::DeleteTask
            | Endpoint::MarkComplete
            | Endpoint::UpdateTask => Some(ReplyShape::Success),
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}


/// The shape of a mutation reply
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReplyShape {
    /// `{"status": "success"}`, or `{"status": <anything else>, "message": ...}`
    Status,
    /// `{"success": true}`, or `{"success": false, "message": ...}`
    Success,
}

#[derive(Deserialize)]
struct StatusReply {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct SuccessReply {
    success: bool,
    #[serde(default)]
    message: Option<String>,
}

/// The normalized result of a mutation request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub ok: bool,
    pub message: Option<String>,
}

impl From<StatusReply> for Outcome {
    fn from(reply: StatusReply) -> Self {
        Self { ok: reply.status == "success", message: reply.message }
    }
}

impl From<SuccessReply> for Outcome {
    fn from(reply: SuccessReply) -> Self {
        Self { ok: reply.success, message: reply.message }
    }
}

impl Outcome {
    /// Parse the body of a reply, according to the shape the endpoint uses
    pub fn parse(body: &str, shape: ReplyShape) -> Result<Self, ServiceError> {
        let outcome: Outcome = match shape {
            ReplyShape::Status => serde_json::from_str::<StatusReply>(body)?.into(),
            ReplyShape::Success => serde_json::from_str::<SuccessReply>(body)?.into(),
        };
        Ok(outcome)
    }

    pub fn into_result(self) -> Result<(), ServiceError> {
        if self.ok {
            Ok(())
        } else {
            Err(ServiceError::Rejected(self.message.unwrap_or_else(|| "no reason given".to_string())))
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_replies() {
        let ok = Outcome::parse(r#"{"status":"success"}"#, ReplyShape::Status).unwrap();
        assert_eq!(ok, Outcome { ok: true, message: None });
        assert!(ok.into_result().is_ok());

        let ko = Outcome::parse(r#"{"status":"error","message":"duplicate id"}"#, ReplyShape::Status).unwrap();
        assert_eq!(ko.ok, false);
        let err = ko.into_result().unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "rejected by the service: duplicate id");
    }

    #[test]
    fn success_replies() {
        assert!(Outcome::parse(r#"{"success":true}"#, ReplyShape::Success).unwrap().ok);

        let ko = Outcome::parse(r#"{"success":false}"#, ReplyShape::Success).unwrap();
        assert_eq!(ko, Outcome { ok: false, message: None });
        assert!(ko.into_result().unwrap_err().is_rejection());
    }

    #[test]
    fn shapes_are_not_interchangeable() {
        // An endpoint that answers with the wrong shape is a malformed reply, not a success
        let err = Outcome::parse(r#"{"status":"success"}"#, ReplyShape::Success).unwrap_err();
        assert!(matches!(err, ServiceError::Malformed(_)));
        assert!(err.is_rejection() == false);

        assert!(Outcome::parse("<html>", ReplyShape::Status).is_err());
    }

    #[test]
    fn only_add_uses_the_status_shape() {
        assert_eq!(Endpoint::GetData.reply_shape(), None);
        assert_eq!(Endpoint::AddTask.reply_shape(), Some(ReplyShape::Status));
        assert_eq!(Endpoint::DeleteTask.reply_shape(), Some(ReplyShape::Success));
        assert_eq!(Endpoint::MarkComplete.reply_shape(), Some(ReplyShape::Success));
        assert_eq!(Endpoint::UpdateTask.reply_shape(), Some(ReplyShape::Success));
        assert_eq!(Endpoint::MarkComplete.to_string(), "markComplete");
    }
}
