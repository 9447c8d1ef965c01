//! This crate keeps a per-day list of to-do tasks in sync with a remote task service.
//!
//! It provides an HTTP/JSON client in the [`client`] module, that can be used as a stand-alone module.
//!
//! A [`TaskStore`](store::TaskStore) owns the local view of the tasks of the selected day, along with the state of a
//! task table (search term, creation and edition forms). It reconciles its task list with a [`TaskService`](traits::TaskService)
//! (usually a [`Client`](client::Client)), and ignores listings that arrive after a newer one has been requested. \
//! The pure parts (form [`validation`], title search in [`filter`], CSV [`export`]) can be used on their own.

pub mod traits;

mod task;
pub use task::{Priority, Task, TaskDraft, TaskId};
pub mod store;
pub use store::TaskStore;

pub mod client;
pub mod service;
pub mod settings;

pub mod validation;
pub mod filter;
pub mod export;

pub mod mock_behaviour;
pub mod mock_service;
