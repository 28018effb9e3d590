//! Scheduling service for recurring triggers.
//!
//! Jobs carry a cron expression and an opaque trigger text. A timer loop
//! sleeps until the next due job and hands its text to a callback.
//! Persistent storage is a JSON jobs file plus JSONL run history.

pub mod error;
pub mod registry;
pub mod schedule;
pub mod service;
pub mod store;
pub mod store_file;
pub mod store_memory;
pub mod types;

pub use {
    error::{Error, Result},
    registry::{JobRegistry, ListFilter},
    service::{CronService, TriggerFn},
};
