//! Client for the memory service that supplies briefing context.
//!
//! [`ApiClient`] wraps HTTP calls in [`retry`], which backs off
//! exponentially and lets a predicate veto further attempts.

pub mod client;
pub mod context;
pub mod error;
pub mod retry;

pub use {
    client::ApiClient,
    context::{
        ContextItem, ContextSource, EmptyContextSource, MemoryApiClient, MemoryContext,
        StaticContextSource,
    },
    error::{Error, Result},
    retry::{RetryPolicy, default_should_retry, retry},
};
