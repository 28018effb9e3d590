//! Delivery side of the briefing pipeline.
//!
//! A [`ChannelSender`] transmits an already rendered canvas to one chat
//! platform. [`envelope`] wraps each renderer's payload in the request body
//! shape the platform expects; [`webhook::WebhookSender`] posts it and
//! [`stdout::StdoutSender`] prints it.

pub mod envelope;
pub mod error;
pub mod registry;
pub mod sender;
pub mod stdout;
pub mod webhook;

pub use {
    envelope::envelope,
    error::{Error, Result},
    registry::SenderRegistry,
    sender::ChannelSender,
};
