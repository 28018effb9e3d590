//! Briefing pipeline: compose a canvas from memory context, deliver it to
//! every enabled channel, and keep the scheduled briefing jobs in step with
//! the configuration.

pub mod aggregator;
pub mod dispatcher;
pub mod error;
pub mod kind;
pub mod runtime;
pub mod schedule;

pub use {
    aggregator::{Aggregator, Composer},
    dispatcher::{DispatchReport, Dispatcher},
    error::{Error, Result},
    kind::BriefingKind,
    runtime::{BriefingRuntime, trigger_handler},
    schedule::{
        BriefingScheduleConfig, ReconcileStrategy, register_briefing_jobs, time_and_day_to_cron,
        time_to_cron, unregister_briefing_jobs,
    },
};
