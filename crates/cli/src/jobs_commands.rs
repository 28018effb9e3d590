//! Inspect and reconcile the scheduled briefing jobs without running the
//! timer loop.

use std::sync::Arc;

use {
    anyhow::Result,
    chrono::{DateTime, Utc},
    clap::Subcommand,
    herald_briefings::{
        BriefingScheduleConfig, ReconcileStrategy, register_briefing_jobs,
        unregister_briefing_jobs,
    },
    herald_config::HeraldConfig,
    herald_cron::{CronService, JobRegistry, ListFilter, TriggerFn, types::CronJob},
};

use crate::app;

#[derive(Subcommand)]
pub enum JobsAction {
    /// List scheduled jobs.
    List {
        /// Include disabled jobs.
        #[arg(long, default_value_t = false)]
        all: bool,
    },
    /// Make the briefing jobs match the current config.
    Sync {
        /// Add the new jobs before removing the old ones.
        #[arg(long, default_value_t = false)]
        generational: bool,
    },
    /// Remove every briefing job.
    Clear,
}

/// Jobs are only read and written here; nothing fires.
fn idle_trigger() -> TriggerFn {
    Arc::new(|_| Box::pin(async { Ok(()) }))
}

pub async fn handle_jobs(action: JobsAction, config: &HeraldConfig) -> Result<()> {
    let svc = CronService::new(app::cron_store()?, idle_trigger());
    svc.load().await?;

    match action {
        JobsAction::List { all } => {
            let filter = ListFilter {
                include_disabled: all,
                name_prefix: None,
            };
            let jobs = svc.list(&filter).await?;
            if jobs.is_empty() {
                println!("No jobs scheduled.");
            }
            for job in &jobs {
                println!("{}", describe(job));
            }
        },
        JobsAction::Sync { generational } => {
            let strategy = if generational {
                ReconcileStrategy::Generational
            } else {
                ReconcileStrategy::ReplaceAll
            };
            let schedule = BriefingScheduleConfig::from(&config.briefings);
            let added = register_briefing_jobs(svc.as_ref(), &schedule, strategy).await?;
            for job in &added {
                println!("{}", describe(job));
            }
            println!("{} briefing job(s) registered.", added.len());
        },
        JobsAction::Clear => {
            let removed = unregister_briefing_jobs(svc.as_ref()).await?;
            println!("Removed {removed} briefing job(s).");
        },
    }
    Ok(())
}

fn describe(job: &CronJob) -> String {
    let expr = job.schedule.expr().unwrap_or("-");
    let next = job
        .state
        .next_run_at_ms
        .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "-".into());
    let status = if job.enabled { "" } else { " (disabled)" };
    format!("  {:<24} {:<14} next {next}{status}", job.name, expr)
}
