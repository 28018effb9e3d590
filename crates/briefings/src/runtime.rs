//! Wires the dispatcher to the scheduler.

use std::sync::Arc;

use {
    herald_cron::{JobRegistry, TriggerFn},
    tracing::{info, warn},
};

use crate::{
    Result,
    dispatcher::Dispatcher,
    kind::BriefingKind,
    schedule::{
        BriefingScheduleConfig, ReconcileStrategy, register_briefing_jobs,
        unregister_briefing_jobs,
    },
};

/// Trigger callback for the cron service: runs the dispatcher for
/// `dispatch-briefing:<kind>` texts and ignores anything else.
pub fn trigger_handler(dispatcher: Arc<Dispatcher>) -> TriggerFn {
    Arc::new(move |text| {
        let dispatcher = Arc::clone(&dispatcher);
        Box::pin(async move {
            match BriefingKind::from_trigger(&text) {
                Some(kind) => {
                    let report = dispatcher.dispatch(kind).await;
                    info!(
                        %kind,
                        delivered = report.delivered.len(),
                        failed = report.failed.len(),
                        "scheduled briefing finished"
                    );
                },
                None => warn!(%text, "ignoring unknown trigger"),
            }
            Ok(())
        })
    })
}

/// Handle on the scheduled briefings; `stop` removes their jobs.
pub struct BriefingRuntime {
    jobs: Arc<dyn JobRegistry>,
}

impl BriefingRuntime {
    /// Reconcile the briefing jobs. With every briefing disabled, jobs left
    /// by an earlier run are still removed.
    pub async fn start(
        jobs: Arc<dyn JobRegistry>,
        config: &BriefingScheduleConfig,
        strategy: ReconcileStrategy,
    ) -> Result<Self> {
        if config.any_enabled() {
            register_briefing_jobs(jobs.as_ref(), config, strategy).await?;
            info!("briefing runtime initialized");
        } else {
            let removed = unregister_briefing_jobs(jobs.as_ref()).await?;
            info!(removed, "all briefings disabled, removed stale briefing jobs");
        }
        Ok(Self { jobs })
    }

    pub async fn stop(&self) -> Result<()> {
        let removed = unregister_briefing_jobs(self.jobs.as_ref()).await?;
        info!(removed, "briefing runtime stopped");
        Ok(())
    }
}
