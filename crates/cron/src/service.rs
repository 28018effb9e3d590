//! Timer loop, job execution and CRUD.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use {
    async_trait::async_trait,
    tokio::{
        sync::{Mutex, Notify, RwLock},
        task::JoinHandle,
    },
    tracing::{debug, error, info, warn},
};

use crate::{
    Error, Result,
    registry::{JobRegistry, ListFilter},
    schedule::compute_next_run,
    store::CronStore,
    types::*,
};

/// Called with the payload text each time a job fires.
pub type TriggerFn =
    Arc<dyn Fn(String) -> Pin<Box<dyn Future<Output = Result<()>> + Send>> + Send + Sync>;

/// A job still marked running after this long is considered stuck.
const STUCK_THRESHOLD_MS: u64 = 2 * 60 * 60 * 1000;

/// Poll interval when nothing is scheduled.
const IDLE_POLL_MS: u64 = 60_000;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

pub struct CronService {
    store: Arc<dyn CronStore>,
    jobs: RwLock<Vec<CronJob>>,
    timer_handle: Mutex<Option<JoinHandle<()>>>,
    wake_notify: Arc<Notify>,
    running: RwLock<bool>,
    on_trigger: TriggerFn,
}

impl CronService {
    pub fn new(store: Arc<dyn CronStore>, on_trigger: TriggerFn) -> Arc<Self> {
        Arc::new(Self {
            store,
            jobs: RwLock::new(Vec::new()),
            timer_handle: Mutex::new(None),
            wake_notify: Arc::new(Notify::new()),
            running: RwLock::new(false),
            on_trigger,
        })
    }

    /// Load jobs from the store without starting the timer.
    pub async fn load(&self) -> Result<()> {
        let loaded = self.store.load_jobs().await?;
        info!(count = loaded.len(), "loaded cron jobs");
        *self.jobs.write().await = loaded;
        self.recompute_all_next_runs().await;
        Ok(())
    }

    /// Load jobs and start the timer loop.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        self.load().await?;
        *self.running.write().await = true;

        let svc = Arc::clone(self);
        let handle = tokio::spawn(async move {
            svc.timer_loop().await;
        });
        *self.timer_handle.lock().await = Some(handle);
        Ok(())
    }

    pub async fn stop(&self) {
        *self.running.write().await = false;
        self.wake_notify.notify_one();
        if let Some(handle) = self.timer_handle.lock().await.take() {
            handle.abort();
        }
        info!("cron service stopped");
    }

    /// Fire a job now, regardless of its schedule.
    pub async fn run(&self, id: &str, force: bool) -> Result<()> {
        let job = {
            let jobs = self.jobs.read().await;
            jobs.iter()
                .find(|j| j.id == id)
                .cloned()
                .ok_or_else(|| Error::job_not_found(id))?
        };
        if !job.enabled && !force {
            return Err(Error::JobDisabled {
                job_id: job.id.clone(),
            });
        }

        let now = now_ms();
        self.update_job_state(&job.id, |state| state.running_at_ms = Some(now))
            .await;
        self.execute_job(&job).await;
        Ok(())
    }

    pub async fn runs(&self, job_id: &str, limit: usize) -> Result<Vec<CronRunRecord>> {
        self.store.get_runs(job_id, limit).await
    }

    pub async fn status(&self) -> CronStatus {
        let jobs = self.jobs.read().await;
        CronStatus {
            running: *self.running.read().await,
            job_count: jobs.len(),
            enabled_count: jobs.iter().filter(|j| j.enabled).count(),
            next_run_at_ms: jobs
                .iter()
                .filter(|j| j.enabled)
                .filter_map(|j| j.state.next_run_at_ms)
                .min(),
        }
    }

    // ── Internal ────────────────────────────────────────────────────────

    async fn timer_loop(self: &Arc<Self>) {
        loop {
            if !*self.running.read().await {
                break;
            }

            let sleep_ms = self.ms_until_next_wake().await;
            if sleep_ms > 0 {
                let notify = Arc::clone(&self.wake_notify);
                tokio::select! {
                    () = tokio::time::sleep(Duration::from_millis(sleep_ms)) => {},
                    () = notify.notified() => {
                        debug!("timer loop woken by notify");
                        continue;
                    },
                }
            }

            if !*self.running.read().await {
                break;
            }
            self.process_due_jobs().await;
        }
    }

    async fn ms_until_next_wake(&self) -> u64 {
        let jobs = self.jobs.read().await;
        let now = now_ms();
        jobs.iter()
            .filter(|j| j.enabled && j.state.running_at_ms.is_none())
            .filter_map(|j| j.state.next_run_at_ms)
            .map(|t| t.saturating_sub(now))
            .min()
            .unwrap_or(IDLE_POLL_MS)
    }

    async fn process_due_jobs(self: &Arc<Self>) {
        let now = now_ms();
        let due: Vec<CronJob> = {
            let mut jobs = self.jobs.write().await;
            jobs.iter_mut()
                .filter(|j| {
                    j.enabled
                        && j.state.running_at_ms.is_none()
                        && j.state.next_run_at_ms.is_some_and(|t| t <= now)
                })
                .map(|j| {
                    // Marked under the write lock so the next tick skips it.
                    j.state.running_at_ms = Some(now);
                    j.clone()
                })
                .collect()
        };

        self.clear_stuck_jobs(now).await;

        for job in due {
            let svc = Arc::clone(self);
            tokio::spawn(async move {
                svc.execute_job(&job).await;
            });
        }
    }

    async fn execute_job(&self, job: &CronJob) {
        let started = now_ms();
        info!(id = %job.id, name = %job.name, "executing cron job");

        let result = (self.on_trigger)(job.payload.text().to_string()).await;

        let finished = now_ms();
        let duration_ms = finished.saturating_sub(started);
        let (status, error_msg) = match &result {
            Ok(()) => (RunStatus::Ok, None),
            Err(e) => {
                error!(id = %job.id, error = %e, "cron job failed");
                (RunStatus::Error, Some(e.to_string()))
            },
        };

        let run = CronRunRecord {
            job_id: job.id.clone(),
            started_at_ms: started,
            finished_at_ms: finished,
            status,
            error: error_msg.clone(),
            duration_ms,
        };
        if let Err(e) = self.store.append_run(&job.id, &run).await {
            warn!(error = %e, "failed to record cron run");
        }

        let next_run = compute_next_run(&job.schedule, now_ms()).unwrap_or(None);
        let mut jobs = self.jobs.write().await;
        // The job may have been removed while it ran.
        let Some(current) = jobs.iter_mut().find(|j| j.id == job.id) else {
            return;
        };
        current.state.running_at_ms = None;
        current.state.last_run_at_ms = Some(finished);
        current.state.last_status = Some(status);
        current.state.last_error = error_msg;
        current.state.last_duration_ms = Some(duration_ms);
        current.state.next_run_at_ms = next_run;
        if next_run.is_none() {
            current.enabled = false;
        }
        if let Err(e) = self.store.update_job(current).await {
            warn!(id = %job.id, error = %e, "failed to persist cron job state");
        }

        info!(id = %job.id, status = ?status, duration_ms, "cron job finished");
    }

    async fn update_job_state<F: FnOnce(&mut CronJobState)>(&self, id: &str, f: F) {
        let mut jobs = self.jobs.write().await;
        if let Some(job) = jobs.iter_mut().find(|j| j.id == id) {
            f(&mut job.state);
        }
    }

    async fn recompute_all_next_runs(&self) {
        let now = now_ms();
        let mut jobs = self.jobs.write().await;
        for job in jobs.iter_mut().filter(|j| j.enabled) {
            job.state.next_run_at_ms = match compute_next_run(&job.schedule, now) {
                Ok(next) => next,
                Err(e) => {
                    warn!(id = %job.id, error = %e, "cannot schedule cron job");
                    None
                },
            };
        }
    }

    async fn clear_stuck_jobs(&self, now: u64) {
        let mut jobs = self.jobs.write().await;
        for job in jobs.iter_mut() {
            if let Some(running_at) = job.state.running_at_ms
                && now.saturating_sub(running_at) > STUCK_THRESHOLD_MS
            {
                warn!(id = %job.id, "clearing stuck cron job");
                job.state.running_at_ms = None;
                job.state.last_status = Some(RunStatus::Error);
                job.state.last_error = Some("stuck: exceeded 2h timeout".into());
            }
        }
    }
}

#[async_trait]
impl JobRegistry for CronService {
    async fn add(&self, create: CronJobCreate) -> Result<CronJob> {
        let now = now_ms();
        let mut job = CronJob {
            id: uuid::Uuid::new_v4().to_string(),
            name: create.name,
            enabled: create.enabled,
            schedule: create.schedule,
            payload: create.payload,
            state: CronJobState::default(),
            created_at_ms: now,
            updated_at_ms: now,
        };
        // Rejects bad expressions before anything is persisted.
        let next = compute_next_run(&job.schedule, now)?;
        if job.enabled {
            job.state.next_run_at_ms = next;
        }

        // Store writes happen under the jobs lock, like `execute_job`.
        let mut jobs = self.jobs.write().await;
        self.store.save_job(&job).await?;
        jobs.push(job.clone());
        drop(jobs);
        self.wake_notify.notify_one();
        info!(id = %job.id, name = %job.name, "cron job added");
        Ok(job)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<CronJob>> {
        let jobs = self.jobs.read().await;
        Ok(jobs.iter().filter(|j| filter.matches(j)).cloned().collect())
    }

    async fn remove(&self, id: &str) -> Result<()> {
        let mut jobs = self.jobs.write().await;
        self.store.delete_job(id).await?;
        jobs.retain(|j| j.id != id);
        drop(jobs);
        self.wake_notify.notify_one();
        info!(id, "cron job removed");
        Ok(())
    }
}
