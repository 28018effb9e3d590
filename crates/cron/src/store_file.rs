//! JSON file store with atomic writes.

use std::path::{Path, PathBuf};

use {
    async_trait::async_trait,
    tokio::{fs, io::AsyncWriteExt, sync::Mutex},
};

use crate::{
    Error, Result,
    store::CronStore,
    types::{CronJob, CronRunRecord},
};

/// Jobs live in one JSON array file, runs in `<runs_dir>/<job_id>.jsonl`.
pub struct FileStore {
    jobs_path: PathBuf,
    runs_dir: PathBuf,
    /// Held across every read-modify-write of the jobs file.
    jobs_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(jobs_path: PathBuf, runs_dir: PathBuf) -> Self {
        Self {
            jobs_path,
            runs_dir,
            jobs_lock: Mutex::new(()),
        }
    }

    /// `<dir>/jobs.json` and `<dir>/runs/`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self::new(dir.join("jobs.json"), dir.join("runs"))
    }

    pub fn jobs_path(&self) -> &Path {
        &self.jobs_path
    }

    async fn ensure_dirs(&self) -> Result<()> {
        if let Some(parent) = self.jobs_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::create_dir_all(&self.runs_dir).await?;
        Ok(())
    }

    /// Write to a temp file, keep the old file as `.bak`, rename into place.
    async fn write_jobs(&self, jobs: &[CronJob]) -> Result<()> {
        self.ensure_dirs().await?;
        let json = serde_json::to_string_pretty(jobs)?;
        let tmp = self.jobs_path.with_extension("json.tmp");
        fs::write(&tmp, json.as_bytes()).await?;

        if fs::try_exists(&self.jobs_path).await.unwrap_or(false) {
            let bak = self.jobs_path.with_extension("json.bak");
            if let Err(e) = fs::rename(&self.jobs_path, &bak).await {
                tracing::debug!(error = %e, "could not keep jobs backup");
            }
        }

        fs::rename(&tmp, &self.jobs_path).await?;
        Ok(())
    }

    fn runs_path(&self, job_id: &str) -> PathBuf {
        self.runs_dir.join(format!("{job_id}.jsonl"))
    }

    async fn read_jobs(&self) -> Result<Vec<CronJob>> {
        if !fs::try_exists(&self.jobs_path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.jobs_path).await?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[async_trait]
impl CronStore for FileStore {
    async fn load_jobs(&self) -> Result<Vec<CronJob>> {
        let _guard = self.jobs_lock.lock().await;
        self.read_jobs().await
    }

    async fn save_job(&self, job: &CronJob) -> Result<()> {
        let _guard = self.jobs_lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        match jobs.iter_mut().find(|j| j.id == job.id) {
            Some(existing) => *existing = job.clone(),
            None => jobs.push(job.clone()),
        }
        self.write_jobs(&jobs).await
    }

    async fn delete_job(&self, id: &str) -> Result<()> {
        let _guard = self.jobs_lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == before {
            return Err(Error::job_not_found(id));
        }
        self.write_jobs(&jobs).await
    }

    async fn update_job(&self, job: &CronJob) -> Result<()> {
        let _guard = self.jobs_lock.lock().await;
        let mut jobs = self.read_jobs().await?;
        let existing = jobs
            .iter_mut()
            .find(|j| j.id == job.id)
            .ok_or_else(|| Error::job_not_found(&job.id))?;
        *existing = job.clone();
        self.write_jobs(&jobs).await
    }

    async fn append_run(&self, job_id: &str, run: &CronRunRecord) -> Result<()> {
        self.ensure_dirs().await?;
        let mut line = serde_json::to_string(run)?;
        line.push('\n');
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.runs_path(job_id))
            .await?
            .write_all(line.as_bytes())
            .await?;
        Ok(())
    }

    async fn get_runs(&self, job_id: &str, limit: usize) -> Result<Vec<CronRunRecord>> {
        let path = self.runs_path(job_id);
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&path).await?;
        let all: Vec<CronRunRecord> = data
            .lines()
            .filter(|l| !l.trim().is_empty())
            .filter_map(|l| serde_json::from_str(l).ok())
            .collect();
        let start = all.len().saturating_sub(limit);
        Ok(all[start..].to_vec())
    }
}
