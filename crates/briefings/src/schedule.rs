//! Cron expressions for briefing times, and reconciliation of the
//! scheduler's `Briefing:` jobs with the configuration.

use {
    herald_config::BriefingsConfig,
    herald_cron::{
        JobRegistry, ListFilter,
        types::{CronJob, CronJobCreate, CronPayload, CronSchedule},
    },
    tracing::{debug, info, warn},
};

use crate::{
    Error, Result,
    kind::{BriefingKind, JOB_NAME_PREFIX},
};

/// Cron day numbers, Sunday = 0.
const WEEKDAYS: [(&str, u8); 7] = [
    ("sunday", 0),
    ("monday", 1),
    ("tuesday", 2),
    ("wednesday", 3),
    ("thursday", 4),
    ("friday", 5),
    ("saturday", 6),
];

/// Used when the weekday name is not recognized.
const FALLBACK_WEEKDAY: u8 = 1;

/// Split `H:MM` / `HH:MM` into `(hour, minute)`.
fn parse_time(time: &str) -> Result<(u8, u8)> {
    let invalid = || Error::InvalidTime {
        time: time.to_string(),
    };
    let (h, m) = time.trim().split_once(':').ok_or_else(invalid)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u8 = h.parse().map_err(|_| invalid())?;
    let minute: u8 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok((hour, minute))
}

/// `"08:00"` → `"0 8 * * *"`.
pub fn time_to_cron(time: &str) -> Result<String> {
    let (hour, minute) = parse_time(time)?;
    Ok(format!("{minute} {hour} * * *"))
}

/// Cron day number for an English weekday name, case-insensitive.
/// Unknown names fall back to Monday.
#[must_use]
pub fn weekday_number(day: &str) -> u8 {
    let day = day.trim().to_ascii_lowercase();
    WEEKDAYS
        .iter()
        .find(|(name, _)| *name == day)
        .map(|&(_, n)| n)
        .unwrap_or_else(|| {
            warn!(%day, "unknown weekday, falling back to monday");
            FALLBACK_WEEKDAY
        })
}

/// `("09:00", "monday")` → `"0 9 * * 1"`.
pub fn time_and_day_to_cron(time: &str, day: &str) -> Result<String> {
    let (hour, minute) = parse_time(time)?;
    Ok(format!("{minute} {hour} * * {}", weekday_number(day)))
}

/// Which briefing jobs should exist. A kind that is enabled but lacks its
/// time parameters is treated as not configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BriefingScheduleConfig {
    pub morning_enabled: bool,
    pub morning_time: Option<String>,
    pub pre_meeting_enabled: bool,
    pub pre_meeting_minutes_ahead: Option<u32>,
    pub weekly_enabled: bool,
    pub weekly_day: Option<String>,
    pub weekly_time: Option<String>,
    /// IANA timezone the times are read in.
    pub timezone: Option<String>,
}

impl BriefingScheduleConfig {
    #[must_use]
    pub fn any_enabled(&self) -> bool {
        self.morning_enabled || self.pre_meeting_enabled || self.weekly_enabled
    }

    /// Job specs for every enabled, fully configured kind.
    pub fn desired_jobs(&self) -> Result<Vec<CronJobCreate>> {
        let mut jobs = Vec::new();

        if self.morning_enabled
            && let Some(time) = non_empty(&self.morning_time)
        {
            jobs.push(self.job(BriefingKind::Morning, time_to_cron(time)?));
        }

        if self.weekly_enabled
            && let (Some(day), Some(time)) = (non_empty(&self.weekly_day), non_empty(&self.weekly_time))
        {
            jobs.push(self.job(BriefingKind::Weekly, time_and_day_to_cron(time, day)?));
        }

        Ok(jobs)
    }

    fn job(&self, kind: BriefingKind, expr: String) -> CronJobCreate {
        CronJobCreate::new(
            kind.job_name(),
            CronSchedule::Cron {
                expr,
                tz: self.timezone.clone(),
            },
            CronPayload::trigger(kind.trigger_text()),
        )
    }
}

impl From<&BriefingsConfig> for BriefingScheduleConfig {
    fn from(config: &BriefingsConfig) -> Self {
        Self {
            morning_enabled: config.morning_enabled,
            morning_time: Some(config.morning_time.clone()),
            pre_meeting_enabled: config.pre_meeting_enabled,
            pre_meeting_minutes_ahead: Some(config.pre_meeting_minutes_ahead),
            weekly_enabled: config.weekly_enabled,
            weekly_day: Some(config.weekly_day.clone()),
            weekly_time: Some(config.weekly_time.clone()),
            timezone: config.timezone.clone(),
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// How stale briefing jobs are replaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReconcileStrategy {
    /// Remove every `Briefing:` job, then add the new set.
    #[default]
    ReplaceAll,
    /// Add the new set first, then remove the jobs that existed before.
    /// A failed add leaves the previous jobs in place.
    Generational,
}

/// Make the scheduler's `Briefing:` jobs match `config`.
///
/// Not transactional: with [`ReconcileStrategy::ReplaceAll`], a failure
/// while adding leaves fewer jobs than intended until the next call.
pub async fn register_briefing_jobs(
    jobs: &dyn JobRegistry,
    config: &BriefingScheduleConfig,
    strategy: ReconcileStrategy,
) -> Result<Vec<CronJob>> {
    let desired = config.desired_jobs()?;

    let added = match strategy {
        ReconcileStrategy::ReplaceAll => {
            unregister_briefing_jobs(jobs).await?;
            add_all(jobs, desired).await?
        },
        ReconcileStrategy::Generational => {
            let previous = jobs.list(&ListFilter::prefixed(JOB_NAME_PREFIX)).await?;
            let added = add_all(jobs, desired).await?;
            for job in &previous {
                jobs.remove(&job.id).await?;
            }
            debug!(removed = previous.len(), "removed previous briefing generation");
            added
        },
    };

    if config.pre_meeting_enabled {
        info!(
            minutes_ahead = config.pre_meeting_minutes_ahead.unwrap_or_default(),
            "pre-meeting briefing enabled; it is triggered by meetings, not scheduled"
        );
    }
    info!(added = added.len(), ?strategy, "briefing jobs reconciled");
    Ok(added)
}

async fn add_all(jobs: &dyn JobRegistry, desired: Vec<CronJobCreate>) -> Result<Vec<CronJob>> {
    let mut added = Vec::with_capacity(desired.len());
    for create in desired {
        let job = jobs.add(create).await?;
        debug!(id = %job.id, name = %job.name, "briefing job registered");
        added.push(job);
    }
    Ok(added)
}

/// Remove every job whose name starts with `Briefing:`, enabled or not.
pub async fn unregister_briefing_jobs(jobs: &dyn JobRegistry) -> Result<usize> {
    let existing = jobs.list(&ListFilter::prefixed(JOB_NAME_PREFIX)).await?;
    for job in &existing {
        jobs.remove(&job.id).await?;
    }
    debug!(removed = existing.len(), "briefing jobs unregistered");
    Ok(existing.len())
}
