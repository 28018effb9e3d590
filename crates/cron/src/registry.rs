//! The add/list/remove surface that job reconciliation talks to.

use async_trait::async_trait;

use crate::{
    Result,
    types::{CronJob, CronJobCreate},
};

/// Which jobs `list` returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub include_disabled: bool,
    pub name_prefix: Option<String>,
}

impl ListFilter {
    /// Every job whose name starts with `prefix`, enabled or not.
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            include_disabled: true,
            name_prefix: Some(prefix.into()),
        }
    }

    #[must_use]
    pub fn matches(&self, job: &CronJob) -> bool {
        (self.include_disabled || job.enabled)
            && self
                .name_prefix
                .as_deref()
                .is_none_or(|prefix| job.name.starts_with(prefix))
    }
}

#[async_trait]
pub trait JobRegistry: Send + Sync {
    async fn add(&self, create: CronJobCreate) -> Result<CronJob>;
    async fn list(&self, filter: &ListFilter) -> Result<Vec<CronJob>>;
    async fn remove(&self, id: &str) -> Result<()>;
}
