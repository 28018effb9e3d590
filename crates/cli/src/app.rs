//! Builds the pipeline pieces from a loaded config.

use std::{path::Path, sync::Arc, time::Duration};

use {
    anyhow::{Context, Result},
    herald_briefings::{Aggregator, Dispatcher},
    herald_channels::{
        ChannelSender, SenderRegistry, stdout::StdoutSender, webhook::WebhookSender,
    },
    herald_common::ChannelType,
    herald_config::{HeraldConfig, MemoryConfig},
    herald_cron::store_file::FileStore,
    herald_memory::{
        ApiClient, ContextSource, EmptyContextSource, MemoryApiClient, RetryPolicy,
    },
    tracing::{debug, info},
};

/// Load `path` if given, else discover; environment overrides apply either way.
pub fn load_config(path: Option<&Path>) -> Result<HeraldConfig> {
    match path {
        Some(path) => {
            let config = herald_config::load_config(path)
                .with_context(|| format!("loading {}", path.display()))?;
            Ok(herald_config::apply_env_overrides(config, |name| {
                std::env::var(name).ok()
            }))
        },
        None => Ok(herald_config::discover_and_load()),
    }
}

/// The memory service when integration is on and a key is set; otherwise
/// an empty context.
pub fn context_source(memory: &MemoryConfig) -> Result<Arc<dyn ContextSource>> {
    let Some(key) = memory.api_key.clone().filter(|_| memory.integration_enabled) else {
        debug!(
            integration_enabled = memory.integration_enabled,
            "memory integration unavailable, briefings use empty context"
        );
        return Ok(Arc::new(EmptyContextSource));
    };

    let client = ApiClient::new(&memory.api_url, Some(key))?.with_policy(RetryPolicy {
        max_attempts: memory.max_attempts,
        backoff_base: Duration::from_millis(memory.backoff_base_ms),
    });
    info!(url = %memory.api_url, "memory integration enabled");
    Ok(Arc::new(MemoryApiClient::new(client)))
}

/// A webhook sender for every channel with a configured URL, stdout for
/// the rest.
pub fn senders(config: &HeraldConfig) -> Result<SenderRegistry> {
    let mut registry = SenderRegistry::new();
    for channel in ChannelType::ALL {
        let sender: Arc<dyn ChannelSender> = match config.canvas.webhooks.get(&channel) {
            Some(url) => Arc::new(WebhookSender::new(url.as_str())?),
            None => Arc::new(StdoutSender),
        };
        registry.register(channel, sender);
    }
    Ok(registry)
}

pub fn dispatcher(config: &HeraldConfig) -> Result<Arc<Dispatcher>> {
    let composer = Arc::new(Aggregator::new(context_source(&config.memory)?));
    Ok(Arc::new(Dispatcher::new(
        composer,
        senders(config)?,
        config.delivery_channels().to_vec(),
    )))
}

/// Job store under the user data directory.
pub fn cron_store() -> Result<Arc<FileStore>> {
    let dir = herald_config::data_dir()
        .context("no data directory available")?
        .join("cron");
    debug!(dir = %dir.display(), "using cron store");
    Ok(Arc::new(FileStore::in_dir(dir)))
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_channels_get_webhook_senders() {
        let mut config = HeraldConfig::default();
        config
            .canvas
            .webhooks
            .insert(ChannelType::Slack, "https://hooks.example.com/slack".into());
        let registry = senders(&config).unwrap();
        assert_eq!(registry.list(), ChannelType::ALL);
    }

    #[test]
    fn no_key_means_empty_context() {
        let config = HeraldConfig::default();
        assert!(config.memory.api_key.is_none());
        assert!(context_source(&config.memory).is_ok());
    }

    #[test]
    fn dispatcher_uses_delivery_channels() {
        let config = HeraldConfig::default();
        let dispatcher = dispatcher(&config).unwrap();
        assert_eq!(dispatcher.channels(), [ChannelType::Telegram, ChannelType::Discord]);
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("herald.toml");
        std::fs::write(&path, "[briefings]\nmorning_time = \"06:45\"\n").unwrap();
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.briefings.morning_time, "06:45");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/herald.toml"))).is_err());
    }
}
