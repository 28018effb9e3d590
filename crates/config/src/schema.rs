//! Config schema: canvas channels, memory service, briefing schedules.
//!
//! Field names are snake_case; the camelCase names of the JSON override
//! format are accepted as aliases.

use std::collections::BTreeMap;

use {
    herald_common::ChannelType,
    secrecy::Secret,
    serde::{Deserialize, Serialize},
};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HeraldConfig {
    pub canvas: CanvasConfig,
    pub memory: MemoryConfig,
    pub briefings: BriefingsConfig,
}

impl HeraldConfig {
    /// Channels briefings go to: `briefings.delivery_channels`, or the
    /// canvas channels when that list is empty.
    pub fn delivery_channels(&self) -> &[ChannelType] {
        if self.briefings.delivery_channels.is_empty() {
            &self.canvas.enabled_channels
        } else {
            &self.briefings.delivery_channels
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    #[serde(alias = "enabledChannels")]
    pub enabled_channels: Vec<ChannelType>,
    /// Outgoing webhook per channel. Channels without one print to stdout.
    pub webhooks: BTreeMap<ChannelType, String>,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            enabled_channels: vec![ChannelType::Telegram, ChannelType::Discord, ChannelType::Slack],
            webhooks: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    #[serde(alias = "autoExtractEnabled")]
    pub auto_extract_enabled: bool,
    #[serde(alias = "extractionChannels")]
    pub extraction_channels: Vec<ChannelType>,
    #[serde(alias = "jarvisIntegrationEnabled", alias = "integrationEnabled")]
    pub integration_enabled: bool,
    #[serde(alias = "apiUrl")]
    pub api_url: String,
    /// Bearer token for the memory service. Never logged or printed.
    #[serde(
        alias = "apiKey",
        serialize_with = "serialize_redacted",
        skip_serializing_if = "Option::is_none"
    )]
    pub api_key: Option<Secret<String>>,
    #[serde(alias = "maxAttempts")]
    pub max_attempts: u32,
    #[serde(alias = "backoffBaseMs")]
    pub backoff_base_ms: u64,
}

pub const DEFAULT_MEMORY_API_URL: &str = "http://localhost:8000/api/v2";

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            auto_extract_enabled: true,
            extraction_channels: vec![
                ChannelType::Telegram,
                ChannelType::Discord,
                ChannelType::Slack,
            ],
            integration_enabled: true,
            api_url: DEFAULT_MEMORY_API_URL.into(),
            api_key: None,
            max_attempts: 3,
            backoff_base_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BriefingsConfig {
    #[serde(alias = "morningBriefingEnabled")]
    pub morning_enabled: bool,
    /// `HH:MM`, 24-hour.
    #[serde(alias = "morningTime")]
    pub morning_time: String,
    #[serde(alias = "preMeetingBriefingEnabled")]
    pub pre_meeting_enabled: bool,
    #[serde(alias = "preMeetingMinutesAhead")]
    pub pre_meeting_minutes_ahead: u32,
    #[serde(alias = "weeklyBriefingEnabled")]
    pub weekly_enabled: bool,
    /// Lowercase English weekday name.
    #[serde(alias = "weeklyDay")]
    pub weekly_day: String,
    #[serde(alias = "weeklyTime")]
    pub weekly_time: String,
    #[serde(alias = "deliveryChannels")]
    pub delivery_channels: Vec<ChannelType>,
    /// IANA timezone for the schedules. UTC when unset.
    pub timezone: Option<String>,
}

impl Default for BriefingsConfig {
    fn default() -> Self {
        Self {
            morning_enabled: true,
            morning_time: "08:00".into(),
            pre_meeting_enabled: true,
            pre_meeting_minutes_ahead: 60,
            weekly_enabled: true,
            weekly_day: "monday".into(),
            weekly_time: "09:00".into(),
            delivery_channels: vec![ChannelType::Telegram, ChannelType::Discord],
            timezone: None,
        }
    }
}

fn serialize_redacted<S: serde::Serializer>(
    secret: &Option<Secret<String>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match secret {
        Some(_) => serializer.serialize_some("[REDACTED]"),
        None => serializer.serialize_none(),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, secrecy::ExposeSecret};

    #[test]
    fn defaults() {
        let cfg = HeraldConfig::default();
        assert_eq!(cfg.canvas.enabled_channels, [
            ChannelType::Telegram,
            ChannelType::Discord,
            ChannelType::Slack
        ]);
        assert!(cfg.memory.auto_extract_enabled);
        assert!(cfg.memory.integration_enabled);
        assert_eq!(cfg.briefings.morning_time, "08:00");
        assert_eq!(cfg.briefings.pre_meeting_minutes_ahead, 60);
        assert_eq!(cfg.briefings.weekly_day, "monday");
        assert_eq!(cfg.briefings.weekly_time, "09:00");
        assert_eq!(cfg.delivery_channels(), [ChannelType::Telegram, ChannelType::Discord]);
    }

    #[test]
    fn empty_delivery_list_falls_back_to_canvas_channels() {
        let mut cfg = HeraldConfig::default();
        cfg.briefings.delivery_channels.clear();
        assert_eq!(cfg.delivery_channels(), cfg.canvas.enabled_channels.as_slice());
    }

    #[test]
    fn camel_case_aliases() {
        let cfg: HeraldConfig = serde_json::from_str(
            r#"{
                "canvas": {"enabledChannels": ["teams"]},
                "memory": {"jarvisIntegrationEnabled": false, "apiKey": "sk-1"},
                "briefings": {"morningBriefingEnabled": false, "weeklyDay": "friday"}
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.canvas.enabled_channels, [ChannelType::Teams]);
        assert!(!cfg.memory.integration_enabled);
        assert_eq!(cfg.memory.api_key.unwrap().expose_secret(), "sk-1");
        assert!(!cfg.briefings.morning_enabled);
        assert_eq!(cfg.briefings.weekly_day, "friday");
        assert_eq!(cfg.briefings.weekly_time, "09:00");
    }

    #[test]
    fn api_key_never_serialized() {
        let mut cfg = HeraldConfig::default();
        cfg.memory.api_key = Some(Secret::new("sk-secret".into()));
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(!json.contains("sk-secret"));
        assert!(json.contains("[REDACTED]"));
        assert!(!format!("{cfg:?}").contains("sk-secret"));
    }

    #[test]
    fn unknown_channel_rejected() {
        let err = serde_json::from_str::<HeraldConfig>(r#"{"canvas": {"enabled_channels": ["myspace"]}}"#);
        assert!(err.is_err());
    }

    #[test]
    fn webhooks_keyed_by_channel() {
        let cfg: HeraldConfig = toml::from_str(
            r#"
[canvas.webhooks]
slack = "https://hooks.slack.com/services/T/B/X"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.canvas.webhooks.get(&ChannelType::Slack).map(String::as_str),
            Some("https://hooks.slack.com/services/T/B/X")
        );
    }
}
