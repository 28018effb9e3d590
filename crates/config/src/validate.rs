//! Configuration validation.
//!
//! Checks syntax, unknown or misspelled keys, types, and schedule and
//! channel semantics. Nothing here mutates or loads the effective config.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use {herald_common::ChannelType, serde_json::Value};

use crate::{
    loader::{find_config_file, parse_value},
    schema::HeraldConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    /// "syntax", "unknown-field", "unknown-channel", "type-error",
    /// "schedule", "channels", "memory", "file-ref"
    pub category: &'static str,
    /// Dotted path, e.g. `briefings.morning_time`.
    pub path: String,
    pub message: String,
}

impl Diagnostic {
    fn new(
        severity: Severity,
        category: &'static str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            path: path.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub diagnostics: Vec<Diagnostic>,
    pub config_path: Option<PathBuf>,
}

impl ValidationResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    #[must_use]
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

// ── Known keys ──────────────────────────────────────────────────────────────

/// Field name, the aliases serde also accepts for it, and its children.
type KnownField = (&'static str, &'static [&'static str], KnownKeys);

enum KnownKeys {
    Struct(Vec<KnownField>),
    /// Map keyed by channel name.
    ChannelMap,
    Leaf,
}

fn field(
    name: &'static str,
    aliases: &'static [&'static str],
    keys: KnownKeys,
) -> KnownField {
    (name, aliases, keys)
}

fn schema_tree() -> KnownKeys {
    use KnownKeys::{ChannelMap, Leaf, Struct};

    Struct(vec![
        field(
            "canvas",
            &[],
            Struct(vec![
                field("enabled_channels", &["enabledChannels"], Leaf),
                field("webhooks", &[], ChannelMap),
            ]),
        ),
        field(
            "memory",
            &[],
            Struct(vec![
                field("auto_extract_enabled", &["autoExtractEnabled"], Leaf),
                field("extraction_channels", &["extractionChannels"], Leaf),
                field(
                    "integration_enabled",
                    &["jarvisIntegrationEnabled", "integrationEnabled"],
                    Leaf,
                ),
                field("api_url", &["apiUrl"], Leaf),
                field("api_key", &["apiKey"], Leaf),
                field("max_attempts", &["maxAttempts"], Leaf),
                field("backoff_base_ms", &["backoffBaseMs"], Leaf),
            ]),
        ),
        field(
            "briefings",
            &[],
            Struct(vec![
                field("morning_enabled", &["morningBriefingEnabled"], Leaf),
                field("morning_time", &["morningTime"], Leaf),
                field("pre_meeting_enabled", &["preMeetingBriefingEnabled"], Leaf),
                field("pre_meeting_minutes_ahead", &["preMeetingMinutesAhead"], Leaf),
                field("weekly_enabled", &["weeklyBriefingEnabled"], Leaf),
                field("weekly_day", &["weeklyDay"], Leaf),
                field("weekly_time", &["weeklyTime"], Leaf),
                field("delivery_channels", &["deliveryChannels"], Leaf),
                field("timezone", &[], Leaf),
            ]),
        ),
    ])
}

/// Edit distance over chars, single rolling row.
fn edit_distance(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            row[j + 1] = if ca == *cb {
                diagonal
            } else {
                1 + diagonal.min(above).min(row[j])
            };
            diagonal = above;
        }
    }
    row[b.len()]
}

fn closest<'a>(needle: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|c| (edit_distance(needle, c), c))
        .filter(|(d, _)| (1..=3).contains(d))
        .min_by_key(|(d, _)| *d)
        .map(|(_, c)| c)
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn check_unknown_fields(
    value: &Value,
    schema: &KnownKeys,
    prefix: &str,
    diagnostics: &mut Vec<Diagnostic>,
) {
    let Value::Object(table) = value else {
        return;
    };
    match schema {
        KnownKeys::Struct(fields) => {
            for (key, child) in table {
                let path = join_path(prefix, key);
                let key_str = key.as_str();
                let known = fields
                    .iter()
                    .find(|(name, aliases, _)| *name == key_str || aliases.contains(&key_str));
                match known {
                    Some((_, _, child_schema)) => {
                        check_unknown_fields(child, child_schema, &path, diagnostics);
                    },
                    None => {
                        let message = match closest(key, fields.iter().map(|(n, ..)| *n)) {
                            Some(s) => format!("unknown field (did you mean \"{s}\"?)"),
                            None => "unknown field".to_string(),
                        };
                        diagnostics.push(Diagnostic::new(
                            Severity::Error,
                            "unknown-field",
                            path,
                            message,
                        ));
                    },
                }
            }
        },
        KnownKeys::ChannelMap => {
            for key in table.keys() {
                if key.parse::<ChannelType>().is_err() {
                    let message =
                        match closest(key, ChannelType::ALL.iter().map(|c| c.as_str())) {
                            Some(s) => format!("unknown channel (did you mean \"{s}\"?)"),
                            None => "unknown channel".to_string(),
                        };
                    diagnostics.push(Diagnostic::new(
                        Severity::Error,
                        "unknown-channel",
                        join_path(prefix, key),
                        message,
                    ));
                }
            }
        },
        KnownKeys::Leaf => {},
    }
}

// ── Semantic checks ─────────────────────────────────────────────────────────

const WEEKDAYS: &[&str] = &[
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

/// Strict `HH:MM`, 00:00 through 23:59.
#[must_use]
pub fn is_valid_time(time: &str) -> bool {
    let &[h1, h2, b':', m1, m2] = time.as_bytes() else {
        return false;
    };
    if ![h1, h2, m1, m2].iter().all(u8::is_ascii_digit) {
        return false;
    }
    let hour = (h1 - b'0') * 10 + (h2 - b'0');
    let minute = (m1 - b'0') * 10 + (m2 - b'0');
    hour < 24 && minute < 60
}

fn check_time(enabled: bool, time: &str, path: &str, diagnostics: &mut Vec<Diagnostic>) {
    if enabled && !is_valid_time(time) {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "schedule",
            path,
            format!("expected HH:MM between 00:00 and 23:59, got \"{time}\""),
        ));
    }
}

fn check_channel_list(channels: &[ChannelType], path: &str, diagnostics: &mut Vec<Diagnostic>) {
    let mut seen = HashSet::new();
    for channel in channels {
        if !seen.insert(channel) {
            diagnostics.push(Diagnostic::new(
                Severity::Warning,
                "channels",
                path,
                format!("{channel} listed more than once"),
            ));
        }
    }
}

fn check_semantics(config: &HeraldConfig, diagnostics: &mut Vec<Diagnostic>) {
    let b = &config.briefings;

    check_time(b.morning_enabled, &b.morning_time, "briefings.morning_time", diagnostics);
    check_time(b.weekly_enabled, &b.weekly_time, "briefings.weekly_time", diagnostics);

    if b.weekly_enabled && !WEEKDAYS.contains(&b.weekly_day.to_lowercase().as_str()) {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "schedule",
            "briefings.weekly_day",
            format!(
                "unknown weekday \"{}\"; the weekly briefing will run on monday",
                b.weekly_day
            ),
        ));
    }

    if b.pre_meeting_enabled && b.pre_meeting_minutes_ahead == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "schedule",
            "briefings.pre_meeting_minutes_ahead",
            "must be greater than 0",
        ));
    }

    if let Some(tz) = &b.timezone
        && tz.parse::<chrono_tz::Tz>().is_err()
    {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "schedule",
            "briefings.timezone",
            format!("unknown timezone \"{tz}\""),
        ));
    }

    let any_briefing = b.morning_enabled || b.weekly_enabled || b.pre_meeting_enabled;
    if any_briefing && config.delivery_channels().is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "channels",
            "briefings.delivery_channels",
            "briefings are enabled but no delivery channels are configured",
        ));
    }
    if config.canvas.enabled_channels.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "channels",
            "canvas.enabled_channels",
            "no channels enabled",
        ));
    }
    check_channel_list(
        &config.canvas.enabled_channels,
        "canvas.enabled_channels",
        diagnostics,
    );
    check_channel_list(&b.delivery_channels, "briefings.delivery_channels", diagnostics);

    for (channel, url) in &config.canvas.webhooks {
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "channels",
                format!("canvas.webhooks.{channel}"),
                "webhook must be an http(s) URL",
            ));
        }
    }

    let m = &config.memory;
    if m.max_attempts == 0 {
        diagnostics.push(Diagnostic::new(
            Severity::Error,
            "memory",
            "memory.max_attempts",
            "must be at least 1",
        ));
    }
    if m.auto_extract_enabled && m.extraction_channels.is_empty() {
        diagnostics.push(Diagnostic::new(
            Severity::Warning,
            "memory",
            "memory.extraction_channels",
            "auto extraction is enabled but no extraction channels are listed",
        ));
    }
    if m.integration_enabled && m.api_key.is_none() {
        diagnostics.push(Diagnostic::new(
            Severity::Info,
            "memory",
            "memory.api_key",
            "no API key; briefings will use empty context",
        ));
    }
}

// ── Entry points ────────────────────────────────────────────────────────────

/// Semantic checks on an already-loaded config.
#[must_use]
pub fn validate_config(config: &HeraldConfig) -> ValidationResult {
    let mut diagnostics = Vec::new();
    check_semantics(config, &mut diagnostics);
    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Validate raw config text; `path` only selects the format.
#[must_use]
pub fn validate_str(raw: &str, path: &Path) -> ValidationResult {
    let mut diagnostics = Vec::new();

    let value = match parse_value(raw, path) {
        Ok(v) => v,
        Err(e) => {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                "syntax",
                "",
                e.to_string(),
            ));
            return ValidationResult {
                diagnostics,
                config_path: None,
            };
        },
    };

    check_unknown_fields(&value, &schema_tree(), "", &mut diagnostics);

    match serde_json::from_value::<HeraldConfig>(value) {
        Ok(config) => check_semantics(&config, &mut diagnostics),
        Err(e) => diagnostics.push(Diagnostic::new(
            Severity::Error,
            "type-error",
            "",
            format!("type error: {e}"),
        )),
    }

    ValidationResult {
        diagnostics,
        config_path: None,
    }
}

/// Validate the file at `path`, or the discovered config file.
#[must_use]
pub fn validate(path: Option<&Path>) -> ValidationResult {
    let Some(config_path) = path.map(Path::to_path_buf).or_else(find_config_file) else {
        let mut result = validate_config(&HeraldConfig::default());
        result.diagnostics.insert(
            0,
            Diagnostic::new(
                Severity::Info,
                "file-ref",
                "",
                "no config file found; using defaults",
            ),
        );
        return result;
    };

    let mut result = match std::fs::read_to_string(&config_path) {
        Ok(raw) => validate_str(&raw, &config_path),
        Err(e) => ValidationResult {
            diagnostics: vec![Diagnostic::new(
                Severity::Error,
                "file-ref",
                "",
                format!("failed to read config file: {e}"),
            )],
            config_path: None,
        },
    };
    result.config_path = Some(config_path);
    result
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn toml(raw: &str) -> ValidationResult {
        validate_str(raw, Path::new("herald.toml"))
    }

    fn find<'a>(result: &'a ValidationResult, path: &str) -> &'a Diagnostic {
        result
            .diagnostics
            .iter()
            .find(|d| d.path == path)
            .unwrap_or_else(|| panic!("no diagnostic for {path}: {:?}", result.diagnostics))
    }

    #[rstest]
    #[case("00:00", true)]
    #[case("08:30", true)]
    #[case("23:59", true)]
    #[case("8:30", false)]
    #[case("25:00", false)]
    #[case("08:60", false)]
    #[case("invalid", false)]
    #[case("0a:00", false)]
    fn time_format(#[case] time: &str, #[case] valid: bool) {
        assert_eq!(is_valid_time(time), valid);
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("same", "same"), 0);
    }

    #[test]
    fn empty_file_is_valid() {
        let result = toml("");
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
    }

    #[test]
    fn full_config_has_no_errors() {
        let result = toml(
            r#"
[canvas]
enabled_channels = ["telegram", "discord", "slack", "teams"]

[canvas.webhooks]
discord = "https://discord.com/api/webhooks/1/abc"

[memory]
api_url = "https://memory.example.com/api/v2"
api_key = "sk-test"
max_attempts = 4

[briefings]
morning_time = "07:15"
weekly_day = "friday"
weekly_time = "16:00"
timezone = "Europe/Paris"
delivery_channels = ["telegram", "teams"]
"#,
        );
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
        assert_eq!(result.count(Severity::Warning), 0);
    }

    #[test]
    fn syntax_error() {
        let result = toml("canvas = [[[");
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].category, "syntax");
    }

    #[test]
    fn misspelled_key_gets_suggestion() {
        let result = toml("[briefings]\nmorning_tme = \"08:00\"\n");
        let d = find(&result, "briefings.morning_tme");
        assert_eq!(d.category, "unknown-field");
        assert!(d.message.contains("morning_time"), "{}", d.message);
    }

    #[rstest]
    #[case(r#"{"canvas":{"enabledChannels":["slack"]},"briefings":{"morningTime":"07:00"}}"#)]
    #[case(r#"{"memory":{"jarvisIntegrationEnabled":false,"apiUrl":"http://localhost:8000/api/v2"}}"#)]
    #[case(
        r#"{"briefings":{"weeklyBriefingEnabled":true,"weeklyDay":"friday","weeklyTime":"16:00","deliveryChannels":["telegram"]}}"#
    )]
    fn camel_case_aliases_are_known(#[case] raw: &str) {
        let result = validate_str(raw, Path::new("herald.json"));
        assert!(!result.has_errors(), "{:?}", result.diagnostics);
        assert_eq!(result.count(Severity::Warning), 0, "{:?}", result.diagnostics);
    }

    #[test]
    fn misspelled_alias_suggests_field_name() {
        let result = validate_str(
            r#"{"briefings":{"morningTme":"07:00"}}"#,
            Path::new("herald.json"),
        );
        let d = find(&result, "briefings.morningTme");
        assert_eq!(d.category, "unknown-field");
    }

    #[test]
    fn unknown_webhook_channel() {
        let result = toml("[canvas.webhooks]\nslak = \"https://x\"\n");
        let d = find(&result, "canvas.webhooks.slak");
        assert_eq!(d.category, "unknown-channel");
        assert!(d.message.contains("slack"));
    }

    #[test]
    fn wrong_type_reported() {
        let result = toml("[memory]\nmax_attempts = \"three\"\n");
        assert!(
            result
                .diagnostics
                .iter()
                .any(|d| d.category == "type-error")
        );
    }

    #[test]
    fn bad_time_only_matters_when_enabled() {
        let result = toml("[briefings]\nmorning_time = \"8am\"\n");
        assert_eq!(find(&result, "briefings.morning_time").severity, Severity::Error);

        let result = toml("[briefings]\nmorning_enabled = false\nmorning_time = \"8am\"\n");
        assert!(!result.has_errors());
    }

    #[test]
    fn unknown_weekday_warns_about_monday_fallback() {
        let result = toml("[briefings]\nweekly_day = \"funday\"\n");
        let d = find(&result, "briefings.weekly_day");
        assert_eq!(d.severity, Severity::Warning);
        assert!(d.message.contains("monday"));
    }

    #[test]
    fn semantic_errors() {
        let mut cfg = HeraldConfig::default();
        cfg.briefings.delivery_channels.clear();
        cfg.canvas.enabled_channels.clear();
        cfg.briefings.pre_meeting_minutes_ahead = 0;
        cfg.briefings.timezone = Some("Mars/Olympus".into());
        cfg.memory.max_attempts = 0;
        cfg.canvas
            .webhooks
            .insert(ChannelType::Slack, "ftp://nope".into());

        let result = validate_config(&cfg);
        for path in [
            "briefings.delivery_channels",
            "briefings.pre_meeting_minutes_ahead",
            "briefings.timezone",
            "memory.max_attempts",
            "canvas.webhooks.slack",
        ] {
            assert_eq!(find(&result, path).severity, Severity::Error, "{path}");
        }
        assert_eq!(find(&result, "canvas.enabled_channels").severity, Severity::Warning);
    }

    #[test]
    fn duplicate_channels_warned() {
        let mut cfg = HeraldConfig::default();
        cfg.briefings.delivery_channels = vec![ChannelType::Slack, ChannelType::Slack];
        let result = validate_config(&cfg);
        assert_eq!(
            find(&result, "briefings.delivery_channels").severity,
            Severity::Warning
        );
    }

    #[test]
    fn missing_api_key_is_info() {
        let result = validate_config(&HeraldConfig::default());
        assert!(!result.has_errors());
        assert_eq!(find(&result, "memory.api_key").severity, Severity::Info);
    }

    #[test]
    fn validate_reads_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("herald.yaml");
        std::fs::write(&path, "briefings:\n  weekly_time: \"9\"\n").unwrap();
        let result = validate(Some(&path));
        assert_eq!(result.config_path.as_deref(), Some(path.as_path()));
        assert!(result.has_errors());
    }

    #[test]
    fn validate_missing_file_is_error() {
        let result = validate(Some(Path::new("/nonexistent/herald.toml")));
        assert!(result.has_errors());
        assert_eq!(result.diagnostics[0].category, "file-ref");
    }
}
