use std::path::{Path, PathBuf};

use {
    secrecy::Secret,
    tracing::{debug, warn},
};

use crate::{Error, Result, schema::HeraldConfig};

/// Standard config file names, checked in order.
const CONFIG_FILENAMES: &[&str] = &["herald.toml", "herald.yaml", "herald.yml", "herald.json"];

/// Replaces the whole config when it holds valid JSON.
pub const CONFIG_JSON_ENV: &str = "HERALD_CONFIG_JSON";
pub const MEMORY_API_URL_ENV: &str = "HERALD_MEMORY_API_URL";
pub const MEMORY_API_KEY_ENV: &str = "HERALD_MEMORY_API_KEY";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", "herald")
}

/// User-global config directory, e.g. `~/.config/herald/`.
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// User data directory; the scheduler keeps its jobs here.
pub fn data_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.data_dir().to_path_buf())
}

/// Load config from `path`; the format follows the extension.
pub fn load_config(path: &Path) -> Result<HeraldConfig> {
    let raw = std::fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&raw, path)
}

/// First config file in `./`, then the user config directory.
pub fn find_config_file() -> Option<PathBuf> {
    let local = CONFIG_FILENAMES.iter().map(PathBuf::from);
    let global = config_dir()
        .into_iter()
        .flat_map(|dir| CONFIG_FILENAMES.iter().map(move |name| dir.join(name)));
    local.chain(global).find(|p| p.exists())
}

/// Discover the config file, falling back to defaults, then apply
/// environment overrides from the process environment.
pub fn discover_and_load() -> HeraldConfig {
    let config = match find_config_file() {
        Some(path) => {
            debug!(path = %path.display(), "loading config");
            load_config(&path).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "failed to load config, using defaults");
                HeraldConfig::default()
            })
        },
        None => {
            debug!("no config file found, using defaults");
            HeraldConfig::default()
        },
    };
    apply_env_overrides(config, |name| std::env::var(name).ok())
}

/// Apply environment overrides using `lookup` in place of `std::env::var`.
///
/// `HERALD_CONFIG_JSON` replaces the config wholesale; invalid JSON resets
/// it to the built-in defaults with a warning. The memory URL and key
/// variables then fill in the service endpoint and credentials.
pub fn apply_env_overrides(
    mut config: HeraldConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> HeraldConfig {
    if let Some(raw) = lookup(CONFIG_JSON_ENV) {
        match serde_json::from_str::<HeraldConfig>(&raw) {
            Ok(parsed) => {
                debug!(var = CONFIG_JSON_ENV, "config replaced from environment");
                config = parsed;
            },
            Err(e) => {
                warn!(var = CONFIG_JSON_ENV, error = %e, "invalid JSON, using defaults");
                config = HeraldConfig::default();
            },
        }
    }
    if let Some(url) = lookup(MEMORY_API_URL_ENV).filter(|u| !u.is_empty()) {
        config.memory.api_url = url;
    }
    if let Some(key) = lookup(MEMORY_API_KEY_ENV).filter(|k| !k.is_empty()) {
        config.memory.api_key = Some(Secret::new(key));
    }
    config
}

pub(crate) fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("toml")
}

/// Parse raw text into a generic JSON tree, by file extension.
pub(crate) fn parse_value(raw: &str, path: &Path) -> Result<serde_json::Value> {
    let parse_err = |message: String| Error::Parse {
        path: path.to_path_buf(),
        message,
    };
    match extension(path) {
        "toml" => {
            let v: toml::Value = toml::from_str(raw).map_err(|e| parse_err(e.to_string()))?;
            serde_json::to_value(v).map_err(|e| parse_err(e.to_string()))
        },
        "yaml" | "yml" => {
            // An empty YAML document is null; treat it as an empty table.
            if raw.trim().is_empty() {
                return Ok(serde_json::Value::Object(Default::default()));
            }
            serde_yaml::from_str(raw).map_err(|e| parse_err(e.to_string()))
        },
        "json" => serde_json::from_str(raw).map_err(|e| parse_err(e.to_string())),
        other => Err(Error::UnsupportedFormat {
            extension: other.to_string(),
        }),
    }
}

fn parse_config(raw: &str, path: &Path) -> Result<HeraldConfig> {
    let value = parse_value(raw, path)?;
    serde_json::from_value(value).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        herald_common::ChannelType,
        secrecy::ExposeSecret,
        std::collections::HashMap,
        tempfile::TempDir,
    };

    fn write(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, body).unwrap();
        path
    }

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn loads_toml() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "herald.toml",
            r#"
[canvas]
enabled_channels = ["slack", "teams"]

[briefings]
morning_time = "07:30"
"#,
        );
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.canvas.enabled_channels, [ChannelType::Slack, ChannelType::Teams]);
        assert_eq!(cfg.briefings.morning_time, "07:30");
        assert_eq!(cfg.briefings.weekly_time, "09:00");
    }

    #[test]
    fn loads_yaml_and_json() {
        let dir = TempDir::new().unwrap();
        let yaml = write(&dir, "herald.yaml", "briefings:\n  weekly_day: friday\n");
        assert_eq!(load_config(&yaml).unwrap().briefings.weekly_day, "friday");

        let json = write(&dir, "herald.json", r#"{"memory": {"max_attempts": 5}}"#);
        assert_eq!(load_config(&json).unwrap().memory.max_attempts, 5);

        let empty = write(&dir, "empty.yml", "");
        assert!(load_config(&empty).unwrap().briefings.morning_enabled);
    }

    #[test]
    fn parse_errors_name_the_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "herald.toml", "canvas = [[[");
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("herald.toml"));
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "herald.ini", "x=1");
        assert!(matches!(
            load_config(&path),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn missing_file_is_read_error() {
        assert!(matches!(
            load_config(Path::new("/nonexistent/herald.toml")),
            Err(Error::Read { .. })
        ));
    }

    #[test]
    fn env_json_replaces_config() {
        let cfg = apply_env_overrides(
            HeraldConfig::default(),
            env(&[(CONFIG_JSON_ENV, r#"{"briefings": {"morningTime": "07:00"}}"#)]),
        );
        assert_eq!(cfg.briefings.morning_time, "07:00");
    }

    #[test]
    fn invalid_env_json_falls_back_to_defaults() {
        let mut loaded = HeraldConfig::default();
        loaded.briefings.weekly_day = "sunday".into();
        let cfg = apply_env_overrides(
            loaded,
            env(&[
                (CONFIG_JSON_ENV, "{not json"),
                (MEMORY_API_KEY_ENV, "sk-env"),
            ]),
        );
        assert_eq!(cfg.briefings.weekly_day, HeraldConfig::default().briefings.weekly_day);
        assert_eq!(cfg.memory.api_key.unwrap().expose_secret(), "sk-env");
    }

    #[test]
    fn memory_env_vars_fill_endpoint_and_key() {
        let cfg = apply_env_overrides(
            HeraldConfig::default(),
            env(&[
                (MEMORY_API_URL_ENV, "https://memory.example.com/api"),
                (MEMORY_API_KEY_ENV, "sk-env"),
            ]),
        );
        assert_eq!(cfg.memory.api_url, "https://memory.example.com/api");
        assert_eq!(cfg.memory.api_key.unwrap().expose_secret(), "sk-env");
    }

    #[test]
    fn no_env_leaves_config_untouched() {
        let cfg = apply_env_overrides(HeraldConfig::default(), env(&[]));
        assert!(cfg.memory.api_key.is_none());
        assert_eq!(cfg.memory.api_url, crate::schema::DEFAULT_MEMORY_API_URL);
    }
}
