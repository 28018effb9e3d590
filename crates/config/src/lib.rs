//! Configuration loading and validation.
//!
//! Config files: `herald.toml`, `herald.yaml`, `herald.yml` or `herald.json`,
//! searched in `./` then the user config directory. `HERALD_CONFIG_JSON`
//! replaces the whole config when it holds valid JSON.

pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        CONFIG_JSON_ENV, apply_env_overrides, config_dir, data_dir, discover_and_load,
        find_config_file, load_config,
    },
    schema::{BriefingsConfig, CanvasConfig, HeraldConfig, MemoryConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
