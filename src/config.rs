//! Configuration management with layered loading
//!
//! Only rendering is configurable; tree semantics are fixed.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML text supplied by the embedding application
//! 3. Environment variables: `PROPTREE__*` prefix

use config::{Config, ConfigError, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Settings could not be read. Kept outside the domain layer, which never
/// loads configuration.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("environment override: {0}")]
    Env(#[from] ConfigError),

    #[error("invalid value for {key}: {value}")]
    Invalid { key: String, value: String },
}

pub type SettingsResult<T> = Result<T, SettingsError>;

/// Options for the debug and canonical renderings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    /// Property shown next to the node id in tree output
    pub label_key: String,
    /// Pretty-print canonical JSON
    pub pretty: bool,
    /// Append the remaining properties to tree output labels
    pub show_properties: bool,
    /// Deepest level drawn in tree output; deeper nodes are folded
    pub max_depth: usize,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            label_key: "name".into(),
            pretty: false,
            show_properties: false,
            max_depth: 256,
        }
    }
}

/// Raw render config for intermediate parsing (`None` → not specified).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawRenderSettings {
    pub label_key: Option<String>,
    pub pretty: Option<bool>,
    pub show_properties: Option<bool>,
    pub max_depth: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub render: RawRenderSettings,
}

impl RenderSettings {
    /// Scalar options: overlay wins if Some, otherwise keep base
    pub fn merge(&self, overlay: &RawRenderSettings) -> Self {
        Self {
            label_key: overlay
                .label_key
                .clone()
                .unwrap_or_else(|| self.label_key.clone()),
            pretty: overlay.pretty.unwrap_or(self.pretty),
            show_properties: overlay.show_properties.unwrap_or(self.show_properties),
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
        }
    }
}

/// Unified configuration for proptree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub render: RenderSettings,
}

fn parse_raw_settings(content: &str) -> SettingsResult<RawSettings> {
    Ok(toml::from_str(content)?)
}

/// A missing key means "not set"; any other lookup failure is an error.
fn optional<T>(value: Result<T, ConfigError>) -> SettingsResult<Option<T>> {
    match value {
        Ok(val) => Ok(Some(val)),
        Err(ConfigError::NotFound(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Settings {
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            render: self.render.merge(&overlay.render),
        }
    }

    /// Defaults overlaid with `content`; environment variables are ignored.
    pub fn from_toml_str(content: &str) -> SettingsResult<Self> {
        let raw = parse_raw_settings(content)?;
        Ok(Self::default().merge_with(&raw))
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `overlay` - Optional TOML text, e.g. embedded in the host application's own config
    ///
    /// # Precedence (lowest to highest)
    /// 1. Compiled defaults
    /// 2. `overlay`
    /// 3. Environment variables: `PROPTREE__RENDER__LABEL_KEY`, `PROPTREE__RENDER__PRETTY`,
    ///    `PROPTREE__RENDER__SHOW_PROPERTIES`, `PROPTREE__RENDER__MAX_DEPTH`
    #[instrument(level = "debug", skip(overlay))]
    pub fn load(overlay: Option<&str>) -> SettingsResult<Self> {
        let mut current = Self::default();

        if let Some(content) = overlay {
            current = current.merge_with(&parse_raw_settings(content)?);
        }

        current = Self::apply_env_overrides(current, env_source())?;
        debug!(?current, "settings loaded");
        Ok(current)
    }

    /// Apply `PROPTREE__*` variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self, source: Environment) -> SettingsResult<Self> {
        let config = Config::builder().add_source(source).build()?;

        if let Some(val) = optional(config.get_string("render.label_key"))? {
            settings.render.label_key = val;
        }
        if let Some(val) = optional(config.get_bool("render.pretty"))? {
            settings.render.pretty = val;
        }
        if let Some(val) = optional(config.get_bool("render.show_properties"))? {
            settings.render.show_properties = val;
        }
        if let Some(val) = optional(config.get_int("render.max_depth"))? {
            settings.render.max_depth =
                usize::try_from(val).map_err(|_| SettingsError::Invalid {
                    key: "render.max_depth".into(),
                    value: val.to_string(),
                })?;
        }

        Ok(settings)
    }
}

fn env_source() -> Environment {
    Environment::with_prefix("PROPTREE").separator("__")
}
