use std::str::FromStr as _;

use infuse::StdError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing_subscriber::filter::{Directive, EnvFilter};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

use crate::{Config, ConfigSection};

#[derive(Serialize, Deserialize)]
pub struct TracingConfig {
    #[serde(
        serialize_with = "serialize_level",
        deserialize_with = "deserialize_level",
        default = "default_level"
    )]
    pub level: tracing::Level,
    #[serde(default)]
    pub directives: Vec<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directives: Default::default(),
        }
    }
}

impl ConfigSection for TracingConfig {
    fn key() -> &'static str {
        "tracing"
    }
}

impl TracingConfig {
    /// Builds the filter for the configured level and directives.
    pub fn env_filter(&self) -> Result<EnvFilter, StdError> {
        let mut directives = Vec::new();
        for directive in &self.directives {
            directives.push(directive.parse::<Directive>()?);
        }
        Ok(new_env_filter(&directives, self.level))
    }
}

/// Installs the global tracing subscriber described by the `tracing` section
/// of `config`.
///
/// Returns `Ok(false)` without touching the global subscriber when the section
/// is absent.
pub fn init_tracing(config: &Config) -> Result<bool, StdError> {
    let Some(tracing_config) = config.get::<Option<TracingConfig>>(TracingConfig::key())? else {
        return Ok(false);
    };
    tracing_subscriber::registry()
        .with(tracing_config.env_filter()?)
        .with(tracing_subscriber::fmt::Layer::default())
        .try_init()?;
    tracing::debug!(level = %tracing_config.level, "Tracing initialized");
    Ok(true)
}

fn new_env_filter(directives: &[Directive], level: tracing::Level) -> EnvFilter {
    let mut filter = EnvFilter::default();
    for directive in directives {
        filter = filter.add_directive(directive.clone());
    }
    filter.add_directive(level.into())
}

fn serialize_level<S>(v: &tracing::Level, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(v.as_str())
}

fn deserialize_level<'de, D>(deserializer: D) -> Result<tracing::Level, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    String::deserialize(deserializer)
        .and_then(|v| tracing::Level::from_str(&v).map_err(|v| Error::custom(format!("{v}"))))
}

fn default_level() -> tracing::Level {
    tracing::Level::DEBUG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_config_section() {
        let config = Config::parse(
            r#"{"tracing": {"level": "info", "directives": ["infuse=trace"]}}"#,
        )
        .unwrap();
        let tracing_config: TracingConfig = config.section().unwrap();
        assert_eq!(tracing_config.level, tracing::Level::INFO);
        assert_eq!(tracing_config.directives, vec!["infuse=trace"]);
        assert!(tracing_config.env_filter().is_ok());
    }

    #[test]
    fn test_tracing_config_defaults() {
        let config = Config::parse(r#"{"tracing": {}}"#).unwrap();
        let tracing_config: TracingConfig = config.section().unwrap();
        assert_eq!(tracing_config.level, tracing::Level::DEBUG);
        assert!(tracing_config.directives.is_empty());
    }

    #[test]
    fn test_tracing_config_invalid() {
        let config = Config::parse(r#"{"tracing": {"level": "loud"}}"#).unwrap();
        assert!(config.section::<TracingConfig>().is_err());

        let tracing_config = TracingConfig {
            directives: vec!["infuse=notalevel".to_string()],
            ..Default::default()
        };
        assert!(tracing_config.env_filter().is_err());
    }

    #[test]
    fn test_init_tracing_without_section() {
        assert!(!init_tracing(&Config::new()).unwrap());
    }
}
