use std::collections::BTreeMap;
use std::path::Path;

use infuse::{ConfigurationAdapter, StdError};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// JSON-backed configuration store.
///
/// Values are kept as JSON under top-level keys. As a
/// [`ConfigurationAdapter`] the store resolves a name either as a top-level
/// key or, failing that, as a dot-separated path into nested objects. Strings
/// are returned verbatim, numbers and booleans in their JSON form, `null` is
/// treated as absent and arrays or objects are rejected.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(flatten)]
    pub(crate) configs: BTreeMap<String, serde_json::Value>,
}

/// Typed section of a [`Config`] stored under a fixed key.
pub trait ConfigSection: DeserializeOwned {
    fn key() -> &'static str;
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T>(&self, name: impl AsRef<str>) -> Result<T, StdError>
    where
        T: DeserializeOwned,
    {
        Ok(serde_json::from_value(
            self.configs
                .get(name.as_ref())
                .cloned()
                .unwrap_or(serde_json::Value::Null),
        )?)
    }

    /// Deserializes the section stored under `T::key()`.
    pub fn section<T>(&self) -> Result<T, StdError>
    where
        T: ConfigSection,
    {
        self.get(T::key())
    }

    pub fn set<T>(&mut self, name: impl Into<String>, value: T) -> Result<(), StdError>
    where
        T: Serialize,
    {
        self.configs
            .insert(name.into(), serde_json::to_value(value)?);
        Ok(())
    }

    /// Builder variant of [`Config::set`].
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be represented as JSON.
    pub fn with<T>(mut self, name: impl Into<String>, value: T) -> Self
    where
        T: Serialize,
    {
        self.configs.insert(
            name.into(),
            serde_json::to_value(value).expect("config value must be representable as JSON"),
        );
        self
    }

    pub fn merge_from(&mut self, other: Self) -> Result<(), StdError> {
        for (key, value) in other.configs {
            let entry = self.configs.entry(key);
            merge_json_from(entry.or_insert(serde_json::Value::Null), value)?;
        }
        Ok(())
    }

    pub fn parse<T>(text: T) -> Result<Self, StdError>
    where
        T: AsRef<str>,
    {
        Ok(serde_json::from_str(text.as_ref())?)
    }

    pub async fn parse_file(path: impl AsRef<Path>) -> Result<Self, StdError> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::parse(text)
    }

    /// Check if the config is empty
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Get the number of config entries
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    fn lookup(&self, name: &str) -> Option<&serde_json::Value> {
        if let Some(value) = self.configs.get(name) {
            return Some(value);
        }
        let mut parts = name.split('.');
        let mut value = self.configs.get(parts.next()?)?;
        for part in parts {
            value = value.as_object()?.get(part)?;
        }
        Some(value)
    }
}

impl ConfigurationAdapter for Config {
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        match self.lookup(name) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(serde_json::Value::String(value)) => Ok(Some(value.clone())),
            Some(serde_json::Value::Bool(value)) => Ok(Some(value.to_string())),
            Some(serde_json::Value::Number(value)) => Ok(Some(value.to_string())),
            Some(serde_json::Value::Array(_) | serde_json::Value::Object(_)) => {
                Err(format!("configuration value {name} is not a scalar").into())
            }
        }
    }
}

fn merge_json_from(lhs: &mut serde_json::Value, rhs: serde_json::Value) -> Result<(), StdError> {
    match lhs {
        serde_json::Value::Object(l) => match rhs {
            serde_json::Value::Object(r) => {
                for (key, value) in r {
                    let entry = l.entry(key);
                    merge_json_from(entry.or_insert(serde_json::Value::Null), value)?;
                }
            }
            _ => *lhs = rhs,
        },
        serde_json::Value::Array(l) => match rhs {
            serde_json::Value::Array(r) => {
                l.extend(r);
            }
            _ => *lhs = rhs,
        },
        _ => *lhs = rhs,
    }
    Ok(())
}
