use std::env::{self, VarError};

use infuse::{ConfigurationAdapter, StdError};

/// Adapter reading configuration from process environment variables.
///
/// Without a prefix, names are looked up verbatim. With a prefix, names are
/// converted to upper snake case and appended to the prefix, so `server.port`
/// becomes `APP_SERVER_PORT` for the prefix `APP_`.
///
/// A variable holding invalid unicode is reported as a lookup failure.
#[derive(Clone, Debug, Default)]
pub struct Environment {
    prefix: Option<String>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    /// Returns the variable name queried for `name`.
    pub fn var_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}{}", upper_snake_case(name)),
            None => name.to_owned(),
        }
    }
}

impl ConfigurationAdapter for Environment {
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        let var_name = self.var_name(name);
        match env::var(&var_name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(err @ VarError::NotUnicode(_)) => {
                Err(format!("environment variable {var_name}: {err}").into())
            }
        }
    }
}

fn upper_snake_case(name: &str) -> String {
    let mut result = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if c.is_ascii_uppercase() && prev_lower {
                result.push('_');
            }
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
            result.push(c.to_ascii_uppercase());
        } else {
            prev_lower = false;
            if !result.ends_with('_') {
                result.push('_');
            }
        }
    }
    result
}
