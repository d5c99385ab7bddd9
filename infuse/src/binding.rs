//! Remapping of logical configuration names to physical names.
//!
//! A binding sits between the names declared on a target and the names an
//! adapter understands, e.g. to place a component's settings under a prefix
//! or to rename individual keys.

use std::any::type_name;
use std::collections::HashMap;
use std::hash::BuildHasher;

use crate::StdError;

/// Trait for remapping a logical name to the physical name queried on the
/// adapter. Returning the input unchanged is equivalent to no binding.
pub trait ConfigurationBinding {
    /// Returns the physical name for `name`.
    fn remap(&self, name: &str) -> Result<String, StdError>;

    /// Identifies this binding in error messages.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

/// Binding that leaves every name unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityBinding;

impl ConfigurationBinding for IdentityBinding {
    fn remap(&self, name: &str) -> Result<String, StdError> {
        Ok(name.to_owned())
    }
}

/// Renames the mapped names; unmapped names pass through unchanged.
impl<S> ConfigurationBinding for HashMap<String, String, S>
where
    S: BuildHasher,
{
    fn remap(&self, name: &str) -> Result<String, StdError> {
        Ok(self.get(name).cloned().unwrap_or_else(|| name.to_owned()))
    }
}

/// Binding that prepends a fixed prefix to every name.
///
/// ```rust
/// use infuse::{ConfigurationBinding, PrefixBinding};
///
/// let binding = PrefixBinding::new("server.");
/// assert_eq!(binding.remap("port").unwrap(), "server.port");
/// ```
#[derive(Clone, Debug)]
pub struct PrefixBinding {
    prefix: String,
}

impl PrefixBinding {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl ConfigurationBinding for PrefixBinding {
    fn remap(&self, name: &str) -> Result<String, StdError> {
        Ok(format!("{}{name}", self.prefix))
    }
}

impl<B> ConfigurationBinding for &B
where
    B: ConfigurationBinding + ?Sized,
{
    fn remap(&self, name: &str) -> Result<String, StdError> {
        (**self).remap(name)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Binding backed by a closure. Created with [`from_fn`].
pub struct FnBinding<F> {
    func: F,
    name: &'static str,
}

/// Creates a binding from a remapping closure.
///
/// ```rust
/// use infuse::ConfigurationBinding;
///
/// let binding = infuse::binding::from_fn(|name| Ok(name.replace('_', ".")));
/// assert_eq!(binding.remap("server_port").unwrap(), "server.port");
/// ```
pub fn from_fn<F>(func: F) -> FnBinding<F>
where
    F: Fn(&str) -> Result<String, StdError>,
{
    FnBinding {
        func,
        name: type_name::<FnBinding<F>>(),
    }
}

impl<F> FnBinding<F> {
    /// Overrides the name reported in error messages.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> ConfigurationBinding for FnBinding<F>
where
    F: Fn(&str) -> Result<String, StdError>,
{
    fn remap(&self, name: &str) -> Result<String, StdError> {
        (self.func)(name)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
