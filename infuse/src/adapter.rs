//! Sources of raw configuration values.
//!
//! The injector only needs a name → optional string lookup. Maps with
//! string-like keys, slices of key/value pairs and closures work out of the
//! box; richer stores implement [`ConfigurationAdapter`] directly.

use std::any::type_name;
use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;
use std::hash::{BuildHasher, Hash};

use crate::StdError;

/// Trait for looking up raw configuration values by name.
///
/// # Examples
///
/// ```rust
/// use infuse::{ConfigurationAdapter, StdError};
///
/// struct Fixed;
///
/// impl ConfigurationAdapter for Fixed {
///     fn get(&self, name: &str) -> Result<Option<String>, StdError> {
///         Ok((name == "answer").then(|| "42".to_string()))
///     }
/// }
///
/// assert_eq!(Fixed.get("answer").unwrap().as_deref(), Some("42"));
/// assert_eq!(Fixed.get("question").unwrap(), None);
/// ```
pub trait ConfigurationAdapter {
    /// Returns the raw value stored under `name`, or `None` when absent.
    fn get(&self, name: &str) -> Result<Option<String>, StdError>;

    /// Identifies this adapter in error messages.
    fn name(&self) -> &'static str {
        type_name::<Self>()
    }
}

impl<K, V, S> ConfigurationAdapter for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: Display,
    S: BuildHasher,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        Ok(HashMap::get(self, name).map(ToString::to_string))
    }
}

impl<K, V> ConfigurationAdapter for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: Display,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        Ok(BTreeMap::get(self, name).map(ToString::to_string))
    }
}

/// Key/value pairs with arbitrary displayable keys and values. Keys are
/// compared by their string form; the first matching pair wins.
impl<K, V> ConfigurationAdapter for [(K, V)]
where
    K: Display,
    V: Display,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        Ok(self
            .iter()
            .find(|(key, _)| key.to_string() == name)
            .map(|(_, value)| value.to_string()))
    }
}

impl<K, V> ConfigurationAdapter for Vec<(K, V)>
where
    K: Display,
    V: Display,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        ConfigurationAdapter::get(self.as_slice(), name)
    }
}

impl<K, V, const N: usize> ConfigurationAdapter for [(K, V); N]
where
    K: Display,
    V: Display,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        ConfigurationAdapter::get(self.as_slice(), name)
    }
}

impl<A> ConfigurationAdapter for &A
where
    A: ConfigurationAdapter + ?Sized,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        (**self).get(name)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<A> ConfigurationAdapter for Box<A>
where
    A: ConfigurationAdapter + ?Sized,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        (**self).get(name)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Adapter backed by a closure. Created with [`from_fn`].
pub struct FnAdapter<F> {
    func: F,
    name: &'static str,
}

/// Creates an adapter from a lookup closure.
///
/// ```rust
/// use infuse::ConfigurationAdapter;
///
/// let adapter = infuse::adapter::from_fn(|name| Ok(Some(name.to_uppercase())));
/// assert_eq!(adapter.get("port").unwrap().as_deref(), Some("PORT"));
/// ```
pub fn from_fn<F>(func: F) -> FnAdapter<F>
where
    F: Fn(&str) -> Result<Option<String>, StdError>,
{
    FnAdapter {
        func,
        name: type_name::<FnAdapter<F>>(),
    }
}

impl<F> FnAdapter<F> {
    /// Overrides the name reported in error messages.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

impl<F> ConfigurationAdapter for FnAdapter<F>
where
    F: Fn(&str) -> Result<Option<String>, StdError>,
{
    fn get(&self, name: &str) -> Result<Option<String>, StdError> {
        (self.func)(name)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
