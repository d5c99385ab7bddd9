/// Type alias for boxed errors that can be sent across threads.
///
/// Adapters, bindings and configurable methods report their own failures with
/// this type; the injector wraps them into a [`ConfigurationError`].
pub type StdError = Box<dyn std::error::Error + Send + Sync>;

/// Error returned when a raw configuration string cannot be parsed into the
/// requested type.
#[derive(Debug, thiserror::Error)]
#[error("cannot convert {value:?} to {type_name}")]
pub struct ConversionError {
    value: String,
    type_name: &'static str,
    #[source]
    source: StdError,
}

impl ConversionError {
    /// Creates a conversion error for `value` that failed to parse as `T`.
    pub fn new<T: ?Sized>(value: impl Into<String>, source: impl Into<StdError>) -> Self {
        Self {
            value: value.into(),
            type_name: std::any::type_name::<T>(),
            source: source.into(),
        }
    }

    /// The raw string that failed to convert.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Name of the type the value was converted to.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Errors that can occur while injecting configuration into a target.
///
/// Every variant names the concrete target type and the configuration names
/// involved. Variants that wrap a lower level failure expose it through
/// [`std::error::Error::source`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// The adapter has no value for a required field or for a method
    /// parameter without a default.
    #[error("Failed to find configuration for {physical} (logical name {logical}) of {target} via {adapter}")]
    NotFound {
        logical: String,
        physical: String,
        target: &'static str,
        adapter: &'static str,
    },
    /// The binding failed to remap a logical name.
    #[error("Failed to bind configuration name {logical} of {target} via {binding}")]
    Binding {
        logical: String,
        target: &'static str,
        binding: &'static str,
        #[source]
        source: StdError,
    },
    /// The adapter failed while looking up a name.
    #[error("Failed to retrieve configuration for {physical} of {target} via {adapter}")]
    Retrieval {
        physical: String,
        target: &'static str,
        adapter: &'static str,
        #[source]
        source: StdError,
    },
    /// A raw value or default literal could not be converted to the declared
    /// type of a member.
    #[error("Failed to convert configuration for {name} of {target} to {}", .source.type_name())]
    Conversion {
        name: String,
        target: &'static str,
        #[source]
        source: ConversionError,
    },
    /// A configurable method was invoked and returned an error.
    #[error("Failed to inject method configuration via {method} of {target}")]
    Invocation {
        method: String,
        target: &'static str,
        #[source]
        source: StdError,
    },
}

impl ConfigurationError {
    /// Name of the target type the failing member belongs to.
    pub fn target(&self) -> &'static str {
        match self {
            Self::NotFound { target, .. }
            | Self::Binding { target, .. }
            | Self::Retrieval { target, .. }
            | Self::Conversion { target, .. }
            | Self::Invocation { target, .. } => target,
        }
    }
}

/// Error returned by a method invoker.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    /// An argument could not be converted to the parameter type.
    #[error("cannot convert argument {name}")]
    Conversion {
        name: String,
        #[source]
        source: ConversionError,
    },
    /// The method itself failed.
    #[error("{0}")]
    Failed(StdError),
}

impl InvokeError {
    /// Wraps an error returned by a configurable method.
    pub fn failed(err: impl Into<StdError>) -> Self {
        Self::Failed(err.into())
    }
}
