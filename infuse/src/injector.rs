use crate::descriptor::{Argument, Field, Method};
use crate::{
    Arguments, Configurable, ConfigurationAdapter, ConfigurationBinding, ConfigurationError,
    Descriptor, IdentityBinding, InvokeError, NameResolver,
};

/// Engine that populates [`Configurable`] targets from a configuration
/// adapter.
///
/// The injector walks the target's descriptor chain from the most derived
/// type to its root base. For every type it first assigns the tagged fields,
/// then invokes the tagged methods, each in declaration order. The first
/// failure aborts the whole call; members handled before it keep their new
/// values.
///
/// An injector holds no per-call state and can be shared freely.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashMap;
/// use infuse::{Configurable, Injector};
///
/// #[derive(Configurable, Default)]
/// struct Credentials {
///     #[configure]
///     username: String,
///     #[configure(optional)]
///     password: Option<String>,
/// }
///
/// let config = HashMap::from([("username", "alice")]);
/// let mut credentials = Credentials::default();
/// Injector::new().inject(&mut credentials, &config).unwrap();
/// assert_eq!(credentials.username, "alice");
/// assert_eq!(credentials.password, None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Injector {
    resolver: NameResolver,
}

pub(crate) struct Session<'a> {
    adapter: &'a dyn ConfigurationAdapter,
    binding: &'a dyn ConfigurationBinding,
    target: &'static str,
}

impl Injector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an injector deriving names with `resolver`.
    pub fn with_resolver(resolver: NameResolver) -> Self {
        Self { resolver }
    }

    pub fn resolver(&self) -> &NameResolver {
        &self.resolver
    }

    /// Injects values from `adapter` into `target`, querying the adapter with
    /// logical names directly.
    pub fn inject<T>(
        &self,
        target: &mut T,
        adapter: &dyn ConfigurationAdapter,
    ) -> Result<(), ConfigurationError>
    where
        T: Configurable,
    {
        self.inject_with_binding(target, adapter, &IdentityBinding)
    }

    /// Injects values from `adapter` into `target`, remapping every logical
    /// name through `binding` before the lookup.
    pub fn inject_with_binding<T>(
        &self,
        target: &mut T,
        adapter: &dyn ConfigurationAdapter,
        binding: &dyn ConfigurationBinding,
    ) -> Result<(), ConfigurationError>
    where
        T: Configurable,
    {
        let session = Session {
            adapter,
            binding,
            target: std::any::type_name::<T>(),
        };
        tracing::debug!(
            target_type = session.target,
            adapter = adapter.name(),
            binding = binding.name(),
            "Injecting configuration"
        );
        self.inject_descriptor(target, T::descriptor(), &session)
    }

    pub(crate) fn inject_descriptor<T>(
        &self,
        target: &mut T,
        descriptor: Descriptor<T>,
        session: &Session<'_>,
    ) -> Result<(), ConfigurationError>
    where
        T: 'static,
    {
        tracing::trace!(
            target_type = session.target,
            declaring_type = descriptor.type_name(),
            "Injecting declared members"
        );
        for field in &descriptor.fields {
            self.inject_field(target, field, session)?;
        }
        for method in &descriptor.methods {
            self.inject_method(target, method, session)?;
        }
        descriptor.inject_base(self, target, session)
    }

    fn inject_field<T>(
        &self,
        target: &mut T,
        field: &Field<T>,
        session: &Session<'_>,
    ) -> Result<(), ConfigurationError> {
        let logical = self
            .resolver
            .field_name(field.spec.ident(), field.spec.alias_name());
        let physical = session.remap(&logical)?;
        let Some(raw) = session.retrieve(&physical)? else {
            if field.spec.is_optional() {
                tracing::debug!(
                    target_type = session.target,
                    field = field.spec.ident(),
                    name = %physical,
                    "Configuration not found, keeping optional field"
                );
                return Ok(());
            }
            return Err(session.not_found(logical, physical));
        };
        (field.assign)(target, &raw).map_err(|source| ConfigurationError::Conversion {
            name: physical.clone(),
            target: session.target,
            source,
        })?;
        tracing::debug!(
            target_type = session.target,
            field = field.spec.ident(),
            name = %physical,
            "Injected field configuration"
        );
        Ok(())
    }

    fn inject_method<T>(
        &self,
        target: &mut T,
        method: &Method<T>,
        session: &Session<'_>,
    ) -> Result<(), ConfigurationError> {
        let method_name = self
            .resolver
            .method_name(method.spec.ident(), method.spec.alias_name());
        let params = method.spec.params();
        let sole = params.len() == 1;
        let mut values = Vec::with_capacity(params.len());
        for param in params {
            let logical = self.resolver.param_name(
                &method_name,
                param.ident_name(),
                param.alias_name(),
                sole,
            );
            let physical = session.remap(&logical)?;
            let raw = match (session.retrieve(&physical)?, param.default_literal()) {
                (Some(raw), _) => raw,
                (None, Some(literal)) => {
                    tracing::debug!(
                        target_type = session.target,
                        method = method.spec.ident(),
                        name = %physical,
                        "Configuration not found, using parameter default"
                    );
                    literal.to_owned()
                }
                (None, None) => return Err(session.not_found(logical, physical)),
            };
            values.push(Argument {
                name: physical,
                raw,
            });
        }
        let mut args = Arguments::new(values);
        (method.invoke)(target, &mut args)
            .and_then(|()| match args.remaining() {
                0 => Ok(()),
                remaining => Err(InvokeError::failed(format!(
                    "invoker left {remaining} of {} declared arguments untaken",
                    params.len()
                ))),
            })
            .map_err(|err| match err {
                InvokeError::Conversion { name, source } => ConfigurationError::Conversion {
                    name,
                    target: session.target,
                    source,
                },
                InvokeError::Failed(source) => ConfigurationError::Invocation {
                    method: method_name.clone(),
                    target: session.target,
                    source,
                },
            })?;
        tracing::debug!(
            target_type = session.target,
            method = method.spec.ident(),
            name = %method_name,
            "Injected method configuration"
        );
        Ok(())
    }
}

impl Session<'_> {
    fn remap(&self, logical: &str) -> Result<String, ConfigurationError> {
        self.binding
            .remap(logical)
            .map_err(|source| ConfigurationError::Binding {
                logical: logical.to_owned(),
                target: self.target,
                binding: self.binding.name(),
                source,
            })
    }

    fn retrieve(&self, physical: &str) -> Result<Option<String>, ConfigurationError> {
        tracing::trace!(target_type = self.target, name = %physical, "Looking up configuration");
        self.adapter
            .get(physical)
            .map_err(|source| ConfigurationError::Retrieval {
                physical: physical.to_owned(),
                target: self.target,
                adapter: self.adapter.name(),
                source,
            })
    }

    fn not_found(&self, logical: String, physical: String) -> ConfigurationError {
        ConfigurationError::NotFound {
            logical,
            physical,
            target: self.target,
            adapter: self.adapter.name(),
        }
    }
}

/// Injects values from `adapter` into `target` with a default [`Injector`].
pub fn inject<T>(target: &mut T, adapter: &dyn ConfigurationAdapter) -> Result<(), ConfigurationError>
where
    T: Configurable,
{
    Injector::default().inject(target, adapter)
}

/// Injects values from `adapter` into `target` through `binding` with a
/// default [`Injector`].
pub fn inject_with_binding<T>(
    target: &mut T,
    adapter: &dyn ConfigurationAdapter,
    binding: &dyn ConfigurationBinding,
) -> Result<(), ConfigurationError>
where
    T: Configurable,
{
    Injector::default().inject_with_binding(target, adapter, binding)
}
