//! Compile-time descriptions of configurable types.
//!
//! A [`Descriptor`] lists the tagged fields and methods a type declares
//! itself, plus an accessor to its embedded base type. The injector walks
//! descriptors instead of inspecting types at runtime. Descriptors are usually
//! generated by `#[derive(Configurable)]`, but can be written by hand:
//!
//! ```rust
//! use infuse::{Configurable, Descriptor, FieldSpec, MethodSpec, ParamSpec};
//!
//! #[derive(Default)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! impl Server {
//!     fn set_port(&mut self, port: u16) {
//!         self.port = port;
//!     }
//! }
//!
//! impl Configurable for Server {
//!     fn descriptor() -> Descriptor<Self> {
//!         Descriptor::<Self>::new()
//!             .field::<String>(FieldSpec::new("host").optional(), |target, value| {
//!                 target.host = value
//!             })
//!             .method(
//!                 MethodSpec::new("set_port").param(ParamSpec::of::<u16>().alias("server.port")),
//!                 |target, args| {
//!                     target.set_port(args.take()?);
//!                     Ok(())
//!                 },
//!             )
//!     }
//! }
//!
//! let mut server = Server::default();
//! infuse::inject(&mut server, &[("server.port", "8080")]).unwrap();
//! assert_eq!(server.port, 8080);
//! ```

use std::any::type_name;
use std::fmt;

use crate::injector::Session;
use crate::{ConfigurationError, ConversionError, FromConfigValue, InvokeError, Injector};

/// Trait for types whose members can be populated from configuration.
pub trait Configurable: Sized + 'static {
    /// Describes the configurable members this type declares.
    fn descriptor() -> Descriptor<Self>;
}

/// Declaration of a configurable field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    ident: &'static str,
    alias: Option<&'static str>,
    optional: bool,
    type_name: &'static str,
}

impl FieldSpec {
    /// Declares a required field named `ident`.
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            alias: None,
            optional: false,
            type_name: "",
        }
    }

    /// Sets the explicit configuration name of the field.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Marks the field as optional: a missing value leaves it untouched.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Name of the declared field type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Declaration of a configurable method parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParamSpec {
    ident: Option<&'static str>,
    alias: Option<&'static str>,
    default: Option<&'static str>,
    type_name: &'static str,
}

impl ParamSpec {
    /// Declares a parameter of type `V`.
    pub fn of<V>() -> Self
    where
        V: FromConfigValue,
    {
        Self {
            ident: None,
            alias: None,
            default: None,
            type_name: type_name::<V>(),
        }
    }

    /// Sets the identifier the parameter is declared with.
    pub fn ident(mut self, ident: &'static str) -> Self {
        self.ident = Some(ident);
        self
    }

    /// Sets the explicit configuration name of the parameter.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Sets the literal used when the adapter has no value.
    pub fn default(mut self, literal: &'static str) -> Self {
        self.default = Some(literal);
        self
    }

    pub fn ident_name(&self) -> Option<&'static str> {
        self.ident
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn default_literal(&self) -> Option<&'static str> {
        self.default
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// Declaration of a configurable method and its parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    ident: &'static str,
    alias: Option<&'static str>,
    params: Vec<ParamSpec>,
}

impl MethodSpec {
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            alias: None,
            params: Vec::new(),
        }
    }

    /// Sets the explicit configuration name of the method.
    pub fn alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Appends the next parameter in declaration order.
    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn alias_name(&self) -> Option<&'static str> {
        self.alias
    }

    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }
}

/// Resolved raw arguments of a method, consumed in declaration order by the
/// method invoker.
///
/// An invoker must take every declared argument. Arguments left over after it
/// returns are reported as an invocation failure.
pub struct Arguments {
    values: std::vec::IntoIter<Argument>,
}

pub(crate) struct Argument {
    pub(crate) name: String,
    pub(crate) raw: String,
}

impl Arguments {
    pub(crate) fn new(values: Vec<Argument>) -> Self {
        Self {
            values: values.into_iter(),
        }
    }

    /// Converts the next argument into `V`.
    pub fn take<V>(&mut self) -> Result<V, InvokeError>
    where
        V: FromConfigValue,
    {
        let Argument { name, raw } = self
            .values
            .next()
            .ok_or_else(|| InvokeError::failed("method takes more arguments than declared"))?;
        V::from_config_value(&raw).map_err(|source| InvokeError::Conversion { name, source })
    }

    /// Number of arguments not taken yet.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// Function invoking a configurable method with resolved arguments.
pub type Invoker<T> = fn(&mut T, &mut Arguments) -> Result<(), InvokeError>;

type Assign<T> = Box<dyn Fn(&mut T, &str) -> Result<(), ConversionError>>;

type Base<T> = Box<dyn Fn(&Injector, &mut T, &Session<'_>) -> Result<(), ConfigurationError>>;

pub(crate) struct Field<T> {
    pub(crate) spec: FieldSpec,
    pub(crate) assign: Assign<T>,
}

pub(crate) struct Method<T> {
    pub(crate) spec: MethodSpec,
    pub(crate) invoke: Invoker<T>,
}

/// Description of the configurable members declared by `T`.
pub struct Descriptor<T> {
    type_name: &'static str,
    pub(crate) fields: Vec<Field<T>>,
    pub(crate) methods: Vec<Method<T>>,
    base: Option<(&'static str, Base<T>)>,
}

impl<T> Default for Descriptor<T>
where
    T: 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Descriptor<T>
where
    T: 'static,
{
    pub fn new() -> Self {
        Self {
            type_name: type_name::<T>(),
            fields: Vec::new(),
            methods: Vec::new(),
            base: None,
        }
    }

    /// Adds a field of type `V` written through `assign`.
    pub fn field<V>(mut self, spec: FieldSpec, assign: fn(&mut T, V)) -> Self
    where
        V: FromConfigValue + 'static,
    {
        let spec = FieldSpec {
            type_name: type_name::<V>(),
            ..spec
        };
        self.fields.push(Field {
            spec,
            assign: Box::new(move |target, raw| {
                assign(target, V::from_config_value(raw)?);
                Ok(())
            }),
        });
        self
    }

    /// Adds a method called through `invoke` once all arguments are resolved.
    pub fn method(mut self, spec: MethodSpec, invoke: Invoker<T>) -> Self {
        self.methods.push(Method { spec, invoke });
        self
    }

    /// Sets the embedded base type, processed after the members of `T`.
    pub fn base<B>(mut self, access: fn(&mut T) -> &mut B) -> Self
    where
        B: Configurable,
    {
        let inject: Base<T> = Box::new(move |injector, target, session| {
            injector.inject_descriptor(access(target), B::descriptor(), session)
        });
        self.base = Some((type_name::<B>(), inject));
        self
    }

    /// Name of the described type.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().map(|field| &field.spec)
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodSpec> {
        self.methods.iter().map(|method| &method.spec)
    }

    /// Name of the base type, if any.
    pub fn base_type_name(&self) -> Option<&'static str> {
        self.base.as_ref().map(|(name, _)| *name)
    }

    pub(crate) fn inject_base(
        &self,
        injector: &Injector,
        target: &mut T,
        session: &Session<'_>,
    ) -> Result<(), ConfigurationError> {
        match &self.base {
            Some((_, inject)) => inject(injector, target, session),
            None => Ok(()),
        }
    }
}

impl<T> fmt::Debug for Descriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("type_name", &self.type_name)
            .field(
                "fields",
                &self.fields.iter().map(|v| &v.spec).collect::<Vec<_>>(),
            )
            .field(
                "methods",
                &self.methods.iter().map(|v| &v.spec).collect::<Vec<_>>(),
            )
            .field("base", &self.base.as_ref().map(|(name, _)| name))
            .finish()
    }
}
