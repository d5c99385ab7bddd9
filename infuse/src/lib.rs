//! # infuse
//!
//! Declarative configuration injection for Rust types. A component declares
//! which configuration it needs by tagging its fields and setter methods; a
//! pluggable adapter decides where the values come from; an optional binding
//! decides how declared names map to the names the adapter understands.
//!
//! ## Core Concepts
//!
//! - **Configurable**: A type that describes its tagged members through a [`Descriptor`]
//! - **Adapter**: A [`ConfigurationAdapter`] returning raw string values by name
//! - **Binding**: A [`ConfigurationBinding`] remapping logical names to physical names
//! - **Injector**: The [`Injector`] that resolves names, looks up and converts values,
//!   assigns fields and invokes methods
//! - **Conversion**: [`FromConfigValue`] parsing raw strings into scalar types
//!
//! ## Field Injection
//!
//! ```rust
//! use std::collections::HashMap;
//! use std::path::PathBuf;
//! use infuse::Configurable;
//!
//! #[derive(Configurable)]
//! struct Worker {
//!     #[configure]
//!     username: String,
//!     #[configure(alias = "worker.threads")]
//!     threads: usize,
//!     #[configure(optional)]
//!     cache_dir: PathBuf,
//! }
//!
//! let config = HashMap::from([("username", "alice"), ("worker.threads", "4")]);
//! let mut worker = Worker {
//!     username: String::new(),
//!     threads: 1,
//!     cache_dir: PathBuf::from("/tmp/cache"),
//! };
//! infuse::inject(&mut worker, &config).unwrap();
//!
//! assert_eq!(worker.username, "alice");
//! assert_eq!(worker.threads, 4);
//! assert_eq!(worker.cache_dir, PathBuf::from("/tmp/cache"));
//! ```
//!
//! ## Method Injection
//!
//! Methods are tagged inside an impl block marked `#[configurable]`; the
//! struct opts in with `#[configure(methods)]`. Parameters may carry their
//! own alias and a default literal used when the adapter has no value.
//!
//! ```rust
//! use std::time::Duration;
//! use infuse::{Configurable, configurable};
//!
//! #[derive(Configurable, Default)]
//! #[configure(methods)]
//! struct Server {
//!     port: u16,
//!     timeout: Duration,
//! }
//!
//! #[configurable]
//! impl Server {
//!     #[configure]
//!     fn set_port(&mut self, #[configure(alias = "server.port")] port: u16) {
//!         self.port = port;
//!     }
//!
//!     #[configure]
//!     fn set_limits(
//!         &mut self,
//!         #[configure(alias = "server.port")] port: u16,
//!         #[configure(alias = "server.timeout", default = "30s")] timeout: Duration,
//!     ) {
//!         self.port = port;
//!         self.timeout = timeout;
//!     }
//! }
//!
//! let mut server = Server::default();
//! infuse::inject(&mut server, &[("server.port", "8080")]).unwrap();
//! assert_eq!(server.port, 8080);
//! assert_eq!(server.timeout, Duration::from_secs(30));
//! ```
//!
//! A struct with a `#[configurable]` impl block must opt in with
//! `#[configure(methods)]`, otherwise its tagged methods would never run:
//!
//! ```compile_fail
//! use infuse::{Configurable, configurable};
//!
//! #[derive(Configurable, Default)]
//! struct Server {
//!     port: u16,
//! }
//!
//! #[configurable]
//! impl Server {
//!     #[configure]
//!     fn set_port(&mut self, port: u16) {
//!         self.port = port;
//!     }
//! }
//! ```
//!
//! Tagged methods of one type live in a single `#[configurable]` impl block:
//!
//! ```compile_fail
//! use infuse::{Configurable, configurable};
//!
//! #[derive(Configurable, Default)]
//! #[configure(methods)]
//! struct Server {
//!     host: String,
//!     port: u16,
//! }
//!
//! #[configurable]
//! impl Server {
//!     #[configure]
//!     fn set_host(&mut self, host: String) {
//!         self.host = host;
//!     }
//! }
//!
//! #[configurable]
//! impl Server {
//!     #[configure]
//!     fn set_port(&mut self, port: u16) {
//!         self.port = port;
//!     }
//! }
//! ```
//!
//! ## Base Types
//!
//! Rust has no inheritance; a configurable struct embeds its base type in a
//! field marked `#[configure(base)]`. The base is injected after the members
//! of the embedding type.
//!
//! ```rust
//! use infuse::{Configurable, PrefixBinding};
//!
//! #[derive(Configurable, Default)]
//! struct Connection {
//!     #[configure]
//!     host: String,
//! }
//!
//! #[derive(Configurable, Default)]
//! struct Database {
//!     #[configure(base)]
//!     connection: Connection,
//!     #[configure]
//!     pool_size: u32,
//! }
//!
//! let config = [("db.host", "localhost"), ("db.pool_size", "8")];
//! let mut database = Database::default();
//! infuse::inject_with_binding(&mut database, &config, &PrefixBinding::new("db.")).unwrap();
//! assert_eq!(database.connection.host, "localhost");
//! assert_eq!(database.pool_size, 8);
//! ```
//!
//! ## Features
//!
//! - `macros` (default): Enables `#[derive(Configurable)]` and `#[configurable]`
//! - `num-bigint`: Conversion into `BigInt` and `BigUint`
//! - `bigdecimal`: Conversion into `BigDecimal`

pub mod adapter;
pub mod binding;
mod convert;
mod descriptor;
mod error;
mod injector;
mod naming;

pub use adapter::ConfigurationAdapter;
pub use binding::{ConfigurationBinding, IdentityBinding, PrefixBinding};
pub use convert::*;
pub use descriptor::*;
pub use error::*;
pub use injector::{Injector, inject, inject_with_binding};
pub use naming::*;

#[cfg(feature = "macros")]
pub use infuse_macros::*;

#[doc(hidden)]
pub mod __private {
    use crate::Descriptor;

    /// Implemented by `#[derive(Configurable)]` for structs marked
    /// `#[configure(methods)]`.
    #[diagnostic::on_unimplemented(
        message = "`{Self}` has a `#[configurable]` impl block but is not marked `#[configure(methods)]`"
    )]
    pub trait DeclaresMethods {}

    /// Implemented by `#[configurable]` impl blocks.
    #[diagnostic::on_unimplemented(
        message = "`{Self}` is marked `#[configure(methods)]` but has no `#[configurable]` impl block"
    )]
    pub trait ConfigurableMethods: DeclaresMethods + Sized + 'static {
        fn methods(descriptor: Descriptor<Self>) -> Descriptor<Self>;
    }
}
