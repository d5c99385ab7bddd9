//! # infuse-base
//!
//! Configuration sources and logging setup for applications built on
//! [`infuse`].
//!
//! ## Core Components
//!
//! - **Configuration Store**: [`Config`], a JSON-backed store usable directly as a
//!   configuration adapter, with typed sections, merging and file loading
//! - **Environment**: [`Environment`], an adapter over process environment variables
//! - **Tracing Integration**: [`init_tracing`] installing a subscriber from the
//!   `tracing` section of a [`Config`]
//!
//! ## Example
//!
//! ```rust
//! use infuse::Configurable;
//! use infuse_base::Config;
//!
//! #[derive(Configurable, Default)]
//! struct Database {
//!     #[configure(alias = "database.host")]
//!     host: String,
//!     #[configure(alias = "database.port")]
//!     port: u16,
//!     #[configure(alias = "database.ssl", optional)]
//!     ssl: bool,
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = Config::parse(r#"{"database": {"host": "localhost", "port": 5432}}"#)?;
//!
//! let mut database = Database::default();
//! infuse::inject(&mut database, &config)?;
//! assert_eq!(database.host, "localhost");
//! assert_eq!(database.port, 5432);
//! assert!(!database.ssl);
//! # Ok(())
//! # }
//! ```

mod config;
mod environment;
mod tracing;

pub use config::*;
pub use environment::*;
pub use tracing::*;
