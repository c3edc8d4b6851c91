//! Configuration management for Tidemark.
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files and environment variables.
//!
//! # Configuration Sources
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. TOML file (`tidemark.toml`)
//! 2. Environment variable substitution (`${VAR}` in the TOML)
//! 3. Environment variable overrides (`TIDEMARK_*` prefix)
//!
//! # Example
//!
//! ```no_run
//! use tidemark::config::load_config;
//!
//! let config = load_config("tidemark.toml").expect("failed to load config");
//! println!("Bucket: {}", config.storage.bucket);
//! ```
//!
//! # Secrets
//!
//! Sensitive values (the source connection URL, storage credentials) are
//! wrapped in [`SecretString`] so they are zeroed on drop and redacted in
//! Debug output. Call `expose_secret()` only at the point of use.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, DatasetConfig, Environment, ExtractConfig, LoggingConfig, SourceConfig,
    StorageConfig, TidemarkConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};
