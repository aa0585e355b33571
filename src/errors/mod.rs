//! Error types, one enum per subsystem.
//!
//! "Header not found" is not an error: the resolver reports it as an empty
//! result. Only failures that make a search incomplete surface here.

mod config_error;
mod resolve_error;

pub use config_error::ConfigError;
pub use resolve_error::ResolveError;
