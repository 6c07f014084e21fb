//! Configuration module for the unibuild dispatcher
//!
//! Provides types and parsing for `unibuild.toml` project configuration.

pub mod loader;
pub mod schema;

pub use loader::*;
pub use schema::*;
