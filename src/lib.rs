//! Unibuild - build-target dispatcher for engine batch builds
//!
//! This library provides functionality to:
//! - Resolve symbolic platform tokens against a fixed registry
//! - Derive deterministic output paths and executable names
//! - Dispatch the clean/build/report lifecycle to an external build executor

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod executor;
pub mod registry;
