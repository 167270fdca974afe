//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the catalog workspace:
//! - Logging and tracing infrastructure
//! - Configuration management
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that other modules depend on.
//! It establishes the logging conventions and the explicit configuration
//! value that replaces any process-wide default storage location.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, DatabaseLocation};
pub use error::{Error, Result};
