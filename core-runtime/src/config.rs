//! # Core Configuration Module
//!
//! Provides configuration management for the catalog workspace.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a `CoreConfig`
//! instance that is passed explicitly into the service layer. There is no
//! process-wide default storage location: every catalog is opened against the
//! database named in its configuration.
//!
//! ## Usage
//!
//! ```no_run
//! use core_runtime::config::CoreConfig;
//!
//! let config = CoreConfig::builder()
//!     .database_path("/path/to/library.db")
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! The builder validates its inputs and fails fast:
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No database location given
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing database location");
//! ```

use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Default upper bound on pooled SQLite connections.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Where the catalog database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    /// SQLite database file on disk (created if missing)
    File(PathBuf),
    /// Private in-memory database, discarded when the pool closes
    InMemory,
}

impl DatabaseLocation {
    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            DatabaseLocation::File(path) => Some(path.as_path()),
            DatabaseLocation::InMemory => None,
        }
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::InMemory => write!(f, ":memory:"),
        }
    }
}

/// Core configuration for the catalog workspace.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// Location of the SQLite database
    pub database: DatabaseLocation,

    /// Maximum number of pooled connections
    pub max_connections: u32,
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates the configuration and returns an error if invalid.
    ///
    /// This checks:
    /// - A file-backed database has a non-empty path
    /// - At least one connection is allowed
    pub fn validate(&self) -> Result<()> {
        if let DatabaseLocation::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(Error::Config("Database path cannot be empty".to_string()));
            }
        }

        if self.max_connections == 0 {
            return Err(Error::Config(
                "max_connections must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Builder for [`CoreConfig`].
#[derive(Debug, Default)]
pub struct CoreConfigBuilder {
    database: Option<DatabaseLocation>,
    max_connections: Option<u32>,
}

impl CoreConfigBuilder {
    /// Sets the path to the SQLite database file.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use core_runtime::config::CoreConfig;
    ///
    /// let builder = CoreConfig::builder().database_path("library.db");
    /// ```
    pub fn database_path(mut self, path: impl AsRef<Path>) -> Self {
        self.database = Some(DatabaseLocation::File(path.as_ref().to_path_buf()));
        self
    }

    /// Uses a private in-memory database instead of a file.
    pub fn in_memory(mut self) -> Self {
        self.database = Some(DatabaseLocation::InMemory);
        self
    }

    /// Sets the maximum number of pooled connections.
    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when no database location was set or the
    /// resulting configuration fails [`CoreConfig::validate`].
    pub fn build(self) -> Result<CoreConfig> {
        let database = self.database.ok_or_else(|| {
            Error::Config(
                "Database location is required. Use .database_path() or .in_memory() to set it."
                    .to_string(),
            )
        })?;

        let config = CoreConfig {
            database,
            max_connections: self.max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS),
        };

        config.validate()?;

        Ok(config)
    }
}
