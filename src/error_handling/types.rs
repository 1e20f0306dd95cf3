//! Error type definitions.
//!
//! This module defines the error types returned by the library. Every data-access
//! operation returns one of these explicitly; callers decide what is fatal.

use log::SetLoggerError;
use mongodb::bson;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for configuration validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A MongoDB URI was given without a username and password.
    #[error("please provide credentials (--username/--password or MONGO_USERNAME/MONGO_PASSWORD)")]
    MissingCredentials,
}

/// Error types for document store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// An operation was attempted before `connect()` succeeded.
    #[error("not connected: call connect() first")]
    NotConnected,

    /// The named database was never bound with `connect_database()`.
    #[error("database '{0}' is not connected")]
    DatabaseNotConnected(String),

    /// The client could not be created or the server could not be reached.
    #[error("connecting to {uri} - {message}")]
    Connect {
        /// Connection string (credentials are never embedded in it by this crate)
        uri: String,
        /// Driver message
        message: String,
    },

    /// A liveness check failed.
    #[error("pinging '{database}' - {message}")]
    Ping {
        /// Database the ping was sent through
        database: String,
        /// Driver message
        message: String,
    },

    /// An insert was rejected.
    #[error("inserting into '{namespace}' - {message}")]
    Insert {
        /// `<database>.<collection>`
        namespace: String,
        /// Driver message
        message: String,
    },

    /// A find or cursor drain failed.
    #[error("retrieving all from '{namespace}' - {message}")]
    Query {
        /// `<database>.<collection>`
        namespace: String,
        /// Driver message
        message: String,
    },

    /// An update was rejected.
    #[error("updating '{namespace}' - {message}")]
    Update {
        /// `<database>.<collection>`
        namespace: String,
        /// Driver message
        message: String,
    },

    /// An update document used an operator the in-process store does not implement.
    #[error("unsupported update operator: {0}")]
    UnsupportedUpdate(String),

    /// A record could not be converted into a BSON document.
    #[error("encoding record: {0}")]
    Encode(#[from] bson::ser::Error),

    /// A stored document does not match the record schema.
    #[error("decoding document: {0}")]
    Decode(#[from] bson::de::Error),
}

impl StoreError {
    /// Builds the `<database>.<collection>` label used in error messages.
    pub(crate) fn namespace(database: &str, collection: &str) -> String {
        format!("{database}.{collection}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_messages_name_the_namespace() {
        let err = StoreError::Query {
            namespace: StoreError::namespace("bullet_trains", "chicago_to_florida"),
            message: "cursor killed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "retrieving all from 'bullet_trains.chicago_to_florida' - cursor killed"
        );
    }

    #[test]
    fn test_database_not_connected_message() {
        let err = StoreError::DatabaseNotConnected("network".to_string());
        assert_eq!(err.to_string(), "database 'network' is not connected");
    }

    #[test]
    fn test_missing_credentials_message() {
        assert!(ConfigError::MissingCredentials
            .to_string()
            .starts_with("please provide credentials"));
    }
}
