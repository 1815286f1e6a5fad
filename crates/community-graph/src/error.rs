//! Error types for community graph operations.
//!
//! Every failure the resolver layer can observe falls into one of these
//! variants. The resolvers never surface them to API callers; they are logged
//! and replaced by the last cached payload.

use thiserror::Error;

/// Result type alias for community graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error type for store access, query execution and record mapping.
#[derive(Error, Debug)]
pub enum GraphError {
    /// The graph store could not be reached or a session could not be opened
    #[error("Connection error: {message}")]
    Connection {
        /// Detailed error message
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The store rejected or failed to execute a query
    #[error("Query '{query}' failed: {message}")]
    QueryExecution {
        /// Name of the query that failed
        query: String,
        /// Error details
        message: String,
        /// Optional source error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A returned record did not have the shape the mapper expects
    #[error("Mapping error in '{query}': {message}")]
    Mapping {
        /// Name of the query whose records could not be mapped
        query: String,
        /// What was missing or malformed
        message: String,
    },

    /// Node not found in an in-process graph
    #[error("Node not found: {node_id}")]
    NodeNotFound {
        /// ID of the missing node
        node_id: String,
    },

    /// Invalid process configuration
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of what went wrong
        message: String,
    },
}

impl GraphError {
    /// Create a connection error from a message and optional source.
    pub fn connection<E>(message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a query execution error from a message and optional source.
    pub fn query<E>(query: impl Into<String>, message: impl Into<String>, source: Option<E>) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::QueryExecution {
            query: query.into(),
            message: message.into(),
            source: source.map(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>),
        }
    }

    /// Create a mapping error.
    pub fn mapping(query: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Mapping {
            query: query.into(),
            message: message.into(),
        }
    }
}
