//! Graph store abstractions and the data-store gateway.
//!
//! This module defines the [`GraphStore`] and [`Session`] traits and provides
//! implementations:
//! - [`Neo4jStore`]: production store backed by a Neo4j server (feature `neo4j-backend`)
//! - [`MemoryGraph`]: in-process graph for tests and demos
//!
//! The [`Gateway`] is what resolvers talk to. It opens one session per call,
//! runs one named query and releases the session on every exit path.

mod memory;
#[cfg(feature = "neo4j-backend")]
mod neo4j_backend;
pub mod queries;

pub use memory::MemoryGraph;
#[cfg(feature = "neo4j-backend")]
pub use neo4j_backend::Neo4jStore;
pub use queries::{Column, QueryName, QueryParams, QueryTemplate, DEFAULT_FIRST};

use crate::error::Result;
use crate::graph::Record;
use async_trait::async_trait;
use log::{debug, trace};
use std::sync::Arc;

/// A graph store that hands out short-lived query sessions.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Open a new session.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Connection`](crate::GraphError::Connection) if the
    /// store cannot be reached.
    async fn open_session(&self) -> Result<Box<dyn Session>>;
}

/// One query session against a graph store.
#[async_trait]
pub trait Session: Send {
    /// Execute a template with bound parameters and collect every record.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::QueryExecution`](crate::GraphError::QueryExecution)
    /// if the store fails the query, or
    /// [`GraphError::Mapping`](crate::GraphError::Mapping) if a returned row
    /// does not have the template's columns.
    async fn run(&mut self, template: &QueryTemplate, params: &QueryParams) -> Result<Vec<Record>>;

    /// Release the session. Called exactly once, by the gateway's guard.
    fn close(&mut self);
}

/// Releases the wrapped session when dropped.
struct ScopedSession {
    inner: Box<dyn Session>,
}

impl Drop for ScopedSession {
    fn drop(&mut self) {
        self.inner.close();
    }
}

/// Typed query-by-name access to a [`GraphStore`].
#[derive(Clone)]
pub struct Gateway {
    store: Arc<dyn GraphStore>,
}

impl Gateway {
    /// Create a gateway over the given store.
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Run one named query in its own session.
    ///
    /// The session is closed whether the query succeeds, fails, or the
    /// returned future is dropped mid-flight.
    ///
    /// # Errors
    ///
    /// Propagates connection and query failures from the store.
    pub async fn fetch(&self, name: QueryName, params: QueryParams) -> Result<Vec<Record>> {
        let template = name.template();
        let mut session = ScopedSession {
            inner: self.store.open_session().await?,
        };
        debug!("Running {name} v{} with first={}", template.version, params.first);
        let records = session.inner.run(template, &params).await?;
        trace!("{name} returned {} records", records.len());
        Ok(records)
    }
}
