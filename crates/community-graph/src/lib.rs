//! # community-graph
//!
//! Read-only GraphQL resolvers over the Neo4j community graph.
//!
//! ## Core Principles
//!
//! - **Available over fresh**: a failing query answers with the last good payload
//! - **Queries by name**: resolvers never see Cypher text
//! - **Scoped sessions**: one store session per call, always released
//!
//! ## Architecture
//!
//! ```text
//! GraphQL schema (QueryRoot)
//!     ↓
//! Resolvers ──→ ResultCache (stale-on-error)
//!     ↓
//! Mappers (records → API entities)
//!     ↓
//! Gateway (scoped session, named queries)
//!     ↓
//! Graph store (Neo4j, in-memory)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use community_graph::{MemoryGraph, PropertyMap, ResultCache, Resolvers};
//! use std::sync::Arc;
//!
//! # async fn example() -> community_graph::Result<()> {
//! let graph = MemoryGraph::new();
//! let member = graph.add_node(&["DiscourseUser", "User"], PropertyMap::new().with("name", "Ada"));
//! let repo = graph.add_node(
//!     &["GitHub"],
//!     PropertyMap::new()
//!         .with("title", "graph-tools")
//!         .with("updated_at", 1_551_398_400i64)
//!         .with("favorites", 3i64),
//! );
//! graph.add_relationship(member, "CREATED", repo)?;
//!
//! let resolvers = Resolvers::new(Arc::new(graph), Arc::new(ResultCache::new()));
//! let projects = resolvers.top_community_open_source_projects(10).await;
//! assert_eq!(projects.map(|p| p.len()), Some(1));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod error;
pub mod graph;
pub mod mappers;
pub mod model;
pub mod resolvers;
pub mod schema;
pub mod store;

// Re-export main types
pub use cache::{CachedResult, ResultCache};
pub use error::{GraphError, Result};
pub use graph::{Direction, FieldValue, GraphNode, NodeId, PropertyMap, PropertyValue, Record};
pub use model::{
    CertifiedDeveloper, CommunityBlog, CommunityMember, CommunityOpenSourceProject,
    DiscourseUser, Twin4jContent, Twin4jItem,
};
pub use resolvers::{Resolution, Resolvers};
pub use schema::{build_schema, CommunitySchema, QueryRoot};
#[cfg(feature = "neo4j-backend")]
pub use store::Neo4jStore;
pub use store::{Gateway, GraphStore, MemoryGraph, QueryName, QueryParams, Session};
