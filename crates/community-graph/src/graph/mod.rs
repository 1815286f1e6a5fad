//! Graph data model shared by the store backends and the mappers.
//!
//! This module defines the fundamental building blocks:
//! - [`GraphNode`]: labelled nodes with a [`PropertyMap`]
//! - [`Relationship`]: typed, directed links between nodes
//! - [`Record`]: one row of a traversal query result

mod property;
mod types;

pub use property::{PropertyMap, PropertyValue};
pub use types::{Direction, FieldValue, GraphNode, NodeId, Record, Relationship};
