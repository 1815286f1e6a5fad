//! Core graph types: nodes, relationships and query result records.

use super::property::PropertyMap;
use crate::error::{GraphError, Result};
use serde::{Deserialize, Serialize};

/// Identifier of a node as assigned by the graph store.
pub type NodeId = i64;

/// A labelled node with its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Store-assigned identity
    pub id: NodeId,
    /// Node labels (e.g. `DiscourseUser`, `Exclude`)
    pub labels: Vec<String>,
    /// Node properties
    pub properties: PropertyMap,
}

impl GraphNode {
    /// Create a node.
    pub fn new(id: NodeId, labels: Vec<String>, properties: PropertyMap) -> Self {
        Self {
            id,
            labels,
            properties,
        }
    }

    /// Whether the node carries the given label.
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

/// A directed, typed relationship between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Start node
    pub source_id: NodeId,
    /// End node
    pub target_id: NodeId,
    /// Relationship type (e.g. `POSTED_CONTENT`)
    pub rel_type: String,
}

/// Which relationships to follow from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Follow outgoing relationships
    Outgoing,
    /// Follow incoming relationships
    Incoming,
    /// Follow relationships in either direction
    Both,
}

/// Value of one named column in a query result record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    /// A single node
    Node(GraphNode),
    /// A collected list of nodes
    Nodes(Vec<GraphNode>),
    /// Null (e.g. an unmatched optional pattern)
    Null,
}

/// One row returned by a traversal query: named columns in return order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: append a column.
    pub fn with(mut self, key: impl Into<String>, value: FieldValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Append or replace a column.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Raw access to a column.
    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Column names in return order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Get a node column.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Mapping`] if the column is missing or not a node.
    pub fn node(&self, query: &str, key: &str) -> Result<&GraphNode> {
        match self.get(key) {
            Some(FieldValue::Node(node)) => Ok(node),
            Some(other) => Err(GraphError::mapping(
                query,
                format!("column '{key}' is not a node: {}", kind_of(other)),
            )),
            None => Err(GraphError::mapping(query, format!("missing column '{key}'"))),
        }
    }

    /// Get a node-list column. A null column reads as an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Mapping`] if the column is missing or holds a
    /// non-list value.
    pub fn nodes(&self, query: &str, key: &str) -> Result<&[GraphNode]> {
        match self.get(key) {
            Some(FieldValue::Nodes(nodes)) => Ok(nodes),
            Some(FieldValue::Null) => Ok(&[]),
            Some(other) => Err(GraphError::mapping(
                query,
                format!("column '{key}' is not a node list: {}", kind_of(other)),
            )),
            None => Err(GraphError::mapping(query, format!("missing column '{key}'"))),
        }
    }
}

fn kind_of(value: &FieldValue) -> &'static str {
    match value {
        FieldValue::Node(_) => "node",
        FieldValue::Nodes(_) => "node list",
        FieldValue::Null => "null",
    }
}
