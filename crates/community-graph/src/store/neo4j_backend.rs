//! Neo4j graph store for production use.
//!
//! Sessions share the client's connection pool; a session is a logical
//! scope around one query, released as soon as its records are collected.

use super::queries::{Column, QueryTemplate};
use super::{GraphStore, QueryParams, Session};
use crate::error::{GraphError, Result};
use crate::graph::{FieldValue, GraphNode, PropertyMap, PropertyValue, Record};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use log::{debug, info};
use neo4rs::{query, BoltType, Graph, Row};
use std::sync::Arc;
use uuid::Uuid;

/// Neo4j-backed graph store.
#[derive(Clone)]
pub struct Neo4jStore {
    graph: Arc<Graph>,
}

impl Neo4jStore {
    /// Connect to a Neo4j server.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Connection`] if the server cannot be reached or
    /// rejects the credentials.
    pub async fn connect(uri: &str, user: &str, password: &str) -> Result<Self> {
        if uri.trim().is_empty() {
            return Err(GraphError::Configuration {
                message: "Neo4j URI must not be empty".to_string(),
            });
        }

        info!("Connecting to Neo4j at {uri}");
        let graph = Graph::new(uri, user, password)
            .await
            .map_err(|e| GraphError::connection(format!("Failed to connect to Neo4j at {uri}"), Some(e)))?;

        Ok(Self::from_graph(Arc::new(graph)))
    }

    /// Wrap an already connected client.
    pub fn from_graph(graph: Arc<Graph>) -> Self {
        Self { graph }
    }
}

#[async_trait]
impl GraphStore for Neo4jStore {
    async fn open_session(&self) -> Result<Box<dyn Session>> {
        let id = Uuid::new_v4();
        debug!("Opened Neo4j session {id}");
        Ok(Box::new(Neo4jSession {
            graph: Some(Arc::clone(&self.graph)),
            id,
        }))
    }
}

struct Neo4jSession {
    graph: Option<Arc<Graph>>,
    id: Uuid,
}

#[async_trait]
impl Session for Neo4jSession {
    async fn run(&mut self, template: &QueryTemplate, params: &QueryParams) -> Result<Vec<Record>> {
        let name = template.name.as_str();
        let graph = self.graph.as_ref().ok_or_else(|| {
            GraphError::connection(format!("session {} already closed", self.id), None::<std::io::Error>)
        })?;

        let mut q = query(template.text);
        if template.takes_limit {
            q = q.param("first", params.first);
        }

        let mut stream = graph
            .execute(q)
            .await
            .map_err(|e| GraphError::query(name, "execution failed", Some(e)))?;

        let mut records = Vec::new();
        while let Some(row) = stream
            .next()
            .await
            .map_err(|e| GraphError::query(name, "reading result stream failed", Some(e)))?
        {
            records.push(row_to_record(template, &row)?);
        }
        Ok(records)
    }

    fn close(&mut self) {
        if self.graph.take().is_some() {
            debug!("Closed Neo4j session {}", self.id);
        }
    }
}

fn row_to_record(template: &QueryTemplate, row: &Row) -> Result<Record> {
    let name = template.name.as_str();
    let mut record = Record::new();

    for column in template.columns {
        let value = match column {
            Column::Node(key) => {
                let node: neo4rs::Node = row
                    .get(key)
                    .map_err(|e| GraphError::mapping(name, format!("column '{key}': {e}")))?;
                FieldValue::Node(convert_node(&node))
            }
            Column::NodeList(key) => {
                let nodes: Vec<neo4rs::Node> = row
                    .get(key)
                    .map_err(|e| GraphError::mapping(name, format!("column '{key}': {e}")))?;
                FieldValue::Nodes(nodes.iter().map(convert_node).collect())
            }
        };
        record.insert(column.name(), value);
    }

    Ok(record)
}

fn convert_node(node: &neo4rs::Node) -> GraphNode {
    let labels = node.labels().into_iter().map(str::to_string).collect();
    let properties: PropertyMap = node
        .keys()
        .into_iter()
        .map(|key| (key.to_string(), convert_property(node, key)))
        .collect();
    GraphNode::new(node.id(), labels, properties)
}

/// Convert one node property by its Bolt kind.
///
/// The kind is checked before any coercion: neo4rs will also decode a Bolt
/// datetime as an `i64` of nanoseconds and a Bolt date as a `String`.
fn convert_property(node: &neo4rs::Node, key: &str) -> PropertyValue {
    let converted = match node.get::<BoltType>(key) {
        Ok(BoltType::DateTime(_)) | Ok(BoltType::DateTimeZoneId(_)) => node
            .get::<DateTime<FixedOffset>>(key)
            .map(|dt| PropertyValue::DateTime(dt.with_timezone(&Utc))),
        Ok(BoltType::LocalDateTime(_)) => node
            .get::<NaiveDateTime>(key)
            .map(|dt| PropertyValue::DateTime(dt.and_utc())),
        Ok(BoltType::Date(_)) => node.get::<NaiveDate>(key).map(PropertyValue::Date),
        Ok(value) => Ok(convert_scalar(&value)),
        Err(e) => Err(e),
    };
    converted.unwrap_or_else(|e| {
        debug!("Property '{key}' of node {} read as null: {e}", node.id());
        PropertyValue::Null
    })
}

fn convert_scalar(value: &BoltType) -> PropertyValue {
    match value {
        BoltType::Boolean(b) => PropertyValue::Bool(b.value),
        BoltType::Integer(i) => PropertyValue::Int(i.value),
        BoltType::Float(f) => PropertyValue::Float(f.value),
        BoltType::String(s) => PropertyValue::String(s.value.clone()),
        BoltType::List(list) => convert_list(&list.value),
        _ => PropertyValue::Null,
    }
}

fn convert_list(items: &[BoltType]) -> PropertyValue {
    let strings: Option<Vec<String>> = items
        .iter()
        .map(|item| match item {
            BoltType::String(s) => Some(s.value.clone()),
            _ => None,
        })
        .collect();
    if let Some(strings) = strings {
        return PropertyValue::StringList(strings);
    }

    let ints: Option<Vec<i64>> = items
        .iter()
        .map(|item| match item {
            BoltType::Integer(i) => Some(i.value),
            _ => None,
        })
        .collect();
    ints.map_or(PropertyValue::Null, PropertyValue::IntList)
}
