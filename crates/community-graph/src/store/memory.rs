//! In-process graph store.
//!
//! **Note**: intended for tests, demos and benchmarks. Nothing is persisted.
//!
//! [`MemoryGraph`] keeps labelled nodes and typed relationships with adjacency
//! indexes, and answers the four named queries by evaluating their ranking
//! rules directly instead of interpreting Cypher. It can also simulate an
//! unreachable store or failing queries, and counts the sessions it hands out.

use super::queries::{QueryName, QueryParams, QueryTemplate};
use super::{GraphStore, Session};
use crate::error::{GraphError, Result};
use crate::graph::{Direction, FieldValue, GraphNode, NodeId, PropertyMap, Record, Relationship};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use parking_lot::{Mutex, RwLock};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use uuid::Uuid;

/// Seconds per unit of topic age in the content score.
pub const CONTENT_AGE_SCALE: f64 = 10_000.0;

/// Maximum hops between a community member and a linked code-hosting account.
const ACCOUNT_LINK_HOPS: usize = 2;

/// In-memory graph store. Cloning shares the same graph.
#[derive(Clone, Default)]
pub struct MemoryGraph {
    shared: Arc<Shared>,
}

#[derive(Default)]
struct Shared {
    data: RwLock<GraphData>,
    pinned_now: RwLock<Option<DateTime<Utc>>>,
    faults: Mutex<Faults>,
    sessions_opened: AtomicUsize,
    open_sessions: AtomicUsize,
}

#[derive(Default)]
struct Faults {
    unavailable: bool,
    failing: HashSet<QueryName>,
}

#[derive(Default)]
struct GraphData {
    node_counter: NodeId,
    nodes: BTreeMap<NodeId, GraphNode>,
    relationships: Vec<Relationship>,
    // Adjacency indexes into `relationships`, in insertion order
    adjacency_out: HashMap<NodeId, Vec<usize>>,
    adjacency_in: HashMap<NodeId, Vec<usize>>,
}

impl MemoryGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node with the given labels and return its id.
    ///
    /// Ids are assigned monotonically starting at 1.
    pub fn add_node(&self, labels: &[&str], properties: PropertyMap) -> NodeId {
        let mut data = self.shared.data.write();
        data.node_counter += 1;
        let id = data.node_counter;
        let labels = labels.iter().map(|l| l.to_string()).collect();
        data.nodes.insert(id, GraphNode::new(id, labels, properties));
        id
    }

    /// Add a directed relationship `source -[rel_type]-> target`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if either endpoint doesn't exist.
    pub fn add_relationship(&self, source_id: NodeId, rel_type: &str, target_id: NodeId) -> Result<()> {
        let mut data = self.shared.data.write();
        for id in [source_id, target_id] {
            if !data.nodes.contains_key(&id) {
                return Err(GraphError::NodeNotFound {
                    node_id: id.to_string(),
                });
            }
        }

        let index = data.relationships.len();
        data.relationships.push(Relationship {
            source_id,
            target_id,
            rel_type: rel_type.to_string(),
        });
        data.adjacency_out.entry(source_id).or_default().push(index);
        data.adjacency_in.entry(target_id).or_default().push(index);
        Ok(())
    }

    /// Add a label to an existing node (e.g. `Exclude`).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn add_label(&self, id: NodeId, label: &str) -> Result<()> {
        let mut data = self.shared.data.write();
        let node = data.nodes.get_mut(&id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })?;
        if !node.has_label(label) {
            node.labels.push(label.to_string());
        }
        Ok(())
    }

    /// Merge properties into an existing node, overwriting duplicates.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::NodeNotFound`] if the node doesn't exist.
    pub fn update_properties(&self, id: NodeId, properties: PropertyMap) -> Result<()> {
        let mut data = self.shared.data.write();
        let node = data.nodes.get_mut(&id).ok_or_else(|| GraphError::NodeNotFound {
            node_id: id.to_string(),
        })?;
        for (key, value) in properties.iter() {
            node.properties.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    /// Snapshot of a node.
    pub fn node(&self, id: NodeId) -> Option<GraphNode> {
        self.shared.data.read().nodes.get(&id).cloned()
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.shared.data.read().nodes.len()
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.shared.data.read().relationships.len()
    }

    /// Fix the clock used for recency scoring. `None` restores the wall clock.
    pub fn pin_clock(&self, now: Option<DateTime<Utc>>) {
        *self.shared.pinned_now.write() = now;
    }

    /// Simulate an unreachable store: opening a session fails.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.faults.lock().unavailable = unavailable;
    }

    /// Make every execution of `name` fail until faults are cleared.
    pub fn fail_query(&self, name: QueryName) {
        self.shared.faults.lock().failing.insert(name);
    }

    /// Remove all simulated faults.
    pub fn clear_faults(&self) {
        let mut faults = self.shared.faults.lock();
        faults.unavailable = false;
        faults.failing.clear();
    }

    /// Total sessions opened since creation.
    pub fn sessions_opened(&self) -> usize {
        self.shared.sessions_opened.load(Ordering::SeqCst)
    }

    /// Sessions opened and not yet closed.
    pub fn open_sessions(&self) -> usize {
        self.shared.open_sessions.load(Ordering::SeqCst)
    }

    fn now(&self) -> DateTime<Utc> {
        let pinned = *self.shared.pinned_now.read();
        pinned.unwrap_or_else(Utc::now)
    }
}

#[async_trait]
impl GraphStore for MemoryGraph {
    async fn open_session(&self) -> Result<Box<dyn Session>> {
        if self.shared.faults.lock().unavailable {
            return Err(GraphError::connection(
                "memory graph is marked unavailable",
                None::<std::io::Error>,
            ));
        }

        let id = Uuid::new_v4();
        self.shared.sessions_opened.fetch_add(1, Ordering::SeqCst);
        self.shared.open_sessions.fetch_add(1, Ordering::SeqCst);
        debug!("Opened memory session {id}");

        Ok(Box::new(MemorySession {
            graph: self.clone(),
            id,
            closed: false,
        }))
    }
}

struct MemorySession {
    graph: MemoryGraph,
    id: Uuid,
    closed: bool,
}

#[async_trait]
impl Session for MemorySession {
    async fn run(&mut self, template: &QueryTemplate, params: &QueryParams) -> Result<Vec<Record>> {
        let name = template.name;
        if self.graph.shared.faults.lock().failing.contains(&name) {
            return Err(GraphError::query(
                name.as_str(),
                "simulated query failure",
                None::<std::io::Error>,
            ));
        }

        let limit = if template.takes_limit {
            usize::try_from(params.first).map_err(|_| {
                GraphError::query(
                    name.as_str(),
                    format!("LIMIT must be a non-negative integer, got {}", params.first),
                    None::<std::io::Error>,
                )
            })?
        } else {
            usize::MAX
        };

        let now = self.graph.now();
        let data = self.graph.shared.data.read();
        let records = match name {
            QueryName::TopOpenSourceProjects => data.top_open_source_projects(limit),
            QueryName::TopCommunityContent => data.top_community_content(now, limit),
            QueryName::NewCertifiedDevelopers => data.new_certified_developers(limit),
            QueryName::ThisWeekInNeo4j => data.this_week_in_neo4j(),
        };
        Ok(records)
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.graph.shared.open_sessions.fetch_sub(1, Ordering::SeqCst);
            debug!("Closed memory session {}", self.id);
        }
    }
}

impl GraphData {
    fn labelled<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a GraphNode> + 'a {
        self.nodes.values().filter(move |n| n.has_label(label))
    }

    /// Nodes one hop away, in relationship insertion order.
    fn neighbors(&self, id: NodeId, direction: Direction, rel_type: Option<&str>) -> Vec<&GraphNode> {
        let mut result = Vec::new();
        let mut follow = |indexes: Option<&Vec<usize>>, outgoing: bool| {
            for &index in indexes.into_iter().flatten() {
                let rel = &self.relationships[index];
                if rel_type.is_some_and(|t| t != rel.rel_type) {
                    continue;
                }
                let other = if outgoing { rel.target_id } else { rel.source_id };
                if let Some(node) = self.nodes.get(&other) {
                    result.push(node);
                }
            }
        };

        if matches!(direction, Direction::Outgoing | Direction::Both) {
            follow(self.adjacency_out.get(&id), true);
        }
        if matches!(direction, Direction::Incoming | Direction::Both) {
            follow(self.adjacency_in.get(&id), false);
        }
        result
    }

    /// Nodes reachable within `max_depth` hops in either direction, start included.
    fn within_hops(&self, start: NodeId, max_depth: usize) -> Vec<&GraphNode> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut result = Vec::new();

        if let Some(node) = self.nodes.get(&start) {
            visited.insert(start);
            result.push(node);
            queue.push_back((start, 0));
        }

        while let Some((current, depth)) = queue.pop_front() {
            if depth >= max_depth {
                continue;
            }
            for neighbor in self.neighbors(current, Direction::Both, None) {
                if visited.insert(neighbor.id) {
                    result.push(neighbor);
                    queue.push_back((neighbor.id, depth + 1));
                }
            }
        }

        result
    }

    fn top_open_source_projects(&self, limit: usize) -> Vec<Record> {
        let mut picks: Vec<(&GraphNode, &GraphNode, f64)> = Vec::new();

        for member in self.labelled("DiscourseUser") {
            let mut latest: Option<(&GraphNode, f64)> = None;
            for account in self.within_hops(member.id, ACCOUNT_LINK_HOPS) {
                if !account.has_label("User") {
                    continue;
                }
                for repo in self.neighbors(account.id, Direction::Outgoing, Some("CREATED")) {
                    if !repo.has_label("GitHub") || repo.has_label("Exclude") {
                        continue;
                    }
                    let Some(updated) = repo.properties.get_epoch_seconds("updated_at") else {
                        continue;
                    };
                    if repo.properties.get_number("favorites").unwrap_or(0.0) <= 0.0 {
                        continue;
                    }
                    if latest.map_or(true, |(_, seen)| updated > seen) {
                        latest = Some((repo, updated));
                    }
                }
            }
            if let Some((repo, updated)) = latest {
                picks.push((member, repo, updated));
            }
        }

        picks.sort_by(|a, b| b.2.total_cmp(&a.2));
        picks
            .into_iter()
            .take(limit)
            .map(|(member, repo, _)| {
                Record::new()
                    .with("du", FieldValue::Node(member.clone()))
                    .with("repo", FieldValue::Node(repo.clone()))
            })
            .collect()
    }

    fn top_community_content(&self, now: DateTime<Utc>, limit: usize) -> Vec<Record> {
        let now_secs = now.timestamp() as f64;
        let mut picks: Vec<(&GraphNode, &GraphNode, f64)> = Vec::new();

        for member in self.labelled("DiscourseUser") {
            let mut best: Option<(&GraphNode, f64)> = None;
            for topic in self.neighbors(member.id, Direction::Outgoing, Some("POSTED_CONTENT")) {
                if !topic.has_label("DiscourseTopic") || topic.has_label("Exclude") {
                    continue;
                }
                if topic.properties.get_bool("approved") != Some(true) {
                    continue;
                }
                let Some(score) = content_score(&topic.properties, now_secs) else {
                    continue;
                };
                if best.map_or(true, |(_, seen)| score > seen) {
                    best = Some((topic, score));
                }
            }
            if let Some((topic, score)) = best {
                picks.push((member, topic, score));
            }
        }

        picks.sort_by(|a, b| b.2.total_cmp(&a.2));
        picks
            .into_iter()
            .take(limit)
            .map(|(member, topic, _)| {
                Record::new()
                    .with("u", FieldValue::Node(member.clone()))
                    .with("topic", FieldValue::Node(topic.clone()))
            })
            .collect()
    }

    fn new_certified_developers(&self, limit: usize) -> Vec<Record> {
        let mut picks: Vec<(&GraphNode, &GraphNode)> = Vec::new();

        for member in self.labelled("DiscourseUser") {
            let mut earliest: Option<(&GraphNode, Option<f64>)> = None;
            for account in self.neighbors(member.id, Direction::Incoming, Some("DISCOURSE_ACCOUNT")) {
                if !account.has_label("User") {
                    continue;
                }
                for exam in self.neighbors(account.id, Direction::Outgoing, Some("TOOK")) {
                    if !exam.has_label("Certification") || exam.properties.get_bool("passed") != Some(true) {
                        continue;
                    }
                    let finished = exam.properties.get_number("finished");
                    // Unfinished exams sort last, as nulls do in an ascending ORDER BY
                    let earlier = match (earliest, finished) {
                        (None, _) => true,
                        (Some((_, None)), Some(_)) => true,
                        (Some((_, Some(seen))), Some(f)) => f < seen,
                        (Some(_), None) => false,
                    };
                    if earlier {
                        earliest = Some((exam, finished));
                    }
                }
            }
            if let Some((exam, _)) = earliest {
                picks.push((member, exam));
            }
        }

        picks.sort_by(|a, b| b.0.id.cmp(&a.0.id));
        picks
            .into_iter()
            .take(limit)
            .map(|(member, exam)| {
                Record::new()
                    .with("du", FieldValue::Node(member.clone()))
                    .with("c", FieldValue::Node(exam.clone()))
            })
            .collect()
    }

    fn this_week_in_neo4j(&self) -> Vec<Record> {
        let mut latest: Option<(&GraphNode, f64)> = None;
        for digest in self.labelled("TWIN4j") {
            let Some(date) = digest.properties.get_epoch_seconds("date") else {
                continue;
            };
            if latest.map_or(true, |(_, seen)| date > seen) {
                latest = Some((digest, date));
            }
        }
        let Some((digest, _)) = latest else {
            return Vec::new();
        };

        let featured = self
            .neighbors(digest.id, Direction::Outgoing, Some("FEATURED"))
            .into_iter()
            .find(|n| n.has_label("User"));
        let Some(featured) = featured else {
            return Vec::new();
        };

        let tags: Vec<&GraphNode> = self
            .neighbors(digest.id, Direction::Outgoing, Some("CONTAINS_TAG"))
            .into_iter()
            .filter(|n| n.has_label("TWIN4jTag"))
            .collect();
        let with_prefix = |prefix: &str| -> Vec<GraphNode> {
            tags.iter()
                .filter(|tag| {
                    tag.properties
                        .get_string("anchor")
                        .is_some_and(|anchor| anchor.starts_with(prefix))
                })
                .map(|tag| (*tag).clone())
                .collect()
        };

        vec![Record::new()
            .with("t", FieldValue::Node(digest.clone()))
            .with("u", FieldValue::Node(featured.clone()))
            .with("features", FieldValue::Nodes(with_prefix("features")))
            .with("articles", FieldValue::Nodes(with_prefix("articles")))]
    }
}

/// Recency-decayed topic score: `(10 * rating + likes + replies) / ago^2`,
/// with `ago` the whole seconds since creation divided by [`CONTENT_AGE_SCALE`].
///
/// Returns `None` when the topic has no creation time.
pub fn content_score(topic: &PropertyMap, now_secs: f64) -> Option<f64> {
    let created = topic.get_epoch_seconds("createdAt")?;
    let ago = (now_secs - created).trunc() / CONTENT_AGE_SCALE;
    let rating = topic.get_number("rating").unwrap_or(0.0);
    let likes = topic.get_number("likeCount").unwrap_or(0.0);
    let replies = topic.get_number("replyCount").unwrap_or(0.0);
    Some((10.0 * rating + likes + replies) / ago.powi(2))
}
