//! Named traversal queries and their Cypher templates.
//!
//! Resolvers refer to queries only by [`QueryName`]. The query text is a
//! contract with the graph store and lives here, versioned, next to the
//! columns each query returns.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default result-count limit for list queries.
pub const DEFAULT_FIRST: i64 = 10;

/// The four fixed queries the API serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryName {
    /// Most recently updated starred repository per linked community member
    TopOpenSourceProjects,
    /// Highest recency-decayed scoring topic per posting member
    TopCommunityContent,
    /// Earliest passed certification per member
    NewCertifiedDevelopers,
    /// Latest "This Week in Neo4j" digest
    ThisWeekInNeo4j,
}

impl QueryName {
    /// All queries, in API declaration order.
    pub const ALL: [QueryName; 4] = [
        QueryName::TopOpenSourceProjects,
        QueryName::TopCommunityContent,
        QueryName::NewCertifiedDevelopers,
        QueryName::ThisWeekInNeo4j,
    ];

    /// Public operation name, as exposed by the API surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryName::TopOpenSourceProjects => "topCommunityOpenSourceProjects",
            QueryName::TopCommunityContent => "topCommunityBlogsAndContent",
            QueryName::NewCertifiedDevelopers => "topNewCertifiedDevelopers",
            QueryName::ThisWeekInNeo4j => "thisWeekInNeo4j",
        }
    }

    /// The template executed for this query.
    pub fn template(&self) -> &'static QueryTemplate {
        match self {
            QueryName::TopOpenSourceProjects => &TOP_OPEN_SOURCE_PROJECTS,
            QueryName::TopCommunityContent => &TOP_COMMUNITY_CONTENT,
            QueryName::NewCertifiedDevelopers => &NEW_CERTIFIED_DEVELOPERS,
            QueryName::ThisWeekInNeo4j => &THIS_WEEK_IN_NEO4J,
        }
    }
}

impl fmt::Display for QueryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of one returned column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    /// A single node
    Node(&'static str),
    /// A collected list of nodes
    NodeList(&'static str),
}

impl Column {
    /// Column name.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Node(name) | Column::NodeList(name) => name,
        }
    }
}

/// A versioned, parameterized traversal query.
#[derive(Debug)]
pub struct QueryTemplate {
    /// Query this template implements
    pub name: QueryName,
    /// Bumped whenever the text changes
    pub version: u32,
    /// Cypher text; `$first` is bound from [`QueryParams`]
    pub text: &'static str,
    /// Returned columns, in order
    pub columns: &'static [Column],
    /// Whether the template binds `$first`
    pub takes_limit: bool,
}

/// Parameters bound into a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// Result-count limit; passed through unchecked
    pub first: i64,
}

impl QueryParams {
    /// Parameters with the given limit.
    pub fn first(first: i64) -> Self {
        Self { first }
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            first: DEFAULT_FIRST,
        }
    }
}

/// Per-member latest qualifying repository, newest first.
pub static TOP_OPEN_SOURCE_PROJECTS: QueryTemplate = QueryTemplate {
    name: QueryName::TopOpenSourceProjects,
    version: 2,
    text: r#"
      MATCH (du:DiscourseUser)-[*0..2]-(ghu:User)-[:CREATED]->(g:GitHub)
      WHERE g.updated_at IS NOT NULL
        AND coalesce(g.favorites, 0) > 0
        AND NOT "Exclude" IN labels(g)
      WITH DISTINCT du, g
      ORDER BY g.updated_at DESC
      WITH du, COLLECT(g)[0] AS repo
      RETURN du, repo ORDER BY repo.updated_at DESC LIMIT $first
    "#,
    columns: &[Column::Node("du"), Column::Node("repo")],
    takes_limit: true,
};

/// Per-member best scoring approved topic, best first.
pub static TOP_COMMUNITY_CONTENT: QueryTemplate = QueryTemplate {
    name: QueryName::TopCommunityContent,
    version: 3,
    text: r#"
      MATCH (u:DiscourseUser)-[:POSTED_CONTENT]->(t:DiscourseTopic)
      WHERE t.approved AND t.createdAt IS NOT NULL AND NOT "Exclude" IN labels(t)
      WITH *, 1.0 * (duration.inSeconds(datetime(), t.createdAt)).seconds / 10000 AS ago
      WITH u, t, (10.0 * coalesce(t.rating, 0) + coalesce(t.likeCount, 0) + coalesce(t.replyCount, 0)) / (ago ^ 2) AS score
      ORDER BY score DESC
      WITH u, COLLECT({topic: t, score: score})[0] AS best
      RETURN u, best.topic AS topic ORDER BY best.score DESC LIMIT $first
    "#,
    columns: &[Column::Node("u"), Column::Node("topic")],
    takes_limit: true,
};

/// Per-member earliest passed certification, ordered by member identity.
pub static NEW_CERTIFIED_DEVELOPERS: QueryTemplate = QueryTemplate {
    name: QueryName::NewCertifiedDevelopers,
    version: 2,
    text: r#"
      MATCH (du:DiscourseUser)<-[:DISCOURSE_ACCOUNT]-(u:User)-[:TOOK]->(c:Certification {passed: true})
      WITH du, c ORDER BY c.finished ASC
      WITH du, COLLECT(c)[0] AS cert
      RETURN du, cert AS c ORDER BY id(du) DESC LIMIT $first
    "#,
    columns: &[Column::Node("du"), Column::Node("c")],
    takes_limit: true,
};

/// Latest digest with its featured member and tags split by anchor prefix.
pub static THIS_WEEK_IN_NEO4J: QueryTemplate = QueryTemplate {
    name: QueryName::ThisWeekInNeo4j,
    version: 2,
    text: r#"
      MATCH (t:TWIN4j)
      WHERE t.date IS NOT NULL
      WITH t ORDER BY t.date DESC LIMIT 1
      MATCH (t)-[:FEATURED]->(u:User)
      OPTIONAL MATCH (t)-[:CONTAINS_TAG]->(article:TWIN4jTag)
      WHERE article.anchor STARTS WITH "articles"
      WITH t, u, COLLECT(article) AS articles
      OPTIONAL MATCH (t)-[:CONTAINS_TAG]->(feature:TWIN4jTag)
      WHERE feature.anchor STARTS WITH "features"
      WITH t, u, articles, COLLECT(feature) AS features
      RETURN t, u, features, articles
    "#,
    columns: &[
        Column::Node("t"),
        Column::Node("u"),
        Column::NodeList("features"),
        Column::NodeList("articles"),
    ],
    takes_limit: false,
};
