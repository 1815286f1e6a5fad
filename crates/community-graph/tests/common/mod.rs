//! Shared fixtures: small community graphs built on `MemoryGraph`.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use community_graph::{MemoryGraph, NodeId, PropertyMap, ResultCache, Resolvers};
use std::sync::Arc;

/// Fixed "now" for recency scoring.
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2019, 3, 10, 12, 0, 0).unwrap()
}

pub fn resolvers(graph: &MemoryGraph) -> Resolvers {
    Resolvers::new(Arc::new(graph.clone()), Arc::new(ResultCache::new()))
}

pub fn member(graph: &MemoryGraph, screen_name: &str) -> NodeId {
    graph.add_node(
        &["DiscourseUser"],
        PropertyMap::new()
            .with("name", format!("{screen_name} name"))
            .with("screenName", screen_name)
            .with("avatarTemplate", format!("/user_avatar/{screen_name}/{{size}}/1.png")),
    )
}

/// A GitHub account linked to `member` through DISCOURSE_ACCOUNT.
pub fn github_account(graph: &MemoryGraph, member: NodeId) -> NodeId {
    let account = graph.add_node(&["User"], PropertyMap::new());
    graph
        .add_relationship(account, "DISCOURSE_ACCOUNT", member)
        .unwrap();
    account
}

pub fn repo(graph: &MemoryGraph, account: NodeId, title: &str, updated_at: i64, favorites: i64) -> NodeId {
    let repo = graph.add_node(
        &["GitHub"],
        PropertyMap::new()
            .with("title", title)
            .with("url", format!("https://github.com/example/{title}"))
            .with("description", format!("{title} description"))
            .with("language", "Rust")
            .with("pushed", updated_at)
            .with("updated_at", updated_at)
            .with("favorites", favorites),
    );
    graph.add_relationship(account, "CREATED", repo).unwrap();
    repo
}

/// An approved topic created `hours_ago` before [`now`].
pub fn topic(graph: &MemoryGraph, author: NodeId, slug: &str, hours_ago: i64, likes: i64) -> NodeId {
    let created = now() - chrono::Duration::hours(hours_ago);
    let topic = graph.add_node(
        &["DiscourseTopic"],
        PropertyMap::new()
            .with("title", slug.replace('-', " "))
            .with("slug", slug)
            .with("approved", true)
            .with("rating", 0i64)
            .with("likeCount", likes)
            .with("replyCount", 0i64)
            .with("createdAt", created),
    );
    graph.add_relationship(author, "POSTED_CONTENT", topic).unwrap();
    topic
}

pub fn certification(graph: &MemoryGraph, account: NodeId, finished: i64, passed: bool) -> NodeId {
    let exam = graph.add_node(
        &["Certification"],
        PropertyMap::new()
            .with("finished", finished)
            .with("passed", passed),
    );
    graph.add_relationship(account, "TOOK", exam).unwrap();
    exam
}

/// A dated digest with a featured member.
pub fn digest(graph: &MemoryGraph, date: &str, link: &str) -> NodeId {
    let digest = graph.add_node(
        &["TWIN4j"],
        PropertyMap::new()
            .with("date", date)
            .with("link", link)
            .with("summaryText", format!("Digest of {date}"))
            .with("image", format!("{link}/featured.jpg")),
    );
    let featured = graph.add_node(&["User"], PropertyMap::new());
    graph.add_relationship(digest, "FEATURED", featured).unwrap();
    digest
}

pub fn tag(graph: &MemoryGraph, digest: NodeId, tag: &str, anchor: &str) -> NodeId {
    let node = graph.add_node(
        &["TWIN4jTag"],
        PropertyMap::new().with("tag", tag).with("anchor", anchor),
    );
    graph.add_relationship(digest, "CONTAINS_TAG", node).unwrap();
    node
}
