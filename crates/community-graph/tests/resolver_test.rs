//! Integration tests for the resolver layer over a `MemoryGraph`.
//!
//! Covers ranking rules per query, result limits, the stale-on-error
//! fallback and session release.

mod common;

use common::*;
use community_graph::{MemoryGraph, PropertyMap, QueryName};

#[tokio::test]
async fn test_open_source_projects_ordered_and_limited() {
    let graph = MemoryGraph::new();
    for (name, updated) in [("ada", 100), ("bob", 300), ("cy", 200)] {
        let m = member(&graph, name);
        let account = github_account(&graph, m);
        repo(&graph, account, &format!("{name}-repo"), updated, 5);
    }

    let projects = resolvers(&graph)
        .top_community_open_source_projects(2)
        .await
        .unwrap();

    assert_eq!(projects.len(), 2);
    let titles: Vec<_> = projects.iter().filter_map(|p| p.title.as_deref()).collect();
    assert_eq!(titles, vec!["bob-repo", "cy-repo"]);
    let released: Vec<_> = projects.iter().filter_map(|p| p.release_date.as_deref()).collect();
    assert_eq!(released, vec!["300", "200"]);
    assert_eq!(projects[0].author.screen_name.as_deref(), Some("bob"));
    assert_eq!(
        projects[0].author.avatar.as_deref(),
        Some("https://community.neo4j.com/user_avatar/bob/50/1.png")
    );
}

#[tokio::test]
async fn test_open_source_keeps_latest_repo_per_member() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "old-repo", 100, 5);
    repo(&graph, account, "new-repo", 200, 5);

    let projects = resolvers(&graph)
        .top_community_open_source_projects(10)
        .await
        .unwrap();

    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].title.as_deref(), Some("new-repo"));
}

#[tokio::test]
async fn test_open_source_skips_unqualified_repos() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "starred", 100, 5);
    repo(&graph, account, "unstarred", 400, 0);
    let excluded = repo(&graph, account, "excluded", 300, 9);
    graph.add_label(excluded, "Exclude").unwrap();
    let undated = graph.add_node(&["GitHub"], PropertyMap::new().with("title", "undated").with("favorites", 3i64));
    graph.add_relationship(account, "CREATED", undated).unwrap();

    let projects = resolvers(&graph)
        .top_community_open_source_projects(10)
        .await
        .unwrap();

    let titles: Vec<_> = projects.iter().filter_map(|p| p.title.as_deref()).collect();
    assert_eq!(titles, vec!["starred"]);
}

#[tokio::test]
async fn test_open_source_follows_links_up_to_two_hops() {
    let graph = MemoryGraph::new();
    let near = member(&graph, "near");
    let far = member(&graph, "far");

    // near <- account (1 hop)
    let account = github_account(&graph, near);
    repo(&graph, account, "near-repo", 100, 1);

    // far - twitter - other - account (3 hops)
    let twitter = graph.add_node(&["Twitter"], PropertyMap::new());
    let other = graph.add_node(&["Twitter"], PropertyMap::new());
    let distant = graph.add_node(&["User"], PropertyMap::new());
    graph.add_relationship(far, "LINKED", twitter).unwrap();
    graph.add_relationship(twitter, "LINKED", other).unwrap();
    graph.add_relationship(other, "LINKED", distant).unwrap();
    repo(&graph, distant, "far-repo", 200, 1);

    let projects = resolvers(&graph)
        .top_community_open_source_projects(10)
        .await
        .unwrap();

    let titles: Vec<_> = projects.iter().filter_map(|p| p.title.as_deref()).collect();
    assert_eq!(titles, vec!["near-repo"]);
}

#[tokio::test]
async fn test_community_content_best_topic_per_member() {
    let graph = MemoryGraph::new();
    graph.pin_clock(Some(now()));

    let ada = member(&graph, "ada");
    topic(&graph, ada, "fresh-post", 10, 5);
    topic(&graph, ada, "old-popular-post", 100, 50);
    let bob = member(&graph, "bob");
    topic(&graph, bob, "bob-post", 5, 1);
    let cy = member(&graph, "cy");
    let hidden = topic(&graph, cy, "hidden-post", 1, 1000);
    graph.add_label(hidden, "Exclude").unwrap();
    let unapproved = topic(&graph, cy, "pending-post", 1, 1000);
    graph
        .update_properties(unapproved, PropertyMap::new().with("approved", false))
        .unwrap();

    let blogs = resolvers(&graph)
        .top_community_blogs_and_content(10)
        .await
        .unwrap();

    let urls: Vec<_> = blogs.iter().filter_map(|b| b.url.as_deref()).collect();
    assert_eq!(
        urls,
        vec![
            "https://community.neo4j.com/t/fresh-post",
            "https://community.neo4j.com/t/bob-post",
        ]
    );
    assert_eq!(blogs[0].title.as_deref(), Some("fresh post"));
    assert_eq!(blogs[1].author.screen_name.as_deref(), Some("bob"));
}

#[tokio::test]
async fn test_certified_developers_earliest_pass_ordered_by_member_desc() {
    let graph = MemoryGraph::new();
    let first = member(&graph, "first");
    let failed = member(&graph, "failed");
    let last = member(&graph, "last");

    let account = github_account(&graph, first);
    certification(&graph, account, 1_551_794_531, true);
    certification(&graph, account, 1_500_000_000, true);
    let account = github_account(&graph, failed);
    certification(&graph, account, 1_400_000_000, false);
    let account = github_account(&graph, last);
    certification(&graph, account, 1_600_000_000, true);

    let developers = resolvers(&graph)
        .top_new_certified_developers(10)
        .await
        .unwrap();

    // Ordered by member identity, not by certification date
    let names: Vec<_> = developers
        .iter()
        .filter_map(|d| d.developer.screen_name.as_deref())
        .collect();
    assert_eq!(names, vec!["last", "first"]);
    assert_eq!(
        developers[1].certification_date.as_deref(),
        Some("Fri Jul 14 2017 02:40:00 GMT+0000 (Coordinated Universal Time)")
    );
}

#[tokio::test]
async fn test_digest_latest_with_partitioned_tags() {
    let graph = MemoryGraph::new();
    let older = digest(&graph, "2019-03-02", "https://neo4j.com/blog/twin4j-old");
    tag(&graph, older, "Old feature", "features-old");

    let link = "https://neo4j.com/blog/twin4j-2019-03-09";
    let latest = digest(&graph, "2019-03-09", link);
    tag(&graph, latest, "Article 1", "articles-1");
    tag(&graph, latest, "Feature 1", "features-1");
    tag(&graph, latest, "Article 2", "articles-2");
    tag(&graph, latest, "Feature 2", "features-2");
    tag(&graph, latest, "Community", "community-1");
    tag(&graph, latest, "Article 3", "articles-3");
    tag(&graph, latest, "Feature 3", "features-3");
    tag(&graph, latest, "Article 4", "articles-4");

    let content = resolvers(&graph).this_week_in_neo4j().await.unwrap();

    assert_eq!(content.date.as_deref(), Some("9th Mar 2019"));
    assert_eq!(content.url.as_deref(), Some(link));
    assert_eq!(content.text.as_deref(), Some("Digest of 2019-03-09"));
    assert_eq!(
        content.featured_community_member.image.as_deref(),
        Some("https://neo4j.com/blog/twin4j-2019-03-09/featured.jpg")
    );
    assert_eq!(content.features.len(), 3);
    assert_eq!(content.articles.len(), 4);
    assert_eq!(
        content.features[0].url.as_deref(),
        Some("https://neo4j.com/blog/twin4j-2019-03-09#features-1")
    );

    let top: Vec<_> = content.top_items.iter().filter_map(|i| i.tag.as_deref()).collect();
    assert_eq!(
        top,
        vec!["Feature 1", "Feature 2", "Feature 3", "Article 1", "Article 2"]
    );
}

#[tokio::test]
async fn test_unranked_rows_are_never_picked() {
    let graph = MemoryGraph::new();
    graph.pin_clock(Some(now()));

    let ada = member(&graph, "ada");
    topic(&graph, ada, "dated-post", 10, 1);
    let undated = graph.add_node(
        &["DiscourseTopic"],
        PropertyMap::new()
            .with("slug", "undated-post")
            .with("approved", true)
            .with("likeCount", 1000i64),
    );
    graph.add_relationship(ada, "POSTED_CONTENT", undated).unwrap();
    let bob = member(&graph, "bob");
    let only_undated = graph.add_node(
        &["DiscourseTopic"],
        PropertyMap::new().with("slug", "bob-undated").with("approved", true),
    );
    graph.add_relationship(bob, "POSTED_CONTENT", only_undated).unwrap();

    let dated = digest(&graph, "2019-03-02", "https://neo4j.com/blog/twin4j-dated");
    let no_date = graph.add_node(
        &["TWIN4j"],
        PropertyMap::new().with("link", "https://neo4j.com/blog/twin4j-undated"),
    );
    let featured = graph.add_node(&["User"], PropertyMap::new());
    graph.add_relationship(no_date, "FEATURED", featured).unwrap();
    tag(&graph, dated, "Feature", "features-1");

    let resolvers = resolvers(&graph);
    let blogs = resolvers.top_community_blogs_and_content(10).await.unwrap();
    let urls: Vec<_> = blogs.iter().filter_map(|b| b.url.as_deref()).collect();
    assert_eq!(urls, vec!["https://community.neo4j.com/t/dated-post"]);

    let content = resolvers.this_week_in_neo4j().await.unwrap();
    assert_eq!(content.url.as_deref(), Some("https://neo4j.com/blog/twin4j-dated"));
}

#[tokio::test]
async fn test_list_operations_respect_limit() {
    let graph = MemoryGraph::new();
    graph.pin_clock(Some(now()));
    for i in 0..4 {
        let m = member(&graph, &format!("m{i}"));
        let account = github_account(&graph, m);
        repo(&graph, account, &format!("repo-{i}"), 100 + i, 1);
        certification(&graph, account, 1_500_000_000 + i, true);
        topic(&graph, m, &format!("post-{i}"), 1 + i, 1);
    }
    let resolvers = resolvers(&graph);

    for first in [0, 1, 3, 4, 1000] {
        let expected = first.min(4) as usize;
        let projects = resolvers.top_community_open_source_projects(first).await.unwrap();
        let blogs = resolvers.top_community_blogs_and_content(first).await.unwrap();
        let developers = resolvers.top_new_certified_developers(first).await.unwrap();
        assert_eq!(projects.len(), expected, "projects, first={first}");
        assert_eq!(blogs.len(), expected, "blogs, first={first}");
        assert_eq!(developers.len(), expected, "developers, first={first}");
    }
}

#[tokio::test]
async fn test_repeated_resolution_is_idempotent() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "graph-tools", 100, 5);
    let resolvers = resolvers(&graph);

    let first = resolvers.top_community_open_source_projects_resolution(10).await;
    let second = resolvers.top_community_open_source_projects_resolution(10).await;

    assert!(first.fresh && second.fresh);
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_failure_after_success_serves_previous_payload() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "graph-tools", 100, 5);
    let resolvers = resolvers(&graph);

    let fresh = resolvers.top_community_open_source_projects_resolution(10).await;
    assert!(fresh.fresh);

    // A newer repo would change the answer, but the query now fails
    repo(&graph, account, "newer-tools", 200, 5);
    graph.fail_query(QueryName::TopOpenSourceProjects);

    let stale = resolvers.top_community_open_source_projects_resolution(10).await;
    assert!(!stale.fresh);
    assert_eq!(stale.data, fresh.data);

    graph.clear_faults();
    let recovered = resolvers.top_community_open_source_projects(10).await.unwrap();
    assert_eq!(recovered[0].title.as_deref(), Some("newer-tools"));
}

#[tokio::test]
async fn test_failure_before_any_success_returns_nothing() {
    let graph = MemoryGraph::new();
    graph.set_unavailable(true);
    let resolvers = resolvers(&graph);

    let blogs = resolvers.top_community_blogs_and_content_resolution(10).await;
    assert!(!blogs.fresh);
    assert_eq!(blogs.data, None);
    assert_eq!(resolvers.this_week_in_neo4j().await, None);
    assert!(resolvers.cache().is_empty());
}

#[tokio::test]
async fn test_mapping_failure_serves_previous_digest() {
    let graph = MemoryGraph::new();
    let first = digest(&graph, "2019-03-02", "https://neo4j.com/blog/twin4j-1");
    tag(&graph, first, "Feature", "features-1");
    let resolvers = resolvers(&graph);

    let fresh = resolvers.this_week_in_neo4j_resolution().await;
    assert!(fresh.fresh);

    // Newest digest has no featured member, so the query returns no row
    graph.add_node(
        &["TWIN4j"],
        PropertyMap::new().with("date", "2019-03-09").with("link", "https://neo4j.com/blog/twin4j-2"),
    );

    let stale = resolvers.this_week_in_neo4j_resolution().await;
    assert!(!stale.fresh);
    assert_eq!(stale.data, fresh.data);
}

#[tokio::test]
async fn test_failures_do_not_leak_between_operations() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "graph-tools", 100, 5);
    certification(&graph, account, 1_500_000_000, true);
    let resolvers = resolvers(&graph);

    graph.fail_query(QueryName::NewCertifiedDevelopers);

    assert!(resolvers.top_community_open_source_projects_resolution(10).await.fresh);
    let developers = resolvers.top_new_certified_developers_resolution(10).await;
    assert!(!developers.fresh);
    assert_eq!(developers.data, None);
}

#[tokio::test]
async fn test_every_call_releases_its_session() {
    let graph = MemoryGraph::new();
    let resolvers = resolvers(&graph);

    resolvers.top_community_open_source_projects(10).await;
    resolvers.top_community_blogs_and_content(-1).await;
    resolvers.this_week_in_neo4j().await;
    graph.fail_query(QueryName::NewCertifiedDevelopers);
    resolvers.top_new_certified_developers(10).await;

    assert_eq!(graph.sessions_opened(), 4);
    assert_eq!(graph.open_sessions(), 0);

    graph.set_unavailable(true);
    resolvers.top_community_open_source_projects(10).await;
    assert_eq!(graph.sessions_opened(), 4);
    assert_eq!(graph.open_sessions(), 0);
}

#[tokio::test]
async fn test_concurrent_resolutions_share_cache() {
    let graph = MemoryGraph::new();
    let m = member(&graph, "ada");
    let account = github_account(&graph, m);
    repo(&graph, account, "graph-tools", 100, 5);
    let resolvers = resolvers(&graph);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolvers = resolvers.clone();
            tokio::spawn(async move { resolvers.top_community_open_source_projects(10).await })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.await.unwrap().map(|p| p.len()), Some(1));
    }

    assert!(resolvers.cache().contains(QueryName::TopOpenSourceProjects));
    assert_eq!(graph.open_sessions(), 0);
}
