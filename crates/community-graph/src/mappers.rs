//! Pure transforms from graph records to the public API entities.
//!
//! Missing node properties become absent fields. Only structural problems
//! (a missing column, a column of the wrong kind, no digest row) are
//! reported as [`GraphError::Mapping`].

use crate::error::{GraphError, Result};
use crate::graph::{GraphNode, PropertyMap, Record};
use crate::model::{
    CertifiedDeveloper, CommunityBlog, CommunityMember, CommunityOpenSourceProject,
    DiscourseUser, Twin4jContent, Twin4jItem,
};
use crate::store::QueryName;
use chrono::{DateTime, Datelike, Utc};

/// Community forum root, used for topic links.
pub const COMMUNITY_BASE_URL: &str = "https://community.neo4j.com/";

/// Prefix for avatar templates that are not already absolute.
pub const AVATAR_BASE_URL: &str = "https://community.neo4j.com";

/// Pixel size substituted into avatar templates.
pub const AVATAR_SIZE: u32 = 50;

/// Maximum number of merged digest items.
pub const TOP_ITEMS_LIMIT: usize = 5;

/// Expand an avatar template into a fully-qualified URL.
pub fn avatar_url(template: &str) -> String {
    let size = AVATAR_SIZE.to_string();
    if template.starts_with("http") {
        template.replacen("{size}", &size, 1)
    } else {
        format!("{AVATAR_BASE_URL}{template}").replacen("{size}", &size, 1)
    }
}

/// Link to a community topic.
pub fn blog_url(slug: &str) -> String {
    format!("{COMMUNITY_BASE_URL}t/{slug}")
}

/// Deep link to a tagged section of a digest.
pub fn tag_url(digest_link: &str, anchor: &str) -> String {
    format!("{digest_link}#{anchor}")
}

/// Render epoch seconds the way a browser's `Date.toString()` does in UTC.
pub fn certification_date(epoch_seconds: i64) -> Option<String> {
    let at = DateTime::<Utc>::from_timestamp(epoch_seconds, 0)?;
    Some(
        at.format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)")
            .to_string(),
    )
}

/// Render a digest date as e.g. `1st Mar 2019`.
pub fn digest_date(at: DateTime<Utc>) -> String {
    let day = at.day();
    format!("{day}{} {}", ordinal_suffix(day), at.format("%b %Y"))
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Map a community member node. Absent properties stay absent.
pub fn discourse_user(user: &PropertyMap) -> DiscourseUser {
    DiscourseUser {
        name: user.get_rendered("name"),
        screen_name: user.get_rendered("screenName"),
        avatar: user.get_string("avatarTemplate").map(avatar_url),
    }
}

/// Map a `du, repo` row.
pub fn open_source_project(record: &Record) -> Result<CommunityOpenSourceProject> {
    let query = QueryName::TopOpenSourceProjects.as_str();
    let user = record.node(query, "du")?;
    let repo = &record.node(query, "repo")?.properties;

    Ok(CommunityOpenSourceProject {
        title: repo.get_rendered("title"),
        url: repo.get_rendered("url"),
        description: repo.get_rendered("description"),
        release_date: repo.get_rendered("pushed"),
        language: repo.get_rendered("language"),
        author: discourse_user(&user.properties),
    })
}

/// Map a `u, topic` row.
pub fn community_blog(record: &Record) -> Result<CommunityBlog> {
    let query = QueryName::TopCommunityContent.as_str();
    let user = record.node(query, "u")?;
    let topic = &record.node(query, "topic")?.properties;

    Ok(CommunityBlog {
        title: topic.get_rendered("title"),
        url: topic.get_rendered("slug").map(|slug| blog_url(&slug)),
        author: discourse_user(&user.properties),
    })
}

/// Map a `du, c` row.
pub fn certified_developer(record: &Record) -> Result<CertifiedDeveloper> {
    let query = QueryName::NewCertifiedDevelopers.as_str();
    let user = record.node(query, "du")?;
    let exam = &record.node(query, "c")?.properties;

    Ok(CertifiedDeveloper {
        developer: discourse_user(&user.properties),
        certification_date: exam
            .get_number("finished")
            .and_then(|secs| certification_date(secs.trunc() as i64)),
    })
}

/// Map the digest query's result; only the first row is used.
pub fn twin4j_content(records: &[Record]) -> Result<Twin4jContent> {
    let query = QueryName::ThisWeekInNeo4j.as_str();
    let record = records
        .first()
        .ok_or_else(|| GraphError::mapping(query, "no digest record returned"))?;

    let digest = &record.node(query, "t")?.properties;
    let link = digest.get_rendered("link");
    let features = twin4j_items(record.nodes(query, "features")?, link.as_deref());
    let articles = twin4j_items(record.nodes(query, "articles")?, link.as_deref());
    let top_items = top_items(&features, &articles);

    Ok(Twin4jContent {
        date: digest
            .get("date")
            .and_then(|date| date.as_datetime())
            .map(digest_date),
        url: link,
        text: digest.get_rendered("summaryText"),
        featured_community_member: CommunityMember {
            image: digest.get_rendered("image"),
        },
        features,
        articles,
        top_items,
    })
}

fn twin4j_items(tags: &[GraphNode], link: Option<&str>) -> Vec<Twin4jItem> {
    tags.iter()
        .map(|node| {
            let tag = &node.properties;
            let anchor = tag.get_rendered("anchor").unwrap_or_default();
            Twin4jItem {
                tag: tag.get_rendered("tag"),
                url: link.map(|link| tag_url(link, &anchor)),
            }
        })
        .collect()
}

/// Features first, then articles, at most [`TOP_ITEMS_LIMIT`] in total.
pub fn top_items(features: &[Twin4jItem], articles: &[Twin4jItem]) -> Vec<Twin4jItem> {
    features
        .iter()
        .chain(articles)
        .take(TOP_ITEMS_LIMIT)
        .cloned()
        .collect()
}
