//! Public API entities.
//!
//! Field names are snake_case here and camelCase on the wire, both in the
//! GraphQL schema and in JSON.

use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};

/// A community forum member.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct DiscourseUser {
    /// Display name
    pub name: Option<String>,
    /// Forum handle
    pub screen_name: Option<String>,
    /// Fully-qualified avatar URL
    pub avatar: Option<String>,
}

/// A member's open-source repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CommunityOpenSourceProject {
    /// Repository title
    pub title: Option<String>,
    /// Repository URL
    pub url: Option<String>,
    /// Repository description
    pub description: Option<String>,
    /// Last push time, as stored
    pub release_date: Option<String>,
    /// Primary language
    pub language: Option<String>,
    /// Repository owner
    pub author: DiscourseUser,
}

/// A community forum topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CommunityBlog {
    /// Topic title
    pub title: Option<String>,
    /// Link to the topic
    pub url: Option<String>,
    /// Topic author
    pub author: DiscourseUser,
}

/// A member who passed the certification exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CertifiedDeveloper {
    /// The certified member
    pub developer: DiscourseUser,
    /// When the exam was finished
    pub certification_date: Option<String>,
}

/// The member featured in a digest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct CommunityMember {
    /// Image URL
    pub image: Option<String>,
}

/// A tagged section of a digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Twin4jItem {
    /// Display text
    pub tag: Option<String>,
    /// Deep link into the digest
    pub url: Option<String>,
}

/// The weekly "This Week in Neo4j" digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct Twin4jContent {
    /// Publication date, e.g. `1st Mar 2019`
    pub date: Option<String>,
    /// Digest URL
    pub url: Option<String>,
    /// Summary text
    pub text: Option<String>,
    /// Featured member
    pub featured_community_member: CommunityMember,
    /// Feature sections, in stored order
    pub features: Vec<Twin4jItem>,
    /// Article sections, in stored order
    pub articles: Vec<Twin4jItem>,
    /// Features then articles, at most five
    pub top_items: Vec<Twin4jItem>,
}
