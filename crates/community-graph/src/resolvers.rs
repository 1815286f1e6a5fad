//! The resolver layer: gateway, then mapper, then cache, per operation.
//!
//! Every operation follows the same policy. A successful query is mapped,
//! cached and returned as fresh. Any failure (connection, execution or
//! mapping) is logged and answered with the last cached payload, or with
//! nothing if the operation has never succeeded. Callers never see an error.

use crate::cache::ResultCache;
use crate::error::Result;
use crate::graph::Record;
use crate::mappers;
use crate::model::{CertifiedDeveloper, CommunityBlog, CommunityOpenSourceProject, Twin4jContent};
use crate::store::{Gateway, GraphStore, QueryName, QueryParams};
use chrono::Utc;
use log::{error, warn};
use std::sync::Arc;

/// Outcome of one resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution<T> {
    /// `true` if `data` was produced by this call
    pub fresh: bool,
    /// The payload; a cached one when not fresh, `None` on a cold failure
    pub data: Option<T>,
}

impl<T> Resolution<T> {
    /// A payload produced by this call.
    pub fn fresh(data: T) -> Self {
        Self {
            fresh: true,
            data: Some(data),
        }
    }

    /// A fallback payload (or none) after a failure.
    pub fn stale(data: Option<T>) -> Self {
        Self { fresh: false, data }
    }

    /// Drop the freshness flag.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Resolves the four community queries against a graph store.
#[derive(Clone)]
pub struct Resolvers {
    gateway: Gateway,
    cache: Arc<ResultCache>,
}

impl Resolvers {
    /// Create resolvers over `store`, falling back to `cache` on failure.
    pub fn new(store: Arc<dyn GraphStore>, cache: Arc<ResultCache>) -> Self {
        Self {
            gateway: Gateway::new(store),
            cache,
        }
    }

    /// The cache this resolver writes to.
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Top open-source projects, one per member, most recently updated first.
    pub async fn top_community_open_source_projects_resolution(
        &self,
        first: i64,
    ) -> Resolution<Vec<CommunityOpenSourceProject>> {
        self.resolve(QueryName::TopOpenSourceProjects, QueryParams::first(first), |records| {
            records.iter().map(mappers::open_source_project).collect()
        })
        .await
    }

    /// See [`Resolvers::top_community_open_source_projects_resolution`].
    pub async fn top_community_open_source_projects(
        &self,
        first: i64,
    ) -> Option<Vec<CommunityOpenSourceProject>> {
        self.top_community_open_source_projects_resolution(first)
            .await
            .into_data()
    }

    /// Top community content, one topic per member, best score first.
    pub async fn top_community_blogs_and_content_resolution(
        &self,
        first: i64,
    ) -> Resolution<Vec<CommunityBlog>> {
        self.resolve(QueryName::TopCommunityContent, QueryParams::first(first), |records| {
            records.iter().map(mappers::community_blog).collect()
        })
        .await
    }

    /// See [`Resolvers::top_community_blogs_and_content_resolution`].
    pub async fn top_community_blogs_and_content(&self, first: i64) -> Option<Vec<CommunityBlog>> {
        self.top_community_blogs_and_content_resolution(first)
            .await
            .into_data()
    }

    /// Newly certified developers, one per member, ordered by member identity
    /// descending.
    pub async fn top_new_certified_developers_resolution(
        &self,
        first: i64,
    ) -> Resolution<Vec<CertifiedDeveloper>> {
        self.resolve(QueryName::NewCertifiedDevelopers, QueryParams::first(first), |records| {
            records.iter().map(mappers::certified_developer).collect()
        })
        .await
    }

    /// See [`Resolvers::top_new_certified_developers_resolution`].
    pub async fn top_new_certified_developers(&self, first: i64) -> Option<Vec<CertifiedDeveloper>> {
        self.top_new_certified_developers_resolution(first)
            .await
            .into_data()
    }

    /// The latest weekly digest.
    pub async fn this_week_in_neo4j_resolution(&self) -> Resolution<Twin4jContent> {
        self.resolve(QueryName::ThisWeekInNeo4j, QueryParams::default(), |records| {
            mappers::twin4j_content(&records)
        })
        .await
    }

    /// See [`Resolvers::this_week_in_neo4j_resolution`].
    pub async fn this_week_in_neo4j(&self) -> Option<Twin4jContent> {
        self.this_week_in_neo4j_resolution().await.into_data()
    }

    async fn resolve<T, F>(&self, name: QueryName, params: QueryParams, map: F) -> Resolution<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce(Vec<Record>) -> Result<T>,
    {
        let outcome = match self.gateway.fetch(name, params).await {
            Ok(records) => map(records),
            Err(e) => Err(e),
        };

        match outcome {
            Ok(data) => {
                self.cache.store(name, data.clone());
                Resolution::fresh(data)
            }
            Err(e) => {
                error!("{name} failed: {e}");
                let cached = self.cache.load::<T>(name);
                match &cached {
                    Some(hit) => warn!(
                        "Serving cached {name} from {} ({}s old)",
                        hit.stored_at,
                        (Utc::now() - hit.stored_at).num_seconds()
                    ),
                    None => warn!("No cached {name} to fall back on"),
                }
                Resolution::stale(cached.map(|hit| hit.data))
            }
        }
    }
}
