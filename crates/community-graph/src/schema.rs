//! GraphQL schema for the four community queries.

use crate::model::{CertifiedDeveloper, CommunityBlog, CommunityOpenSourceProject, Twin4jContent};
use crate::resolvers::Resolvers;
use crate::store::DEFAULT_FIRST;
use async_graphql::{Context, EmptyMutation, EmptySubscription, Object, Schema};

/// The community API schema.
pub type CommunitySchema = Schema<QueryRoot, EmptyMutation, EmptySubscription>;

/// Build the schema around a set of resolvers.
pub fn build_schema(resolvers: Resolvers) -> CommunitySchema {
    Schema::build(QueryRoot, EmptyMutation, EmptySubscription)
        .data(resolvers)
        .finish()
}

/// Root query type.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// Most recently updated starred repository of each community member.
    #[graphql(name = "topCommunityOpenSourceProjects")]
    async fn top_community_open_source_projects(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] first: i32,
    ) -> async_graphql::Result<Option<Vec<CommunityOpenSourceProject>>> {
        let resolvers = ctx.data::<Resolvers>()?;
        Ok(resolvers
            .top_community_open_source_projects(i64::from(first))
            .await)
    }

    /// Best scoring recent topic of each community member.
    #[graphql(name = "topCommunityBlogsAndContent")]
    async fn top_community_blogs_and_content(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] first: i32,
    ) -> async_graphql::Result<Option<Vec<CommunityBlog>>> {
        let resolvers = ctx.data::<Resolvers>()?;
        Ok(resolvers
            .top_community_blogs_and_content(i64::from(first))
            .await)
    }

    /// Members with a passed certification.
    #[graphql(name = "topNewCertifiedDevelopers")]
    async fn top_new_certified_developers(
        &self,
        ctx: &Context<'_>,
        #[graphql(default = 10)] first: i32,
    ) -> async_graphql::Result<Option<Vec<CertifiedDeveloper>>> {
        let resolvers = ctx.data::<Resolvers>()?;
        Ok(resolvers.top_new_certified_developers(i64::from(first)).await)
    }

    /// The latest "This Week in Neo4j" digest.
    #[graphql(name = "thisWeekInNeo4j")]
    async fn this_week_in_neo4j(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<Twin4jContent>> {
        let resolvers = ctx.data::<Resolvers>()?;
        Ok(resolvers.this_week_in_neo4j().await)
    }
}

// Keep the schema default in step with the gateway default.
const _: () = assert!(DEFAULT_FIRST == 10);
