//! community-graph-api: serves the community GraphQL API over HTTP.
//!
//! Parses configuration, initializes logging, connects to Neo4j and serves
//! the schema until Ctrl-C.

mod config;

use async_graphql::http::{playground_source, GraphQLPlaygroundConfig};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use clap::Parser;
use community_graph::{build_schema, CommunitySchema, Neo4jStore, ResultCache, Resolvers};
use config::Config;
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();
    let config = Config::parse();
    config.validate()?;

    let store = Neo4jStore::connect(&config.neo4j_uri, &config.neo4j_user, &config.neo4j_password).await?;
    let resolvers = Resolvers::new(Arc::new(store), Arc::new(ResultCache::new()));
    let schema = build_schema(resolvers);

    let app = Router::new()
        .route("/", get(graphql_playground).post(graphql_handler))
        .with_state(schema);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("GraphQL API ready at http://{addr}/");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("shutdown");
    Ok(())
}

fn setup_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

async fn graphql_handler(State(schema): State<CommunitySchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphql_playground() -> impl IntoResponse {
    Html(playground_source(GraphQLPlaygroundConfig::new("/")))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to install Ctrl-C handler: {e}");
        std::future::pending::<()>().await;
    }
}
