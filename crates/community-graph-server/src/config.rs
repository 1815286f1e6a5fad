//! Server configuration from flags and environment.

use clap::Parser;
use community_graph::GraphError;
use std::net::{IpAddr, SocketAddr};

/// Startup settings. Every flag falls back to an environment variable.
#[derive(Parser, Debug, Clone)]
#[command(name = "community-graph-api", version, about = "Community graph GraphQL API")]
pub struct Config {
    /// Bolt URI of the Neo4j server
    #[arg(long, env = "NEO4J_URI", default_value = "bolt://localhost:7687")]
    pub neo4j_uri: String,

    /// Neo4j user
    #[arg(long, env = "NEO4J_USER", default_value = "neo4j")]
    pub neo4j_user: String,

    /// Neo4j password
    #[arg(long, env = "NEO4J_PASSWORD", default_value = "neo4j", hide_env_values = true)]
    pub neo4j_password: String,

    /// Address to listen on
    #[arg(long, env = "GRAPHQL_LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    /// Port to listen on
    #[arg(long, env = "GRAPHQL_LISTEN_PORT", default_value_t = 4001)]
    pub port: u16,
}

impl Config {
    /// Reject settings that cannot work.
    pub fn validate(&self) -> Result<(), GraphError> {
        if self.neo4j_uri.trim().is_empty() {
            return Err(GraphError::Configuration {
                message: "NEO4J_URI must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Socket address the HTTP server binds.
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
