use std::env;

use crate::env_or;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub addr: String,
    pub metrics_addr: String,
    pub database_url: Option<String>,
    pub database_max_connections: u32,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            addr: env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            metrics_addr: env::var("METRICS_ADDR").unwrap_or_else(|_| "0.0.0.0:9090".to_string()),
            database_url: env::var("DATABASE_URL").ok(),
            database_max_connections: env_or("DATABASE_MAX_CONNECTIONS", 10),
        }
    }
}
