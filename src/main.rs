//! roster - entry point
//!
//! Bootstrap order: config, logging, database (with schema bootstrap),
//! then the gateway. Everything the components need is constructed here
//! once and passed down; no globals.

use std::sync::Arc;

use roster::auth::{AuthService, CredentialStore, TokenService};
use roster::config::AppConfig;
use roster::gateway::{self, state::AppState};
use roster::{Database, logging};

fn get_env() -> String {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if (args[i] == "--env" || args[i] == "-e") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }
    "dev".to_string()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env = get_env();
    let config = AppConfig::load(&env);
    let _log_guard = logging::init_logging(&config);

    tracing::info!(
        "starting roster v{} ({}) env={}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env
    );

    let db = Arc::new(
        Database::connect(&config.database.url, config.database.max_connections).await?,
    );
    db.init_schema().await?;

    let credentials = CredentialStore::new(
        config.auth.hash.memory_kib,
        config.auth.hash.iterations,
        config.auth.hash.parallelism,
    )?;
    let tokens = TokenService::new(&config.auth.secret, config.auth.token_ttl_minutes);
    let auth = AuthService::new(db.pool().clone(), credentials, tokens);

    let state = Arc::new(AppState::new(db, auth, config.auth.secret.clone()));

    gateway::run_server(config, state).await
}
