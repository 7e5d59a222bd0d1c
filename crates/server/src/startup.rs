use std::{net::SocketAddr, sync::Arc};

use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use dotenvy::dotenv;
use migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::customer::repo::seaorm::SeaOrmCustomerRepository;
use service::customer::CustomerService;
use service::hash::Argon2Hasher;
use service::token::TokenIssuer;

use crate::routes::{self, auth::ServerState};

/// Initialize logging via shared common utils; LOG_FORMAT=json selects
/// structured output for container deployments.
fn init_logging() {
    match std::env::var("LOG_FORMAT").as_deref() {
        Ok("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = configs::AppConfig::load_and_validate()?;

    // DB connection + schema
    let db = models::db::connect_with(&cfg.database).await?;
    migration::Migrator::up(&db, None).await?;
    info!("database migrations applied");

    // Blob store for profile images
    let blobs = storage::from_config(&cfg.storage).await?;

    let repo = Arc::new(SeaOrmCustomerRepository { db });
    let customers = Arc::new(CustomerService::new(
        repo,
        Arc::new(Argon2Hasher),
        blobs,
        cfg.storage.customer_bucket.clone(),
    ));
    let tokens = Arc::new(TokenIssuer::new(
        cfg.auth.jwt_secret.clone(),
        cfg.auth.token_ttl_hours,
    ));
    let state = ServerState { customers, tokens };

    // Build router
    let app: Router = routes::build_router(state, build_cors());

    // Bind and serve
    let addr: SocketAddr = format!("{}:{}", cfg.server.host, cfg.server.port).parse()?;
    info!(%addr, "starting customer api");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
