use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use cvi_api::api;
use cvi_api::auth::jwt::JwtTokenProvider;
use cvi_api::auth::oauth::SocialAuthClients;
use cvi_api::config::Config;
use cvi_api::infrastructure::public_data::PublicDataClient;
use cvi_api::infrastructure::repositories::InMemoryStore;
use cvi_api::services::scheduler;
use cvi_api::state::{AppState, Repositories};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cvi_api=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let repositories = match &config.database_url {
        Some(database_url) => {
            tracing::info!("Connecting to database...");
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(database_url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            tracing::info!("Database connected and migrated");
            Repositories::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, data is kept in memory only");
            Repositories::in_memory(InMemoryStore::new())
        }
    };

    let http = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;
    let social = SocialAuthClients::from_config(
        http.clone(),
        config.kakao.clone(),
        config.naver.clone(),
    );
    let source = Arc::new(PublicDataClient::new(http, &config.public_data));
    let tokens = JwtTokenProvider::new(config.jwt_secret.clone(), config.jwt_expiry_hours);

    let state = AppState::new(repositories, social, source, tokens);
    scheduler::spawn(state.public_data.clone(), config.public_data.schedule.clone());

    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
