mod app;
mod auth;
mod config;
mod db;
mod docs;
mod error;
mod extract;
mod handlers;
mod posts;
mod response;

use axum::http::HeaderValue;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::build_router;
use auth::jwt::JwtManager;
use auth::services::AuthService;
use config::Config;
use db::Repositories;

pub fn setup_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Defaults when RUST_LOG is not set
        tracing_subscriber::EnvFilter::new(
            "info,blog_server=debug,hyper_util=warn,tower_http=info",
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_repositories(config: &Config) -> anyhow::Result<Repositories> {
    match &config.database_url {
        Some(url) => {
            let pool = db::connection::create_pool(url)?;
            Ok(Repositories::postgres(&pool))
        }
        None => Ok(Repositories::in_memory()),
    }
}

fn seed_owner(config: &Config, jwt_manager: &JwtManager, repositories: &Repositories) {
    let Some(owner) = &config.owner else {
        tracing::debug!("ADMIN_USERNAME/ADMIN_PASSWORD not set, skipping owner seeding");
        return;
    };

    let service = AuthService::new(jwt_manager.clone(), repositories);
    match service.ensure_owner(&owner.username, &owner.password) {
        Ok(Some(_)) => {}
        Ok(None) => tracing::debug!("Owner account already present"),
        Err(e) => tracing::error!("Failed to seed owner account: {e}"),
    }
}

// ----------------- Main -----------------

#[tokio::main]
async fn main() -> Result<(), lambda_http::Error> {
    setup_logging();
    tracing::info!("Starting blog-server...");

    let config = Config::from_env()?;
    let repositories = open_repositories(&config)?;
    let jwt_manager = JwtManager::new(&config.jwt_secret, config.jwt_expiration_hours);

    seed_owner(&config, &jwt_manager, &repositories);

    let cors_origin = HeaderValue::from_str(&config.frontend_url)
        .ok()
        .filter(|origin| !origin.is_empty());
    let app = build_router(jwt_manager, &repositories, cors_origin);

    if config.is_production() && std::env::var("AWS_LAMBDA_FUNCTION_NAME").is_ok() {
        tracing::info!("Running in Lambda mode");
        lambda_http::run(app).await
    } else {
        tracing::info!("Running in local HTTP server mode");
        let addr = format!("{}:{}", config.server_host, config.server_port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;
        tracing::info!("🚀 Server running at http://{}", addr);
        axum::serve(listener, app).await?;

        Ok(())
    }
}
