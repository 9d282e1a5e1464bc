use axum::{middleware, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use ttodo_api::database::manager::DatabaseManager;
use ttodo_api::level::{seed, LevelTable, LevelTableError};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SECURITY_JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = ttodo_api::config::config();
    tracing::info!("Starting TTODO API in {:?} mode", config.environment);

    tracing_subscriber::fmt::init();

    match bootstrap().await {
        Ok(()) => {}
        // A malformed level table is a configuration error: refuse to start
        // rather than fail on every request.
        Err(LevelTableError::Database(e)) => {
            tracing::warn!("database unavailable at startup, continuing degraded: {}", e);
        }
        Err(e) => {
            eprintln!("level table misconfigured: {e}");
            std::process::exit(1);
        }
    }

    let app = app();

    // Allow tests or deployments to override port via env
    let port = std::env::var("TTODO_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("🚀 TTODO API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

/// Ensure schema, seed the default ladder on first boot, then load and
/// validate the level table into its init-once global.
async fn bootstrap() -> Result<(), LevelTableError> {
    DatabaseManager::ensure_schema().await?;

    let pool = DatabaseManager::pool().await?;
    seed::seed_default_levels(&pool).await?;

    let table = LevelTable::load(&pool).await?;
    LevelTable::initialize(table);
    Ok(())
}

fn app() -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn api_routes() -> Router {
    use ttodo_api::handlers::{experience, levels};

    Router::new()
        // Level ladder (static reference data)
        .route("/api/levels", get(levels::levels_get))
        // Experience queries and grants
        .route(
            "/api/members/:member_id/experience",
            get(experience::progress_get).post(experience::grant_post),
        )
        .layer(middleware::from_fn(
            ttodo_api::middleware::auth::jwt_auth_middleware,
        ))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "TTODO API (Rust)",
            "version": version,
            "description": "Habit tracking backend with experience/level progression, built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "levels": "/api/levels (protected)",
                "experience": "/api/members/:member_id/experience (protected - GET progress, POST grant)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
