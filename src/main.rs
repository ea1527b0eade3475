use axum::{middleware::from_fn, routing::get, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use jot_api::database::manager;
use jot_api::handlers;
use jot_api::middleware::session_auth_middleware;
use jot_api::state::AppState;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jot_api=info,tower_http=info".into()),
        )
        .init();

    let config = jot_api::config::config();
    tracing::info!("Starting Jot API in {:?} mode", config.environment);

    let pool = manager::connect()
        .await
        .unwrap_or_else(|e| panic!("failed to connect database: {}", e));
    manager::ensure_schema(&pool)
        .await
        .unwrap_or_else(|e| panic!("failed to ensure schema: {}", e));

    let state = AppState::new(pool);
    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("JOT_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("Jot API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}

fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API behind session middleware
        .merge(api_routes())
        // Global middleware
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    use jot_api::config::{config, Environment};

    match config().environment {
        Environment::Development => CorsLayer::permissive(),
        Environment::Production => {
            let origins: Vec<axum::http::HeaderValue> = config()
                .security
                .cors_origins
                .iter()
                .filter_map(|o| o.parse().ok())
                .collect();
            CorsLayer::new()
                .allow_origin(tower_http::cors::AllowOrigin::list(origins))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
    }
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        // Session token issuance (identity verified upstream by the provider)
        .route("/auth/session", post(auth::session_create))
}

fn api_routes() -> Router<AppState> {
    use axum::routing::delete;
    use handlers::protected::{auth, dashboard, notes};

    Router::new()
        // Session introspection and teardown
        .route("/api/auth/whoami", get(auth::session_whoami))
        .route("/api/auth/session", delete(auth::session_logout))
        // Note CRUD
        .route(
            "/api/notes",
            get(notes::notes_get).post(notes::notes_post),
        )
        .route("/api/notes/:id", delete(notes::note_delete))
        // Cached dashboard view
        .route("/api/dashboard", get(dashboard::dashboard_get))
        .layer(from_fn(session_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Jot API",
            "version": version,
            "description": "Personal notes backend with session auth",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "session": "/auth/session (public - token acquisition)",
                "auth": "/api/auth/* (protected - session management)",
                "notes": "/api/notes[/:id] (protected)",
                "dashboard": "/api/dashboard (protected - cached view)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match manager::health_check(&state.pool).await {
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
