//! HTTP API for team rosters, schedules, stats and media
//!
//! Every protected route passes through [`middleware::require_auth`]; list
//! reads are scoped by team membership in SQL and mutations are gated by the
//! checks in [`authz`].

pub mod authz;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod upload;
pub mod validation;

use std::{
    future::Future,
    net::SocketAddr,
    path::PathBuf,
    sync::Arc,
};

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use dugout_auth::TokenIssuer;

pub use authz::OwnershipPolicy;
pub use error::ApiError;

/// Application state shared across handlers
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenIssuer>,
    /// Directory uploaded files are written to and served from
    pub upload_dir: PathBuf,
    pub ownership: OwnershipPolicy,
    pub max_upload_bytes: usize,
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Dugout API",
        version = "0.1.0",
        description = "REST API for youth baseball team management",
        contact(
            name = "Dugout Team",
            email = "team@dugout.app"
        )
    ),
    paths(
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::profile,
        handlers::teams::list_teams,
        handlers::players::list_players,
        handlers::players::create_player,
        handlers::games::list_games,
        handlers::games::create_game,
        handlers::stats::list_stats,
        handlers::stats::create_stat,
        handlers::media::list_media,
        handlers::media::upload_media,
        handlers::system::health_check,
    ),
    components(
        schemas(
            models::ErrorResponse,
            models::FieldError,
            models::RegisterRequest,
            models::LoginRequest,
            models::UserInfo,
            models::AuthResponse,
            models::TeamMembershipInfo,
            models::ProfileResponse,
            models::CreatePlayerRequest,
            models::Player,
            models::CreateGameRequest,
            models::Game,
            models::CreateStatRequest,
            models::PlayerStat,
            models::MediaUploadForm,
            models::Media,
            models::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registration, login and profile"),
        (name = "teams", description = "Team memberships"),
        (name = "players", description = "Team rosters"),
        (name = "games", description = "Team schedules"),
        (name = "stats", description = "Per-game player stats"),
        (name = "media", description = "Photo and video uploads"),
        (name = "system", description = "System health and info endpoints")
    )
)]
struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
    /// Allowed CORS origins (if None, allows all)
    pub cors_origins: Option<Vec<String>>,
    pub upload_dir: PathBuf,
    pub ownership: OwnershipPolicy,
    /// Largest accepted media file
    pub max_upload_bytes: usize,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 5000)),
            enable_cors: true,
            cors_origins: None,
            upload_dir: PathBuf::from("uploads"),
            ownership: OwnershipPolicy::default(),
            max_upload_bytes: upload::MAX_UPLOAD_BYTES,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(config: ApiServerConfig, db: DatabaseConnection, tokens: TokenIssuer) -> Self {
        let state = Arc::new(AppState {
            db,
            tokens: Arc::new(tokens),
            upload_dir: config.upload_dir.clone(),
            ownership: config.ownership,
            max_upload_bytes: config.max_upload_bytes,
        });

        Self { config, state }
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let guard = middleware::GuardState::new(self.state.tokens.clone());
        let body_limit = self.state.max_upload_bytes + upload::FORM_OVERHEAD_BYTES;

        // Build PUBLIC routes (no authentication required)
        let public_router = Router::new()
            .route("/health", get(handlers::system::health_check))
            .route("/openapi.json", get(handlers::system::openapi_json))
            .route("/auth/register", post(handlers::auth::register))
            .route("/auth/login", post(handlers::auth::login))
            .with_state(self.state.clone());

        // Build PROTECTED routes (require a bearer token)
        let protected_router = Router::new()
            .route("/auth/profile", get(handlers::auth::profile))
            .route("/teams", get(handlers::teams::list_teams))
            .route(
                "/players",
                get(handlers::players::list_players).post(handlers::players::create_player),
            )
            .route(
                "/games",
                get(handlers::games::list_games).post(handlers::games::create_game),
            )
            .route(
                "/stats",
                get(handlers::stats::list_stats).post(handlers::stats::create_stat),
            )
            .route("/media", get(handlers::media::list_media))
            .route(
                "/media/upload",
                post(handlers::media::upload_media).layer(DefaultBodyLimit::max(body_limit)),
            )
            .with_state(self.state.clone())
            .route_layer(axum_middleware::from_fn_with_state(
                guard,
                middleware::require_auth,
            ));

        let router = Router::new()
            .merge(public_router)
            .merge(protected_router)
            .nest_service(upload::UPLOADS_PREFIX, ServeDir::new(&self.state.upload_dir));

        let mut router = router.layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            router = router.layer(self.cors_layer());
        }

        router
    }

    fn cors_layer(&self) -> CorsLayer {
        let layer = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

        match &self.config.cors_origins {
            Some(origins) => {
                let allowed: Vec<HeaderValue> = origins
                    .iter()
                    .filter_map(|origin| match HeaderValue::from_str(origin) {
                        Ok(value) => Some(value),
                        Err(_) => {
                            warn!("Ignoring invalid CORS origin '{}'", origin);
                            None
                        }
                    })
                    .collect();
                layer.allow_origin(AllowOrigin::list(allowed))
            }
            None => layer.allow_origin(Any),
        }
    }

    /// Start the API server, stopping on Ctrl-C
    pub async fn start(self) -> Result<(), anyhow::Error> {
        self.start_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Start the API server, stopping when `shutdown` resolves
    pub async fn start_with_shutdown<F>(self, shutdown: F) -> Result<(), anyhow::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        tokio::fs::create_dir_all(&self.state.upload_dir).await?;
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI document: http://{}/openapi.json",
            self.config.bind_addr
        );
        info!("Serving uploads from {}", self.state.upload_dir.display());

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("API server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_generation() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).unwrap();

        for path in ["/auth/register", "/players", "/media/upload", "/health"] {
            assert!(json["paths"].get(path).is_some(), "missing {}", path);
        }
        assert!(json["components"]["securitySchemes"]
            .get("bearer_auth")
            .is_some());
    }
}
