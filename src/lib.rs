pub mod api;
pub mod auth;
pub mod cli;
pub mod db;
pub mod password;

use api::create_api_router;
use auth::AuthSettings;
use axum::{
    Router,
    http::{Method, Request, header},
};
use db::Database;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Token lifetime and lookup-miss delay
    pub auth: AuthSettings,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let auth = Arc::new(config.auth.clone());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request<_>| {
        tracing::info_span!("http_request", method = %req.method(), uri = %req.uri().path())
    });

    create_api_router(config.db.clone(), auth).layer(ServiceBuilder::new().layer(trace).layer(cors))
}

/// Run the server on the given listener. This function blocks until the server exits.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app).await
}
