//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum Router for the configured service
//! - Wire up middleware (request ID, tracing, timeout, body limit, CORS, metrics)
//! - Bind server to listener and serve until shutdown

use std::time::Duration;

use axum::http::HeaderValue;
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::{CorsConfig, ServiceConfig, ServiceKind};
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, trace_layer};
use crate::http::{chat, fruits, hello, middleware::track_metrics, users};
use crate::inference::InferenceError;
use crate::lifecycle::Shutdown;
use crate::store::{BasicFruit, Fruit, FruitStore};

/// HTTP server for one demo service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a server for `config.service`.
    ///
    /// `shutdown` is shared with long-lived connections (chat sessions) so
    /// they close when the server stops.
    pub fn new(config: ServiceConfig, shutdown: Shutdown) -> Result<Self, InferenceError> {
        let routes = Self::service_routes(&config, shutdown)?;
        let router = Self::build_router(&config, routes);
        Ok(Self { router, config })
    }

    fn service_routes(config: &ServiceConfig, shutdown: Shutdown) -> Result<Router, InferenceError> {
        let routes = match config.service {
            ServiceKind::Hello => hello::router(&config.hello),
            ServiceKind::Fruits => fruits::router(FruitStore::<BasicFruit>::new()),
            ServiceKind::FruitsDetailed => fruits::router(FruitStore::<Fruit>::new()),
            ServiceKind::Users => users::router(users::UsersState::from_config(&config.users)),
            ServiceKind::Chat => chat::router(chat::ChatState::from_config(&config.chat, shutdown)?),
        };
        Ok(routes)
    }

    /// Wrap service routes with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(config: &ServiceConfig, routes: Router) -> Router {
        let mut router = routes.route_layer(middleware::from_fn(track_metrics));

        if config.cors.enabled {
            router = router.layer(cors_layer(&config.cors));
        }

        router
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(propagate_request_id_layer())
                    .layer(trace_layer())
                    .layer(RequestBodyLimitLayer::new(config.security.max_body_size)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service = %self.config.service,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, e.g. for in-process requests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// CORS for the configured origins, with credentials.
///
/// Methods and headers mirror the preflight request because wildcards are
/// not allowed together with credentials.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_request_id_generated_and_propagated() {
        let server = HttpServer::new(ServiceConfig::default(), Shutdown::new()).unwrap();
        let response = server
            .router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_cors_preflight_for_allowed_origin() {
        let config = ServiceConfig {
            service: ServiceKind::Fruits,
            ..ServiceConfig::default()
        };
        let server = HttpServer::new(config, Shutdown::new()).unwrap();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/fruits")
            .header("origin", "http://localhost:5173")
            .header("access-control-request-method", "POST")
            .body(Body::empty())
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:5173"
        );
        assert_eq!(
            response.headers().get("access-control-allow-credentials").unwrap(),
            "true"
        );
    }

    #[tokio::test]
    async fn test_body_passes_limit_and_timeout_layers() {
        let config = ServiceConfig {
            service: ServiceKind::Fruits,
            ..ServiceConfig::default()
        };
        let server = HttpServer::new(config, Shutdown::new()).unwrap();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/fruits")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name": "fig"}"#))
            .unwrap();

        let response = server.router().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let config = ServiceConfig {
            service: ServiceKind::Users,
            ..ServiceConfig::default()
        };
        let server = HttpServer::new(config, Shutdown::new()).unwrap();
        let response = server
            .router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
