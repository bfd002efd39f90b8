//! HTTP server facade for booklens with Axum, error handling, and OpenAPI support.

use anyhow::Context;
use axum::{routing::get, Router};

use booklens_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

use router::RouterBuilder;

/// Identifier returned by `/api/info`.
pub const SERVICE_INFO: &str = "booklens-api-v1";

/// Serve the registry's routes until ctrl-c
pub async fn start_server(registry: &ModuleRegistry, settings: &Settings) -> anyhow::Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    tracing::info!("starting HTTP server on {}", addr);

    let app = build_router(registry, settings);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, settings: &Settings) -> Router {
    let mut router_builder = RouterBuilder::new()
        .route("/healthz", get(health_check))
        .route("/api/ping", get(ping))
        .route("/api/info", get(info));

    for module in registry.modules() {
        let module_name = module.name();
        tracing::info!(
            module = module_name,
            "mounting module routes under /api/{}",
            module_name
        );
        router_builder = router_builder.mount_module(module_name, module.routes());
    }

    // Layers wrap the routes registered above
    router_builder
        .with_openapi(registry)
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(settings.server.request_timeout_ms)
        .build()
}

async fn health_check() -> &'static str {
    "ok"
}

async fn ping() -> &'static str {
    "pong"
}

async fn info() -> &'static str {
    SERVICE_INFO
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn get_text(uri: &str) -> (StatusCode, String) {
        let router = build_router(&ModuleRegistry::new(), &Settings::default());
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        assert_eq!(get_text("/api/ping").await, (StatusCode::OK, "pong".to_string()));
    }

    #[tokio::test]
    async fn info_names_the_service() {
        assert_eq!(
            get_text("/api/info").await,
            (StatusCode::OK, SERVICE_INFO.to_string())
        );
    }

    #[tokio::test]
    async fn healthz_and_openapi_are_served() {
        assert_eq!(get_text("/healthz").await, (StatusCode::OK, "ok".to_string()));

        let (status, body) = get_text("/docs/openapi.json").await;
        assert_eq!(status, StatusCode::OK);
        let spec: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(spec["info"]["title"], "booklens API");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = get_text("/api/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
