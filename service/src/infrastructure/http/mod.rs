use anyhow::Context;
use axum::Router;
use axum::routing::{delete, get, put};
use axum_prometheus::PrometheusMetricLayer;
use tokio::net;
use tokio::signal;

use crate::domain::AppState;
use crate::infrastructure::http::handlers::{game, health_check, stories, votes};

mod admin;
mod api;
mod handlers;
mod json;
mod querystring;

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpServerConfig {
    pub port: u16,
}

/// The application's HTTP server. The underlying HTTP package is opaque to module consumers.
pub struct HttpServer {
    router: axum::Router,
    listener: net::TcpListener,
}

impl HttpServer {
    /// Returns a new HTTP server bound to the port specified in `config`.
    pub async fn new(state: impl AppState, config: HttpServerConfig) -> anyhow::Result<Self> {
        let trace_layer = tower_http::trace::TraceLayer::new_for_http().make_span_with(
            |request: &axum::extract::Request<_>| {
                let uri = request.uri().to_string();
                tracing::info_span!("http_request", method = ?request.method(), uri)
            },
        );
        // see: https://github.com/Ptrskay3/axum-prometheus
        let (prometheus_layer, metric_handle) = PrometheusMetricLayer::pair();

        let router = router(state)
            .route("/metrics", get(|| async move { metric_handle.render() }))
            .layer(trace_layer)
            .layer(prometheus_layer);

        let listener = net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
            .await
            .with_context(|| format!("failed to listen on {}", config.port))?;

        Ok(Self { router, listener })
    }

    /// Runs the HTTP server until ctrl-c or SIGTERM.
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("listening on {}", self.listener.local_addr()?);
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("received error from running server")?;
        tracing::info!("server stopped");
        Ok(())
    }
}

fn router<S: AppState>(state: S) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

fn api_routes<S: AppState>() -> Router<S> {
    Router::new()
        .route(
            "/stories",
            get(stories::list_stories::<S>).post(stories::create_story::<S>),
        )
        .route("/stories/{id}/approve", put(stories::approve_story::<S>))
        .route("/stories/{id}/reject", put(stories::reject_story::<S>))
        .route("/admin/stories", get(stories::moderation_overview::<S>))
        .route(
            "/votes",
            get(votes::list_votes::<S>).post(votes::submit_vote::<S>),
        )
        .route("/votes/progress", get(votes::voter_progress::<S>))
        .route("/participation", get(game::participation_report::<S>))
        .route("/results", get(game::results::<S>))
        .route("/reset", delete(game::reset::<S>))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {}", err);
            std::future::pending::<()>().await;
        }
        tracing::info!("received ctrl-c, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!("failed to install signal handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::Router;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use axum::response::Response;
    use hallostories_common::GameSnapshot;
    use hallostories_common::test_utils::{approved_story, pending_story};
    use serde_json::Value;

    use crate::infrastructure::AppStateImpl;
    use crate::infrastructure::persistence::memory::InMemoryGameRepository;

    pub const ADMIN_PASSWORD: &str = "boo";

    pub fn app() -> Router {
        super::router(AppStateImpl::new(InMemoryGameRepository::new(), ADMIN_PASSWORD))
    }

    /// Alice and Bob have approved stories `a` and `b`, Paul's `p` is pending.
    pub fn seeded_app() -> Router {
        let repository = InMemoryGameRepository::from_snapshot(GameSnapshot {
            stories: vec![
                approved_story("a", "Alice", true),
                approved_story("b", "Bob", false),
                pending_story("p", "Paul", true),
            ],
            votes: Vec::new(),
        });
        super::router(AppStateImpl::new(repository, ADMIN_PASSWORD))
    }

    pub fn post_vote(body: Value) -> Request<Body> {
        Request::post("/api/votes")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub async fn read_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_check_is_ok() {
        use tower::ServiceExt;

        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
