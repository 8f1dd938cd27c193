//! HTTP endpoint serving the rendered graph and a small viewer page.
//!
//! The graph and assignment map are frozen before the server starts and
//! shared read-only across requests; every request renders afresh.
use crate::assigned::AssignedConfig;
use crate::errors::KconfigGraphError;
use crate::graph::SymbolGraph;
use crate::visualization;
use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const DEFAULT_ADDR: &str = "127.0.0.1:8080";
pub const DOT_PATH: &str = "/kconfigMap.dot";

const INDEX_HTML: &str = include_str!("../../assets/index.html");

#[derive(Debug, Clone)]
pub struct AppState {
    graph: Arc<SymbolGraph>,
    assigned: Arc<AssignedConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(graph: SymbolGraph, assigned: AssignedConfig) -> Self {
        Self { graph: Arc::new(graph), assigned: Arc::new(assigned) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new().route("/", get(index)).route(DOT_PATH, get(dot)).with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn dot(State(state): State<AppState>) -> impl IntoResponse {
    let body = visualization::render(&state.graph, &state.assigned);
    ([(header::CONTENT_TYPE, "text/vnd.graphviz; charset=utf-8")], body)
}

/// Serve on an already bound listener until the server fails.
///
/// # Errors
/// Returns `KconfigGraphError::Serve` if the server loop stops with an error.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), KconfigGraphError> {
    axum::serve(listener, router(state)).await.map_err(|e| KconfigGraphError::Serve(e.to_string()))
}

/// Bind `addr`, call `on_bound` with the actual address, then serve forever
/// on a fresh tokio runtime.
///
/// # Errors
/// Returns `KconfigGraphError` if the runtime cannot start, binding fails, or
/// the server stops with an error.
pub fn run_blocking<F>(addr: &str, state: AppState, on_bound: F) -> Result<(), KconfigGraphError>
where
    F: FnOnce(SocketAddr),
{
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| KconfigGraphError::Serve(format!("failed to bind {addr}: {e}")))?;
        on_bound(listener.local_addr()?);
        serve(listener, state).await
    })
}
