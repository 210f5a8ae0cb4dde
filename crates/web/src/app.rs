//! Router assembly and serving.
//!
//! Shared by the binary and the integration tests so both run the exact same
//! middleware stack.

use std::future::Future;

use axum::{Router, ServiceExt, extract::Request, middleware::from_fn};
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionStore;

use crate::middleware::{create_session_layer, method_override_middleware, request_id_middleware};
use crate::routes;
use crate::state::AppState;

/// Build the full application router over the given session store.
///
/// Layers, innermost first: session, request ID, tracing, Sentry.
pub fn build_router<S>(state: AppState, session_store: S) -> Router
where
    S: SessionStore + Clone,
{
    let session_layer = create_session_layer(session_store, state.config());

    routes::routes()
        .layer(session_layer)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                )
            }),
        )
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Serve `router` on `listener` until `shutdown` resolves.
///
/// The method override wraps the router from outside so that rewritten
/// methods are seen by route matching.
///
/// # Errors
///
/// Returns an I/O error if the server fails.
pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = from_fn(method_override_middleware).layer(router);

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown)
        .await
}
