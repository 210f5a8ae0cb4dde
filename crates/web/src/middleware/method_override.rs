//! HTML method override.
//!
//! Browsers can only submit `GET` and `POST` forms. A `POST` carrying a
//! `_method` query parameter (`?_method=DELETE`) is rewritten to that method
//! before routing, so the router only ever sees the intended verb.
//!
//! This must wrap the router from the outside: a layer added with
//! `Router::layer` runs after route matching.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};

/// Query parameter carrying the overriding method.
pub const METHOD_PARAM: &str = "_method";

/// Rewrite the request method from the `_method` query parameter.
pub async fn method_override_middleware(mut request: Request, next: Next) -> Response {
    if request.method() == Method::POST
        && let Some(method) = requested_method(request.uri().query())
    {
        tracing::debug!(%method, path = %request.uri().path(), "method override");
        *request.method_mut() = method;
    }

    next.run(request).await
}

fn requested_method(query: Option<&str>) -> Option<Method> {
    let query = query?;
    let value = url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == METHOD_PARAM)
        .map(|(_, value)| value.to_ascii_uppercase())?;

    // Only verbs a form cannot send directly.
    match value.as_str() {
        "DELETE" => Some(Method::DELETE),
        "PUT" => Some(Method::PUT),
        "PATCH" => Some(Method::PATCH),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware,
        routing::{delete, post},
    };
    use tower::{Layer, ServiceExt};

    use super::*;

    #[test]
    fn test_requested_method() {
        assert_eq!(requested_method(Some("_method=DELETE")), Some(Method::DELETE));
        assert_eq!(requested_method(Some("a=1&_method=delete")), Some(Method::DELETE));
        assert_eq!(requested_method(Some("_method=GET")), None);
        assert_eq!(requested_method(Some("other=DELETE")), None);
        assert_eq!(requested_method(None), None);
    }

    async fn send(method: Method, uri: &str) -> StatusCode {
        let router = Router::new()
            .route("/things", post(|| async { "posted" }))
            .route("/things/{id}", delete(|| async { "deleted" }));
        let app = middleware::from_fn(method_override_middleware).layer(router);

        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_post_with_override_reaches_delete_route() {
        assert_eq!(
            send(Method::POST, "/things/1?_method=DELETE").await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_post_without_override_is_not_delete() {
        assert_eq!(
            send(Method::POST, "/things/1").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_get_is_never_overridden() {
        assert_eq!(
            send(Method::GET, "/things/1?_method=DELETE").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }
}
