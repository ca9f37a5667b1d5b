//! Opaque response behavior attached to a fixture.

use std::future::Future;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;

/// Produces the response for a request that hit a fixture's route.
///
/// The registry never looks inside a handler; it only stores it and binds it
/// to a route when a server is built. Closures of the shape
/// `|req: Request<Body>| async move { ... }` returning anything that
/// implements [`IntoResponse`] are handlers.
pub trait ResponseHandler: Send + Sync + 'static {
    fn respond(&self, request: Request<Body>) -> BoxFuture<'static, Response>;
}

impl<F, Fut, R> ResponseHandler for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse,
{
    fn respond(&self, request: Request<Body>) -> BoxFuture<'static, Response> {
        let fut = (self)(request);
        Box::pin(async move { fut.await.into_response() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_closure_is_handler() {
        let handler = |_req: Request<Body>| async { (StatusCode::CREATED, "made") };
        let response = handler.respond(Request::new(Body::empty())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"made");
    }

    #[tokio::test]
    async fn test_handler_sees_request() {
        let handler = |req: Request<Body>| async move { req.uri().path().to_string() };
        let request = Request::builder().uri("/echo/path").body(Body::empty()).unwrap();
        let response = handler.respond(request).await;

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"/echo/path");
    }
}
