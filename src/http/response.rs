//! Canned responses.
//!
//! # Responsibilities
//! - Hold a fixed status, header set and body
//! - Serve it unchanged for every request
//! - Build itself from a validated `ResponseSpec`
//!
//! # Design Decisions
//! - JSON bodies get `application/json`, text bodies `text/plain`
//! - Explicit headers override the default content type
//! - Body bytes are shared, so each response is a cheap clone

use axum::body::{Body, Bytes};
use axum::http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::response::Response;
use futures_util::future::{self, BoxFuture};

use crate::config::schema::ResponseSpec;
use crate::config::validation::{validate_response, ValidationError};
use crate::fixture::ResponseHandler;

/// A response that is the same for every request.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl StaticResponse {
    /// An empty response with the given status.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        let mut response = Self::new(status);
        response.body = Bytes::from(body.into());
        response.headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }

    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        let mut response = Self::new(status);
        response.body = Bytes::from(body.to_string());
        response
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Build from a file spec, reporting every problem at once.
    pub fn from_spec(spec: &ResponseSpec) -> Result<Self, Vec<ValidationError>> {
        let parts = validate_response(spec)?;

        let mut response = match (&spec.body, &spec.json) {
            (_, Some(json)) => Self::json(parts.status, json),
            (Some(body), None) => Self::text(parts.status, body.clone()),
            (None, None) => Self::new(parts.status),
        };
        for (name, value) in parts.headers {
            if let Some(name) = name {
                response = response.with_header(name, value);
            }
        }

        Ok(response)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

impl ResponseHandler for StaticResponse {
    fn respond(&self, _request: Request<Body>) -> BoxFuture<'static, Response> {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        Box::pin(future::ready(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spec_json() {
        let spec = ResponseSpec {
            json: Some(serde_json::json!([{ "data": true }])),
            ..ResponseSpec::default()
        };
        let response = StaticResponse::from_spec(&spec).unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
        assert_eq!(&response.body()[..], br#"[{"data":true}]"#);
    }

    #[test]
    fn test_headers_override_content_type() {
        let mut spec = ResponseSpec {
            status: 500,
            body: Some("Rejected!".into()),
            ..ResponseSpec::default()
        };
        spec.headers.insert("content-type".into(), "text/html".into());

        let response = StaticResponse::from_spec(&spec).unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/html");
    }

    #[tokio::test]
    async fn test_serves_same_response_every_time() {
        let fixture = StaticResponse::text(StatusCode::ACCEPTED, "queued");

        for _ in 0..2 {
            let response = fixture.respond(Request::new(Body::empty())).await;
            assert_eq!(response.status(), StatusCode::ACCEPTED);
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&body[..], b"queued");
        }
    }
}
