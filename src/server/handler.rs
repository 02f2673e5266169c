// src/server/handler.rs
use hyper::{header, Body, Method, Request, Response, StatusCode};
use std::sync::Arc;
use tower::Service;

use crate::health::StatusCache;

const STATUS_PREFIX: &str = "/status";

/// Serves the cached statuses as JSON.
#[derive(Clone)]
pub struct RequestHandler {
    cache: Arc<StatusCache>,
}

impl RequestHandler {
    pub fn new(cache: Arc<StatusCache>) -> Self {
        Self { cache }
    }

    pub fn handle(&self, req: &Request<Body>) -> Result<Response<Body>, ApiError> {
        if req.method() != Method::GET {
            return Err(ApiError::MethodNotAllowed);
        }

        let path = req.uri().path().trim_end_matches('/');
        let body = if path == STATUS_PREFIX {
            serde_json::to_vec(self.cache.snapshot().as_ref())?
        } else if let Some(id) = path.strip_prefix("/status/") {
            serde_json::to_vec(self.cache.get(id).as_ref())?
        } else {
            return Err(ApiError::NotFound);
        };

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?)
    }
}

impl Service<Request<Body>> for RequestHandler {
    type Response = Response<Body>;
    type Error = std::convert::Infallible;
    type Future = futures::future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &mut self,
        _cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        std::task::Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let response = self.handle(&req).unwrap_or_else(|e| {
            if matches!(e, ApiError::Serialize(_) | ApiError::Http(_)) {
                tracing::error!(%e, path = %req.uri().path(), "status request failed");
            }
            e.into()
        });
        futures::future::ready(Ok(response))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Failed to serialize status: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to build response: {0}")]
    Http(#[from] hyper::http::Error),
}

impl From<ApiError> for Response<Body> {
    fn from(err: ApiError) -> Self {
        let status = match err {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Serialize(_) | ApiError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let mut response = Response::new(Body::from(err.to_string()));
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::{Catalog, Describe, Evaluator, InstanceDescriptor, ServiceDescriptor};

    fn handler() -> RequestHandler {
        let describer: Arc<dyn Describe> = Arc::new(Catalog::new());
        let cache = Arc::new(StatusCache::new(describer.clone()));
        Evaluator::new(describer, cache.clone()).update(&[ServiceDescriptor::new("svc1", "web")
            .with_instance(InstanceDescriptor::new("0").with_check("ready", "passed"))]);
        RequestHandler::new(cache)
    }

    async fn get_json(handler: &mut RequestHandler, uri: &str) -> (StatusCode, serde_json::Value) {
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let response = handler.call(req).await.unwrap();
        let status = response.status();
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null))
    }

    #[tokio::test]
    async fn test_status_by_id() {
        let mut handler = handler();

        let (code, body) = get_json(&mut handler, "/status/svc1.0").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"], "passed");
        assert_eq!(body["kind"], "instance");

        let (code, body) = get_json(&mut handler, "/status/ghost").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"], "unknown");
        assert_eq!(body["kind"], "placeholder");
    }

    #[tokio::test]
    async fn test_snapshot() {
        let mut handler = handler();

        let (code, body) = get_json(&mut handler, "/status").await;
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["generation"], 1);
        assert_eq!(body["services"][0]["id"], "svc1");
        assert_eq!(body["services"][0]["instances"][0]["id"], "svc1.0");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let mut handler = handler();
        let (code, _) = get_json(&mut handler, "/nope").await;
        assert_eq!(code, StatusCode::NOT_FOUND);
    }
}
