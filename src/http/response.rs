//! HTTP response building module
//!
//! Provides builders for the status codes the service answers with.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

/// Build 200 HTML response carrying the rendered fragment
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build plain-text health check response
pub fn build_health_response(status: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-store")
        .body(Full::new(Bytes::from_static(status.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(status.as_bytes())))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found", None)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "405 Method Not Allowed",
        Some("GET, HEAD"),
    )
}

/// Build 500 Internal Server Error response
///
/// The body stays generic; the cause goes to the error log only.
pub fn build_500_response() -> Response<Full<Bytes>> {
    build_text_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "500 Internal Server Error",
        None,
    )
}

fn build_text_response(
    status: StatusCode,
    text: &'static str,
    allow: Option<&'static str>,
) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(status)
        .header("Content-Type", "text/plain");
    if let Some(methods) = allow {
        builder = builder.header("Allow", methods);
    }

    builder
        .body(Full::new(Bytes::from_static(text.as_bytes())))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            let mut resp = Response::new(Full::new(Bytes::from_static(text.as_bytes())));
            *resp.status_mut() = status;
            resp
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_html_response() {
        let resp = build_html_response("<h2>New</h2>".to_string(), false);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["content-type"],
            "text/html; charset=utf-8"
        );
        assert_eq!(resp.headers()["content-length"], "12");
        assert_eq!(body_of(resp).await, "<h2>New</h2>");
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let resp = build_html_response("abc".to_string(), true);
        assert_eq!(resp.headers()["content-length"], "3");
        assert!(body_of(resp).await.is_empty());
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(build_404_response().status(), StatusCode::NOT_FOUND);
        assert_eq!(build_500_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["allow"], "GET, HEAD");
    }
}
