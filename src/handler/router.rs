//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: access logging, method
//! validation, route matching and the pet listing endpoints.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::petstore::{render_pets, PetStatus};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = AccessLogEntry::from_request(&req, peer_addr);

    let mut response = route_request(req.method(), req.uri().path(), &state).await;

    if let Ok(server) = HeaderValue::from_str(&state.config.http.server_name) {
        response.headers_mut().insert(SERVER, server);
    }

    if state.config.logging.access_log {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or_default();
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Map a request path to the status filter it lists
pub fn status_for_path(path: &str) -> Option<PetStatus> {
    match path {
        "/" => Some(PetStatus::Available),
        "/new" => Some(PetStatus::New),
        _ => None,
    }
}

/// Route request based on method and path
pub async fn route_request(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    let is_head = match *method {
        Method::GET => false,
        Method::HEAD => true,
        _ => {
            logger::log_warning(&format!("Method not allowed: {method} {path}"));
            return http::build_405_response();
        }
    };

    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        return http::build_health_response("ok");
    }

    match status_for_path(path) {
        Some(status) => serve_pets(status, is_head, state).await,
        None => http::build_404_response(),
    }
}

/// Fetch pets for `status` and render them as the response body
async fn serve_pets(status: PetStatus, is_head: bool, state: &AppState) -> Response<Full<Bytes>> {
    match state.petstore.find_by_status(status).await {
        Ok(pets) => http::build_html_response(render_pets(&pets, status), is_head),
        Err(e) => {
            logger::log_upstream_error(status, &e);
            http::build_500_response()
        }
    }
}
