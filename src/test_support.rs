//! In-process pet-store stand-in for tests
//!
//! Serves `pet/findByStatus` over plain HTTP on `127.0.0.1:0` and records
//! every request it receives.

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, Uri};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

/// What the mock saw for one upstream call
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path_and_query: String,
    pub accept: Option<String>,
    pub authorization: Option<String>,
}

pub struct MockUpstream {
    /// Base URL to configure the client with, ends in `/v2/`
    pub base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// How the mock answers every request
#[derive(Clone)]
enum Behavior {
    /// `code` plus the body mapped from the `status` query value
    Respond {
        code: u16,
        bodies: Vec<(&'static str, &'static str)>,
        delay: Duration,
    },
    /// 302 to `target`, or back to the requested URL when `None`
    Redirect { target: Option<String> },
}

impl MockUpstream {
    /// Start a mock answering every request with `code`
    ///
    /// `bodies` maps a `status` query value to the JSON body returned for it;
    /// unknown values get `[]`.
    pub async fn spawn(code: u16, bodies: &[(&'static str, &'static str)]) -> Self {
        Self::spawn_delayed(Duration::ZERO, code, bodies).await
    }

    /// Like `spawn`, but every response is held back for `delay`
    pub async fn spawn_delayed(
        delay: Duration,
        code: u16,
        bodies: &[(&'static str, &'static str)],
    ) -> Self {
        Self::start(Behavior::Respond {
            code,
            bodies: bodies.to_vec(),
            delay,
        })
        .await
    }

    /// Start a mock that redirects every request to `target`, or to itself
    pub async fn spawn_redirect(target: Option<String>) -> Self {
        Self::start(Behavior::Redirect { target }).await
    }

    async fn start(behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let behavior = Arc::new(behavior);

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let recorded = Arc::clone(&recorded);
                let behavior = Arc::clone(&behavior);
                tokio::spawn(async move {
                    let service = service_fn(move |req: Request<Incoming>| {
                        let recorded = Arc::clone(&recorded);
                        let behavior = Arc::clone(&behavior);
                        async move {
                            record(&req, &recorded);
                            let uri = req.uri().clone();
                            Ok::<_, Infallible>(respond(&uri, &behavior).await)
                        }
                    });
                    let _ = http1::Builder::new()
                        .serve_connection(TokioIo::new(stream), service)
                        .await;
                });
            }
        });

        Self {
            base_url: format!("http://{addr}/v2/"),
            requests,
        }
    }

    /// Base URL of a port nothing listens on
    pub async fn unused_base_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/v2/")
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

fn record(req: &Request<Incoming>, recorded: &Mutex<Vec<RecordedRequest>>) {
    let header = |name: &str| {
        req.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    };

    recorded.lock().unwrap().push(RecordedRequest {
        path_and_query: req
            .uri()
            .path_and_query()
            .map(ToString::to_string)
            .unwrap_or_default(),
        accept: header("accept"),
        authorization: header("authorization"),
    });
}

async fn respond(uri: &Uri, behavior: &Behavior) -> Response<Full<Bytes>> {
    match behavior {
        Behavior::Respond {
            code,
            bodies,
            delay,
        } => {
            if !delay.is_zero() {
                tokio::time::sleep(*delay).await;
            }

            let status = uri
                .query()
                .and_then(|q| q.strip_prefix("status="))
                .unwrap_or_default();
            let body = bodies
                .iter()
                .find(|(key, _)| *key == status)
                .map_or("[]", |(_, body)| *body);

            Response::builder()
                .status(*code)
                .header("Content-Type", "application/json")
                .body(Full::new(Bytes::from(body)))
                .unwrap()
        }
        Behavior::Redirect { target } => {
            let location = target.clone().unwrap_or_else(|| {
                uri.path_and_query()
                    .map(ToString::to_string)
                    .unwrap_or_default()
            });

            Response::builder()
                .status(302)
                .header("Location", location)
                .body(Full::new(Bytes::new()))
                .unwrap()
        }
    }
}
