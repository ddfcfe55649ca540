//! In-process mock of the client API for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::Value;
use tokio::sync::Notify;
use url::Url;

use ::common::api::ApiClient;

#[derive(Debug, Clone)]
struct Canned {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: String,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<String, Canned>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    hits: Mutex<HashMap<String, usize>>,
    requests: Mutex<HashMap<String, Vec<Recorded>>>,
}

/// A backend listening on an ephemeral localhost port.
///
/// Routes are keyed as `"METHOD /path"`. Unconfigured routes answer 404
/// with a FastAPI-style `detail` body.
pub struct MockBackend {
    pub url: Url,
    state: Arc<MockState>,
}

impl MockBackend {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: Url::parse(&format!("http://{}", addr)).unwrap(),
            state,
        }
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(&self.url).unwrap()
    }

    pub fn respond(&self, route: &str, status: u16, body: impl Into<String>) {
        self.respond_with_headers(route, status, &[], body);
    }

    /// Like [`MockBackend::respond`], with extra response headers
    pub fn respond_with_headers(
        &self,
        route: &str,
        status: u16,
        headers: &[(&str, &str)],
        body: impl Into<String>,
    ) {
        self.state.routes.lock().unwrap().insert(
            route.to_string(),
            Canned {
                status: StatusCode::from_u16(status).unwrap(),
                headers: headers
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                body: body.into(),
            },
        );
    }

    pub fn respond_json(&self, route: &str, status: u16, body: Value) {
        self.respond(route, status, body.to_string());
    }

    /// Hold responses on `route` until [`MockBackend::release`] is called
    pub fn hold(&self, route: &str) {
        self.state
            .gates
            .lock()
            .unwrap()
            .insert(route.to_string(), Arc::new(Notify::new()));
    }

    /// Let one held request on `route` through
    pub fn release(&self, route: &str) {
        if let Some(gate) = self.state.gates.lock().unwrap().get(route) {
            gate.notify_one();
        }
    }

    pub fn hits(&self, route: &str) -> usize {
        self.state
            .hits
            .lock()
            .unwrap()
            .get(route)
            .copied()
            .unwrap_or(0)
    }

    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    pub fn last_request(&self, route: &str) -> Option<Recorded> {
        self.state
            .requests
            .lock()
            .unwrap()
            .get(route)
            .and_then(|r| r.last().cloned())
    }

    pub fn last_json(&self, route: &str) -> Option<Value> {
        self.last_request(route)
            .and_then(|r| serde_json::from_slice(&r.body).ok())
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let route = format!("{} {}", method, uri.path());

    *state.hits.lock().unwrap().entry(route.clone()).or_default() += 1;
    state
        .requests
        .lock()
        .unwrap()
        .entry(route.clone())
        .or_default()
        .push(Recorded {
            query: uri.query().map(str::to_string),
            headers,
            body,
        });

    let gate = state.gates.lock().unwrap().get(&route).cloned();
    if let Some(gate) = gate {
        gate.notified().await;
    }

    let canned = state.routes.lock().unwrap().get(&route).cloned();
    match canned {
        Some(canned) => {
            let mut response = (
                canned.status,
                [(header::CONTENT_TYPE, "application/json")],
                canned.body,
            )
                .into_response();
            for (name, value) in canned.headers {
                response.headers_mut().append(
                    HeaderName::from_bytes(name.as_bytes()).unwrap(),
                    HeaderValue::from_str(&value).unwrap(),
                );
            }
            response
        }
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            r#"{"detail":"Not Found"}"#,
        )
            .into_response(),
    }
}

/// A client pointed at a port nothing listens on
pub fn unreachable_client() -> ApiClient {
    ApiClient::new(&Url::parse("http://127.0.0.1:1").unwrap()).unwrap()
}
