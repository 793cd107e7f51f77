#![allow(dead_code)]

use anyhow::Result;
use axum::{
    Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use contact_crawler::{ApiCredentials, GatewayClient, GatewaySettings};

pub const API_KEY: &str = "test-key";
pub const API_PATH: &str = "/v1/extract";

/// What the fake API saw on one request.
#[derive(Debug, Clone, Default)]
pub struct SeenRequest {
    pub params: HashMap<String, String>,
    pub api_key: Option<String>,
    pub api_host: Option<String>,
    pub accept: Option<String>,
}

#[derive(Clone)]
struct FakeState {
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
    status: StatusCode,
    body: String,
    delay: Duration,
}

/// In-process stand-in for the hosted contact API.
pub struct FakeApi {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl FakeApi {
    pub async fn start(status: StatusCode, body: &str) -> Result<FakeApi> {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    pub async fn json(body: serde_json::Value) -> Result<FakeApi> {
        Self::start(StatusCode::OK, &body.to_string()).await
    }

    pub async fn start_with_delay(status: StatusCode, body: &str, delay: Duration) -> Result<FakeApi> {
        let hits = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let state = FakeState {
            hits: hits.clone(),
            seen: seen.clone(),
            status,
            body: body.to_string(),
            delay,
        };

        let app = Router::new()
            .route(API_PATH, get(fake_handler))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(FakeApi { addr, hits, seen })
    }

    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.seen.lock().unwrap().last().cloned()
    }

    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn client(&self) -> GatewayClient {
        client_for(Some(self.host()), settings(true, Duration::from_secs(5)))
    }

    pub fn client_without_cache(&self) -> GatewayClient {
        client_for(Some(self.host()), settings(false, Duration::from_secs(5)))
    }
}

async fn fake_handler(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.seen.lock().unwrap().push(SeenRequest {
        params,
        api_key: header("x-rapidapi-key"),
        api_host: header("x-rapidapi-host"),
        accept: header("accept"),
    });

    if !state.delay.is_zero() {
        tokio::time::sleep(state.delay).await;
    }
    (
        state.status,
        [("content-type", "application/json")],
        state.body.clone(),
    )
}

pub fn settings(cache_enabled: bool, timeout: Duration) -> GatewaySettings {
    GatewaySettings {
        scheme: "http".to_string(),
        timeout,
        cache_enabled,
        ..GatewaySettings::default()
    }
}

/// Gateway pointed at `host`; `None` means no API key is configured.
pub fn client_for(host: Option<String>, settings: GatewaySettings) -> GatewayClient {
    let credentials = host.map(|h| ApiCredentials::new(API_KEY, h));
    GatewayClient::new(credentials, settings).unwrap()
}

/// A local address nothing is listening on.
pub async fn closed_port_host() -> Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(addr.to_string())
}
