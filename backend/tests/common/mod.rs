//! Shared helpers for HTTP-level tests.
//!
//! Requests go straight through the router with `tower::ServiceExt::oneshot`;
//! results are kept in the in-memory store.

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::{Arc, Mutex};

use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt as _;
use uuid::Uuid;

use whiskey_wiz_backend::{
    create_app, middleware::Claims, AnalyticsSink, AppState, Config, GameEvent, MemoryStore,
};

const BODY_LIMIT: usize = 1024 * 1024;

/// Analytics sink that keeps every event for inspection
#[derive(Default)]
pub struct RecordingAnalytics {
    events: Mutex<Vec<GameEvent>>,
}

impl RecordingAnalytics {
    pub fn events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl AnalyticsSink for RecordingAnalytics {
    fn record(&self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

pub struct TestApp {
    pub router: Router,
    pub analytics: Arc<RecordingAnalytics>,
    pub config: Config,
}

impl TestApp {
    pub fn new() -> Self {
        let config = Config::default();
        let analytics = Arc::new(RecordingAnalytics::default());
        let state = AppState::new(
            Arc::new(MemoryStore::new()),
            analytics.clone(),
            config.clone(),
        );

        Self {
            router: create_app(state),
            analytics,
            config,
        }
    }

    pub fn token(&self, player_id: &str, admin: bool) -> String {
        let claims = Claims {
            sub: player_id.to_string(),
            name: Some(format!("{} the taster", player_id)),
            admin,
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.auth.jwt_secret.as_bytes()),
        )
        .expect("encode token")
    }

    pub fn admin_token(&self) -> String {
        self.token("curator", true)
    }

    /// Send a request and return the status with the parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("oneshot");
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), BODY_LIMIT)
            .await
            .expect("read body");

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, value)
    }

    /// Create a quarter that is open right now and return its id
    pub async fn create_open_quarter(&self) -> Uuid {
        let (status, body) = self
            .send(
                "POST",
                "/api/v1/quarters",
                Some(&self.admin_token()),
                Some(open_quarter_body()),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create quarter: {}", body);
        body["id"].as_str().unwrap().parse().unwrap()
    }

    /// Submit guesses as `player_id`
    pub async fn submit(&self, player_id: &str, quarter_id: Uuid, body: Value) -> (StatusCode, Value) {
        self.send(
            "POST",
            &format!("/api/v1/quarters/{}/results", quarter_id),
            Some(&self.token(player_id, false)),
            Some(body),
        )
        .await
    }
}

pub fn samples() -> Value {
    json!([
        { "id": "A", "name": "Harbor Small Batch", "age": 4, "proof": "90", "mashbill": "Bourbon" },
        { "id": "B", "age": 6, "proof": "114.2", "mashbill": "Rye" },
        { "id": "C", "age": 8, "proof": "100", "mashbill": "Wheat" },
        { "id": "D", "age": 12, "proof": "92", "mashbill": "Single Malt" }
    ])
}

pub fn open_quarter_body() -> Value {
    let now = Utc::now();
    json!({
        "name": "Winter Pour",
        "startDate": (now - Duration::days(1)).to_rfc3339(),
        "endDate": (now + Duration::days(30)).to_rfc3339(),
        "isActive": true,
        "difficulty": "intermediate",
        "samples": samples(),
    })
}

/// Guesses matching every sample exactly: 130 points each
pub fn exact_guesses() -> Value {
    json!({
        "A": { "age": 4, "proof": "90", "mashbill": "bourbon" },
        "B": { "age": 6, "proof": "114.2", "mashbill": "Rye" },
        "C": { "age": 8, "proof": "100", "mashbill": "Wheat" },
        "D": { "age": 12, "proof": "92", "mashbill": "Single Malt" }
    })
}

/// Age on sample A is two years off: 98 + 3 * 130 = 488 points
pub fn close_guesses() -> Value {
    let mut guesses = exact_guesses();
    guesses["A"]["age"] = json!(6);
    guesses
}

pub fn dec(value: &Value) -> Decimal {
    match value {
        Value::String(s) => Decimal::from_str(s).unwrap(),
        other => Decimal::from_str(&other.to_string()).unwrap(),
    }
}
