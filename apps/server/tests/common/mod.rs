#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;
use xportfoy_server::{
    api::app_router,
    build_state,
    config::{Config, LogFormat},
    AppState,
};

pub const SECRET: &[u8] = b"test-secret-test-secret-test-secret!";

pub struct TestApp {
    _dir: TempDir,
    pub state: Arc<AppState>,
    pub router: Router,
}

pub async fn spawn_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let config = Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        jwt_secret: SECRET.to_vec(),
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(10),
        quote_cache_capacity: 100,
        telegram: None,
        log_format: LogFormat::Text,
    };
    let state = build_state(&config).await.unwrap();
    let router = app_router(state.clone(), &config);
    TestApp {
        _dir: dir,
        state,
        router,
    }
}

impl TestApp {
    pub fn token(&self, user_id: &str, is_admin: bool) -> String {
        self.state
            .auth
            .issue_token(user_id, is_admin, Duration::from_secs(300))
            .unwrap()
    }

    /// Sends a request as `user` (or anonymously) and returns the status and
    /// the JSON body, `Value::Null` when the body is empty.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = user.map(|u| self.token(u, u == "admin"));
        self.send_with_token(method, uri, token.as_deref(), body).await
    }

    pub async fn send_with_token(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }
}
