//! Live server tests
//!
//! Bind a real socket and exercise the API over HTTP, the way a browser
//! client would.

mod common;

use serde_json::{json, Value};
use taskpro::api::server::create_router;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

struct LiveServer {
    base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
    _app: common::TestApp,
}

impl LiveServer {
    async fn start() -> Self {
        let app = common::TestApp::new().await;
        let router = create_router(app.state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            base_url: format!("http://{}/api", addr),
            shutdown: Some(tx),
            handle,
            _app: app,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            tx.send(()).ok();
        }
        self.handle.await.unwrap();
    }
}

#[tokio::test]
async fn test_full_flow_over_http() {
    let server = LiveServer::start().await;
    let client = reqwest::Client::new();

    // Register
    let response = client
        .post(server.url("/register"))
        .json(&json!({"name": "Ada", "email": "ada@example.com", "password": "s3cret"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    // Login
    let response = client
        .post(server.url("/login"))
        .json(&json!({"email": "ada@example.com", "password": "s3cret"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let token = body["token"].as_str().unwrap().to_string();

    // Create
    let response = client
        .post(server.url("/tasks"))
        .bearer_auth(&token)
        .json(&json!({"title": "Ship it"}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let task: Value = response.json().await.unwrap();
    let task_url = server.url(&format!("/tasks/{}", task["id"]));

    // Update
    let response = client
        .put(&task_url)
        .bearer_auth(&token)
        .json(&json!({"done": true}))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["done"], true);

    // List
    let tasks: Value = client
        .get(server.url("/tasks"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tasks.as_array().unwrap().len(), 1);

    // Delete
    let response = client
        .delete(&task_url)
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let response = client.get(&task_url).bearer_auth(&token).send().await.unwrap();
    assert_eq!(response.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_cors_headers_on_real_response() {
    let server = LiveServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/health"))
        .header("Origin", "http://localhost:3000")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );

    server.stop().await;
}

#[tokio::test]
async fn test_unauthenticated_request_over_http() {
    let server = LiveServer::start().await;

    let response = reqwest::Client::new()
        .get(server.url("/tasks"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Authorization header required");

    server.stop().await;
}
