use diary_backend::{
    api::router::create_router,
    api::extractors::editor::EDITOR_HEADER,
    state::AppState,
    config::{Config, DiaryConfig},
    infra::factory::sqlite_state,
};
use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, Sqlite};
use std::sync::Arc;
use uuid::Uuid;
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    Router,
};
use std::str::FromStr;
use tower::ServiceExt;
use serde_json::{json, Value};

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            diary: DiaryConfig::default(),
        };

        let state = Arc::new(sqlite_state(&config, pool.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Sends a JSON request, optionally as `editor`, and returns status and parsed body.
    pub async fn send(&self, method: &str, uri: &str, editor: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(editor) = editor {
            builder = builder.header(EDITOR_HEADER, editor);
        }
        let body = body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty);

        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    pub async fn create_staff(&self, username: &str) -> String {
        let (status, body) = self.send("POST", "/api/v1/users", None, Some(json!({
            "username": username,
            "password": "staff-password",
            "is_staff": true
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "create staff failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_customer(&self, username: &str) -> String {
        let (status, body) = self.send("POST", "/api/v1/customers", None, Some(json!({
            "username": username,
            "password": "customer-password",
            "first_name": "Test",
            "last_name": username,
            "email": format!("{}@example.com", username)
        }))).await;
        assert_eq!(status, StatusCode::CREATED, "create customer failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_resource(&self, name: &str) -> String {
        let (status, body) = self.send("POST", "/api/v1/resources", None, Some(json!({ "name": name }))).await;
        assert_eq!(status, StatusCode::CREATED, "create resource failed: {}", body);
        body["id"].as_str().unwrap().to_string()
    }

    pub async fn create_entry(&self, editor: &str, payload: Value) -> (StatusCode, Value) {
        self.send("POST", "/api/v1/entries", Some(editor), Some(payload)).await
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}
