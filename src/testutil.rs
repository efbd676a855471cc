//! Shared test helpers: an in-memory item repository and request builders
//! for driving the router without a network listener.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::api;
use crate::config::{Config, DatabaseConfig, ServerConfig};
use crate::file_store::LocalFileStore;
use crate::storage::models::{Item, ItemUpdate, NewItem};
use crate::storage::{DatabaseError, ItemRepository};
use crate::AppState;

const BOUNDARY: &str = "inventory-test-boundary";

// ============================================================================
// In-memory repository
// ============================================================================

/// `ItemRepository` over a vector, with ids assigned like a serial column.
#[derive(Default)]
pub struct MemoryItemRepository {
    rows: Mutex<MemoryRows>,
    failing: AtomicBool,
}

#[derive(Default)]
struct MemoryRows {
    items: Vec<Item>,
    last_id: i64,
}

impl MemoryItemRepository {
    /// Make every subsequent query fail as if the database were unreachable.
    pub fn fail_queries(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn insert(&self, name: &str, description: Option<&str>, photo: Option<&str>) -> i64 {
        let mut rows = self.rows.lock().await;
        rows.last_id += 1;
        let id = rows.last_id;
        rows.items.push(Item {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            photo: photo.map(str::to_string),
        });
        id
    }

    pub async fn get(&self, id: i64) -> Option<Item> {
        self.rows
            .lock()
            .await
            .items
            .iter()
            .find(|item| item.id == id)
            .cloned()
    }

    pub async fn snapshot(&self) -> Vec<Item> {
        self.rows.lock().await.items.clone()
    }

    fn check(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryItemRepository {
    async fn create(&self, item: &NewItem) -> Result<i64, DatabaseError> {
        self.check()?;
        Ok(self
            .insert(&item.name, item.description.as_deref(), item.photo.as_deref())
            .await)
    }

    async fn get_all(&self) -> Result<Vec<Item>, DatabaseError> {
        self.check()?;
        Ok(self.snapshot().await)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Item>, DatabaseError> {
        self.check()?;
        Ok(self.get(id).await)
    }

    async fn update(&self, id: i64, update: &ItemUpdate) -> Result<bool, DatabaseError> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        match rows.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                update.apply_to(item);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<Option<Option<String>>, DatabaseError> {
        self.check()?;
        let mut rows = self.rows.lock().await;
        let position = rows.items.iter().position(|item| item.id == id);
        Ok(position.map(|index| rows.items.remove(index).photo))
    }

    async fn get_photo_name(&self, id: i64) -> Result<Option<String>, DatabaseError> {
        self.check()?;
        Ok(self
            .get(id)
            .await
            .and_then(|item| item.photo)
            .filter(|name| !name.is_empty()))
    }
}

// ============================================================================
// Test application
// ============================================================================

pub struct TestApp {
    pub router: Router,
    pub items: Arc<MemoryItemRepository>,
    pub state: Arc<AppState>,
    cache_dir: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestApp {
    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn max_upload_size(&self) -> u64 {
        self.state.config.max_upload_size
    }
}

/// Build a router over an in-memory repository and a temporary cache directory.
pub fn test_app() -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let cache_dir = temp_dir.path().join("cache");

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            max_connections: 1,
            ..Default::default()
        },
        cache_dir: cache_dir.to_string_lossy().to_string(),
        max_upload_size: 64 * 1024, // 64KB for tests
    };

    let files = LocalFileStore::new(&cache_dir).expect("Failed to create test cache dir");
    let items = Arc::new(MemoryItemRepository::default());

    let state = Arc::new(AppState {
        config,
        items: Arc::clone(&items) as Arc<dyn ItemRepository>,
        files: Arc::new(files),
    });

    TestApp {
        router: api::create_router(Arc::clone(&state)),
        items,
        state,
        cache_dir,
        _temp_dir: temp_dir,
    }
}

// ============================================================================
// Requests and responses
// ============================================================================

pub async fn send(router: &Router, request: Request<Body>) -> Response<Body> {
    router
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible")
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

/// One part of a multipart/form-data body.
pub struct Part {
    name: String,
    file: Option<(String, String)>,
    data: Vec<u8>,
}

impl Part {
    pub fn text(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            file: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(name: &str, file_name: &str, content_type: &str, data: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            file: Some((file_name.to_string(), content_type.to_string())),
            data,
        }
    }
}

pub fn multipart_request(uri: &str, parts: &[Part]) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((ref file_name, ref content_type)) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: {}\r\n\r\n",
                        part.name, file_name, content_type
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .expect("valid request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("readable body")
        .to_vec()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("JSON body")
}
