//! In-process mock of the companion books API.
//!
//! Serves the same routes as the real server under `/api`, keeps books in
//! memory and tracks progress only for requests carrying
//! `X-Requested-With: XMLHttpRequest`.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

#[derive(Debug, Default)]
struct Inner {
    books: Vec<Map<String, Value>>,
    next_id: i64,
    mode: String,
    completed: Vec<String>,
    hits: usize,
    tracked_hits: usize,
}

/// Shared state of the mock server.
#[derive(Clone, Debug, Default)]
pub struct MockApi {
    inner: Arc<Mutex<Inner>>,
}

impl MockApi {
    /// A server with no books.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A server holding the given `(title, author, year)` books.
    pub fn with_books(books: &[(&str, &str, i64)]) -> Self {
        let api = Self::default();
        {
            let mut inner = api.inner.lock().unwrap();
            for (title, author, year) in books {
                inner.next_id += 1;
                let book = json!({
                    "id": inner.next_id,
                    "title": title,
                    "author": author,
                    "year": year,
                    "available": true,
                });
                if let Value::Object(book) = book {
                    inner.books.push(book);
                }
            }
        }
        api
    }

    /// Marks a method as completed, as if another tab had done it.
    pub fn complete(&self, method: &str) {
        let mut inner = self.inner.lock().unwrap();
        if !inner.completed.iter().any(|m| m == method) {
            inner.completed.push(method.to_string());
        }
    }

    /// Total requests served.
    pub fn hits(&self) -> usize {
        self.inner.lock().unwrap().hits
    }

    /// Requests that carried the progress header.
    pub fn tracked_hits(&self) -> usize {
        self.inner.lock().unwrap().tracked_hits
    }

    /// Mode last announced via `POST /mode`.
    pub fn mode(&self) -> String {
        self.inner.lock().unwrap().mode.clone()
    }

    /// Methods the server has recorded.
    pub fn completed(&self) -> Vec<String> {
        self.inner.lock().unwrap().completed.clone()
    }

    fn touch(&self, headers: &HeaderMap) -> Hit<'_> {
        let mut inner = self.inner.lock().unwrap();
        inner.hits += 1;
        let tracked = headers
            .get("x-requested-with")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.contains("XMLHttpRequest"));
        if tracked {
            inner.tracked_hits += 1;
        }
        Hit { inner, tracked }
    }
}

/// One request's view of the state.
struct Hit<'a> {
    inner: MutexGuard<'a, Inner>,
    tracked: bool,
}

impl Hit<'_> {
    /// Records `method` as completed if the request came from the UI.
    fn record(&mut self, method: &str) {
        if self.tracked && !self.inner.completed.iter().any(|m| m == method) {
            self.inner.completed.push(method.to_string());
        }
    }
}

/// Binds an ephemeral port, serves the mock and returns the API base URL.
pub async fn spawn(api: MockApi) -> String {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    tokio::spawn(async move {
        axum::serve(listener, router(api)).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    format!("http://{addr}/api")
}

fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

fn router(api: MockApi) -> Router {
    Router::new()
        .route("/api/books", get(list_books).post(create_book))
        .route(
            "/api/books/:id",
            get(get_book)
                .put(replace_book)
                .patch(patch_book)
                .delete(delete_book),
        )
        .route("/api/mode", post(set_mode))
        .route("/api/progress", get(get_progress))
        .with_state(api)
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(json!({"detail": "Book not found"}))).into_response()
}

fn progress(inner: &Inner) -> Value {
    json!({
        "mode": if inner.mode.is_empty() { "beginner" } else { inner.mode.as_str() },
        "completed_methods": inner.completed,
        "current_level": 0,
    })
}

async fn list_books(State(api): State<MockApi>, headers: HeaderMap) -> Json<Value> {
    let mut hit = api.touch(&headers);
    hit.record("GET");
    Json(json!(hit.inner.books))
}

async fn get_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut hit = api.touch(&headers);
    let Some(book) = hit.inner.books.iter().find(|b| b["id"] == id).cloned() else {
        return not_found();
    };
    hit.record("GET_ID");
    Json(Value::Object(book)).into_response()
}

async fn create_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut hit = api.touch(&headers);
    let (Some(title), Some(author), Some(year)) = (
        body.get("title").and_then(Value::as_str),
        body.get("author").and_then(Value::as_str),
        body.get("year").and_then(Value::as_i64),
    ) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "title, author and year are required"})),
        )
            .into_response();
    };

    hit.inner.next_id += 1;
    let book = json!({
        "id": hit.inner.next_id,
        "title": title,
        "author": author,
        "year": year,
        "available": true,
    });
    if let Value::Object(map) = book.clone() {
        hit.inner.books.push(map);
    }
    hit.record("POST");
    (StatusCode::CREATED, Json(book)).into_response()
}

async fn replace_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut hit = api.touch(&headers);
    let Some(book) = hit.inner.books.iter_mut().find(|b| b["id"] == id) else {
        return not_found();
    };
    let available = book.get("available").cloned().unwrap_or(Value::Bool(true));
    let mut replaced = Map::new();
    replaced.insert("id".to_string(), json!(id));
    for key in ["title", "author", "year"] {
        if let Some(value) = body.get(key) {
            replaced.insert(key.to_string(), value.clone());
        }
    }
    replaced.insert("available".to_string(), available);
    *book = replaced.clone();
    hit.record("PUT");
    Json(Value::Object(replaced)).into_response()
}

async fn patch_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut hit = api.touch(&headers);
    let Some(book) = hit.inner.books.iter_mut().find(|b| b["id"] == id) else {
        return not_found();
    };
    if let Value::Object(changes) = body {
        for (key, value) in changes {
            book.insert(key, value);
        }
    }
    let patched = book.clone();
    hit.record("PATCH");
    Json(Value::Object(patched)).into_response()
}

async fn delete_book(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    let mut hit = api.touch(&headers);
    let Some(index) = hit.inner.books.iter().position(|b| b["id"] == id) else {
        return not_found();
    };
    hit.inner.books.remove(index);
    hit.record("DELETE");
    StatusCode::NO_CONTENT.into_response()
}

async fn set_mode(
    State(api): State<MockApi>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Json<Value> {
    let mut hit = api.touch(&headers);
    if let Some(mode) = body.get("mode").and_then(Value::as_str) {
        hit.inner.mode = mode.to_string();
    }
    Json(progress(&hit.inner))
}

async fn get_progress(State(api): State<MockApi>, headers: HeaderMap) -> Json<Value> {
    let hit = api.touch(&headers);
    Json(progress(&hit.inner))
}
