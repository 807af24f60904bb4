//! In-memory stand-in for the companion books API, shared by unit tests.

#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::book::Book;
use crate::transport::{ApiRequest, ApiResponse, HttpVerb, Transport, TransportError};

#[derive(Debug, Default)]
struct FakeState {
    books: Vec<Book>,
    next_id: i64,
    mode: Option<String>,
    completed: Vec<String>,
    requests: Vec<ApiRequest>,
    offline: bool,
    html: bool,
    fail_status: Option<u16>,
}

/// A books API kept in memory. Counts every call it receives.
#[derive(Debug, Default)]
pub(crate) struct FakeApi {
    state: Mutex<FakeState>,
    calls: AtomicUsize,
}

impl FakeApi {
    /// A server holding books `1..=count`.
    pub(crate) fn with_books(count: i64) -> Self {
        let books = (1..=count)
            .map(|id| Book {
                id,
                title: format!("Book {id}"),
                author: Some(format!("Author {id}")),
                year: Some(2000 + id),
                available: true,
            })
            .collect();
        Self {
            state: Mutex::new(FakeState {
                books,
                next_id: count,
                ..FakeState::default()
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// A server that never answers.
    pub(crate) fn offline() -> Self {
        let api = Self::default();
        api.set_offline(true);
        api
    }

    pub(crate) fn set_offline(&self, offline: bool) {
        self.state.lock().unwrap().offline = offline;
    }

    /// Makes every response a 200 with an HTML body.
    pub(crate) fn answer_with_html(&self) {
        self.state.lock().unwrap().html = true;
    }

    /// Makes every response fail with `status` and a JSON detail body.
    pub(crate) fn fail_with(&self, status: u16) {
        self.state.lock().unwrap().fail_status = Some(status);
    }

    /// Pretends another client already completed `method`.
    pub(crate) fn mark_completed(&self, method: &str) {
        self.state.lock().unwrap().completed.push(method.to_string());
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().unwrap();
        state.requests.push(request.clone());

        if state.offline {
            return Err(TransportError::Unreachable {
                verb: request.verb,
                url: format!("http://fake{}", request.path),
                message: "connection refused".to_string(),
            });
        }
        if let Some(status) = state.fail_status {
            return Ok(ApiResponse::new(status, r#"{"detail": "Server error"}"#));
        }
        if state.html {
            return Ok(ApiResponse::new(200, "<html>oops</html>"));
        }
        Ok(state.route(&request))
    }
}

impl FakeState {
    fn route(&mut self, request: &ApiRequest) -> ApiResponse {
        let segments: Vec<&str> = request.path.trim_matches('/').split('/').collect();
        match (request.verb, segments.as_slice()) {
            (HttpVerb::Get, ["books"]) => {
                self.track("GET");
                ok(200, &json!(self.books))
            }
            (HttpVerb::Post, ["books"]) => self.create(request.body.as_ref()),
            (HttpVerb::Get, ["books", id]) => match self.find(id) {
                Some(index) => {
                    self.track("GET_ID");
                    ok(200, &json!(self.books[index]))
                }
                None => not_found(),
            },
            (HttpVerb::Put | HttpVerb::Patch, ["books", id]) => {
                let Some(index) = self.find(id) else {
                    return not_found();
                };
                let body = request.body.clone().unwrap_or_else(|| json!({}));
                let book = &mut self.books[index];
                if request.verb == HttpVerb::Put {
                    book.author = None;
                    book.year = None;
                }
                if let Some(title) = body.get("title").and_then(Value::as_str) {
                    book.title = title.to_string();
                }
                if let Some(author) = body.get("author").and_then(Value::as_str) {
                    book.author = Some(author.to_string());
                }
                if let Some(year) = body.get("year").and_then(Value::as_i64) {
                    book.year = Some(year);
                }
                let updated = json!(book);
                self.track(if request.verb == HttpVerb::Put { "PUT" } else { "PATCH" });
                ok(200, &updated)
            }
            (HttpVerb::Delete, ["books", id]) => match self.find(id) {
                Some(index) => {
                    self.books.remove(index);
                    self.track("DELETE");
                    ApiResponse::new(204, "")
                }
                None => not_found(),
            },
            (HttpVerb::Post, ["mode"]) => {
                self.mode = request
                    .body
                    .as_ref()
                    .and_then(|body| body.get("mode"))
                    .and_then(Value::as_str)
                    .map(str::to_string);
                ok(200, &self.progress())
            }
            (HttpVerb::Get, ["progress"]) => ok(200, &self.progress()),
            _ => ApiResponse::new(404, r#"{"detail": "Not Found"}"#),
        }
    }

    fn create(&mut self, body: Option<&Value>) -> ApiResponse {
        let body = body.cloned().unwrap_or_else(|| json!({}));
        let title = body.get("title").and_then(Value::as_str);
        let author = body.get("author").and_then(Value::as_str);
        let year = body.get("year").and_then(Value::as_i64);
        let (Some(title), Some(author), Some(year)) = (title, author, year) else {
            return ApiResponse::new(422, r#"{"detail": "Field required"}"#);
        };
        self.next_id += 1;
        let book = Book {
            id: self.next_id,
            title: title.to_string(),
            author: Some(author.to_string()),
            year: Some(year),
            available: true,
        };
        self.books.push(book.clone());
        self.track("POST");
        ok(201, &json!(book))
    }

    fn find(&self, id: &str) -> Option<usize> {
        let id: i64 = id.parse().ok()?;
        self.books.iter().position(|book| book.id == id)
    }

    fn track(&mut self, method: &str) {
        if !self.completed.iter().any(|m| m == method) {
            self.completed.push(method.to_string());
        }
    }

    fn progress(&self) -> Value {
        json!({
            "mode": self.mode,
            "completed_methods": self.completed,
            "current_level": 0,
        })
    }
}

fn ok(status: u16, body: &Value) -> ApiResponse {
    ApiResponse::new(status, body.to_string())
}

fn not_found() -> ApiResponse {
    ApiResponse::new(404, r#"{"detail": "Book not found"}"#)
}
