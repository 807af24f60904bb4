//! Request orchestration: one operation per HTTP verb.
//!
//! Every operation follows the same shape:
//!
//! 1. Validate the form's draft. Failures become a local `400 Bad Request`
//!    record and nothing is sent.
//! 2. Send the request through the [`Transport`].
//! 3. No response (or an unreadable one) becomes a synthetic `400` record
//!    naming the operation.
//! 4. Any response becomes a record with its real status line and the body
//!    pretty-printed.
//! 5. Only on success: record the method, clear the draft and refresh the
//!    book collection.
//!
//! The orchestrator never touches presentation; it hands back a
//! [`DisplayRecord`].

use serde_json::{json, Map, Value};

use crate::book::Book;
use crate::display::{DisplayRecord, RequestFailure};
use crate::draft::{FormDraft, FormDrafts};
use crate::level::{FormKind, Method, Mode, Variant};
use crate::progress::{Progress, RemoteProgress};
use crate::transport::{ApiRequest, ApiResponse, HttpVerb, Transport};

/// Message shown after a successful delete.
pub const DELETE_SUCCESS_MESSAGE: &str = "Book successfully deleted";

/// Message shown when a failed delete has no error text of its own.
pub const DELETE_FAILURE_MESSAGE: &str = "Failed to delete book";

/// The session state an operation may update.
#[derive(Debug)]
pub struct RequestContext<'a> {
    /// Active tutorial variant.
    pub variant: Variant,
    /// Learner progress.
    pub progress: &'a mut Progress,
    /// Form input buffers.
    pub drafts: &'a mut FormDrafts,
    /// Cached book collection.
    pub books: &'a mut Vec<Book>,
}

/// Issues tutorial requests and interprets their responses.
#[derive(Debug, Clone)]
pub struct RequestOrchestrator<T> {
    transport: T,
}

impl<T: Transport> RequestOrchestrator<T> {
    /// Creates an orchestrator over the given transport.
    #[must_use]
    pub const fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    // ------------------------------------------------------------------------
    // Book operations
    // ------------------------------------------------------------------------

    /// `GET /books`. The response body becomes the cached collection.
    pub async fn get_all_books(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let (response, data) = match self
            .exchange_json(ApiRequest::get("/books"), "fetch books")
            .await
        {
            Ok(exchange) => exchange,
            Err(failure) => return failure.into(),
        };

        let record = json_record(response.status, &data);
        if record.success {
            match serde_json::from_value::<Vec<Book>>(data) {
                Ok(books) => *ctx.books = books,
                Err(e) => tracing::warn!(error = %e, "Book list has an unexpected shape"),
            }
            ctx.progress.record_success(Method::Get);
        }
        record
    }

    /// `GET /books/{id}`.
    ///
    /// Records `GET_ID`; in beginner mode it also satisfies `GET`. Variants
    /// with server progress reconcile with `GET /progress` afterwards.
    pub async fn get_book(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let request = match build_get_book(ctx.drafts.get(FormKind::GetById)) {
            Ok(request) => request,
            Err(failure) => return failure.into(),
        };
        let record = match self.submit_json(request, "fetch book").await {
            Ok(record) => record,
            Err(failure) => return failure.into(),
        };

        if record.success {
            ctx.progress.record_success(Method::GetById);
            if ctx.progress.mode() == Some(Mode::Beginner) {
                ctx.progress.record_success(Method::Get);
            }
            if ctx.variant.tracks_server_progress() {
                self.fetch_progress(ctx.progress).await;
            }
            self.finish_success(ctx, FormKind::GetById).await;
        }
        record
    }

    /// `POST /books` with title, author and an integer year.
    pub async fn create_book(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let request = match build_create_book(ctx.drafts.get(FormKind::Create)) {
            Ok(request) => request,
            Err(failure) => return failure.into(),
        };
        self.submit_mutation(ctx, request, FormKind::Create, Method::Post, "create book")
            .await
    }

    /// `PUT /books/{id}`: title required, author and year sent when filled.
    pub async fn update_book(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let request = match build_update_book(ctx.drafts.get(FormKind::Update)) {
            Ok(request) => request,
            Err(failure) => return failure.into(),
        };
        self.submit_mutation(ctx, request, FormKind::Update, Method::Put, "update book")
            .await
    }

    /// `PATCH /books/{id}` with only the filled fields.
    pub async fn patch_book(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let request = match build_patch_book(ctx.drafts.get(FormKind::Patch)) {
            Ok(request) => request,
            Err(failure) => return failure.into(),
        };
        self.submit_mutation(ctx, request, FormKind::Patch, Method::Patch, "patch book")
            .await
    }

    /// `DELETE /books/{id}`. The body is optional and never pretty-printed.
    pub async fn delete_book(&self, ctx: &mut RequestContext<'_>) -> DisplayRecord {
        let request = match build_delete_book(ctx.drafts.get(FormKind::Delete)) {
            Ok(request) => request,
            Err(failure) => return failure.into(),
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Delete request failed");
                return RequestFailure::transport("delete book").into();
            }
        };

        let record = if response.is_success() {
            DisplayRecord::from_response(response.status, DELETE_SUCCESS_MESSAGE)
        } else {
            let message = error_message(&response.body)
                .unwrap_or_else(|| DELETE_FAILURE_MESSAGE.to_string());
            DisplayRecord::from_response(response.status, message)
        };

        if record.success {
            ctx.progress.record_success(Method::Delete);
            self.finish_success(ctx, FormKind::Delete).await;
        }
        record
    }

    // ------------------------------------------------------------------------
    // Background operations
    // ------------------------------------------------------------------------

    /// Re-fetches the collection and replaces the cache.
    ///
    /// Failures are logged and leave the cache as it was. Returns `true` if
    /// the cache was replaced.
    pub async fn refresh_books(&self, books: &mut Vec<Book>) -> bool {
        let response = match self.transport.send(ApiRequest::get("/books")).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh books table");
                return false;
            }
        };
        if !response.is_success() {
            tracing::warn!(status = response.status, "Failed to refresh books table");
            return false;
        }
        match serde_json::from_str::<Vec<Book>>(&response.body) {
            Ok(fresh) => {
                tracing::debug!(count = fresh.len(), "Books table refreshed");
                *books = fresh;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to refresh books table");
                false
            }
        }
    }

    /// Selects a difficulty mode and, where the variant tracks progress on
    /// the server, announces it with `POST /mode`.
    ///
    /// The server call is best effort: failures are logged, never shown.
    pub async fn select_mode(&self, variant: Variant, mode: Mode, progress: &mut Progress) {
        progress.set_mode(mode);
        tracing::info!(%mode, "Mode selected");
        if !variant.tracks_server_progress() {
            return;
        }
        let request = ApiRequest::with_json(HttpVerb::Post, "/mode", json!({ "mode": mode.as_str() }));
        self.reconcile(request, progress).await;
    }

    /// `GET /progress`, merging the server's completions into `progress`.
    pub async fn fetch_progress(&self, progress: &mut Progress) {
        self.reconcile(ApiRequest::get("/progress"), progress).await;
    }

    // ------------------------------------------------------------------------
    // Helpers
    // ------------------------------------------------------------------------

    async fn reconcile(&self, request: ApiRequest, progress: &mut Progress) {
        let path = request.path.clone();
        match self.transport.send(request).await {
            Ok(response) if response.is_success() => {
                match serde_json::from_str::<RemoteProgress>(&response.body) {
                    Ok(remote) => {
                        progress.merge_remote(&remote);
                    }
                    Err(e) => tracing::warn!(%path, error = %e, "Unreadable progress from server"),
                }
            }
            Ok(response) => {
                tracing::warn!(%path, status = response.status, "Progress sync rejected");
            }
            Err(e) => tracing::warn!(%path, error = %e, "Progress sync failed"),
        }
    }

    /// Sends a request whose response must be JSON.
    async fn exchange_json(
        &self,
        request: ApiRequest,
        operation: &'static str,
    ) -> Result<(ApiResponse, Value), RequestFailure> {
        tracing::debug!(verb = %request.verb, path = %request.path, "Sending request");
        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(error = %e, operation, "Request failed");
            RequestFailure::transport(operation)
        })?;
        let data = serde_json::from_str::<Value>(&response.body).map_err(|e| {
            tracing::warn!(status = response.status, error = %e, operation, "Response is not JSON");
            RequestFailure::transport(operation)
        })?;
        Ok((response, data))
    }

    async fn submit_json(
        &self,
        request: ApiRequest,
        operation: &'static str,
    ) -> Result<DisplayRecord, RequestFailure> {
        let (response, data) = self.exchange_json(request, operation).await?;
        Ok(json_record(response.status, &data))
    }

    async fn submit_mutation(
        &self,
        ctx: &mut RequestContext<'_>,
        request: ApiRequest,
        form: FormKind,
        method: Method,
        operation: &'static str,
    ) -> DisplayRecord {
        let record = match self.submit_json(request, operation).await {
            Ok(record) => record,
            Err(failure) => return failure.into(),
        };
        if record.success {
            ctx.progress.record_success(method);
            self.finish_success(ctx, form).await;
        }
        record
    }

    async fn finish_success(&self, ctx: &mut RequestContext<'_>, form: FormKind) {
        ctx.drafts.clear(form);
        self.refresh_books(ctx.books).await;
    }
}

// ============================================================================
// Request builders
// ============================================================================

fn json_record(status: u16, data: &Value) -> DisplayRecord {
    let body = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
    DisplayRecord::from_response(status, body)
}

/// Extracts `error` (or FastAPI's `detail`) from an error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["error", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_id(raw: &str, missing: &str) -> Result<i64, RequestFailure> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(RequestFailure::validation(missing));
    }
    raw.parse()
        .map_err(|_| RequestFailure::validation("Book ID must be a whole number"))
}

fn parse_year(raw: &str) -> Result<i64, RequestFailure> {
    raw.trim()
        .parse()
        .map_err(|_| RequestFailure::validation("Year must be a whole number"))
}

fn build_get_book(draft: &FormDraft) -> Result<ApiRequest, RequestFailure> {
    let id = parse_id(&draft.id, "Please enter a book ID")?;
    Ok(ApiRequest::get(format!("/books/{id}")))
}

fn build_create_book(draft: &FormDraft) -> Result<ApiRequest, RequestFailure> {
    let title = draft.title.trim();
    let author = draft.author.trim();
    if title.is_empty() || author.is_empty() || draft.year.trim().is_empty() {
        return Err(RequestFailure::validation("Please fill in all fields"));
    }
    let year = parse_year(&draft.year)?;
    Ok(ApiRequest::with_json(
        HttpVerb::Post,
        "/books",
        json!({ "title": title, "author": author, "year": year }),
    ))
}

fn build_update_book(draft: &FormDraft) -> Result<ApiRequest, RequestFailure> {
    let missing = "Please provide book ID and title (other fields are optional)";
    let title = draft.title.trim();
    if draft.id.trim().is_empty() || title.is_empty() {
        return Err(RequestFailure::validation(missing));
    }
    let id = parse_id(&draft.id, missing)?;

    let mut body = Map::new();
    body.insert("title".to_string(), json!(title));
    insert_optional_fields(&mut body, draft, false)?;
    Ok(ApiRequest::with_json(
        HttpVerb::Put,
        format!("/books/{id}"),
        Value::Object(body),
    ))
}

fn build_patch_book(draft: &FormDraft) -> Result<ApiRequest, RequestFailure> {
    let id = parse_id(&draft.id, "Please provide a book ID")?;

    let mut body = Map::new();
    insert_optional_fields(&mut body, draft, true)?;
    if body.is_empty() {
        return Err(RequestFailure::validation(
            "Please provide at least one field to update",
        ));
    }
    Ok(ApiRequest::with_json(
        HttpVerb::Patch,
        format!("/books/{id}"),
        Value::Object(body),
    ))
}

fn build_delete_book(draft: &FormDraft) -> Result<ApiRequest, RequestFailure> {
    let id = parse_id(&draft.id, "Please enter a book ID")?;
    Ok(ApiRequest::delete(format!("/books/{id}")))
}

/// Adds the non-empty fields among author and year (and title if asked).
fn insert_optional_fields(
    body: &mut Map<String, Value>,
    draft: &FormDraft,
    include_title: bool,
) -> Result<(), RequestFailure> {
    if include_title && !draft.title.trim().is_empty() {
        body.insert("title".to_string(), json!(draft.title.trim()));
    }
    if !draft.author.trim().is_empty() {
        body.insert("author".to_string(), json!(draft.author.trim()));
    }
    if !draft.year.trim().is_empty() {
        body.insert("year".to_string(), json!(parse_year(&draft.year)?));
    }
    Ok(())
}
