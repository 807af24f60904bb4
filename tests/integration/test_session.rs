//! End-to-end tests for a tutorial session against a mock books server.
//!
//! Requests travel through the real reqwest transport to an in-process axum
//! server bound to an ephemeral port.

mod mock_server;

use mock_server::MockApi;
use restquest_core::{
    FormKind, HttpTransport, LevelKind, Method, Mode, QuestError, Session, Variant,
};
use restquest_view::{TextRenderer, ViewModel};

async fn session_for(api: &MockApi, variant: Variant) -> Session<HttpTransport> {
    let base_url = mock_server::spawn(api.clone()).await;
    let transport = HttpTransport::new(base_url).expect("Failed to build transport");
    Session::new(variant, transport)
}

fn render(session: &Session<HttpTransport>) -> String {
    let view = ViewModel::build(
        session.tutorial(),
        session.progress(),
        session.drafts(),
        session.display(),
        session.books(),
    );
    TextRenderer::new(&view).render()
}

// ============================================================================
// Beginner Walkthrough
// ============================================================================

/// Mode beginner, start, GET all: success, "200 OK", GET completed, next unlocked.
#[tokio::test]
async fn test_beginner_get_all_unlocks_next_level() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    let mut session = session_for(&api, Variant::Quest).await;

    session.select_mode(Mode::Beginner).await.unwrap();
    session.start().await.unwrap();
    let record = session.submit(FormKind::GetAll).await.unwrap().clone();

    assert!(record.success);
    assert_eq!(record.status_line, "200 OK");
    assert!(record.body_text.contains("\"title\": \"Dune\""));
    assert!(session.progress().is_complete(Method::Get));
    assert!(session.navigator().can_advance(session.progress()));
    assert_eq!(session.books().len(), 1);
    assert_eq!(api.mode(), "beginner");

    let screen = render(&session);
    assert!(screen.contains("Available: next"));
    assert!(screen.contains("Frank Herbert"));
}

/// Starting quest without a mode is refused and makes no requests.
#[tokio::test]
async fn test_quest_start_requires_mode() {
    let api = MockApi::empty();
    let mut session = session_for(&api, Variant::Quest).await;

    let err = session.start().await.unwrap_err();

    assert!(matches!(err, QuestError::ModeRequired));
    assert_eq!(api.hits(), 0);
}

// ============================================================================
// Request Round Trips
// ============================================================================

/// POST {T, A, 2024}: the refreshed table holds exactly that book.
#[tokio::test]
async fn test_post_round_trip_refreshes_table() {
    let api = MockApi::empty();
    let mut session = session_for(&api, Variant::Classic).await;
    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();
    session.advance().await;

    for (field, value) in [("title", "T"), ("author", "A"), ("year", "2024")] {
        session.set_draft(FormKind::Create, field, value).unwrap();
    }
    let record = session.submit(FormKind::Create).await.unwrap().clone();

    assert!(record.success);
    assert_eq!(record.status_line, "201 Created");
    assert!(session.progress().is_complete(Method::Post));
    assert!(session.drafts().get(FormKind::Create).is_empty());

    let books = session.books();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "T");
    assert_eq!(books[0].author.as_deref(), Some("A"));
    assert_eq!(books[0].year, Some(2024));
}

/// DELETE of a nonexistent id fails and is not recorded.
#[tokio::test]
async fn test_delete_nonexistent_book() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    let mut session = session_for(&api, Variant::Basics).await;
    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();
    session.advance().await;
    assert_eq!(
        session.current_level().unwrap().id,
        "http-methods",
        "basics playground should offer every form"
    );

    session.set_draft(FormKind::Delete, "id", "99").unwrap();
    let record = session.submit(FormKind::Delete).await.unwrap().clone();

    assert!(!record.success);
    assert_eq!(record.status_line, "404 Not Found");
    assert_eq!(record.body_text, "Book not found");
    assert!(!session.progress().is_complete(Method::Delete));
    assert_eq!(session.books().len(), 1);
}

/// PUT without author/year leaves them missing, and the table shows "-".
#[tokio::test]
async fn test_put_clears_omitted_fields() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    let mut session = session_for(&api, Variant::Basics).await;
    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();
    session.advance().await;

    session.set_draft(FormKind::Update, "id", "1").unwrap();
    session.set_draft(FormKind::Update, "title", "Dune Messiah").unwrap();
    let record = session.submit(FormKind::Update).await.unwrap().clone();

    assert!(record.success, "{record:?}");
    let book = &session.books()[0];
    assert_eq!(book.title, "Dune Messiah");
    assert!(book.author.is_none());
    assert!(book.year.is_none());

    let screen = render(&session);
    assert!(screen.contains("Dune Messiah | -"));
}

/// Validation failures never reach the server.
#[tokio::test]
async fn test_validation_makes_no_requests() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    let mut session = session_for(&api, Variant::Basics).await;
    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();
    session.advance().await;
    let hits_before = api.hits();

    session.set_draft(FormKind::Patch, "id", "1").unwrap();
    let record = session.submit(FormKind::Patch).await.unwrap().clone();

    assert_eq!(record.status_line, "400 Bad Request");
    assert_eq!(
        record.body_text,
        r#"{"error":"Please provide at least one field to update"}"#
    );
    assert_eq!(api.hits(), hits_before);
}

// ============================================================================
// Server Progress
// ============================================================================

/// GET by id in quest merges whatever the server has recorded.
#[tokio::test]
async fn test_get_by_id_reconciles_server_progress() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    api.complete("POST");
    let mut session = session_for(&api, Variant::Quest).await;
    session.select_mode(Mode::Advanced).await.unwrap();
    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();
    session.advance().await;

    session.set_draft(FormKind::GetById, "id", "1").unwrap();
    let record = session.submit(FormKind::GetById).await.unwrap().clone();

    assert!(record.success);
    assert!(session.progress().is_complete(Method::GetById));
    assert!(session.progress().is_complete(Method::Post));
    assert!(api.completed().contains(&"GET_ID".to_string()));
}

/// Every request carries the progress header unless it is disabled.
#[tokio::test]
async fn test_progress_header_can_be_disabled() {
    let api = MockApi::empty();
    let base_url = mock_server::spawn(api.clone()).await;
    let transport = HttpTransport::new(base_url)
        .unwrap()
        .with_progress_header(false);
    let mut session = Session::new(Variant::Classic, transport);

    session.start().await.unwrap();
    session.submit(FormKind::GetAll).await.unwrap();

    assert_eq!(api.hits(), 2);
    assert_eq!(api.tracked_hits(), 0);
    assert!(api.completed().is_empty());
}

// ============================================================================
// Full Walkthrough
// ============================================================================

/// Advanced quest from welcome to the documentation finale.
#[tokio::test]
async fn test_quest_walkthrough_reaches_documentation() {
    let api = MockApi::with_books(&[("Dune", "Frank Herbert", 1965)]);
    let mut session = session_for(&api, Variant::Quest).await;
    session.select_mode(Mode::Advanced).await.unwrap();
    session.start().await.unwrap();

    session.submit(FormKind::GetAll).await.unwrap();
    assert!(session.advance().await.moved);

    session.set_draft(FormKind::GetById, "id", "1").unwrap();
    session.submit(FormKind::GetById).await.unwrap();
    assert!(session.advance().await.moved);

    for (field, value) in [("title", "Emma"), ("author", "Jane Austen"), ("year", "1815")] {
        session.set_draft(FormKind::Create, field, value).unwrap();
    }
    session.submit(FormKind::Create).await.unwrap();
    assert!(session.advance().await.moved);

    session.set_draft(FormKind::Update, "id", "2").unwrap();
    session.set_draft(FormKind::Update, "title", "Persuasion").unwrap();
    session.submit(FormKind::Update).await.unwrap();
    assert!(session.advance().await.moved);

    session.set_draft(FormKind::Patch, "id", "2").unwrap();
    session.set_draft(FormKind::Patch, "year", "1817").unwrap();
    session.submit(FormKind::Patch).await.unwrap();
    assert!(session.advance().await.moved);

    session.set_draft(FormKind::Delete, "id", "2").unwrap();
    let record = session.submit(FormKind::Delete).await.unwrap().clone();
    assert_eq!(record.status_line, "204 No Content");
    assert!(session.advance().await.moved);

    let level = session.current_level().unwrap();
    assert_eq!(level.kind, LevelKind::Documentation);
    assert!(!session.navigator().can_advance(session.progress()));
    assert!(session.display().is_none());
    assert_eq!(session.books().len(), 1);

    let screen = render(&session);
    assert!(screen.contains("100%"));
}
