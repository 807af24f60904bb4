//! REST Quest View
//!
//! Turns a session snapshot into a [`ViewModel`] and renders it. Nothing in
//! this crate performs I/O; the caller writes the rendered output.
//!
//! # Types
//!
//! - [`ViewModel`] - Everything a screen shows, built by [`ViewModel::build`]
//! - [`LevelPanel`] - Title, lesson and forms of the current level
//! - [`Navigation`] - Which navigation commands would have an effect
//! - [`ProgressSummary`] - Completion ratio and completed methods
//! - [`BookRow`] - One row of the live book table
//!
//! # Renderers
//!
//! - [`TextRenderer`] - Plain text for the interactive terminal
//! - [`json::JsonRenderer`] - Serialized view model for scripting
//!
//! # Example
//!
//! ```rust
//! use restquest_core::{FormDrafts, Progress, Tutorial, Variant};
//! use restquest_view::{TextRenderer, ViewModel};
//!
//! let tutorial = Tutorial::for_variant(Variant::Classic);
//! let progress = Progress::new();
//! let drafts = FormDrafts::default();
//!
//! let view = ViewModel::build(&tutorial, &progress, &drafts, None, &[]);
//! assert!(view.navigation.can_start);
//!
//! let text = TextRenderer::new(&view).render();
//! assert!(text.contains("Welcome to REST Quest"));
//! ```

pub mod json;
mod text;

pub use text::TextRenderer;

use restquest_core::{
    Book, DisplayRecord, FormDrafts, FormKind, LevelDef, LevelKind, LevelNavigator, Method, Mode,
    Progress, Tutorial, Variant,
};
use serde::Serialize;
use thiserror::Error;

/// Glyph for an available book.
pub const AVAILABLE_GLYPH: &str = "✅";

/// Glyph for a book that is on loan.
pub const UNAVAILABLE_GLYPH: &str = "❌";

/// Placeholder for a missing table cell.
pub const MISSING_CELL: &str = "-";

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur while rendering.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Failed to serialize the view model to JSON.
    #[error("failed to serialize view: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, ViewError>;

// ============================================================================
// View Model
// ============================================================================

/// A complete, immutable snapshot of what the learner sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    /// Active tutorial variant.
    pub variant: Variant,
    /// Selected difficulty mode, if any.
    pub mode: Option<Mode>,
    /// Current level.
    pub level: LevelPanel,
    /// Navigation availability.
    pub navigation: Navigation,
    /// Completion summary.
    pub progress: ProgressSummary,
    /// Last response, if one is showing.
    pub response: Option<DisplayRecord>,
    /// Book table rows; `None` when the level hides the table.
    pub table: Option<Vec<BookRow>>,
}

/// The current level as shown in the level panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelPanel {
    /// Zero-based level index.
    pub index: usize,
    /// `"Welcome"` or `"Level i of N"`.
    pub position: String,
    /// Stable identifier.
    pub id: &'static str,
    /// Level title.
    pub title: &'static str,
    /// Lesson text.
    pub lesson: &'static str,
    /// Screen kind.
    pub kind: LevelKind,
    /// Method this level asks for.
    pub required: Option<Method>,
    /// Forms offered, with the learner's draft values.
    pub forms: Vec<FormView>,
}

/// One request form and what has been typed into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    /// Which form this is.
    pub kind: FormKind,
    /// Endpoint label, e.g. `POST /api/books`.
    pub endpoint: &'static str,
    /// Command that submits it.
    pub command: &'static str,
    /// Input fields.
    pub fields: Vec<FieldView>,
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldView {
    /// Command key.
    pub name: &'static str,
    /// Placeholder label.
    pub label: &'static str,
    /// Whether it must be filled.
    pub required: bool,
    /// Current draft value.
    pub value: String,
}

/// Which navigation commands would change the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Navigation {
    /// `start` leaves the welcome screen.
    pub can_start: bool,
    /// `prev` moves back.
    pub can_retreat: bool,
    /// `next` moves forward.
    pub can_advance: bool,
    /// A difficulty mode has to be chosen before `start`.
    pub needs_mode: bool,
}

/// Completion summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSummary {
    /// Fraction of required methods done, in `[0, 1]`.
    pub ratio: f64,
    /// `ratio` as a whole percentage.
    pub percent: u32,
    /// Completed methods, wire names when serialized.
    pub completed: Vec<Method>,
}

/// One row of the book table, already formatted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRow {
    /// Book id.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Author or `"-"`.
    pub author: String,
    /// Year or `"-"`.
    pub year: String,
    /// Availability glyph.
    pub available: &'static str,
}

impl From<&Book> for BookRow {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            author: book
                .author
                .clone()
                .filter(|author| !author.is_empty())
                .unwrap_or_else(|| MISSING_CELL.to_string()),
            year: book
                .year
                .map_or_else(|| MISSING_CELL.to_string(), |year| year.to_string()),
            available: if book.available {
                AVAILABLE_GLYPH
            } else {
                UNAVAILABLE_GLYPH
            },
        }
    }
}

impl ViewModel {
    /// Builds the view of a session snapshot.
    ///
    /// An out-of-range level index is clamped to the terminal level.
    #[must_use]
    pub fn build(
        tutorial: &Tutorial,
        progress: &Progress,
        drafts: &FormDrafts,
        response: Option<&DisplayRecord>,
        books: &[Book],
    ) -> Self {
        let index = progress.current_level().min(tutorial.terminal_index());
        let level = &tutorial.levels()[index];
        let navigator = LevelNavigator::new(tutorial);
        let on_documentation = tutorial.is_terminal_documentation(index);

        let can_start = navigator.can_start(progress);
        Self {
            variant: tutorial.variant(),
            mode: progress.mode(),
            level: LevelPanel::build(tutorial, index, level, drafts),
            navigation: Navigation {
                can_start,
                can_retreat: navigator.can_retreat(progress),
                can_advance: navigator.can_advance(progress),
                needs_mode: can_start
                    && tutorial.variant().supports_modes()
                    && progress.mode().is_none(),
            },
            progress: ProgressSummary {
                ratio: progress.completion_ratio(on_documentation),
                percent: progress.completion_percent(on_documentation),
                completed: progress.completed().collect(),
            },
            response: response.cloned(),
            table: level
                .shows_table
                .then(|| books.iter().map(BookRow::from).collect()),
        }
    }
}

impl LevelPanel {
    fn build(tutorial: &Tutorial, index: usize, level: &'static LevelDef, drafts: &FormDrafts) -> Self {
        let position = if level.kind == LevelKind::Welcome {
            "Welcome".to_string()
        } else {
            format!("Level {index} of {}", tutorial.terminal_index())
        };
        let forms = level
            .forms
            .iter()
            .map(|&kind| {
                let draft = drafts.get(kind);
                FormView {
                    kind,
                    endpoint: kind.endpoint(),
                    command: kind.command(),
                    fields: kind
                        .fields()
                        .iter()
                        .map(|spec| FieldView {
                            name: spec.name,
                            label: spec.label,
                            required: spec.required,
                            value: draft.value(spec.name).unwrap_or_default().to_string(),
                        })
                        .collect(),
                }
            })
            .collect();

        Self {
            index,
            position,
            id: level.id,
            title: level.title,
            lesson: level.lesson,
            kind: level.kind,
            required: level.required,
            forms,
        }
    }
}
