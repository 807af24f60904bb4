//! JSON rendering of the view model.
//!
//! Used by `restquest --json` so the screen can be consumed by scripts.
//!
//! # Example
//!
//! ```rust
//! use restquest_core::{FormDrafts, Progress, Tutorial, Variant};
//! use restquest_view::{json::JsonRenderer, ViewModel};
//!
//! let tutorial = Tutorial::for_variant(Variant::Basics);
//! let view = ViewModel::build(&tutorial, &Progress::new(), &FormDrafts::default(), None, &[]);
//!
//! let json = JsonRenderer::new(&view).render().unwrap();
//! assert!(!json.contains('\n'));
//! ```

use crate::{Result, ViewError, ViewModel};

/// Serializes a [`ViewModel`] to JSON.
pub struct JsonRenderer<'a> {
    view: &'a ViewModel,
}

impl<'a> JsonRenderer<'a> {
    /// Creates a renderer for the given view.
    #[must_use]
    pub const fn new(view: &'a ViewModel) -> Self {
        Self { view }
    }

    /// Compact single-line JSON, one screen per line.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::Serialization`] if serialization fails.
    pub fn render(&self) -> Result<String> {
        serde_json::to_string(self.view).map_err(ViewError::from)
    }
}
