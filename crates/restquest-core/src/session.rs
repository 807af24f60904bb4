//! The session controller.
//!
//! [`Session`] owns every piece of mutable state: progress, drafts, the last
//! response and the cached collection. Navigation is delegated to the pure
//! [`LevelNavigator`]; the session carries out the [`NavEffect`]s it returns.
//! Requests go through the [`RequestOrchestrator`].

use crate::book::Book;
use crate::display::DisplayRecord;
use crate::draft::FormDrafts;
use crate::error::{QuestError, Result};
use crate::level::{FormKind, LevelDef, Mode, Tutorial, Variant};
use crate::navigator::{LevelNavigator, NavEffect};
use crate::orchestrator::{RequestContext, RequestOrchestrator};
use crate::progress::Progress;
use crate::transport::Transport;

/// One learner's run through a tutorial.
#[derive(Debug)]
pub struct Session<T> {
    tutorial: Tutorial,
    progress: Progress,
    drafts: FormDrafts,
    display: Option<DisplayRecord>,
    books: Vec<Book>,
    orchestrator: RequestOrchestrator<T>,
}

impl<T: Transport> Session<T> {
    /// Creates a session on the welcome level of `variant`.
    #[must_use]
    pub fn new(variant: Variant, transport: T) -> Self {
        tracing::debug!(%variant, "Creating session");
        Self {
            tutorial: Tutorial::for_variant(variant),
            progress: Progress::new(),
            drafts: FormDrafts::default(),
            display: None,
            books: Vec::new(),
            orchestrator: RequestOrchestrator::new(transport),
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The level list being played.
    #[must_use]
    pub const fn tutorial(&self) -> &Tutorial {
        &self.tutorial
    }

    /// Learner progress.
    #[must_use]
    pub const fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Form input buffers.
    #[must_use]
    pub const fn drafts(&self) -> &FormDrafts {
        &self.drafts
    }

    /// The last response, if one is showing.
    #[must_use]
    pub const fn display(&self) -> Option<&DisplayRecord> {
        self.display.as_ref()
    }

    /// Cached book collection.
    #[must_use]
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// The underlying transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        self.orchestrator.transport()
    }

    /// The level on screen.
    #[must_use]
    pub fn current_level(&self) -> Option<&'static LevelDef> {
        self.tutorial.level(self.progress.current_level())
    }

    /// Navigation rules for this session's tutorial.
    #[must_use]
    pub const fn navigator(&self) -> LevelNavigator<'_> {
        LevelNavigator::new(&self.tutorial)
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Leaves the welcome screen.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::ModeRequired`] if a mode must be selected first.
    pub async fn start(&mut self) -> Result<NavEffect> {
        let effect = LevelNavigator::new(&self.tutorial).start(&mut self.progress)?;
        self.apply(effect).await;
        Ok(effect)
    }

    /// Moves to the next level if it is unlocked.
    pub async fn advance(&mut self) -> NavEffect {
        let effect = LevelNavigator::new(&self.tutorial).advance(&mut self.progress);
        self.apply(effect).await;
        effect
    }

    /// Moves to the previous level if there is one.
    pub async fn retreat(&mut self) -> NavEffect {
        let effect = LevelNavigator::new(&self.tutorial).retreat(&mut self.progress);
        self.apply(effect).await;
        effect
    }

    /// Starts over on the welcome level, keeping the selected mode.
    ///
    /// Only local state is cleared. The quest server keeps its own record of
    /// completed methods, so the next `select_mode` or successful GET by id
    /// merges that record back in and unlocks the levels again.
    pub fn reset(&mut self) {
        self.progress.reset();
        self.drafts = FormDrafts::default();
        self.display = None;
        tracing::info!("Session reset");
    }

    /// Selects a difficulty mode.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::ModesUnsupported`] if the variant has no modes.
    pub async fn select_mode(&mut self, mode: Mode) -> Result<()> {
        let variant = self.tutorial.variant();
        if !variant.supports_modes() {
            return Err(QuestError::modes_unsupported(variant));
        }
        self.orchestrator
            .select_mode(variant, mode, &mut self.progress)
            .await;
        Ok(())
    }

    async fn apply(&mut self, effect: NavEffect) {
        if effect.clear_display {
            self.display = None;
        }
        if effect.refresh_books {
            self.orchestrator.refresh_books(&mut self.books).await;
        }
    }

    // ------------------------------------------------------------------------
    // Requests
    // ------------------------------------------------------------------------

    /// Types `value` into `field` of `form`.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::InvalidArguments`] if the form has no such field.
    pub fn set_draft(&mut self, form: FormKind, field: &str, value: impl Into<String>) -> Result<()> {
        self.drafts.set(form, field, value)
    }

    /// Types several `field=value` pairs into `form` at once.
    ///
    /// Nothing is written unless the current level offers the form and every
    /// field exists on it.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::FormUnavailable`] if the current level doesn't
    /// offer the form, or [`QuestError::InvalidArguments`] for an unknown field.
    pub fn fill_draft<K, V>(&mut self, form: FormKind, fields: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        self.ensure_offered(form)?;
        let mut drafts = self.drafts.clone();
        for (field, value) in fields {
            drafts.set(form, field.as_ref(), value)?;
        }
        self.drafts = drafts;
        Ok(())
    }

    fn ensure_offered(&self, form: FormKind) -> Result<()> {
        let level = self
            .current_level()
            .ok_or_else(|| QuestError::form_unavailable(form.endpoint(), "?"))?;
        if !level.forms.contains(&form) {
            return Err(QuestError::form_unavailable(form.endpoint(), level.id));
        }
        Ok(())
    }

    /// Submits `form` with its current draft and shows the outcome.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::FormUnavailable`] if the current level doesn't
    /// offer the form. Request failures are not errors; they end up in the
    /// returned record.
    pub async fn submit(&mut self, form: FormKind) -> Result<&DisplayRecord> {
        self.ensure_offered(form)?;

        let mut ctx = RequestContext {
            variant: self.tutorial.variant(),
            progress: &mut self.progress,
            drafts: &mut self.drafts,
            books: &mut self.books,
        };
        let record = match form {
            FormKind::GetAll => self.orchestrator.get_all_books(&mut ctx).await,
            FormKind::GetById => self.orchestrator.get_book(&mut ctx).await,
            FormKind::Create => self.orchestrator.create_book(&mut ctx).await,
            FormKind::Update => self.orchestrator.update_book(&mut ctx).await,
            FormKind::Patch => self.orchestrator.patch_book(&mut ctx).await,
            FormKind::Delete => self.orchestrator.delete_book(&mut ctx).await,
        };
        tracing::debug!(status = %record.status_line, success = record.success, "Request finished");
        Ok(&*self.display.insert(record))
    }

    /// Re-fetches the collection. Returns `true` if it was replaced.
    pub async fn refresh_books(&mut self) -> bool {
        self.orchestrator.refresh_books(&mut self.books).await
    }
}
