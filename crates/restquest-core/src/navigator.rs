//! Linear level navigation.
//!
//! The navigator is a pure state machine over [`Progress::current_level`].
//! It never performs I/O; every transition returns a [`NavEffect`] that the
//! session carries out.
//!
//! ```text
//! Level[0] --start--> Level[1] <--advance/retreat--> ... Level[N-1]
//! ```
//!
//! Disallowed transitions are silent no-ops, except `start` without a
//! required mode, which is reported to the learner.

use serde::Serialize;

use crate::error::{QuestError, Result};
use crate::level::{Method, Tutorial};
use crate::progress::Progress;

/// Side effects required after a navigation call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NavEffect {
    /// Whether the level index changed.
    pub moved: bool,
    /// Whether the stale response record must be cleared.
    pub clear_display: bool,
    /// Whether the book collection must be re-fetched.
    pub refresh_books: bool,
}

impl NavEffect {
    /// No transition happened.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            moved: false,
            clear_display: false,
            refresh_books: false,
        }
    }

    const fn arrived(shows_table: bool) -> Self {
        Self {
            moved: true,
            clear_display: true,
            refresh_books: shows_table,
        }
    }
}

/// Navigation rules for one tutorial.
#[derive(Debug, Clone, Copy)]
pub struct LevelNavigator<'a> {
    tutorial: &'a Tutorial,
}

impl<'a> LevelNavigator<'a> {
    /// Creates a navigator over the given tutorial.
    #[must_use]
    pub const fn new(tutorial: &'a Tutorial) -> Self {
        Self { tutorial }
    }

    /// Returns `true` if [`LevelNavigator::advance`] would move forward.
    ///
    /// Requires the current level's method to be completed and a level to
    /// exist after it. On the penultimate level, a completed DELETE also
    /// opens a terminal level that has no method of its own.
    #[must_use]
    pub fn can_advance(&self, progress: &Progress) -> bool {
        let index = progress.current_level();
        let terminal = self.tutorial.terminal_index();
        if index >= terminal {
            return false;
        }

        let Some(level) = self.tutorial.level(index) else {
            return false;
        };
        if level
            .required
            .is_some_and(|method| progress.is_complete(method))
        {
            return true;
        }

        index + 1 == terminal
            && self
                .tutorial
                .level(terminal)
                .is_some_and(|last| last.required.is_none())
            && progress.is_complete(Method::Delete)
    }

    /// Returns `true` if [`LevelNavigator::retreat`] would move back.
    #[must_use]
    pub fn can_retreat(&self, progress: &Progress) -> bool {
        progress.current_level() > self.tutorial.first_interactive()
    }

    /// Returns `true` while the welcome screen is showing.
    #[must_use]
    pub const fn can_start(&self, progress: &Progress) -> bool {
        progress.current_level() == 0
    }

    /// Moves to the next level if allowed.
    pub fn advance(&self, progress: &mut Progress) -> NavEffect {
        if !self.can_advance(progress) {
            tracing::debug!(level = progress.current_level(), "Advance ignored");
            return NavEffect::none();
        }
        self.move_to(progress, progress.current_level() + 1)
    }

    /// Moves to the previous level if allowed.
    pub fn retreat(&self, progress: &mut Progress) -> NavEffect {
        if !self.can_retreat(progress) {
            tracing::debug!(level = progress.current_level(), "Retreat ignored");
            return NavEffect::none();
        }
        self.move_to(progress, progress.current_level() - 1)
    }

    /// Leaves the welcome screen.
    ///
    /// Always refreshes the collection on success.
    ///
    /// # Errors
    ///
    /// Returns [`QuestError::ModeRequired`] if the variant needs a difficulty
    /// mode and none is selected. Progress is left untouched.
    pub fn start(&self, progress: &mut Progress) -> Result<NavEffect> {
        if !self.can_start(progress) {
            return Ok(NavEffect::none());
        }
        if self.tutorial.variant().supports_modes() && progress.mode().is_none() {
            return Err(QuestError::ModeRequired);
        }
        let mut effect = self.move_to(progress, 1);
        effect.refresh_books = true;
        Ok(effect)
    }

    fn move_to(&self, progress: &mut Progress, index: usize) -> NavEffect {
        let shows_table = self
            .tutorial
            .level(index)
            .is_some_and(|level| level.shows_table);
        tracing::info!(from = progress.current_level(), to = index, "Level changed");
        progress.set_current_level(index);
        NavEffect::arrived(shows_table)
    }
}
