//! Progress tracking for a tutorial session.
//!
//! [`Progress`] records which methods the learner has exercised and which
//! level is on screen. Completion only ever grows until [`Progress::reset`].
//! Nothing here performs I/O.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::level::{Method, Mode};

/// Number of methods counted by the progress ratio.
const REQUIRED_COUNT: u32 = 5;

/// Session-scoped learner progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    mode: Option<Mode>,
    completed: BTreeSet<Method>,
    current_level: usize,
}

impl Progress {
    /// Creates empty progress on level 0 with no mode selected.
    ///
    /// # Examples
    ///
    /// ```
    /// use restquest_core::{Method, Progress};
    ///
    /// let mut progress = Progress::new();
    /// assert!(progress.record_success(Method::Get));
    /// assert!(!progress.record_success(Method::Get));
    /// assert!(progress.is_complete(Method::Get));
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the selected difficulty mode.
    #[must_use]
    pub const fn mode(&self) -> Option<Mode> {
        self.mode
    }

    /// Selects a difficulty mode.
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
    }

    /// Index of the level on screen.
    #[must_use]
    pub const fn current_level(&self) -> usize {
        self.current_level
    }

    pub(crate) fn set_current_level(&mut self, index: usize) {
        self.current_level = index;
    }

    /// Marks `method` as completed.
    ///
    /// Returns `true` if this call added it; repeating has no further effect.
    pub fn record_success(&mut self, method: Method) -> bool {
        let added = self.completed.insert(method);
        if added {
            tracing::info!(%method, "Method completed");
        }
        added
    }

    /// Returns `true` if `method` has been completed.
    #[must_use]
    pub fn is_complete(&self, method: Method) -> bool {
        self.completed.contains(&method)
    }

    /// Completed methods in a stable order.
    pub fn completed(&self) -> impl Iterator<Item = Method> + '_ {
        self.completed.iter().copied()
    }

    /// Clears all completion and returns to level 0.
    ///
    /// The mode selection is kept so the learner can start again directly.
    pub fn reset(&mut self) {
        self.completed.clear();
        self.current_level = 0;
    }

    /// Number of required methods completed, out of five.
    #[must_use]
    pub fn required_completed(&self) -> u32 {
        Method::REQUIRED
            .iter()
            .map(|method| u32::from(self.completed.contains(method)))
            .sum()
    }

    /// Fraction of required methods completed, in `[0, 1]`.
    ///
    /// The terminal documentation level always reports `1.0`.
    #[must_use]
    pub fn completion_ratio(&self, on_terminal_documentation: bool) -> f64 {
        if on_terminal_documentation {
            return 1.0;
        }
        f64::from(self.required_completed()) / f64::from(REQUIRED_COUNT)
    }

    /// [`Progress::completion_ratio`] as a whole percentage.
    #[must_use]
    pub fn completion_percent(&self, on_terminal_documentation: bool) -> u32 {
        if on_terminal_documentation {
            return 100;
        }
        self.required_completed() * 100 / REQUIRED_COUNT
    }

    /// Unions server-reported completions into this progress.
    ///
    /// Never removes anything. Unknown method names are skipped.
    /// Returns how many methods were newly added.
    pub fn merge_remote(&mut self, remote: &RemoteProgress) -> usize {
        let mut added = 0;
        for name in &remote.completed_methods {
            match Method::from_wire(name) {
                Some(method) => {
                    if self.completed.insert(method) {
                        added += 1;
                    }
                }
                None => tracing::debug!(method = %name, "Ignoring unknown method from server"),
            }
        }
        if added > 0 {
            tracing::info!(added, "Reconciled progress with server");
        }
        added
    }
}

/// Progress object as reported by the companion server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteProgress {
    /// Mode recorded on the server, if any.
    #[serde(default)]
    pub mode: Option<String>,

    /// Method wire names the server has seen succeed.
    #[serde(default)]
    pub completed_methods: Vec<String>,

    /// Level index tracked by the server. Informational only.
    #[serde(default)]
    pub current_level: usize,
}
