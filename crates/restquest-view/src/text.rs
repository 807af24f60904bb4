//! Plain-text rendering for the interactive terminal.
//!
//! The screen is laid out top to bottom: level panel, progress bar,
//! navigation hints, forms, the last response and the book table.

use std::fmt::Write;

use crate::{BookRow, FormView, ViewModel};

/// Width of the progress bar in characters.
const PROGRESS_BAR_WIDTH: usize = 20;

/// Renders a [`ViewModel`] as terminal text.
pub struct TextRenderer<'a> {
    view: &'a ViewModel,
}

impl<'a> TextRenderer<'a> {
    /// Creates a renderer for the given view.
    #[must_use]
    pub const fn new(view: &'a ViewModel) -> Self {
        Self { view }
    }

    /// Renders the whole screen.
    #[must_use]
    pub fn render(&self) -> String {
        let mut output = String::new();

        self.write_level(&mut output);
        self.write_progress(&mut output);
        self.write_navigation(&mut output);
        self.write_forms(&mut output);
        self.write_response(&mut output);
        self.write_table(&mut output);

        output
    }

    fn write_level(&self, output: &mut String) {
        let level = &self.view.level;
        let _ = writeln!(output, "== {} · {} ==", level.position, level.title);
        let _ = writeln!(output, "{}", level.lesson);
        if let Some(method) = level.required {
            let _ = writeln!(output, "Goal: complete a {method} request");
        }
        let _ = writeln!(output);
    }

    fn write_progress(&self, output: &mut String) {
        let progress = &self.view.progress;
        let _ = writeln!(
            output,
            "Progress: {} {}%",
            progress_bar(progress.ratio),
            progress.percent
        );
        let mode = self.view.mode.map_or("none", |mode| mode.as_str());
        let completed: Vec<&str> = progress.completed.iter().map(|m| m.wire_name()).collect();
        let completed = if completed.is_empty() {
            "none yet".to_string()
        } else {
            completed.join(", ")
        };
        if self.view.variant.supports_modes() {
            let _ = writeln!(output, "Mode: {mode}   Completed: {completed}");
        } else {
            let _ = writeln!(output, "Completed: {completed}");
        }
        let _ = writeln!(output);
    }

    fn write_navigation(&self, output: &mut String) {
        let nav = &self.view.navigation;
        let mut hints = Vec::new();
        if nav.needs_mode {
            hints.push("mode beginner|advanced");
        }
        if nav.can_start {
            hints.push("start");
        }
        if nav.can_retreat {
            hints.push("prev");
        }
        if nav.can_advance {
            hints.push("next");
        }
        if !hints.is_empty() {
            let _ = writeln!(output, "Available: {}", hints.join("  "));
            let _ = writeln!(output);
        }
    }

    fn write_forms(&self, output: &mut String) {
        for form in &self.view.level.forms {
            write_form(output, form);
        }
    }

    fn write_response(&self, output: &mut String) {
        let Some(record) = &self.view.response else {
            return;
        };
        let marker = if record.success { "OK" } else { "ERROR" };
        let _ = writeln!(output, "Response [{marker}] {}", record.status_line);
        for line in record.body_text.lines() {
            let _ = writeln!(output, "  {line}");
        }
        let _ = writeln!(output);
    }

    fn write_table(&self, output: &mut String) {
        let Some(rows) = &self.view.table else {
            return;
        };
        let _ = writeln!(output, "Books");
        if rows.is_empty() {
            let _ = writeln!(output, "  (no books)");
            return;
        }

        let header = ["ID", "Title", "Author", "Year", "Available"];
        let cells: Vec<[String; 5]> = rows.iter().map(row_cells).collect();
        let mut widths = header.map(str::len);
        for row in &cells {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.chars().count());
            }
        }

        write_row(output, &header.map(str::to_string), &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        let _ = writeln!(output, "  {}", rule.join("-+-"));
        for row in &cells {
            write_row(output, row, &widths);
        }
    }
}

fn write_form(output: &mut String, form: &FormView) {
    let _ = writeln!(output, "[{}]  usage: {}", form.endpoint, form.command);
    for field in &form.fields {
        let value = if field.value.is_empty() {
            "(empty)"
        } else {
            field.value.as_str()
        };
        let required = if field.required { "*" } else { " " };
        let _ = writeln!(output, "  {required}{:<7} {value}   {}", field.name, field.label);
    }
    let _ = writeln!(output);
}

fn row_cells(row: &BookRow) -> [String; 5] {
    [
        row.id.to_string(),
        row.title.clone(),
        row.author.clone(),
        row.year.clone(),
        row.available.to_string(),
    ]
}

fn write_row(output: &mut String, cells: &[String; 5], widths: &[usize; 5]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    let _ = writeln!(output, "  {}", padded.join(" | ").trim_end());
}

/// Renders `ratio` as `[#####...............]`.
fn progress_bar(ratio: f64) -> String {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let filled = ((ratio.clamp(0.0, 1.0) * PROGRESS_BAR_WIDTH as f64).round() as usize)
        .min(PROGRESS_BAR_WIDTH);
    format!(
        "[{}{}]",
        "#".repeat(filled),
        ".".repeat(PROGRESS_BAR_WIDTH - filled)
    )
}
