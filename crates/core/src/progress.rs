//! Live progress display for a conversion run.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::{
    ConversionResult,
    config::{ERROR_EXCERPT_CHARS, FILENAME_DISPLAY_CHARS},
};

const BAR_TEMPLATE: &str = "[{pos}/{len}] |{bar:50.green/white}| {msg}";

/// Renders a progress bar and one status line per completed conversion.
///
/// Purely observational: it only writes to the terminal.
pub struct ProgressReporter {
    bar: ProgressBar,
    total: usize,
    completed: usize,
}

impl ProgressReporter {
    /// Create a reporter for `total` results. The bar is drawn on stderr
    /// when `visible` is set and stderr is a terminal; status lines are
    /// always written.
    pub fn new(total: usize, visible: bool) -> Self {
        let target =
            if visible { ProgressDrawTarget::stderr() } else { ProgressDrawTarget::hidden() };
        let bar = ProgressBar::with_draw_target(Some(total as u64), target);
        bar.set_style(
            ProgressStyle::with_template(BAR_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▌-"),
        );
        bar.set_message(format_percent(0, total));
        Self { bar, total, completed: 0 }
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn is_finished(&self) -> bool {
        self.bar.is_finished()
    }

    /// Advance by one result and print its status line. The bar is finished
    /// once, on the last expected result.
    pub fn record(&mut self, result: &ConversionResult) {
        if self.completed >= self.total {
            return;
        }
        self.completed += 1;

        let line = format_result_line(self.completed, self.total, result);
        if self.bar.is_hidden() {
            println!("{line}");
        } else {
            self.bar.println(line);
        }

        self.bar.set_position(self.completed as u64);
        self.bar.set_message(format_percent(self.completed, self.total));
        if self.completed == self.total {
            self.bar.finish();
        }
    }
}

/// Completion as a percentage with one decimal, e.g. `66.7%`.
pub fn format_percent(done: usize, total: usize) -> String {
    let percent = if total == 0 { 100.0 } else { 100.0 * done as f64 / total as f64 };
    format!("{percent:.1}%")
}

/// Status line for one completed conversion, carrying the count and
/// percentage so progress stays visible when the bar is hidden.
pub fn format_result_line(done: usize, total: usize, result: &ConversionResult) -> String {
    let name = truncate_with_marker(&result.filename, FILENAME_DISPLAY_CHARS);
    let status = if result.is_success() { "✓ ok    " } else { "× failed" };
    let mut line = format!(
        "[{done}/{total} {}] | {name:<width$} | {status} | {:.3}s",
        format_percent(done, total),
        result.elapsed.as_secs_f64(),
        width = FILENAME_DISPLAY_CHARS + 2,
    );
    if !result.is_success() {
        let excerpt: String = result.error_message().chars().take(ERROR_EXCERPT_CHARS).collect();
        line.push_str(" | error: ");
        line.push_str(&excerpt);
    }
    line
}

fn truncate_with_marker(s: &str, max_chars: usize) -> String {
    let mut chars = s.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() { format!("{head}..") } else { head }
}
