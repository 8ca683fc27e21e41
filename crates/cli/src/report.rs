//! Console banner and final report.

use std::{fmt::Write, time::Duration};

use chrono::{DateTime, Local};
use fontbatch_core::{RunObserver, RunOptions, RunPlan, RunSummary, config::DISPLAY_WIDTH};

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Prints the run banner to stdout when dispatch starts.
pub struct ConsoleBanner;

impl RunObserver for ConsoleBanner {
    fn on_start(&mut self, plan: &RunPlan<'_>) {
        print!("{}", render_banner(plan));
    }
}

pub fn render_banner(plan: &RunPlan<'_>) -> String {
    let rule = "=".repeat(DISPLAY_WIDTH);
    let title = format!("Font Converter - v{}", env!("CARGO_PKG_VERSION"));
    let mut out = String::new();
    let _ = writeln!(out, "{rule}");
    let _ = writeln!(out, "{title:^DISPLAY_WIDTH$}");
    let _ = writeln!(out, "{rule}\n");
    let _ = writeln!(out, "Directory: {}", plan.dir.display());
    let _ = writeln!(out, "Files:     {} .{} files", plan.files, plan.extension);
    let _ = writeln!(out, "Workers:   {} (based on {} CPU cores)", plan.workers, plan.cpus);
    let _ = writeln!(out, "Started:   {}\n", format_timestamp(&plan.started_at));
    out
}

pub fn render_report(summary: &RunSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n{:=^DISPLAY_WIDTH$}", " Results ");
    let _ = writeln!(out, "✓ Succeeded: {} files", summary.succeeded);
    let _ = writeln!(out, "× Failed:    {} files", summary.failed);
    let _ = writeln!(
        out,
        "Total time:  {} (average {:.3} s/file)",
        format_hms(summary.wall_time),
        summary.average_per_file().as_secs_f64()
    );
    let _ = writeln!(out, "Throughput:  {:.2} files/s", summary.throughput());
    let _ = writeln!(out, "Finished:    {}", format_timestamp(&summary.finished_at));

    if !summary.failures.is_empty() {
        let _ = writeln!(out, "\nFailed files:");
        for failure in &summary.failures {
            let _ = writeln!(out, "  - {}: {}", failure.filename, failure.message);
        }
    }

    let _ = writeln!(out, "\n{}", "=".repeat(DISPLAY_WIDTH));
    out
}

pub fn render_no_files(options: &RunOptions) -> String {
    format!(
        "error: no .{} files found in {}",
        options.extension.trim_start_matches('.'),
        options.dir.display()
    )
}

/// Whole seconds as `H:MM:SS`.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}:{:02}", secs / 3600, secs / 60 % 60, secs % 60)
}

fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format(TIME_FORMAT).to_string()
}
