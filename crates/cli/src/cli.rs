//! CLI definitions and run dispatch.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use log::debug;

use fontbatch_core::{ExternalConverter, RunOptions, RunOutcome, config::DEFAULT_EXTENSION, run};

use crate::report::{ConsoleBanner, render_no_files, render_report};

#[derive(Parser)]
#[command(name = "fontbatch")]
#[command(about = "Convert every font in a directory with otf2ttf, in parallel")]
pub struct Cli {
    /// Directory containing the source fonts
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// Source font extension, matched case-insensitively
    #[arg(short, long, default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Hide the progress bar (per-file lines are still printed)
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Run the batch and return the process exit code.
    pub fn run(self) -> Result<u8> {
        let options = RunOptions::new(&self.dir)
            .with_extension(self.extension)
            .with_progress(!self.no_progress);
        debug!("Run options: {options:?}");
        let converter = Arc::new(ExternalConverter::default());

        let outcome = run(&options, converter, &mut ConsoleBanner)
            .with_context(|| format!("Failed to convert fonts in {}", self.dir.display()))?;

        match &outcome {
            RunOutcome::NoFiles => eprintln!("{}", render_no_files(&options)),
            RunOutcome::Completed(summary) => print!("{}", render_report(summary)),
        }
        Ok(outcome.exit_code())
    }
}
