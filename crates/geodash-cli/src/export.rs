//! # Export Subcommand
//!
//! Drives a full zone, country and sector selection and writes the matching
//! records as `<Country>_<Sector>_data.csv` into the output directory.

use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::Args;
use geodash_core::Catalog;
use geodash_state::{Outcome, SelectionEvent};
use geodash_view::download_for;

use crate::explore::drive;

/// Arguments for `geodash export`.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// Zone to select.
    #[arg(long)]
    pub zone: String,

    /// Territory code of the country to click (ISO alpha-3).
    #[arg(long)]
    pub click: String,

    /// Sector to export.
    #[arg(long)]
    pub sector: String,

    /// Directory to write the CSV into. Defaults to the current directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

impl ExportArgs {
    fn events(&self) -> Vec<SelectionEvent> {
        vec![
            SelectionEvent::SetZone {
                zone: self.zone.clone(),
            },
            SelectionEvent::MapClicked {
                code: self.click.clone(),
            },
            SelectionEvent::SetSector {
                sector: self.sector.clone(),
            },
        ]
    }
}

/// Execute the export subcommand. Prints the written path.
pub fn run_export(args: &ExportArgs, catalog: &Catalog, out: &mut dyn Write) -> Result<u8> {
    let (machine, steps) = drive(catalog, &args.events());

    if let Some((step, reason)) = steps.iter().find_map(|step| match &step.outcome {
        Outcome::Ignored { reason } => Some((step, reason)),
        Outcome::Applied { .. } => None,
    }) {
        bail!(
            "selection stopped at {}: {} was ignored ({reason})",
            machine.selection().level(),
            step.event.kind()
        );
    }

    let started = Instant::now();
    let Some(download) = download_for(catalog, machine.selection())? else {
        bail!("selection has no sector to export");
    };

    let dir = args.out.clone().unwrap_or_else(|| PathBuf::from("."));
    let path = dir.join(&download.filename);
    std::fs::write(&path, &download.bytes)
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        bytes = download.bytes.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "export written"
    );
    writeln!(out, "{}", path.display())?;
    Ok(0)
}
