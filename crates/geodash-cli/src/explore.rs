//! # Explore Subcommand
//!
//! Feeds `SetZone`, then optionally `MapClicked` and `SetSector`, into a
//! fresh selection machine and prints every outcome together with the final
//! selection and view as JSON.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use geodash_core::Catalog;
use geodash_state::{Outcome, SelectionEvent, SelectionMachine, SelectionSnapshot, Widget};
use geodash_view::{compose, ViewArtifacts};
use serde::Serialize;

/// Arguments for `geodash explore`.
#[derive(Args, Debug, Clone)]
pub struct ExploreArgs {
    /// Zone to select.
    #[arg(long)]
    pub zone: String,

    /// Territory code to click on the map (ISO alpha-3, e.g. "USA").
    #[arg(long)]
    pub click: Option<String>,

    /// Sector to select once a country is chosen.
    #[arg(long)]
    pub sector: Option<String>,
}

impl ExploreArgs {
    /// The events these arguments describe, in application order.
    pub fn events(&self) -> Vec<SelectionEvent> {
        let mut events = vec![SelectionEvent::SetZone {
            zone: self.zone.clone(),
        }];
        if let Some(code) = &self.click {
            events.push(SelectionEvent::MapClicked { code: code.clone() });
        }
        if let Some(sector) = &self.sector {
            events.push(SelectionEvent::SetSector {
                sector: sector.clone(),
            });
        }
        events
    }
}

/// One applied or ignored event.
#[derive(Debug, Serialize)]
pub struct Step {
    pub event: SelectionEvent,
    #[serde(flatten)]
    pub outcome: Outcome,
}

/// Everything `explore` prints.
#[derive(Debug, Serialize)]
pub struct Report {
    pub steps: Vec<Step>,
    pub selection: SelectionSnapshot,
    pub widgets: Vec<Widget>,
    pub view: ViewArtifacts,
}

/// Run `events` through a fresh machine.
pub fn drive(catalog: &Catalog, events: &[SelectionEvent]) -> (SelectionMachine, Vec<Step>) {
    let mut machine = SelectionMachine::new();
    let steps = events
        .iter()
        .map(|event| {
            let outcome = machine.apply(catalog, event);
            match &outcome {
                Outcome::Applied { to, .. } => {
                    tracing::info!(event = event.kind(), to = %to, "applied")
                }
                Outcome::Ignored { reason } => {
                    tracing::warn!(event = event.kind(), reason = %reason, "ignored")
                }
            }
            Step {
                event: event.clone(),
                outcome,
            }
        })
        .collect();
    (machine, steps)
}

/// Execute the explore subcommand.
pub fn run_explore(args: &ExploreArgs, catalog: &Catalog, out: &mut dyn Write) -> Result<u8> {
    let (machine, steps) = drive(catalog, &args.events());
    let selection = machine.selection();

    let report = Report {
        steps,
        selection: selection.snapshot(),
        widgets: selection.widgets(),
        view: compose(catalog, selection),
    };

    let text = serde_json::to_string_pretty(&report).context("failed to serialize view")?;
    writeln!(out, "{text}")?;
    Ok(0)
}
