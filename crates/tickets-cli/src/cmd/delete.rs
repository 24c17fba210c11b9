//! `tk delete` — remove a ticket the caller can see.

use crate::cmd::{open_project, parse_ticket_id, report};
use crate::output::{OutputMode, render};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use tickets_core::model::TicketId;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Ticket ID to delete.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DeleteOutput {
    id: TicketId,
    deleted: bool,
}

/// Execute `tk delete <id>`.
///
/// # Errors
///
/// Returns an error if the ticket is not visible or the store fails.
pub fn run_delete(
    args: &DeleteArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let id = parse_ticket_id(&args.id, output)?;
    let project = open_project(project_root, output)?;
    let actor = project.actor(actor_flag, output)?;

    project
        .service
        .destroy(&actor, id)
        .map_err(|e| report(output, &e))?;

    tracing::info!(ticket = %id, actor = %actor.id(), "deleted ticket");
    render(output, &DeleteOutput { id, deleted: true }, |out, w| {
        writeln!(w, "✓ Deleted ticket {}", out.id)
    })
}
