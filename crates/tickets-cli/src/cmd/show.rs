//! `tk show` — display one ticket.

use crate::cmd::{open_project, parse_ticket_id, report};
use crate::output::{OutputMode, render_item};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Ticket ID to display.
    pub id: String,
}

/// Execute `tk show <id>`. A ticket the caller cannot see is reported exactly
/// like one that does not exist.
///
/// # Errors
///
/// Returns an error if the ticket is not visible or the store fails.
pub fn run_show(
    args: &ShowArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let id = parse_ticket_id(&args.id, output)?;
    let project = open_project(project_root, output)?;
    let actor = project.actor(actor_flag, output)?;

    let ticket = project
        .service
        .retrieve(&actor, id)
        .map_err(|e| report(output, &e))?;
    render_item(&ticket, output)?;
    Ok(())
}
