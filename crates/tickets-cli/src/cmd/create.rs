//! `tk create` — open a new ticket authored by the caller.

use crate::cmd::{open_project, report};
use crate::output::{OutputMode, render_item};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Ticket text (trimmed; at most 256 characters).
    #[arg(short, long)]
    pub body: String,
}

/// Execute `tk create --body <text>`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened, no actor is resolved, or
/// the body is blank or too long.
pub fn run_create(
    args: &CreateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = open_project(project_root, output)?;
    let actor = project.actor(actor_flag, output)?;

    let ticket = project
        .service
        .create(&actor, &args.body)
        .map_err(|e| report(output, &e))?;

    tracing::info!(ticket = %ticket.id, actor = %actor.id(), "created ticket");
    render_item(&ticket, output)?;
    Ok(())
}
