//! `tk list` — tickets visible to the caller.
//!
//! Staff see every ticket; everyone else sees only the tickets they wrote.

use crate::cmd::{open_project, report};
use crate::output::{OutputMode, render_list};
use clap::Args;
use std::path::Path;

#[derive(Args, Debug)]
pub struct ListArgs {}

/// Execute `tk list`.
///
/// # Errors
///
/// Returns an error if the project cannot be opened, no actor is resolved, or
/// the store fails.
pub fn run_list(
    _args: &ListArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let project = open_project(project_root, output)?;
    let actor = project.actor(actor_flag, output)?;

    let tickets = project
        .service
        .list(&actor)
        .map_err(|e| report(output, &e))?;

    if tickets.is_empty() && output == OutputMode::Pretty {
        println!("No tickets.");
        return Ok(());
    }
    render_list(&tickets, output)?;
    Ok(())
}
