//! `tk update` — partially update a ticket.
//!
//! The payload is a JSON object of field → value, taken from `--data` and then
//! overlaid with any `--set field=value` pairs. Which keys are allowed depends
//! on the caller's role; a payload naming any other key is rejected whole and
//! the ticket is left as it was. An empty payload succeeds without changes.

use crate::cmd::{fail, open_project, parse_ticket_id, report};
use crate::output::{CliError, OutputMode, render_item};
use clap::Args;
use serde_json::Value;
use std::path::Path;
use tickets_core::{ErrorCode, UpdateRequest};

/// Arguments for `tk update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Ticket ID to update.
    pub id: String,

    /// JSON object of fields to change, e.g. '{"is_completed": true}'.
    #[arg(long)]
    pub data: Option<String>,

    /// One `field=value` pair; repeatable. The value is read as JSON when it
    /// parses (true, 1, "text") and as a plain string otherwise.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,
}

/// Assemble the payload from `--data` and `--set`.
fn build_request(data: Option<&str>, sets: &[String]) -> Result<UpdateRequest, String> {
    let mut request = match data {
        Some(raw) => raw.parse::<UpdateRequest>().map_err(|e| e.to_string())?,
        None => UpdateRequest::default(),
    };

    for pair in sets {
        let Some((name, raw)) = pair.split_once('=') else {
            return Err(format!("invalid --set '{pair}': expected FIELD=VALUE"));
        };
        let value =
            serde_json::from_str::<Value>(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        request.insert(name.trim(), value);
    }

    Ok(request)
}

/// Execute `tk update <id>`.
///
/// # Errors
///
/// Returns an error for a malformed payload, an invisible ticket, a field the
/// caller may not change, an invalid value, or a write conflict.
pub fn run_update(
    args: &UpdateArgs,
    actor_flag: Option<&str>,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let id = parse_ticket_id(&args.id, output)?;
    let request = build_request(args.data.as_deref(), &args.set)
        .map_err(|msg| fail(output, &CliError::coded(msg, ErrorCode::InvalidPayload)))?;

    let project = open_project(project_root, output)?;
    let actor = project.actor(actor_flag, output)?;

    let ticket = project
        .service
        .update(&actor, id, &request)
        .map_err(|e| report(output, &e))?;

    tracing::info!(ticket = %id, actor = %actor.id(), fields = request.len(), "updated ticket");
    render_item(&ticket, output)?;
    Ok(())
}
