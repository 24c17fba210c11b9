//! Command handlers and the project plumbing they share.

pub mod completions;
pub mod create;
pub mod delete;
pub mod init;
pub mod list;
pub mod show;
pub mod update;

use crate::actor;
use crate::output::{CliError, OutputMode, render_error};
use std::path::{Path, PathBuf};
use tickets_core::config::{self, DB_FILE, ProjectConfig};
use tickets_core::model::{Actor, TicketId};
use tickets_core::{ErrorCode, SqliteStore, TicketError, TicketService};

/// An opened project: its config plus a service over its database.
pub struct Project {
    pub tickets_dir: PathBuf,
    pub config: ProjectConfig,
    pub service: TicketService<SqliteStore>,
}

/// Render `error` and hand back an error for `main` to exit on.
pub fn fail(output: OutputMode, error: &CliError) -> anyhow::Error {
    if let Err(render_err) = render_error(output, error) {
        return render_err;
    }
    anyhow::anyhow!("{}", error.message)
}

/// Render a core outcome that ended the command.
pub fn report(output: OutputMode, err: &TicketError) -> anyhow::Error {
    if err.is_retryable() {
        tracing::warn!(error = %err, "request hit a write conflict");
    }
    fail(output, &CliError::from(err))
}

/// Locate `.tickets/`, load and validate its config, and open the store.
///
/// # Errors
///
/// Fails (after rendering the reason) when no project is found, the config is
/// malformed or describes an invalid policy, or the database cannot be opened.
pub fn open_project(project_root: &Path, output: OutputMode) -> anyhow::Result<Project> {
    let tickets_dir = config::find_tickets_dir(project_root).ok_or_else(|| {
        fail(
            output,
            &CliError::coded(
                "Not a tickets project: .tickets directory not found",
                ErrorCode::NotInitialized,
            ),
        )
    })?;

    let config = config::load_project_config(&tickets_dir).map_err(|e| {
        fail(
            output,
            &CliError::coded(format!("{e:#}"), ErrorCode::ConfigParseError),
        )
    })?;

    let policy = config.policy.build().map_err(|e| {
        fail(
            output,
            &CliError::coded(e.to_string(), ErrorCode::InvalidPolicy),
        )
    })?;

    let store = SqliteStore::open(&tickets_dir.join(DB_FILE)).map_err(|e| {
        fail(
            output,
            &CliError::coded(format!("{e:#}"), ErrorCode::StorageFailure),
        )
    })?;

    tracing::debug!(dir = %tickets_dir.display(), "opened project");
    Ok(Project {
        tickets_dir,
        config,
        service: TicketService::new(store, policy),
    })
}

impl Project {
    /// Resolve the caller against this project's staff list.
    ///
    /// # Errors
    ///
    /// Fails (after rendering the reason) when no valid identity is available.
    pub fn actor(&self, actor_flag: Option<&str>, output: OutputMode) -> anyhow::Result<Actor> {
        actor::require_actor(actor_flag, &self.config.auth)
            .map_err(|e| fail(output, &CliError::coded(e.message, e.code)))
    }
}

/// Parse a ticket id argument.
///
/// # Errors
///
/// Fails (after rendering the reason) for anything but a positive integer.
pub fn parse_ticket_id(raw: &str, output: OutputMode) -> anyhow::Result<TicketId> {
    raw.parse::<TicketId>()
        .map_err(|e| fail(output, &CliError::coded(e.to_string(), ErrorCode::InvalidTicketId)))
}
