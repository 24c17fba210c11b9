//! Actor identity resolution for CLI commands.
//!
//! The resolution chain: `--actor` flag > `TICKETS_ACTOR` env > `USER` env (TTY only).
//! Every command that touches tickets needs an identity because visibility and
//! editable fields both depend on who is asking. Staff membership comes from
//! `[auth].staff` in the project config.

use std::env;
use tickets_core::config::AuthConfig;
use tickets_core::model::{Actor, ActorId};
use tickets_core::ErrorCode;

/// Errors from actor resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorResolutionError {
    /// Human-readable description.
    pub message: String,
    /// Machine error code.
    pub code: ErrorCode,
}

impl std::fmt::Display for ActorResolutionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ActorResolutionError {}

/// Environment reader trait for dependency injection in tests.
trait EnvReader {
    fn get(&self, key: &str) -> Option<String>;
    fn is_tty(&self) -> bool;
}

/// Real environment reader.
struct RealEnv;

impl EnvReader for RealEnv {
    fn get(&self, key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.is_empty())
    }

    fn is_tty(&self) -> bool {
        use std::io::IsTerminal;
        std::io::stdin().is_terminal()
    }
}

/// Core resolution logic, parameterized by environment reader.
fn resolve_actor_with(cli_flag: Option<&str>, env: &dyn EnvReader) -> Option<String> {
    if let Some(actor) = cli_flag.filter(|a| !a.is_empty()) {
        return Some(actor.to_string());
    }

    if let Some(val) = env.get("TICKETS_ACTOR") {
        return Some(val);
    }

    // USER only counts for an interactive shell.
    if env.is_tty() {
        return env.get("USER");
    }

    None
}

fn require_actor_with(
    cli_flag: Option<&str>,
    auth: &AuthConfig,
    env: &dyn EnvReader,
) -> Result<Actor, ActorResolutionError> {
    let raw = resolve_actor_with(cli_flag, env).ok_or_else(|| ActorResolutionError {
        message: "Actor identity required for this command. \
                  Set --actor or the TICKETS_ACTOR environment variable."
            .to_string(),
        code: ErrorCode::MissingActor,
    })?;

    let id = ActorId::new(raw).map_err(|e| ActorResolutionError {
        message: e.to_string(),
        code: ErrorCode::MissingActor,
    })?;

    let is_staff = auth.is_staff(&id);
    tracing::debug!(actor = %id, is_staff, "resolved actor");
    Ok(Actor::new(id, is_staff))
}

/// Resolve the caller and their staff flag, or explain why there is none.
pub fn require_actor(
    cli_flag: Option<&str>,
    auth: &AuthConfig,
) -> Result<Actor, ActorResolutionError> {
    require_actor_with(cli_flag, auth, &RealEnv)
}
