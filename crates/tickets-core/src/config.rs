use crate::model::{ActorId, Field};
use crate::policy::{
    AccessPolicy, DEFAULT_OWNER_EDITABLE, DEFAULT_REJECTION_MESSAGE, DEFAULT_STAFF_EDITABLE,
    PolicyError,
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the per-project state directory.
pub const TICKETS_DIR: &str = ".tickets";
pub const CONFIG_FILE: &str = "config.toml";
pub const DB_FILE: &str = "tickets.db";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub policy: PolicyConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Role to editable-field table plus the rejection message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_staff_editable")]
    pub staff_editable: Vec<Field>,
    #[serde(default = "default_owner_editable")]
    pub owner_editable: Vec<Field>,
    #[serde(default = "default_rejection_message")]
    pub rejection_message: String,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            staff_editable: default_staff_editable(),
            owner_editable: default_owner_editable(),
            rejection_message: default_rejection_message(),
        }
    }
}

impl PolicyConfig {
    /// Validate the table and freeze it into an [`AccessPolicy`].
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError`] for immutable, duplicated or shared fields.
    pub fn build(&self) -> Result<AccessPolicy, PolicyError> {
        AccessPolicy::new(
            self.staff_editable.clone(),
            self.owner_editable.clone(),
            self.rejection_message.clone(),
        )
    }
}

/// Which actors are staff. Everyone else is a regular owner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub staff: Vec<String>,
}

impl AuthConfig {
    #[must_use]
    pub fn is_staff(&self, id: &ActorId) -> bool {
        self.staff.iter().any(|name| name == id.as_str())
    }
}

/// Load `.tickets/config.toml`, falling back to defaults when it is absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(tickets_dir: &Path) -> Result<ProjectConfig> {
    let path = tickets_dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Render the default config as TOML, for `tk init`.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn default_config_toml() -> Result<String> {
    toml::to_string_pretty(&ProjectConfig::default()).context("serialize default config")
}

/// Find the `.tickets` directory by walking up from `start`.
#[must_use]
pub fn find_tickets_dir(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(TICKETS_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn default_staff_editable() -> Vec<Field> {
    DEFAULT_STAFF_EDITABLE.to_vec()
}

fn default_owner_editable() -> Vec<Field> {
    DEFAULT_OWNER_EDITABLE.to_vec()
}

fn default_rejection_message() -> String {
    DEFAULT_REJECTION_MESSAGE.to_string()
}
