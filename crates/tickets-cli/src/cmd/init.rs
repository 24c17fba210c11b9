use crate::output::{OutputMode, render};
use anyhow::{Context as _, Result};
use clap::Args;
use serde::Serialize;
use std::path::Path;
use tickets_core::SqliteStore;
use tickets_core::config::{CONFIG_FILE, DB_FILE, TICKETS_DIR, default_config_toml};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Rewrite config.toml even if `.tickets/` already exists. Tickets are kept.
    #[arg(long)]
    pub force: bool,
}

const GITIGNORE: &str = "tickets.db\ntickets.db-wal\ntickets.db-shm\n";

#[derive(Debug, Serialize)]
struct InitOutput {
    ok: bool,
    path: String,
}

/// Execute `tk init`. Creates the project skeleton:
///
/// ```text
/// .tickets/
///   config.toml   (default policy and an empty staff list)
///   tickets.db    (migrated SQLite database)
///   .gitignore    (tickets.db and its WAL files)
/// ```
///
/// # Errors
///
/// Returns an error if `.tickets/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let tickets_dir = project_root.join(TICKETS_DIR);

    if tickets_dir.exists() && !args.force {
        anyhow::bail!(".tickets/ already exists. Use `tk init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&tickets_dir)
        .with_context(|| format!("Failed to create {}", tickets_dir.display()))?;

    let config_path = tickets_dir.join(CONFIG_FILE);
    std::fs::write(&config_path, default_config_toml()?)
        .with_context(|| format!("Failed to write config: {}", config_path.display()))?;

    let gitignore_path = tickets_dir.join(".gitignore");
    std::fs::write(&gitignore_path, GITIGNORE)
        .with_context(|| format!("Failed to write .gitignore: {}", gitignore_path.display()))?;

    SqliteStore::open(&tickets_dir.join(DB_FILE))?;
    tracing::info!(dir = %tickets_dir.display(), "initialized project");

    let result = InitOutput {
        ok: true,
        path: tickets_dir.display().to_string(),
    };
    render(output, &result, |_, w| {
        writeln!(w, "✓ Initialized .tickets/ project structure.")?;
        writeln!(w)?;
        writeln!(w, "  Config:   .tickets/{CONFIG_FILE}")?;
        writeln!(w, "  Database: .tickets/{DB_FILE}")?;
        writeln!(w)?;
        writeln!(w, "Next steps:")?;
        writeln!(w, "  Set your identity:")?;
        writeln!(w, "    export TICKETS_ACTOR=your-name")?;
        writeln!(w)?;
        writeln!(w, "  Grant staff rights by listing names under [auth] staff in config.toml.")?;
        writeln!(w)?;
        writeln!(w, "  Open your first ticket:")?;
        writeln!(w, "    tk create --body \"Printer on floor 2 is jammed\"")
    })
}
