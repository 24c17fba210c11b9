#![forbid(unsafe_code)]

mod actor;
mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::OutputMode;
use std::env;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "tk: permissioned ticket tracker",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (pretty, text, json). Defaults to pretty on a TTY, text when piped.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Emit JSON output (same as --format json).
    #[arg(long, global = true)]
    json: bool,

    /// Act as this user (skips env resolution).
    #[arg(long, global = true)]
    actor: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.format, self.json)
    }

    /// Get the actor flag as an Option<&str> for resolution.
    fn actor_flag(&self) -> Option<&str> {
        self.actor.as_deref()
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Project",
        about = "Initialize a tickets project",
        long_about = "Create .tickets/ with a default config and an empty database.",
        after_help = "EXAMPLES:\n    # Initialize a project in the current directory\n    tk init\n\n    # Emit machine-readable output\n    tk init --json"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Open a new ticket",
        long_about = "Open a new ticket authored by the current actor. Completion and freeze flags start cleared.",
        after_help = "EXAMPLES:\n    # Open a ticket\n    tk create --body \"VPN drops every hour\"\n\n    # Emit machine-readable output\n    tk create --body \"VPN drops every hour\" --json"
    )]
    Create(cmd::create::CreateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "List visible tickets",
        long_about = "List tickets in ID order. Staff see every ticket; others see their own.",
        after_help = "EXAMPLES:\n    # List your tickets\n    tk list\n\n    # Emit machine-readable output\n    tk list --json"
    )]
    List(cmd::list::ListArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Show one ticket",
        long_about = "Show a single ticket by ID.",
        after_help = "EXAMPLES:\n    # Show a ticket\n    tk show 3\n\n    # Emit machine-readable output\n    tk show 3 --json"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Change fields on a ticket",
        long_about = "Partially update a ticket. Owners may change body; staff may change is_completed and is_frozen. A request naming any other field is rejected without changing anything.",
        after_help = "EXAMPLES:\n    # Owner edits the text\n    tk update 3 --set body=\"VPN drops every 30 minutes\"\n\n    # Staff closes a ticket\n    tk --actor carol update 3 --set is_completed=true\n\n    # Pass a JSON object\n    tk update 3 --data '{\"is_frozen\": true}' --json"
    )]
    Update(cmd::update::UpdateArgs),

    #[command(
        next_help_heading = "Tickets",
        about = "Delete a ticket",
        long_about = "Delete a ticket you can see.",
        after_help = "EXAMPLES:\n    # Delete a ticket\n    tk delete 3"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Project",
        about = "Generate shell completion scripts",
        long_about = "Generate shell completion scripts for supported shells.",
        after_help = "EXAMPLES:\n    # Generate bash completions\n    tk completions bash\n\n    # Generate zsh completions\n    tk completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

/// Filter directives used when `TICKETS_LOG` is unset. Covers both the core
/// library (`tickets_core`) and this binary (`tk`).
const fn default_log_directives(debug: bool) -> &'static str {
    if debug {
        "tickets=debug,tk=debug,info"
    } else {
        "tickets=info,tk=info,warn"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TICKETS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(default_log_directives(verbose || env::var("DEBUG").is_ok()))
    });

    let format = env::var("TICKETS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = std::env::current_dir()?;
    let output = cli.output_mode();
    let actor = cli.actor_flag();

    match cli.command {
        Commands::Init(ref args) => cmd::init::run_init(args, output, &project_root),
        Commands::Create(ref args) => cmd::create::run_create(args, actor, output, &project_root),
        Commands::List(ref args) => cmd::list::run_list(args, actor, output, &project_root),
        Commands::Show(ref args) => cmd::show::run_show(args, actor, output, &project_root),
        Commands::Update(ref args) => cmd::update::run_update(args, actor, output, &project_root),
        Commands::Delete(ref args) => cmd::delete::run_delete(args, actor, output, &project_root),
        Commands::Completions(ref args) => {
            let mut command = Cli::command();
            cmd::completions::run_completions(args.shell, &mut command)
        }
    }
}
