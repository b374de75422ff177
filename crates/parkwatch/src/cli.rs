//! Clap derive structures for the `parkwatch` CLI.
//!
//! Defines the command tree, global flags, and shared value enums.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// parkwatch -- live parking occupancy from a status server
#[derive(Debug, Parser)]
#[command(
    name = "parkwatch",
    version,
    about = "Watch parking lot occupancy from the command line",
    long_about = "Polls a parking status server (GET /status) and shows how many\n\
        spaces are occupied and available, and when the count last changed.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Dashboard profile to use
    #[arg(long, short = 'p', env = "PARKWATCH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Status server URL (overrides profile)
    #[arg(long, short = 'S', env = "PARKWATCH_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PARKWATCH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Per-request timeout in milliseconds (default: no timeout)
    #[arg(long, env = "PARKWATCH_TIMEOUT_MS", global = true)]
    pub timeout_ms: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// One of the three dashboard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum TargetArg {
    Occupied,
    Available,
    LastUpdated,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the current parking status once
    #[command(alias = "st")]
    Status(StatusArgs),

    /// Poll the status server and print every change
    #[command(alias = "w")]
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Status / Watch ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Print only this value, unformatted
    #[arg(long, short = 't')]
    pub target: Option<TargetArg>,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll interval in milliseconds (overrides profile)
    #[arg(long, short = 'i')]
    pub interval_ms: Option<u64>,

    /// Ignore responses that arrive after a newer one was shown
    #[arg(long)]
    pub discard_stale: bool,

    /// Exit after this many displayed changes (at least 1)
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create a config file with one profile
    Init {
        /// Status server URL
        url: String,

        /// Lot name shown in headers
        #[arg(long)]
        name: Option<String>,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set the status server URL of the active profile
    SetServer {
        /// Status server URL
        url: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
