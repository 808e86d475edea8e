//! Clap derive structures for the `zfssa` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// zfssa -- batch administration for Oracle ZFS Storage Appliances
#[derive(Debug, Parser)]
#[command(
    name = "zfssa",
    version,
    about = "Batch administration for Oracle ZFS Storage Appliances",
    long_about = "Create, list and delete projects, filesystems, LUNs and snapshots from\n\
        CSV files, update their properties, and collect a read-only explorer\n\
        archive of the appliance configuration.",
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
    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create, list or delete projects
    #[command(alias = "PROJECTS")]
    Projects(BatchArgs),

    /// Create, list or delete filesystems
    #[command(alias = "FILESYSTEMS")]
    Filesystems(BatchArgs),

    /// Create, list or delete LUNs
    #[command(alias = "LUNS")]
    Luns(BatchArgs),

    /// Create, list or delete snapshots of projects, filesystems or LUNs
    #[command(alias = "SNAPSHOTS")]
    Snapshots(BatchArgs),

    /// Update properties of projects, filesystems or LUNs
    #[command(alias = "UPDATE")]
    Update(UpdateArgs),

    /// Collect the appliance configuration into a zip of CSV files
    ///
    /// `--server` may also name a directory: every `*.yml` in it is explored
    /// in turn, verified against the `.crt` of the same name when present.
    #[command(alias = "EXPLORER")]
    Explorer(ExplorerArgs),

    /// Write sample input files
    #[command(alias = "TEMPLATES")]
    Templates(TemplatesArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Arguments ─────────────────────────────────────────────────

/// How to reach the appliance.
#[derive(Debug, Args)]
pub struct ConnectionArgs {
    /// YAML file with the appliance ip, username and password
    #[arg(long, short = 's', env = "ZFSSA_SERVER")]
    pub server: PathBuf,

    /// Request timeout in seconds
    #[arg(long, short = 't', env = "ZFSSA_TIMEOUT", default_value = "100")]
    pub timeout: u64,

    /// CA certificate (PEM) to verify the appliance against
    #[arg(long, short = 'c')]
    pub cert: Option<PathBuf>,

    /// Show a progress bar and write the messages to a log file
    #[arg(long, short = 'p')]
    pub progress: bool,
}

/// Exactly one of `--create`, `--delete`, `--list`.
#[derive(Debug, Clone, Copy, Args)]
#[group(required = true, multiple = false)]
pub struct ActionFlags {
    /// Create every row of the file
    #[arg(long)]
    pub create: bool,

    /// Delete every row of the file
    #[arg(long)]
    pub delete: bool,

    /// Show every row of the file as it exists on the appliance
    #[arg(long)]
    pub list: bool,
}

// ── Per-Command Arguments ────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// CSV input file
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    #[command(flatten)]
    pub action: ActionFlags,

    /// Delete without asking first
    #[arg(long)]
    pub noconfirm: bool,
}

#[derive(Debug, Args)]
pub struct UpdateArgs {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// CSV file of update directives
    #[arg(long, short = 'f')]
    pub file: PathBuf,

    /// Update without asking first
    #[arg(long)]
    pub noconfirm: bool,
}

#[derive(Debug, Args)]
pub struct ExplorerArgs {
    #[command(flatten)]
    pub conn: ConnectionArgs,

    /// Directory that receives the explorer archive
    #[arg(long, short = 'o', default_value = "data")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    #[command(flatten)]
    pub kind: TemplateKindFlags,

    #[command(flatten)]
    pub mode: TemplateModeFlags,

    /// Directory to write the template into
    #[arg(long, short = 'd', default_value = ".")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Copy, Args)]
#[group(required = true, multiple = false)]
pub struct TemplateKindFlags {
    /// Projects template
    #[arg(long)]
    pub projects: bool,

    /// Filesystems template
    #[arg(long)]
    pub filesystems: bool,

    /// LUNs template
    #[arg(long)]
    pub luns: bool,

    /// Snapshots template
    #[arg(long)]
    pub snapshots: bool,
}

#[derive(Debug, Clone, Copy, Args)]
#[group(required = true, multiple = false)]
pub struct TemplateModeFlags {
    /// Template for creating
    #[arg(long)]
    pub create: bool,

    /// Template for deleting
    #[arg(long)]
    pub delete: bool,
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
