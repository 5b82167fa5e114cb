//! Clap derive structures for the `cav` CLI.
//!
//! Defines the command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// cav -- manage Orange Cloud Avenue organizations
#[derive(Debug, Parser)]
#[command(
    name = "cav",
    version,
    about = "Manage Cloud Avenue edge gateways, firewalls and users from the command line",
    long_about = "Administer an Orange Cloud Avenue organization.\n\n\
        Settings come from the config file, CLOUDAVENUE_* variables and the\n\
        global flags below, in increasing order of precedence.",
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
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Organization name (overrides the config file)
    #[arg(long, global = true)]
    pub org: Option<String>,

    /// Default VDC (overrides the config file)
    #[arg(long, global = true)]
    pub vdc: Option<String>,

    /// Console URL (overrides the config file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Output format
    #[arg(long, short = 'o', env = "CAV_OUTPUT", default_value = "table", global = true)]
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept invalid TLS certificates
    #[arg(long, short = 'k', global = true)]
    pub insecure: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
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
    /// Manage edge gateways
    #[command(alias = "edges", alias = "e")]
    Edge(EdgeArgs),

    /// Inspect Tier-0 VRFs
    #[command(name = "t0", alias = "tier0")]
    Tier0(Tier0Args),

    /// Inspect and reset edge gateway firewalls
    #[command(alias = "fw")]
    Firewall(FirewallArgs),

    /// Manage the certificate library
    #[command(alias = "certs")]
    Cert(CertArgs),

    /// Manage organization users
    #[command(alias = "users")]
    User(UserArgs),

    /// Inspect configuration and store credentials
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Edge gateways ────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct EdgeArgs {
    #[command(subcommand)]
    pub command: EdgeCommand,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OwnerKindArg {
    Vdc,
    VdcGroup,
}

#[derive(Debug, Subcommand)]
pub enum EdgeCommand {
    /// List edge gateways
    #[command(alias = "ls")]
    List,

    /// Show one edge gateway
    Get {
        /// Edge name or URN
        edge: String,
    },

    /// Create an edge gateway
    Create {
        /// Owner VDC or VDC group (name or URN); defaults to the configured VDC
        #[arg(long)]
        owner: Option<String>,

        /// Kind of a name-only owner
        #[arg(long, value_enum)]
        owner_kind: Option<OwnerKindArg>,

        /// Uplink Tier-0 VRF
        #[arg(long)]
        tier0: Option<String>,

        /// Bandwidth in Mbps
        #[arg(long, short = 'b')]
        bandwidth: Option<u32>,
    },

    /// Delete an edge gateway
    #[command(alias = "rm")]
    Delete {
        /// Edge name or URN
        edge: String,
    },

    /// Change the bandwidth of an edge gateway
    Bandwidth {
        /// Edge name or URN
        edge: String,
        /// New bandwidth in Mbps
        mbps: u32,
    },

    /// Show the network services attached to an edge gateway
    Services {
        /// Edge name or URN
        edge: String,
    },

    /// List the networks routed by an edge gateway
    Networks {
        /// Edge name or URN
        edge: String,
    },

    /// Enable the Cloud Avenue services zone
    EnableServices {
        /// Edge name or URN
        edge: String,
    },

    /// Disable the Cloud Avenue services zone
    DisableServices {
        /// Edge name or URN
        edge: String,
    },
}

// ── Tier-0 ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct Tier0Args {
    #[command(subcommand)]
    pub command: Tier0Command,
}

#[derive(Debug, Subcommand)]
pub enum Tier0Command {
    /// List Tier-0 VRFs
    #[command(alias = "ls")]
    List,

    /// Show the bandwidth budget of a Tier-0 VRF
    Capacity {
        /// Tier-0 VRF name
        name: String,
    },
}

// ── Firewall ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FirewallArgs {
    #[command(subcommand)]
    pub command: FirewallCommand,
}

#[derive(Debug, Subcommand)]
pub enum FirewallCommand {
    /// List the user-defined rules of an edge gateway firewall
    Rules {
        /// Edge name or URN
        edge: String,
    },

    /// Delete every user-defined rule of an edge gateway firewall
    DeleteAll {
        /// Edge name or URN
        edge: String,
    },
}

// ── Certificates ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CertArgs {
    #[command(subcommand)]
    pub command: CertCommand,
}

#[derive(Debug, Subcommand)]
pub enum CertCommand {
    /// List certificate library items
    #[command(alias = "ls")]
    List,

    /// Show one certificate
    Get {
        /// Alias or URN
        cert: String,
    },

    /// Delete a certificate
    #[command(alias = "rm")]
    Delete {
        /// Alias or URN
        cert: String,
    },
}

// ── Users ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    pub command: UserCommand,
}

#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List users
    #[command(alias = "ls")]
    List,

    /// Enable a user
    Enable {
        /// Username or URN
        user: String,
    },

    /// Disable a user
    Disable {
        /// Username or URN
        user: String,
    },

    /// Unlock a user locked out by failed logins
    Unlock {
        /// Username or URN
        user: String,
    },

    /// Delete a user
    #[command(alias = "rm")]
    Delete {
        /// Username or URN
        user: String,

        /// Transfer ownership of the user's objects to the caller
        #[arg(long)]
        take_ownership: bool,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective settings (secrets masked)
    Show,

    /// Print the config file path
    Path,

    /// Store the account password in the system keyring
    SetPassword,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell
    pub shell: clap_complete::Shell,
}
