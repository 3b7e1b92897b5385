//! Clap derive structures for the `milkfleet` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// milkfleet -- fleet dashboard for milk-vending ATMs
#[derive(Debug, Parser)]
#[command(
    name = "milkfleet",
    version,
    about = "Monitor and manage a milk-vending ATM fleet from the command line",
    long_about = "A dashboard CLI for milk-vending ATM fleets.\n\n\
        Talks to the vending backend's REST API; the backend owns all\n\
        authoritative state. `milkfleet watch` keeps a live view via\n\
        background polling, everything else is one-shot.",
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
    /// Backend base URL (overrides config file)
    #[arg(long, short = 'u', env = "MILKFLEET_URL", global = true)]
    pub url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "MILKFLEET_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "MILKFLEET_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "MILKFLEET_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
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
    /// Fleet status overview: uptime, capacity, alerts
    #[command(alias = "st")]
    Status,

    /// Inspect and register vending devices
    #[command(alias = "dev", alias = "d")]
    Devices(DevicesArgs),

    /// Tamper alerts across the fleet
    Alerts,

    /// List recorded sales
    #[command(alias = "tx")]
    Transactions(TransactionsArgs),

    /// View or change the fleet-wide milk price
    Pricing(PricingArgs),

    /// Vendor account: balance, withdrawals, cash collection
    #[command(alias = "acct")]
    Account(AccountArgs),

    /// View or update the vendor profile
    Vendor(VendorArgs),

    /// Live dashboard: print fleet changes as polls observe them
    Watch,

    /// Manage the milkfleet config file
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Devices ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DevicesArgs {
    #[command(subcommand)]
    pub command: DevicesCommand,
}

#[derive(Debug, Subcommand)]
pub enum DevicesCommand {
    /// List all devices in the fleet
    #[command(alias = "ls")]
    List,

    /// Show one device in detail
    Show {
        /// Device ID or name
        device: String,
    },

    /// Register a new device with the backend
    Add {
        /// Device name
        name: String,

        /// Initial tank level, percent of capacity
        #[arg(long)]
        capacity: Option<f64>,
    },
}

// ── Transactions ─────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct TransactionsArgs {
    /// Only show sales from this device (ID or name)
    #[arg(long, short = 'd')]
    pub device: Option<String>,

    /// Show at most this many rows, newest first
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,
}

// ── Pricing ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct PricingArgs {
    #[command(subcommand)]
    pub command: PricingCommand,
}

#[derive(Debug, Subcommand)]
pub enum PricingCommand {
    /// Show the current price per litre
    Show,

    /// Set the price per litre for the whole fleet
    Set {
        /// New price per litre
        price: f64,
    },
}

// ── Account ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct AccountArgs {
    #[command(subcommand)]
    pub command: AccountCommand,
}

#[derive(Debug, Subcommand)]
pub enum AccountCommand {
    /// Show balance and withdrawal history
    Show,

    /// Withdraw from the account balance
    Withdraw {
        /// Amount to withdraw
        amount: f64,
    },

    /// Deposit into the account balance
    Deposit {
        /// Amount to deposit
        amount: f64,
    },

    /// List cash payments awaiting collection
    Cash,
}

// ── Vendor ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VendorArgs {
    #[command(subcommand)]
    pub command: VendorCommand,
}

#[derive(Debug, Subcommand)]
pub enum VendorCommand {
    /// Show the vendor profile
    Show,

    /// Update the vendor profile
    Update {
        /// Vendor display name
        #[arg(long)]
        name: String,

        /// Shop name shown on receipts
        #[arg(long)]
        shop: String,
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
    /// Print the config file path
    Path,

    /// Write a starter config file
    Init {
        /// Backend base URL to record
        #[arg(long)]
        url: String,
    },

    /// Show the effective configuration
    Show,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
