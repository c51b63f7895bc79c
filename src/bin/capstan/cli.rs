//! CLI definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Capstan - A build-environment configuration resolver for HPC toolchains
#[derive(Parser)]
#[command(name = "capstan")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print one resolved configuration variable
    Print(PrintArgs),

    /// Print every resolved configuration variable
    Env(EnvArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// The logical configuration variables addressable from the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Variable {
    Network,
    Comm,
    CommSubstrate,
    Atomics,
    Rpmalloc,
    Mem,
}

#[derive(Args)]
pub struct PrintArgs {
    /// Variable to resolve
    #[arg(value_enum)]
    pub variable: Variable,

    /// Resolve the target-system flavor (the default)
    #[arg(long, conflicts_with_all = ["network", "host"])]
    pub target: bool,

    /// Resolve the network flavor (atomics only)
    #[arg(long, conflicts_with = "host")]
    pub network: bool,

    /// Resolve the host-system flavor
    #[arg(long)]
    pub host: bool,
}

#[derive(Args)]
pub struct EnvArgs {
    /// Suppress advisory warnings
    #[arg(long)]
    pub quiet: bool,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
