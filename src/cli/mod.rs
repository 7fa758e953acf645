//! CLI module for Sift.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// Sift - Answer questions with tools and a language model
///
/// Runs an optional tool call before generating an answer and streams
/// every step as it happens.
#[derive(Parser, Debug)]
#[command(name = "sift")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a question and stream the answer
    Ask(AskArgs),

    /// Show the periodic task schedule
    Schedule,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct AskArgs {
    /// The question to ask
    pub question: String,

    /// Free-text history of earlier turns
    #[arg(long)]
    pub history: Option<String>,

    /// Force this tool to run before generating
    #[arg(short = 't', long)]
    pub force_tool: Option<String>,

    /// JSON object of arguments for the forced tool (default: {"query": <question>})
    #[arg(long, requires = "force_tool")]
    pub tool_args: Option<String>,

    /// Only run tools, do not generate an answer
    #[arg(long)]
    pub skip_gen_ai: bool,

    /// Do not let the model choose a tool
    #[arg(long)]
    pub skip_explicit_tool_calling: bool,

    /// Include retrieved contexts in tool results
    #[arg(long)]
    pub return_contexts: bool,

    /// LLM model to use
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print one JSON event per line instead of formatted output
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}
