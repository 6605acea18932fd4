// ABOUTME: Command-line interface definition for the hive binary
// Parsing only; the handlers live in the app module

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Declarative tmux sessions from a YAML file.
#[derive(Debug, Parser)]
#[command(name = "hive", version)]
pub struct Args {
    /// Config file (default: .hive.yaml or hive.yaml in the current directory).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<PathBuf>,

    /// Show debug logging.
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Create the tmux session described by the config.
    Launch,

    /// Kill the session if it is running, launch it again, and attach.
    Relaunch,

    /// Kill the session described by the config.
    Clear,

    /// Check the config and report every problem found.
    Validate {
        /// Print the result as JSON on stdout.
        #[arg(long = "json")]
        json: bool,
    },

    /// Write a new config from a template.
    Generate {
        /// Template to use; prompts when omitted.
        #[arg(short = 't', long = "template")]
        template: Option<String>,

        /// Output file (default: stdout).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Capture the current tmux session as a config.
    Export {
        /// Output file (default: stdout).
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },

    /// Open the config in an editor, then validate it.
    Config,

    /// Manage saved templates.
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Print version information.
    Version,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum TemplateAction {
    /// List built-in and saved templates.
    List,

    /// Save the current config as a template.
    Save { name: String },

    /// Delete a saved template.
    Delete { name: String },
}
