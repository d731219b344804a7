// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! CLI argument definitions using Clap
//!
//! Defines all command-line arguments and subcommands for agentchat.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// agentchat - chat with a remote orchestrating agent from your terminal
#[derive(Parser, Debug)]
#[command(name = "agentchat")]
#[command(version, about = "Chat with a remote orchestrating agent and watch it reason")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file path (defaults to ~/.agentchat/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Show the body of collapsed trace steps
    #[arg(long, global = true)]
    pub expand: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start interactive chat session (default when no command given)
    Chat(ChatArgs),

    /// Ask a single question (non-interactive)
    Ask(AskArgs),
}

/// Arguments for the chat subcommand
#[derive(clap::Args, Debug, Default)]
pub struct ChatArgs {
    /// Initial prompt (optional)
    pub prompt: Option<String>,
}

/// Arguments for the ask subcommand
#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question to ask
    pub prompt: String,
}

/// Output format for responses
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Text,

    /// One JSON object per unit (JSONL)
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    // ==================== CLI Global Arguments ====================

    #[test]
    fn test_cli_default_no_command() {
        let cli = Cli::parse_from(["agentchat"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.verbose, 0);
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.expand);
    }

    #[test]
    fn test_cli_verbose_multiple() {
        let cli = Cli::parse_from(["agentchat", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_config_path() {
        let cli = Cli::parse_from(["agentchat", "--config", "/path/to/settings.json"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/settings.json")));
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["agentchat", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_invalid_format() {
        assert!(Cli::try_parse_from(["agentchat", "--format", "xml"]).is_err());
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["agentchat", "ask", "hi", "--expand", "-v"]);
        assert!(cli.expand);
        assert_eq!(cli.verbose, 1);
    }

    // ==================== Subcommands ====================

    #[test]
    fn test_chat_with_prompt() {
        let cli = Cli::parse_from(["agentchat", "chat", "hello there"]);
        match cli.command {
            Some(Commands::Chat(args)) => assert_eq!(args.prompt.as_deref(), Some("hello there")),
            other => panic!("Expected Chat command, got {:?}", other),
        }
    }

    #[test]
    fn test_chat_without_prompt() {
        let cli = Cli::parse_from(["agentchat", "chat"]);
        assert!(matches!(cli.command, Some(Commands::Chat(ChatArgs { prompt: None }))));
    }

    #[test]
    fn test_ask_requires_prompt() {
        assert!(Cli::try_parse_from(["agentchat", "ask"]).is_err());
        let cli = Cli::parse_from(["agentchat", "ask", "What is RAG?"]);
        match cli.command {
            Some(Commands::Ask(args)) => assert_eq!(args.prompt, "What is RAG?"),
            other => panic!("Expected Ask command, got {:?}", other),
        }
    }
}
