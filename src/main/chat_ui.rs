// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

use std::io::{self, Write};

use crossterm::{
    style::{Color, ResetColor, SetForegroundColor},
    ExecutableCommand,
};

use agentchat::chat::display::{format_error, format_unit};
use agentchat::chat::{RenderableUnit, UnitBody};
use agentchat::cli::OutputFormat;
use agentchat::config::AgentConfig;
use agentchat::error::{ChatError, Result};

/// A line typed at the chat prompt
#[derive(Debug, PartialEq, Eq)]
pub(super) enum ChatInput<'a> {
    Empty,
    Prompt(&'a str),
    History,
    Session,
    Exit,
    Unknown(&'a str),
}

pub(super) fn parse_chat_input(line: &str) -> ChatInput<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ChatInput::Empty;
    }

    match trimmed {
        "/history" => ChatInput::History,
        "/session" => ChatInput::Session,
        "/exit" | "/quit" => ChatInput::Exit,
        command if command.starts_with('/') => ChatInput::Unknown(command),
        prompt => ChatInput::Prompt(prompt),
    }
}

pub(super) fn print_welcome(config: &AgentConfig, session_id: &str) -> Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(SetForegroundColor(Color::Cyan))?;
    println!(
        "agentchat: agent {} (alias {}) in {}",
        config.agent_id, config.agent_alias_id, config.region
    );
    stdout.execute(ResetColor)?;
    println!("Session {}. Type /exit to quit.\n", session_id);
    Ok(())
}

/// Print an error to stderr, with guidance when the failure is recognised
pub(super) fn print_error(error: &ChatError) {
    let color = match error {
        ChatError::Invocation(invocation) if invocation.is_classified() => Color::Yellow,
        _ => Color::Red,
    };

    let mut stderr = io::stderr();
    let _ = stderr.execute(SetForegroundColor(color));
    eprintln!("{}", format_error(error));
    let _ = stderr.execute(ResetColor);
}

/// Writes units to stdout as text or JSONL
pub(super) struct UnitPrinter {
    format: OutputFormat,
    expand: bool,
    mid_answer: bool,
}

impl UnitPrinter {
    pub(super) fn new(format: OutputFormat, expand: bool) -> Self {
        Self {
            format,
            expand,
            mid_answer: false,
        }
    }

    pub(super) fn is_text(&self) -> bool {
        self.format == OutputFormat::Text
    }

    pub(super) fn print(&mut self, unit: &RenderableUnit) -> Result<()> {
        let mut stdout = io::stdout();

        if self.format == OutputFormat::Json {
            writeln!(stdout, "{}", serde_json::to_string(unit)?)?;
            return Ok(());
        }

        if unit.is_answer() {
            write!(stdout, "{}", format_unit(unit, self.expand))?;
            stdout.flush()?;
            self.mid_answer = true;
            return Ok(());
        }

        // A trace step interrupting an answer starts on its own line
        if self.mid_answer {
            writeln!(stdout)?;
            self.mid_answer = false;
        }

        let color = match unit.body {
            UnitBody::Info(_) => Color::Yellow,
            _ => Color::DarkGrey,
        };
        stdout.execute(SetForegroundColor(color))?;
        write!(stdout, "{}", format_unit(unit, self.expand))?;
        stdout.execute(ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    /// End the turn's output
    pub(super) fn finish(&mut self) -> Result<()> {
        if self.mid_answer {
            println!();
            self.mid_answer = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_input_prompt() {
        assert_eq!(parse_chat_input("  What is RAG?\n"), ChatInput::Prompt("What is RAG?"));
    }

    #[test]
    fn test_parse_chat_input_empty() {
        assert_eq!(parse_chat_input("\n"), ChatInput::Empty);
        assert_eq!(parse_chat_input("   "), ChatInput::Empty);
    }

    #[test]
    fn test_parse_chat_input_commands() {
        assert_eq!(parse_chat_input("/history\n"), ChatInput::History);
        assert_eq!(parse_chat_input("/session"), ChatInput::Session);
        assert_eq!(parse_chat_input("/exit"), ChatInput::Exit);
        assert_eq!(parse_chat_input("/quit"), ChatInput::Exit);
        assert_eq!(parse_chat_input("/nope"), ChatInput::Unknown("/nope"));
    }

    #[test]
    fn test_unit_printer_format() {
        assert!(UnitPrinter::new(OutputFormat::Text, false).is_text());
        assert!(!UnitPrinter::new(OutputFormat::Json, true).is_text());
    }
}
