// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! agentchat - chat with a remote orchestrating agent from your terminal
//!
//! Entry point for the agentchat CLI application.

use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use futures::StreamExt;

use agentchat::agent::http::HttpGateway;
use agentchat::agent::AgentGateway;
use agentchat::chat::display::format_transcript;
use agentchat::chat::ChatSession;
use agentchat::cli::{AskArgs, ChatArgs, Cli, Commands};
use agentchat::config::AgentConfig;
use agentchat::error::{ChatError, Result};

#[path = "main/chat_ui.rs"]
mod chat_ui;

use chat_ui::{parse_chat_input, print_error, print_welcome, ChatInput, UnitPrinter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        print_error(&e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    // `RUST_LOG` takes precedence over `-v`.
    let env_filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let mut filter = tracing_subscriber::EnvFilter::new("warn");
            let directive = match verbose {
                0 => None,
                1 => Some("agentchat=debug"),
                _ => Some("agentchat=trace"),
            };
            if let Some(parsed) = directive.and_then(|d| d.parse().ok()) {
                filter = filter.add_directive(parsed);
            }
            filter
        }
    };

    // stderr keeps JSONL output on stdout clean
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "could not read .env file");
        }
    }

    let config = AgentConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        agent_id = %config.agent_id,
        agent_alias_id = %config.agent_alias_id,
        region = %config.region,
        "configuration loaded"
    );

    let gateway: Arc<dyn AgentGateway> = Arc::new(HttpGateway::new(&config));
    let printer = UnitPrinter::new(cli.format, cli.expand);

    match cli.command {
        None => run_chat(ChatArgs::default(), config, gateway, printer).await,
        Some(Commands::Chat(args)) => run_chat(args, config, gateway, printer).await,
        Some(Commands::Ask(args)) => run_ask(args, config, gateway, printer).await,
    }
}

/// Run one turn, printing units as they arrive
async fn run_turn(chat: &mut ChatSession, prompt: &str, printer: &mut UnitPrinter) -> Result<()> {
    let mut stream = chat.submit(prompt).await?;
    let mut result = Ok(());

    while let Some(item) = stream.next().await {
        match item {
            Ok(unit) => printer.print(&unit)?,
            Err(e) => {
                result = Err(e);
                break;
            }
        }
    }

    printer.finish()?;
    result
}

/// Errors the chat loop reports and recovers from
fn is_recoverable(error: &ChatError) -> bool {
    match error {
        ChatError::Invocation(invocation) => invocation.is_classified(),
        ChatError::InvalidInput(_) => true,
        _ => false,
    }
}

async fn run_chat(
    args: ChatArgs,
    config: AgentConfig,
    gateway: Arc<dyn AgentGateway>,
    mut printer: UnitPrinter,
) -> Result<()> {
    let mut chat = ChatSession::new(config, gateway);
    let interactive = printer.is_text();

    if interactive {
        print_welcome(chat.config(), chat.session().id())?;
    }

    let mut pending = args.prompt;

    loop {
        let line = match pending.take() {
            Some(prompt) => prompt,
            None => {
                if interactive {
                    print!("> ");
                    io::stdout().flush()?;
                }
                let mut input = String::new();
                if io::stdin().read_line(&mut input)? == 0 {
                    // EOF
                    break;
                }
                input
            }
        };

        match parse_chat_input(&line) {
            ChatInput::Empty => continue,
            ChatInput::Exit => break,
            ChatInput::History => print!("{}", format_transcript(chat.session().transcript())),
            ChatInput::Session => println!("{}", chat.session().id()),
            ChatInput::Unknown(command) => {
                println!("Unknown command: {} (try /history, /session or /exit)", command)
            }
            ChatInput::Prompt(prompt) => match run_turn(&mut chat, prompt, &mut printer).await {
                Ok(()) => {}
                Err(e) if is_recoverable(&e) => print_error(&e),
                Err(e) => return Err(e),
            },
        }
    }

    tracing::debug!(
        session_id = %chat.session().id(),
        entries = chat.session().len(),
        "chat ended"
    );
    Ok(())
}

async fn run_ask(
    args: AskArgs,
    config: AgentConfig,
    gateway: Arc<dyn AgentGateway>,
    mut printer: UnitPrinter,
) -> Result<()> {
    let mut chat = ChatSession::new(config, gateway);
    run_turn(&mut chat, &args.prompt, &mut printer).await
}
