use anyhow::Result;
use chatbot_core::constants::prompts;
use chatbot_core::{ChatSession, Settings};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::commands::{self, CommandResult};

// ── Single-prompt mode ──────────────────────────────────────────────────

pub async fn run_single_prompt(settings: Settings, prompt: &str) -> Result<()> {
    let session = ChatSession::new(settings);
    let status = session.start().await?;
    eprintln!("{status}");

    let reply = session.submit_turn(prompt).await?;
    println!("{reply}");
    Ok(())
}

// ── Interactive chat ────────────────────────────────────────────────────

pub async fn run_chat(settings: Settings) -> Result<()> {
    let session = ChatSession::new(settings);

    println!("{}", prompts::CHECKING_MODEL_SERVICE);
    // Chat input stays disabled until the backend answers.
    let status = session.start().await?;
    println!("{status}");
    println!("{}", prompts::GREETING);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match commands::handle_command(input) {
            CommandResult::Quit => break,
            CommandResult::Message(msg) => println!("{msg}"),
            CommandResult::ShowHistory => {
                for turn in session.history().await {
                    println!("[{}] {}", turn.role, turn.content);
                }
            }
            CommandResult::ShowStatus => {
                let usage = session.usage().await;
                if let Some(backend) = session.backend() {
                    println!("Backend: {} at {}", backend.kind, backend.base_endpoint);
                }
                println!("Session: {} ({})", session.session_id(), session.state());
                println!(
                    "Tokens: {} in / {} out over {} requests",
                    usage.input_tokens, usage.output_tokens, usage.requests
                );
            }
            CommandResult::NotACommand => match session.submit_turn(input).await {
                Ok(reply) => println!("{reply}"),
                Err(e) => {
                    debug!(error = ?e, "Turn failed");
                    eprintln!("Error: {e}");
                }
            },
        }
    }

    Ok(())
}
