//! `parley chat`: interactive REPL command.
//!
//! Opens a readline loop that submits each line to the session and prints
//! the reply. Ctrl+C while waiting cancels the submission, which rolls the
//! prompt back out of the transcript.

use pl_domain::config::Config;
use pl_domain::turn::{Speaker, Turn};
use pl_session::SessionClient;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run the interactive chat REPL until `/exit` or Ctrl+D.
pub async fn chat(config: &Config) -> anyhow::Result<()> {
    let client = SessionClient::from_config(config)?;
    let mut rl = rustyline::DefaultEditor::new()?;

    // Status lines go to stderr, conversation to stdout.
    eprintln!("Parley interactive chat");
    eprintln!("Type /help for commands, Ctrl+D to exit");
    eprintln!();
    for turn in client.transcript() {
        println!("{}", render_turn(&turn));
    }

    loop {
        match rl.readline("you> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                // Kept even when the submission fails, so Up resubmits it.
                rl.add_history_entry(&line).ok();

                if trimmed.starts_with('/') {
                    match SlashCommand::parse(trimmed) {
                        SlashCommand::Exit => break,
                        SlashCommand::Help => print_help(),
                        SlashCommand::History => {
                            print!("{}", render_history(&client.transcript()));
                        }
                        SlashCommand::Unknown(other) => {
                            eprintln!("Unknown command: {other}  (type /help for a list)");
                        }
                    }
                    continue;
                }

                send_message(&client, &line).await;
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or /exit to quit)");
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    eprintln!("Goodbye!");
    Ok(())
}

/// Submit one line, racing it against Ctrl+C.
async fn send_message(client: &SessionClient, text: &str) {
    eprintln!("\x1B[2m…\x1B[0m");
    tokio::select! {
        result = client.submit(text) => match result {
            Ok(answer) => {
                println!("{}", render_turn(&answer));
                println!();
            }
            Err(e) => eprintln!("\x1B[31merror: {e}\x1B[0m"),
        },
        _ = tokio::signal::ctrl_c() => {
            eprintln!("(cancelled)");
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Slash command handling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, PartialEq, Eq)]
pub enum SlashCommand<'a> {
    Exit,
    Help,
    History,
    Unknown(&'a str),
}

impl<'a> SlashCommand<'a> {
    pub fn parse(input: &'a str) -> Self {
        let cmd = input.split_whitespace().next().unwrap_or(input);
        match cmd {
            "/exit" | "/quit" => SlashCommand::Exit,
            "/help" => SlashCommand::Help,
            "/history" => SlashCommand::History,
            other => SlashCommand::Unknown(other),
        }
    }
}

fn print_help() {
    eprintln!("Commands:");
    eprintln!("  /history         Show the conversation so far");
    eprintln!("  /exit, /quit     Exit the chat");
    eprintln!("  /help            Show this help");
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Rendering
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub fn render_turn(turn: &Turn) -> String {
    let who = match turn.speaker {
        Speaker::User => "you",
        Speaker::Assistant => "bot",
    };
    format!("[{}] {who}> {}", turn.display_time(), turn.text)
}

pub fn render_history(turns: &[Turn]) -> String {
    if turns.is_empty() {
        return "(no messages yet)\n".into();
    }
    turns
        .iter()
        .map(|t| format!("{}\n", render_turn(t)))
        .collect()
}
