//! serene-cli – talk to the wellness assistant from a terminal.
//!
//! Each line typed is one message.  `/1`..`/5` pick a suggested prompt while
//! the conversation is fresh, `/quit` (or EOF) ends the session.  Nothing is
//! saved.

use std::io::Write;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{Level, debug};
use tracing_subscriber::FmtSubscriber;

use serene_chat::{ChatMessage, Conversation, HttpRelay, SUGGESTED_PROMPTS};

#[derive(Parser)]
#[command(name = "serene-cli")]
#[command(author, version, about = "Chat with the serene wellness assistant", long_about = None)]
struct Cli {
    /// Base URL of the relay service.
    #[arg(long, env = "SERENE_SERVER_URL", default_value = "http://localhost:5000")]
    server: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Quit,
    /// 1-based suggestion number.
    Suggestion(usize),
    Text(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed == "/quit" || trimmed == "/exit" {
        return Input::Quit;
    }
    if let Some(n) = trimmed.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
        return Input::Suggestion(n);
    }
    Input::Text(line.to_owned())
}

fn print_message(message: &ChatMessage) {
    let who = if message.is_user() { "you" } else { "assistant" };
    let at = message.timestamp.with_timezone(&Local).format("%H:%M");
    println!("[{at}] {who}: {}", message.text);
}

fn print_suggestions() {
    println!("Try asking about:");
    for (i, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
        println!("  /{}  {}", i + 1, prompt);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let relay = HttpRelay::new(&cli.server)?;
    debug!(url = relay.url(), "relay endpoint");

    let mut conversation = Conversation::new();
    for message in conversation.messages() {
        print_message(message);
    }
    print_suggestions();

    let mut composing = conversation.watch_composing();
    tokio::spawn(async move {
        while composing.changed().await.is_ok() {
            if *composing.borrow_and_update() {
                println!("  … assistant is typing");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_input(&line) {
            Input::Quit => break,
            Input::Suggestion(n) => {
                if !conversation.shows_suggestions() {
                    println!("Suggestions are only offered at the start of a conversation.");
                    continue;
                }
                match n.checked_sub(1).and_then(|i| conversation.use_suggestion(i)) {
                    Some(prompt) => println!("you: {prompt}"),
                    None => {
                        println!("There is no suggestion /{n}.");
                        continue;
                    }
                }
            }
            Input::Text(text) => conversation.set_input(text),
        }

        if let Some(reply) = conversation.submit(&relay).await {
            print_message(reply);
        }
    }

    Ok(())
}
