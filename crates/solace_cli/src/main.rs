use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use solace_core::config::SolaceConfig;
use solace_core::{Conversation, EngineResult, MoodSummary, Turn};
use solace_gateway::GatewayServer;
use solace_reasoning::CompanionEngine;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the TOML config file. A missing file means defaults.
    #[arg(short, long, default_value = "solace.toml", env = "SOLACE_CONFIG", global = true)]
    config: PathBuf,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Talk to the engine in the terminal (default)
    Chat {
        /// Print the mood summary after each reply
        #[arg(long)]
        show_mood: bool,
    },
    /// Run the engine once over a JSON array of turns and print the result
    Analyze {
        file: PathBuf,
    },
    /// Start the HTTP gateway
    Serve {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Logs go to stderr so `analyze` output stays clean JSON.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_tracing(args.log_json);

    let config = SolaceConfig::load_or_default(&args.config);
    let engine = CompanionEngine::from_config(&config)?;

    match args.command.unwrap_or(Command::Chat { show_mood: false }) {
        Command::Chat { show_mood } => chat(engine, show_mood).await,
        Command::Analyze { file } => analyze(engine, &file).await,
        Command::Serve { host, port } => {
            let host = host.unwrap_or(config.gateway.host);
            let port = port.unwrap_or(config.gateway.port);
            let server = GatewayServer::new(Arc::new(engine), &host, port)
                .with_request_timeout(Duration::from_secs(config.gateway.request_timeout_secs));
            server.start().await.context("Gateway task failed")?;
            Ok(())
        }
    }
}

// ============================================================================
// Subcommands
// ============================================================================

async fn analyze(engine: CompanionEngine, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read conversation file: {}", file.display()))?;
    let turns: Vec<Turn> =
        serde_json::from_str(&content).with_context(|| "Conversation file must be a JSON array of turns")?;
    let result = engine.respond_to(turns).await?;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn chat(engine: CompanionEngine, show_mood: bool) -> Result<()> {
    let mut editor = rustyline::DefaultEditor::new()?;
    let mut history: Vec<Turn> = Vec::new();

    info!(backend = engine.has_backend(), "Chat session started");
    println!("Solace is here. Type 'quit' to exit.");

    loop {
        let line = match editor.readline("> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let trimmed = line.trim();
        if trimmed == "quit" || trimmed == "exit" {
            break;
        }
        if trimmed.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(trimmed);

        history.push(Turn::user(trimmed));
        let conversation = Conversation::new(history.clone())?;
        let result = engine.respond(&conversation).await;
        print_reply(&result, show_mood);
        history.push(Turn::agent(result.text).with_media(result.media));
    }
    Ok(())
}

fn print_reply(result: &EngineResult, show_mood: bool) {
    println!("\nSolace: {}", result.text);
    for item in &result.media {
        println!("  ▶ {}: {}", item.label, item.url);
    }
    if show_mood {
        println!("  [{}]", describe_mood(&result.mood));
    }
    println!();
}

fn describe_mood(mood: &MoodSummary) -> String {
    let mut out = format!("mood: {} ({:.2})", mood.dominant, mood.confidence);
    if !mood.supporting.is_empty() {
        let supporting: Vec<&str> = mood.supporting.iter().map(|c| c.as_str()).collect();
        out.push_str(&format!(", also {}", supporting.join(", ")));
    }
    out
}
