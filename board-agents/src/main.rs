use anyhow::{bail, Context, Result};
use board_agents::{BoardConfig, BoardPipeline, BoardReport};
use std::io::{self, BufRead, Write};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Credentials may live in a .env file
    dotenvy::dotenv().ok();

    let config = BoardConfig::load().context("Failed to load board configuration")?;

    // Initialize logging; stdout is reserved for the report
    tracing_subscriber::fmt()
        .with_max_level(config.max_log_level())
        .with_writer(io::stderr)
        .init();

    let client = generation_client::build_client(&config.client)
        .context("Failed to set up the generation client")?;
    let pipeline = BoardPipeline::from_config(client, &config);

    println!("📈 Welcome to your Personal Investment Board Meeting (AI Edition)");
    let question = prompt_question()?;
    if question.is_empty() {
        bail!("No question given, the board has nothing to discuss");
    }

    let state = pipeline.run(&question).await?;
    info!(session_id = %state.session_id(), "Printing board report");

    println!();
    println!("{}", BoardReport::from_state(&state));

    Ok(())
}

/// Ask once for the user's question
fn prompt_question() -> Result<String> {
    print!("User: What’s your investment decision/question today?\n> ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read question from stdin")?;

    Ok(line.trim().to_string())
}
