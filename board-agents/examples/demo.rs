//! Offline walk-through of a board meeting
//!
//! This example demonstrates:
//! 1. Building the board over the echo client (no API key needed)
//! 2. Running the full meeting for one question
//! 3. Inspecting per-role responses and the final report
//! 4. What a failed meeting leaves behind

use anyhow::Result;
use async_trait::async_trait;
use board_agents::{
    BoardPipeline, BoardReport, ChatMessage, GenerationClient, GenerationError, Role,
};
use generation_client::EchoClient;
use std::sync::Arc;
use tracing::{info, Level};

/// Echo client that goes quiet once the Risk Manager is asked
struct QuietRiskClient;

#[async_trait]
impl GenerationClient for QuietRiskClient {
    fn name(&self) -> &str {
        "quiet-risk"
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String, GenerationError> {
        if messages[0].content == Role::Risk.instruction() {
            return Err(GenerationError::EmptyResponse);
        }
        EchoClient::new().generate(messages).await
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("🤖 Investment Board - Example");
    info!("=============================");

    // Step 1: Build the board
    let pipeline = BoardPipeline::new(Arc::new(EchoClient::new()));
    info!("✅ Board assembled with {} members", pipeline.agents().len());

    // Step 2: Hold the meeting
    let state = pipeline.run("Should I buy bonds?").await?;
    info!("✅ Meeting finished with {} turns", state.discussion().len());

    // Step 3: Per-role responses
    for role in Role::ALL {
        info!("  {}: {:?}", role, state.response(role));
    }
    info!("\n{}\n", serde_json::to_string_pretty(state.discussion())?);
    println!("{}", BoardReport::from_state(&state));

    // Step 4: A meeting that fails at the Risk step
    let failing = BoardPipeline::new(Arc::new(QuietRiskClient));
    if let Err(err) = failing.run("Should I buy bonds?").await {
        info!("❌ {}", err);
        if let Some(state) = err.committed_state() {
            info!("  Committed turns before failure: {}", state.discussion().len());
            println!("{}", BoardReport::from_state(state));
        }
    }

    Ok(())
}
