//! The console entry point for chat-commands.
use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    chat_commands::app::launch().await
}
