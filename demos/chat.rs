//! Search-then-add chat loop against a running memory stack.
//!
//! Each turn searches for relevant memories first, splices them into the
//! prompt context, and feeds the finished exchange back to the service for
//! extraction. Run with the stack up:
//!
//! ```sh
//! cargo run --example chat -- alice
//! ```
//!
//! The LLM call is stubbed out; wire in your provider of choice where the
//! reply is produced.

use memstack::context::{format_memories_for_prompt, recall_or_empty};
use memstack::{MemoryClient, RememberedExchange};
use std::io::{self, BufRead, Write};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let user_id = std::env::args().nth(1).unwrap_or_else(|| "demo-user".to_string());
    let client = MemoryClient::new(
        std::env::var("MEMSTACK_API_URL").unwrap_or_else(|_| "http://localhost:8001".to_string()),
    )?;

    println!("Chatting as '{}'. Empty line to quit.", user_id);

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        stdin.lock().read_line(&mut line)?;
        let message = line.trim();
        if message.is_empty() {
            break;
        }

        // Recall: failures degrade to an empty context, the chat goes on.
        let memories = recall_or_empty(&client, message, &user_id, Some(5)).await?;
        let context = format_memories_for_prompt(&memories);
        if !context.is_empty() {
            println!("--- context ---\n{}\n---------------", context);
        }

        // Replace with a real LLM call; `context` belongs in the system prompt.
        let reply = format!(
            "(stub reply; {} memories in context)",
            memories.len()
        );
        println!("{}", reply);

        // Remember: submit the exchange for extraction after the reply.
        let mut exchange = RememberedExchange::new(&user_id);
        exchange.user_says(message).assistant_says(&reply);
        let extracted = exchange.commit(&client).await;
        if extracted > 0 {
            println!("(service extracted {} new memories)", extracted);
        }
    }

    Ok(())
}
