use std::sync::Arc;

use persona_bot::bot::SurveyBot;
use persona_bot::channels::{Channel, CliChannel, TelegramChannel};
use persona_bot::config::Config;
use persona_bot::error::Error;
use persona_bot::llm::GigaChatClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().map_err(Error::from).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  export GIGACHAT_AUTH_KEY=...");
        std::process::exit(1);
    });

    eprintln!("🤖 Persona Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Model: {}", config.gigachat.model);
    if let Some(ref client_id) = config.gigachat.client_id {
        eprintln!("   GigaChat client id: {client_id}");
    }

    let synthesizer = Arc::new(GigaChatClient::new(config.gigachat.clone()).map_err(Error::from)?);

    let channel: Arc<dyn Channel> = match config.telegram_token {
        Some(token) => {
            eprintln!(
                "   Telegram: enabled (allowed: {})",
                if config.allowed_users.iter().any(|u| u == "*") {
                    "everyone".to_string()
                } else {
                    config.allowed_users.join(", ")
                }
            );
            Arc::new(TelegramChannel::new(token, config.allowed_users.clone()))
        }
        None => {
            eprintln!("   Telegram: disabled (TELEGRAM_TOKEN not set), using CLI");
            eprintln!("   Type /start to begin the survey.\n");
            Arc::new(CliChannel::new())
        }
    };

    let bot = Arc::new(SurveyBot::new(synthesizer));
    bot.run(channel).await?;

    Ok(())
}
