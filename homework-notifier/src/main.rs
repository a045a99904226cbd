use anyhow::{Context, Result};
use homework_notifier::{
    check_configuration, http_client, Notifier, Poller, PracticumClient, TelegramBot,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Charger les variables d'environnement depuis .env (si présent)
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("homework_notifier=debug,info")),
        )
        .init();

    info!("Homework notifier starting...");

    // Exits the process on missing secrets, before any client exists
    let config = check_configuration();
    debug!("Configuration loaded: {:?}", config);

    let http = http_client(&config).context("Failed to build HTTP client")?;

    debug!("Initializing bot");
    let bot = TelegramBot::new(http.clone(), &config);
    let notifier = Notifier::new(bot, config.chat_id.clone());
    debug!("Bot initialized");

    let source = PracticumClient::new(http, &config);
    let poller = Poller::new(source, notifier, &config);

    poller.run().await;
    Ok(())
}
