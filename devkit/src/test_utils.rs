/*!
Test Harness pour le homework-notifier

Assemble un `Poller` complet à partir des doublures du devkit:
- source scriptée à la place de l'API des statuts
- bot simulé à la place de Telegram
- config de test sans secrets réels
*/

use homework_notifier::{Config, Notifier, Poller};
use std::time::Duration;

use crate::mock_bot::MockMessenger;
use crate::scripted_source::ScriptedSource;

pub const TEST_CHAT_ID: &str = "424242";

/// Configuration de test (tokens factices, endpoints locaux)
pub fn test_config(poll_interval: Duration) -> Config {
    Config {
        practicum_token: "test-practicum-token".to_string(),
        telegram_token: "123456:test-bot-token".to_string(),
        chat_id: TEST_CHAT_ID.to_string(),
        endpoint: "http://127.0.0.1:9/homework_statuses/".to_string(),
        telegram_api_url: "http://127.0.0.1:9".to_string(),
        poll_interval,
        http_timeout: Duration::from_secs(2),
        notify_when_empty: false,
    }
}

/// Init logging pour tests (idempotent)
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Harness de test complet : poller + accès aux doublures
pub struct TestHarness {
    pub source: ScriptedSource,
    pub bot: MockMessenger,
    pub poller: Poller<ScriptedSource, MockMessenger>,
}

impl TestHarness {
    pub fn new(source: ScriptedSource) -> Self {
        Self::with_config(source, test_config(Duration::from_secs(600)))
    }

    pub fn with_config(source: ScriptedSource, config: Config) -> Self {
        init_tracing();

        let bot = MockMessenger::new();
        let notifier = Notifier::new(bot.clone(), config.chat_id.clone());
        let poller = Poller::new(source.clone(), notifier, &config);

        Self { source, bot, poller }
    }

    /// Bot qui refuse les messages contenant `pattern`
    pub fn failing_on(self, pattern: &str) -> Self {
        self.bot.fail_when_contains(pattern);
        self
    }

    pub fn delivered(&self) -> Vec<String> {
        self.bot.delivered_texts()
    }
}
