/*!
Bot Telegram simulé pour tests sans réseau

Enregistre chaque tentative d'envoi (réussie ou non) et permet de
provoquer des échecs de livraison sur certains messages.
*/

use async_trait::async_trait;
use homework_notifier::{Messenger, PollError};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: String,
    pub text: String,
    pub delivered: bool,
}

/// Mock qui remplace `TelegramBot`
#[derive(Clone, Default)]
pub struct MockMessenger {
    attempts: Arc<Mutex<Vec<SentMessage>>>,
    failing_patterns: Arc<Mutex<Vec<String>>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fait échouer tout message contenant `pattern`
    pub fn fail_when_contains<S: Into<String>>(&self, pattern: S) -> &Self {
        self.failing_patterns.lock().unwrap().push(pattern.into());
        self
    }

    /// Toutes les tentatives, dans l'ordre
    pub fn attempts(&self) -> Vec<SentMessage> {
        self.attempts.lock().unwrap().clone()
    }

    /// Textes effectivement livrés, dans l'ordre
    pub fn delivered_texts(&self) -> Vec<String> {
        self.attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.delivered)
            .map(|m| m.text.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.attempts.lock().unwrap().clear();
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), PollError> {
        let fails = self
            .failing_patterns
            .lock()
            .unwrap()
            .iter()
            .any(|p| text.contains(p.as_str()));

        self.attempts.lock().unwrap().push(SentMessage {
            chat_id: chat_id.to_string(),
            text: text.to_string(),
            delivered: !fails,
        });

        if fails {
            tracing::info!("[MOCK] Refused message to {}", chat_id);
            return Err(PollError::DeliveryFailed("Bad Request: chat not found".to_string()));
        }
        tracing::info!("[MOCK] Sent message to {}: {} bytes", chat_id, text.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_attempts_and_failures() {
        let bot = MockMessenger::new();
        bot.fail_when_contains("broken");

        bot.send_message("42", "hello").await.unwrap();
        let err = bot.send_message("42", "broken hw").await.unwrap_err();
        assert!(matches!(err, PollError::DeliveryFailed(_)));

        assert_eq!(bot.attempts().len(), 2);
        assert_eq!(bot.delivered_texts(), vec!["hello"]);

        // Les clones partagent l'historique
        let clone = bot.clone();
        clone.clear();
        assert!(bot.attempts().is_empty());
    }
}
