/*!
# Notifier DevKit - Doublures et utilitaires de test

Bibliothèque facilitant les tests du homework-notifier avec:
- Bot Telegram simulé (enregistre les envois, pannes à la demande)
- Source de statuts scriptée (réponses et pannes enchaînées)
- Serveur HTTP stub pour tester les vrais clients reqwest
- Builders de payloads conformes à l'API des statuts
*/

pub mod fixtures;
pub mod mock_bot;
pub mod scripted_source;
pub mod stub_server;
pub mod test_utils;

pub use fixtures::{submission, StatusPayloadBuilder};
pub use mock_bot::MockMessenger;
pub use scripted_source::{Reply, ScriptedSource};
pub use stub_server::{RecordedRequest, StubServer};
pub use test_utils::{test_config, TestHarness};
