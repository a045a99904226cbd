/*!
Source de statuts scriptée

Rejoue une suite de réponses (payloads, statuts HTTP, corps invalides)
puis retombe sur un payload par défaut. Chaque appel est horodaté avec
l'horloge tokio pour vérifier la cadence de la boucle.
*/

use async_trait::async_trait;
use homework_notifier::error::StatusCode;
use homework_notifier::{PollError, StatusSource};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;

use crate::fixtures::StatusPayloadBuilder;

/// Réponse simulée de l'API
#[derive(Debug, Clone)]
pub enum Reply {
    Payload(Value),
    /// Code HTTP non-200
    Status(u16),
    /// Corps 200 qui n'est pas du JSON
    Garbage(String),
}

#[derive(Debug, Clone)]
pub struct FetchCall {
    pub window_start: i64,
    pub at: Instant,
}

#[derive(Clone)]
pub struct ScriptedSource {
    script: Arc<Mutex<VecDeque<Reply>>>,
    fallback: Value,
    calls: Arc<Mutex<Vec<FetchCall>>>,
}

impl ScriptedSource {
    /// Source vide : chaque appel renvoie un lot sans devoirs
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: StatusPayloadBuilder::new().build(),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn then(self, reply: Reply) -> Self {
        self.script.lock().unwrap().push_back(reply);
        self
    }

    pub fn then_payload(self, payload: Value) -> Self {
        self.then(Reply::Payload(payload))
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for ScriptedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch_status(&self, window_start: i64) -> Result<Value, PollError> {
        self.calls.lock().unwrap().push(FetchCall {
            window_start,
            at: Instant::now(),
        });

        let next = self.script.lock().unwrap().pop_front();
        match next.unwrap_or_else(|| Reply::Payload(self.fallback.clone())) {
            Reply::Payload(payload) => Ok(payload),
            Reply::Status(code) => Err(PollError::UnexpectedStatus {
                status: StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            }),
            Reply::Garbage(body) => Err(PollError::MalformedResponse(format!(
                "body is not valid JSON: {body}"
            ))),
        }
    }
}
