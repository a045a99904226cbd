/*!
Builders de payloads conformes à l'API des statuts de devoirs
*/

use serde_json::{json, Value};

/// Enregistrement de devoir minimal
pub fn submission<S: Into<String>, T: Into<String>>(name: S, status: T) -> Value {
    json!({
        "homework_name": name.into(),
        "status": status.into(),
    })
}

/// Construction d'une réponse `{"current_date": .., "homeworks": [..]}`
#[derive(Debug, Clone)]
pub struct StatusPayloadBuilder {
    current_date: i64,
    homeworks: Vec<Value>,
}

impl StatusPayloadBuilder {
    pub fn new() -> Self {
        Self {
            current_date: chrono::Utc::now().timestamp(),
            homeworks: Vec::new(),
        }
    }

    pub fn at(mut self, current_date: i64) -> Self {
        self.current_date = current_date;
        self
    }

    /// Ajoute un devoir avec nom et statut
    pub fn submission<S: Into<String>, T: Into<String>>(self, name: S, status: T) -> Self {
        self.record(submission(name, status))
    }

    /// Ajoute un enregistrement arbitraire (ex: incomplet)
    pub fn record(mut self, record: Value) -> Self {
        self.homeworks.push(record);
        self
    }

    pub fn build(&self) -> Value {
        json!({
            "current_date": self.current_date,
            "homeworks": self.homeworks,
        })
    }
}

impl Default for StatusPayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}
