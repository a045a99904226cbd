//! Verdict table and submission interpretation

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{error, warn};

use crate::error::PollError;

/// Review status codes known to the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Reviewing,
    Rejected,
}

impl Verdict {
    pub const ALL: [Verdict; 3] = [Verdict::Approved, Verdict::Reviewing, Verdict::Rejected];

    pub fn code(self) -> &'static str {
        match self {
            Verdict::Approved => "approved",
            Verdict::Reviewing => "reviewing",
            Verdict::Rejected => "rejected",
        }
    }

    pub fn phrase(self) -> &'static str {
        match self {
            Verdict::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Verdict::Reviewing => "Работа взята на проверку ревьюером.",
            Verdict::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl FromStr for Verdict {
    type Err = PollError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Verdict::ALL
            .into_iter()
            .find(|v| v.code() == code)
            .ok_or_else(|| PollError::UnknownVerdict(code.to_string()))
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Render the notification for one submission record.
///
/// Non-string names are rendered as JSON; non-string statuses are unknown verdicts.
pub fn interpret_submission(record: &Value) -> Result<String, PollError> {
    let name = require(record, "homework_name")?;
    let status = require(record, "status")?;

    let verdict = match status {
        Value::String(code) => code.parse::<Verdict>(),
        other => Err(PollError::UnknownVerdict(other.to_string())),
    }
    .inspect_err(|e| warn!("Unexpected homework status: {}", e))?;

    let name = match name {
        Value::String(name) => name.clone(),
        other => other.to_string(),
    };

    Ok(format!(
        "Изменился статус проверки работы \"{}\". {}",
        name,
        verdict.phrase()
    ))
}

fn require<'a>(record: &'a Value, key: &'static str) -> Result<&'a Value, PollError> {
    record.get(key).ok_or_else(|| {
        error!("Submission record has no `{}` key", key);
        PollError::IncompleteRecord { missing: key }
    })
}
