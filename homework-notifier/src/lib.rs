//! Homework Notifier - homework review status relay
//!
//! Polls the homework status API on a fixed interval and forwards every
//! status change to one Telegram chat:
//! - Credential guard before anything touches the network
//! - Typed fetch/validation errors contained per cycle
//! - Per-record interpretation with skip-and-continue on bad records
//! - Best-effort delivery through the bot transport

pub mod config;
pub mod error;
pub mod fetcher;
pub mod notifier;
pub mod poller;
pub mod validator;
pub mod verdicts;

pub use config::{check_configuration, Config, ConfigError};
pub use error::PollError;
pub use fetcher::{http_client, PracticumClient, StatusSource};
pub use notifier::{Messenger, Notifier, TelegramBot};
pub use poller::{CycleSummary, Poller};
pub use validator::{validate, ApiResponse};
pub use verdicts::{interpret_submission, Verdict};
