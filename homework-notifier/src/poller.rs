//! Poll loop: fetch -> validate -> interpret -> notify, then wait
//!
//! Every failure is contained inside the cycle that produced it. A fetch or
//! validation error ends the cycle without notifications; a bad record or a
//! failed delivery only affects that record.

use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::PollError;
use crate::fetcher::StatusSource;
use crate::notifier::{Messenger, Notifier};
use crate::validator::validate;
use crate::verdicts::interpret_submission;

/// Sent on empty batches when `NOTIFY_WHEN_EMPTY` is enabled
pub const NO_NEWS_TEXT: &str = "Отсутствуют новые ответы";

/// Outcome of a cycle whose fetch and validation succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleSummary {
    Empty {
        notice_sent: bool,
    },
    Processed {
        total: usize,
        notified: usize,
        skipped: usize,
        undelivered: usize,
    },
}

pub struct Poller<S, M> {
    source: S,
    notifier: Notifier<M>,
    poll_interval: Duration,
    notify_when_empty: bool,
}

impl<S: StatusSource, M: Messenger> Poller<S, M> {
    pub fn new(source: S, notifier: Notifier<M>, config: &Config) -> Self {
        Self {
            source,
            notifier,
            poll_interval: config.poll_interval,
            notify_when_empty: config.notify_when_empty,
        }
    }

    pub fn notifier(&self) -> &Notifier<M> {
        &self.notifier
    }

    /// One cycle for the window ending at `window_start`; cycle-scoped errors are returned.
    pub async fn check_once(&self, window_start: i64) -> Result<CycleSummary, PollError> {
        let raw = self.source.fetch_status(window_start).await?;
        let response = validate(raw)?;
        debug!("Status payload current_date={}", response.current_date);

        if response.is_empty() {
            debug!("No new homework updates");
            let notice_sent = self.notify_when_empty && self.notifier.notify(NO_NEWS_TEXT).await;
            return Ok(CycleSummary::Empty { notice_sent });
        }

        let homeworks = &response.homeworks;
        let (mut notified, mut skipped, mut undelivered) = (0, 0, 0);
        for record in homeworks {
            match interpret_submission(record) {
                Ok(text) => {
                    if self.notifier.notify(&text).await {
                        notified += 1;
                    } else {
                        undelivered += 1;
                    }
                }
                Err(e) => {
                    warn!("Skipping submission: {}", e);
                    skipped += 1;
                }
            }
        }

        Ok(CycleSummary::Processed {
            total: homeworks.len(),
            notified,
            skipped,
            undelivered,
        })
    }

    /// Run one cycle and log its outcome; nothing escapes.
    pub async fn run_cycle(&self, window_start: i64) -> Option<CycleSummary> {
        match self.check_once(window_start).await {
            Ok(summary) => {
                info!("Poll cycle finished: {:?}", summary);
                Some(summary)
            }
            Err(e) => {
                error!("Poll cycle failed: {}", e);
                None
            }
        }
    }

    /// Poll forever, starting a cycle every `poll_interval`.
    pub async fn run(&self) {
        info!("Starting poll loop (interval: {:?})", self.poll_interval);
        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.run_cycle(current_timestamp()).await;
        }
    }
}

/// Current time as epoch seconds
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    struct FixedSource(Value);

    #[async_trait]
    impl StatusSource for FixedSource {
        async fn fetch_status(&self, _window_start: i64) -> Result<Value, PollError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct Recorder(Mutex<Vec<String>>);

    #[async_trait]
    impl Messenger for Recorder {
        async fn send_message(&self, _chat_id: &str, text: &str) -> Result<(), PollError> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    fn config(notify_when_empty: bool) -> Config {
        Config {
            practicum_token: "p".into(),
            telegram_token: "t".into(),
            chat_id: "1".into(),
            endpoint: "http://localhost/".into(),
            telegram_api_url: "http://localhost".into(),
            poll_interval: Duration::from_secs(600),
            http_timeout: Duration::from_secs(5),
            notify_when_empty,
        }
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing_by_default() {
        let poller = Poller::new(
            FixedSource(json!({"current_date": 1, "homeworks": []})),
            Notifier::new(Recorder::default(), "1"),
            &config(false),
        );
        let summary = poller.check_once(1).await.unwrap();
        assert_eq!(summary, CycleSummary::Empty { notice_sent: false });
        assert!(poller.notifier().messenger().0.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_notice_when_enabled() {
        let poller = Poller::new(
            FixedSource(json!({"current_date": 1, "homeworks": []})),
            Notifier::new(Recorder::default(), "1"),
            &config(true),
        );
        let summary = poller.check_once(1).await.unwrap();
        assert_eq!(summary, CycleSummary::Empty { notice_sent: true });
        assert_eq!(*poller.notifier().messenger().0.lock().unwrap(), vec![NO_NEWS_TEXT]);
    }

    #[tokio::test]
    async fn test_malformed_payload_aborts_cycle() {
        let poller = Poller::new(
            FixedSource(json!({"current_date": 1, "homeworks": {"a": 1}})),
            Notifier::new(Recorder::default(), "1"),
            &config(true),
        );
        assert!(matches!(poller.check_once(1).await, Err(PollError::MalformedResponse(_))));
        assert_eq!(poller.run_cycle(1).await, None);
        assert!(poller.notifier().messenger().0.lock().unwrap().is_empty());
    }
}
