//! Failure kinds raised while polling and notifying
//!
//! Each kind is contained by the unit that detects it:
//! - cycle-scoped: `EndpointUnreachable`, `UnexpectedStatus`, `MalformedResponse`
//! - record-scoped: `IncompleteRecord`, `UnknownVerdict`
//! - delivery: `DeliveryFailed`

pub use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("status endpoint unreachable: {0}")]
    EndpointUnreachable(#[source] reqwest::Error),
    #[error("status endpoint answered {status}")]
    UnexpectedStatus { status: StatusCode },
    #[error("malformed API response: {0}")]
    MalformedResponse(String),
    #[error("submission record has no `{missing}` key")]
    IncompleteRecord { missing: &'static str },
    #[error("unknown homework status: {0}")]
    UnknownVerdict(String),
    #[error("message delivery failed: {0}")]
    DeliveryFailed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_offender() {
        let err = PollError::UnknownVerdict("bogus".into());
        assert_eq!(err.to_string(), "unknown homework status: bogus");
        let err = PollError::IncompleteRecord { missing: "homework_name" };
        assert!(err.to_string().contains("homework_name"));

        let err = PollError::UnexpectedStatus { status: StatusCode::BAD_GATEWAY };
        assert_eq!(err.to_string(), "status endpoint answered 502 Bad Gateway");
    }
}
