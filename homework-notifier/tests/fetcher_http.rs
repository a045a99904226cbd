use homework_notifier::{http_client, PollError, PracticumClient, StatusSource};
use notifier_devkit::test_utils::init_tracing;
use notifier_devkit::{test_config, StatusPayloadBuilder, StubServer};
use std::time::Duration;

fn client_for(endpoint: String) -> PracticumClient {
    let mut config = test_config(Duration::from_secs(600));
    config.endpoint = endpoint;
    PracticumClient::new(http_client(&config).unwrap(), &config)
}

#[tokio::test]
async fn test_ok_response_returns_body_unchanged() {
    init_tracing();
    let payload = StatusPayloadBuilder::new()
        .at(1_700_000_600)
        .submission("user__hw_python_oop.zip", "approved")
        .build();
    let server = StubServer::start(200, payload.to_string()).await.unwrap();
    let client = client_for(server.url("/api/user_api/homework_statuses/"));

    let body = client.fetch_status(1_700_000_600).await.unwrap();
    assert_eq!(body, payload);

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "GET");
    assert_eq!(
        requests[0].target,
        "/api/user_api/homework_statuses/?from_date=1700000000"
    );
    assert_eq!(
        requests[0].header("authorization"),
        Some("OAuth test-practicum-token")
    );
    assert_eq!(
        requests[0].header("user-agent"),
        Some(concat!("homework-notifier/", env!("CARGO_PKG_VERSION")))
    );
}

#[tokio::test]
async fn test_non_200_is_unexpected_status() {
    init_tracing();
    for code in [201, 400, 401, 404, 500, 503] {
        let server = StubServer::start(code, "{}").await.unwrap();
        let client = client_for(server.url("/"));

        match client.fetch_status(1_700_000_600).await {
            Err(PollError::UnexpectedStatus { status }) => assert_eq!(status.as_u16(), code),
            other => panic!("{code}: expected UnexpectedStatus, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    init_tracing();
    let server = StubServer::start(200, "<html>maintenance</html>").await.unwrap();
    let client = client_for(server.url("/"));

    assert!(matches!(
        client.fetch_status(1_700_000_600).await,
        Err(PollError::MalformedResponse(_))
    ));
}

#[tokio::test]
async fn test_connection_refused_is_endpoint_unreachable() {
    init_tracing();
    let client = client_for(StubServer::unreachable_url().await.unwrap());

    assert!(matches!(
        client.fetch_status(1_700_000_600).await,
        Err(PollError::EndpointUnreachable(_))
    ));
}
