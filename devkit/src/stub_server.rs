/*!
Serveur HTTP stub pour tester les clients reqwest réels

Un routeur axum répond à chaque requête avec un statut et un corps fixes,
et enregistre les requêtes reçues (méthode, cible, en-têtes, corps) pour
assertions.
*/

use anyhow::Result;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Chemin + query string, tel que reçu
    pub target: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Clone)]
struct StubState {
    status: StatusCode,
    body: Arc<String>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct StubServer {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Démarre un serveur sur un port libre de 127.0.0.1
    pub async fn start<B: Into<String>>(status: u16, body: B) -> Result<Self> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            status: StatusCode::from_u16(status)?,
            body: Arc::new(body.into()),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(record).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!("[stub] server stopped: {}", e);
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            requests,
            task,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// URL vers un port sur lequel plus rien n'écoute
    pub async fn unreachable_url() -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        drop(listener);
        Ok(format!("http://{addr}/"))
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn record(
    State(state): State<StubState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());
    let headers = headers
        .iter()
        .map(|(k, v)| (k.as_str().to_string(), String::from_utf8_lossy(v.as_bytes()).into_owned()))
        .collect();

    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        target,
        headers,
        body,
    });

    (
        state.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.body.as_ref().clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = RecordedRequest {
            method: "GET".into(),
            target: "/".into(),
            headers: vec![("authorization".into(), "OAuth t".into())],
            body: String::new(),
        };
        assert_eq!(request.header("Authorization"), Some("OAuth t"));
        assert_eq!(request.header("X-Missing"), None);
    }

    #[tokio::test]
    async fn test_chunked_body_is_decoded() {
        let server = StubServer::start(200, r#"{"ok":true}"#).await.unwrap();
        let addr = server.base_url().trim_start_matches("http://").to_string();

        let mut stream = TcpStream::connect(&addr).await.unwrap();
        let request = format!(
            "POST /bot1:t/sendMessage HTTP/1.1\r\nHost: {addr}\r\n\
             Content-Type: application/json\r\nTransfer-Encoding: chunked\r\n\
             Connection: close\r\n\r\n\
             B\r\n{{\"chat_id\":\r\n4\r\n\"1\"}}\r\n0\r\n\r\n"
        );
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();

        let response = String::from_utf8_lossy(&response);
        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "POST");
        assert_eq!(requests[0].target, "/bot1:t/sendMessage");
        assert_eq!(requests[0].body, r#"{"chat_id":"1"}"#);
    }

    #[tokio::test]
    async fn test_configured_status_is_returned() {
        let server = StubServer::start(503, "{}").await.unwrap();
        let addr = server.base_url().trim_start_matches("http://").to_string();

        let mut stream = TcpStream::connect(&addr).await.unwrap();
        let request = format!("GET /x?from_date=1 HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = Vec::new();
        stream.read_to_end(&mut response).await.unwrap();

        assert!(String::from_utf8_lossy(&response).starts_with("HTTP/1.1 503"));
        assert_eq!(server.requests()[0].target, "/x?from_date=1");
    }

    #[tokio::test]
    async fn test_invalid_status_is_rejected() {
        assert!(StubServer::start(1000, "{}").await.is_err());
    }
}
