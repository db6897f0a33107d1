use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api::MarketplaceApi;
use crate::config::Config;
use crate::errors::ClientError;
use crate::models::{Category, ContactRequest, ContactResponse, JobRecord, Skill, Specialty};
use crate::session::{SessionEvent, SessionEvents, SessionKey, SessionStore};
use crate::wizard::payload::{CreateJobPayload, UpdateJobForm};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<Value>,
}

/// reqwest-backed `MarketplaceApi`.
/// Attaches the stored bearer token and turns `401` into a session event.
#[derive(Clone)]
pub struct HttpMarketplaceApi {
    client: Client,
    base_url: Url,
    store: Arc<dyn SessionStore>,
    events: SessionEvents,
}

impl HttpMarketplaceApi {
    pub fn new(
        config: &Config,
        store: Arc<dyn SessionStore>,
        events: SessionEvents,
    ) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| ClientError::Request(format!("invalid API base URL: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::Request(format!(
                "API base URL cannot take paths: {base_url}"
            )));
        }
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Request(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            store,
            events,
        })
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match self.store.get(SessionKey::Token) {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!("Backend returned 401 for {}", response.url().path());
            self.events.emit(SessionEvent::Unauthorized);
            return Err(ClientError::SessionExpired);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Backend returned {}: {}", status, body);
            return Err(ClientError::Server {
                status: status.as_u16(),
                message: parse_error_message(&body),
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(ClientError::Decode)
    }
}

#[async_trait]
impl MarketplaceApi for HttpMarketplaceApi {
    async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.fetch_json(self.client.get(self.url(&["categories"]))).await
    }

    async fn specialties(&self, category_id: &str) -> Result<Vec<Specialty>, ClientError> {
        debug!("Fetching specialties for category {category_id}");
        self.fetch_json(
            self.client
                .get(self.url(&["specialties"]))
                .query(&[("category", category_id)]),
        )
        .await
    }

    async fn skills(&self) -> Result<Vec<Skill>, ClientError> {
        self.fetch_json(self.client.get(self.url(&["skills"]))).await
    }

    async fn job(&self, job_id: &str) -> Result<JobRecord, ClientError> {
        self.fetch_json(self.client.get(self.url(&["jobs", job_id])))
            .await
    }

    async fn create_job(&self, payload: &CreateJobPayload) -> Result<(), ClientError> {
        self.send(self.client.post(self.url(&["jobs"])).json(payload))
            .await?;
        Ok(())
    }

    async fn update_job(&self, job_id: &str, form: UpdateJobForm) -> Result<(), ClientError> {
        let multipart = into_multipart(form)?;
        self.send(
            self.client
                .put(self.url(&["jobs", job_id]))
                .multipart(multipart),
        )
        .await?;
        Ok(())
    }

    async fn submit_contact(
        &self,
        request: &ContactRequest,
    ) -> Result<ContactResponse, ClientError> {
        self.fetch_json(self.client.post(self.url(&["contacts"])).json(request))
            .await
    }
}

fn into_multipart(form: UpdateJobForm) -> Result<Form, ClientError> {
    let mut multipart = Form::new();
    for (name, value) in form.fields {
        multipart = multipart.text(name, value);
    }
    for file in form.files {
        let mut part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
        if !file.content_type.is_empty() {
            part = part.mime_str(&file.content_type).map_err(|e| {
                ClientError::Request(format!("invalid content type for {}: {e}", file.name))
            })?;
        }
        multipart = multipart.part("attachments", part);
    }
    Ok(multipart)
}

/// Pulls a human-readable message out of an error body.
/// Accepts `{ message }`, `{ error: "..." }` and `{ error: { message } }`.
fn parse_error_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed
        .message
        .or_else(|| match parsed.error {
            Some(Value::String(s)) => Some(s),
            Some(Value::Object(obj)) => obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
            _ => None,
        })
        .filter(|m| !m.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use crate::wizard::draft::StagedFile;
    use crate::wizard::payload::BudgetPayload;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    fn api_for(base_url: &str, store: Arc<dyn SessionStore>, events: SessionEvents) -> HttpMarketplaceApi {
        HttpMarketplaceApi::new(&Config::with_base_url(base_url), store, events).unwrap()
    }

    /// Serves one canned response and returns the lowercased request head.
    async fn serve_once(status_line: &'static str, body: &'static str) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let head = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status_line}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(head);
        });
        (base_url, rx)
    }

    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 2048];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
            let body_len = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length:"))
                .and_then(|v| v.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= end + 4 + body_len {
                return head;
            }
        }
        String::from_utf8_lossy(&buf).to_lowercase()
    }

    fn payload() -> CreateJobPayload {
        CreateJobPayload {
            title: "Landing page".to_string(),
            description: "d".repeat(60),
            specialty: "S1".to_string(),
            skills: vec!["SK1".to_string()],
            budget: BudgetPayload {
                kind: Default::default(),
                amount: serde_json::Number::from(500u64),
            },
            duration: 7,
            attachments: vec![],
        }
    }

    #[tokio::test]
    async fn test_unauthorized_response_emits_session_event() {
        let (base_url, head) = serve_once("401 Unauthorized", r#"{"message":"jwt expired"}"#).await;
        let store = Arc::new(MemorySessionStore::new());
        store.set(SessionKey::Token, "t1".to_string());
        let events = SessionEvents::new();
        let mut rx = events.subscribe();
        let api = api_for(&base_url, store, events);

        let err = api.categories().await.unwrap_err();

        assert!(matches!(err, ClientError::SessionExpired));
        assert_eq!(rx.try_recv().unwrap(), SessionEvent::Unauthorized);
        let head = head.await.unwrap();
        assert!(head.starts_with("get /categories "));
        assert!(head.contains("authorization: bearer t1"));
    }

    #[tokio::test]
    async fn test_no_token_means_no_authorization_header() {
        let (base_url, head) = serve_once("200 OK", r#"[{"_id":"SK1","name":"Rust"}]"#).await;
        let events = SessionEvents::new();
        let mut rx = events.subscribe();
        let api = api_for(&base_url, Arc::new(MemorySessionStore::new()), events);

        let skills = api.skills().await.unwrap();

        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "Rust");
        assert!(rx.try_recv().is_err());
        assert!(!head.await.unwrap().contains("authorization:"));
    }

    #[tokio::test]
    async fn test_error_body_message_is_surfaced_verbatim() {
        let (base_url, head) = serve_once("422 Unprocessable Entity", r#"{"message":"Title taken"}"#).await;
        let store = Arc::new(MemorySessionStore::new());
        store.set(SessionKey::Token, "t1".to_string());
        let api = api_for(&base_url, store, SessionEvents::new());

        let err = api.create_job(&payload()).await.unwrap_err();

        match &err {
            ClientError::Server { status, message } => {
                assert_eq!(*status, 422);
                assert_eq!(message.as_deref(), Some("Title taken"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.user_message(), "Title taken");
        assert!(head.await.unwrap().starts_with("post /jobs "));
    }

    #[test]
    fn test_parse_error_message_shapes() {
        assert_eq!(
            parse_error_message(r#"{"message":"Title taken"}"#),
            Some("Title taken".to_string())
        );
        assert_eq!(
            parse_error_message(r#"{"error":"Bad category"}"#),
            Some("Bad category".to_string())
        );
        assert_eq!(
            parse_error_message(r#"{"error":{"code":"X","message":"Nested"}}"#),
            Some("Nested".to_string())
        );
        assert_eq!(parse_error_message(r#"{"message":"  "}"#), None);
        assert_eq!(parse_error_message("<html>502</html>"), None);
    }

    #[test]
    fn test_url_joins_base_and_segments() {
        let api = api_for(
            "http://localhost:5000/api/",
            Arc::new(MemorySessionStore::new()),
            SessionEvents::new(),
        );
        assert_eq!(
            api.url(&["jobs", "j1"]).as_str(),
            "http://localhost:5000/api/jobs/j1"
        );

        let api = api_for(
            "http://localhost:5000",
            Arc::new(MemorySessionStore::new()),
            SessionEvents::new(),
        );
        assert_eq!(api.url(&["skills"]).as_str(), "http://localhost:5000/skills");
    }

    #[test]
    fn test_job_id_is_percent_encoded() {
        let api = api_for(
            "http://localhost:5000/api",
            Arc::new(MemorySessionStore::new()),
            SessionEvents::new(),
        );
        let url = api.url(&["jobs", "a/b?c#d"]);
        assert_eq!(url.path(), "/api/jobs/a%2Fb%3Fc%23d");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_invalid_base_url_is_a_request_error() {
        let result = HttpMarketplaceApi::new(
            &Config::with_base_url("not a url"),
            Arc::new(MemorySessionStore::new()),
            SessionEvents::new(),
        );
        assert!(matches!(result, Err(ClientError::Request(_))));
    }

    #[test]
    fn test_into_multipart_accepts_staged_files() {
        let form = UpdateJobForm {
            fields: vec![("title", "T".to_string()), ("skills[]", "sk1".to_string())],
            files: vec![StagedFile::new(
                "brief.pdf",
                "application/pdf",
                bytes::Bytes::from_static(b"%PDF"),
            )],
        };
        assert!(into_multipart(form).is_ok());
    }

    #[test]
    fn test_bad_content_type_is_a_request_error() {
        let form = UpdateJobForm {
            fields: vec![],
            files: vec![StagedFile::new(
                "brief.pdf",
                "not a mime type",
                bytes::Bytes::from_static(b"%PDF"),
            )],
        };
        let err = into_multipart(form).unwrap_err();
        assert!(matches!(err, ClientError::Request(_)));
        assert_eq!(err.code(), "REQUEST_ERROR");
    }
}
