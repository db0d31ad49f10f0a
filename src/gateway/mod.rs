use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("{0}")]
    Backend(String),
    #[error("unexpected response from backend: {0}")]
    Decode(#[source] serde_json::Error),
}

impl GatewayError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "fileContext")]
    file_context: &'a BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct GenerateReply {
    response: String,
}

#[derive(Debug, Serialize)]
struct ApplyRequest<'a> {
    file_path: &'a str,
    code: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApplyReply {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorReply {
    error: String,
}

#[derive(Debug, Clone)]
pub struct BackendGateway {
    client: reqwest::Client,
    base_url: String,
}

impl BackendGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn generate(
        &self,
        prompt: &str,
        file_context: &BTreeMap<String, String>,
    ) -> Result<String, GatewayError> {
        let url = format!("{}/api/generate", self.base_url);
        info!(%url, files = file_context.len(), "sending generate request");
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest {
                prompt,
                file_context,
            })
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        let reply: GenerateReply = read_reply(response).await?;
        debug!(chars = reply.response.len(), "generate reply received");
        Ok(reply.response)
    }

    pub async fn apply(&self, file_path: &str, code: &str) -> Result<String, GatewayError> {
        let url = format!("{}/api/apply", self.base_url);
        info!(%url, file_path, "sending apply request");
        let response = self
            .client
            .post(&url)
            .json(&ApplyRequest { file_path, code })
            .send()
            .await
            .map_err(GatewayError::Transport)?;
        let reply: ApplyReply = read_reply(response).await?;
        Ok(reply.message)
    }
}

async fn read_reply<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, GatewayError> {
    let status = response.status();
    let body = response.bytes().await.map_err(GatewayError::Transport)?;
    if !status.is_success() {
        let error = match serde_json::from_slice::<ErrorReply>(&body) {
            Ok(reply) => GatewayError::Backend(reply.error),
            Err(_) => GatewayError::Status(status.as_u16()),
        };
        warn!(status = status.as_u16(), error = %error, "backend request failed");
        return Err(error);
    }
    serde_json::from_slice(&body).map_err(GatewayError::Decode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context() -> BTreeMap<String, String> {
        let mut context = BTreeMap::new();
        context.insert("demo/main.py".to_string(), "print(1)".to_string());
        context
    }

    #[tokio::test]
    async fn generate_sends_prompt_and_file_context() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_json(json!({
                "prompt": "explain",
                "fileContext": { "demo/main.py": "print(1)" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "It prints 1." })))
            .expect(1)
            .mount(&server)
            .await;

        let gateway = BackendGateway::new(server.uri());
        let reply = gateway
            .generate("explain", &context())
            .await
            .expect("generate should succeed");

        assert_eq!(reply, "It prints 1.");
    }

    #[tokio::test]
    async fn generate_surfaces_backend_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "x" })))
            .mount(&server)
            .await;

        let gateway = BackendGateway::new(server.uri());
        let error = gateway
            .generate("explain", &BTreeMap::new())
            .await
            .expect_err("non-2xx should fail");

        assert!(matches!(error, GatewayError::Backend(ref message) if message == "x"));
        assert_eq!(error.user_message(), "x");
    }

    #[tokio::test]
    async fn non_json_failure_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let gateway = BackendGateway::new(server.uri());
        let error = gateway
            .apply("demo/main.py", "print(2)")
            .await
            .expect_err("502 should fail");

        assert!(matches!(error, GatewayError::Status(502)));
    }

    #[tokio::test]
    async fn apply_returns_confirmation_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/apply"))
            .and(body_json(json!({ "file_path": "demo/main.py", "code": "print(2)" })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "message": "applied to demo/main.py" })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let gateway = BackendGateway::new(server.uri());
        let message = gateway
            .apply("demo/main.py", "print(2)")
            .await
            .expect("apply should succeed");

        assert_eq!(message, "applied to demo/main.py");
    }

    #[tokio::test]
    async fn malformed_success_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let gateway = BackendGateway::new(server.uri());
        let error = gateway
            .generate("explain", &BTreeMap::new())
            .await
            .expect_err("html body should not decode");

        assert!(matches!(error, GatewayError::Decode(_)));
    }

    #[tokio::test]
    async fn unreachable_backend_is_transport_error() {
        let gateway = BackendGateway::new("http://127.0.0.1:9");
        let error = gateway
            .apply("demo/main.py", "x")
            .await
            .expect_err("nothing listens on the discard port");

        assert!(matches!(error, GatewayError::Transport(_)));
        assert!(error.user_message().starts_with("request failed"));
    }
}
