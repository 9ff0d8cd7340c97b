//! Advisor backends
//!
//! `OllamaBackend` talks to a local Ollama server over HTTP. No cloud calls.
//! Endpoints used:
//! - GET / - liveness probe
//! - GET /api/tags - list available models
//! - POST /api/generate - generate a response (non-streaming)

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Default Ollama API endpoint
pub const OLLAMA_DEFAULT_URL: &str = "http://127.0.0.1:11434";

/// Default model (a small local thinking model)
pub const DEFAULT_MODEL: &str = "lfm2.5-thinking";

/// Default timeout for liveness probes (ms)
pub const HEALTH_CHECK_TIMEOUT_MS: u64 = 2000;

/// Default timeout for generation (s)
pub const GENERATE_TIMEOUT_SECS: u64 = 30;

/// Backend errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("advisor is disabled in configuration")]
    Disabled,

    #[error("backend not reachable: {0}")]
    Unreachable(String),

    #[error("request timed out after {0} seconds")]
    Timeout(u64),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("backend returned an empty response")]
    EmptyResponse,
}

/// A language-model backend reachable from this host
pub trait Backend {
    /// Lightweight liveness probe
    fn is_alive(&self) -> bool;

    /// Send a prompt and wait at most `timeout` for the raw answer
    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, BackendError>;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }

    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, BackendError> {
        (**self).invoke(prompt, timeout)
    }
}

/// Request for /api/generate
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: i32,
}

/// Response from /api/generate (non-streaming)
#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Model info from /api/tags
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OllamaModel {
    pub name: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

/// Ollama HTTP backend
#[derive(Debug, Clone)]
pub struct OllamaBackend {
    base_url: String,
    model: String,
    health_timeout: Duration,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            health_timeout: Duration::from_millis(HEALTH_CHECK_TIMEOUT_MS),
        }
    }

    pub fn with_health_timeout(mut self, timeout: Duration) -> Self {
        self.health_timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn client(timeout: Duration) -> Result<reqwest::blocking::Client, BackendError> {
        reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Http(format!("failed to create HTTP client: {}", e)))
    }

    fn map_send_error(e: reqwest::Error, timeout: Duration) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(timeout.as_secs())
        } else if e.is_connect() {
            BackendError::Unreachable(e.to_string())
        } else {
            BackendError::Http(e.to_string())
        }
    }

    /// List models available on the server
    pub fn list_models(&self) -> Result<Vec<OllamaModel>, BackendError> {
        let client = Self::client(self.health_timeout)?;
        let url = format!("{}/api/tags", self.base_url);
        let resp = client
            .get(&url)
            .send()
            .map_err(|e| Self::map_send_error(e, self.health_timeout))?;

        if !resp.status().is_success() {
            return Err(BackendError::Http(format!("status {}", resp.status())));
        }

        let tags: TagsResponse = resp
            .json()
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;
        Ok(tags.models)
    }

    /// Whether the configured model is downloaded
    pub fn has_model(&self) -> Result<bool, BackendError> {
        let models = self.list_models()?;
        // Model names may carry a :latest or other tag
        let wanted = self.model.split(':').next().unwrap_or(&self.model);
        Ok(models.iter().any(|m| {
            let base = m.name.split(':').next().unwrap_or(&m.name);
            base == wanted || m.name == self.model
        }))
    }
}

impl Backend for OllamaBackend {
    fn is_alive(&self) -> bool {
        let client = match Self::client(self.health_timeout) {
            Ok(c) => c,
            Err(_) => return false,
        };

        match client.get(&self.base_url).send() {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn invoke(&self, prompt: &str, timeout: Duration) -> Result<String, BackendError> {
        let client = Self::client(timeout)?;
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.3,
                num_predict: 800,
            },
        };

        let url = format!("{}/api/generate", self.base_url);
        let resp = client
            .post(&url)
            .json(&request)
            .send()
            .map_err(|e| Self::map_send_error(e, timeout))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(BackendError::Http(format!("status {}: {}", status, body.trim())));
        }

        let body: GenerateResponse = resp.json().map_err(|e| {
            if e.is_timeout() {
                BackendError::Timeout(timeout.as_secs())
            } else {
                BackendError::InvalidResponse(e.to_string())
            }
        })?;

        let text = body.response.trim();
        if text.is_empty() {
            return Err(BackendError::EmptyResponse);
        }
        Ok(text.to_string())
    }
}

/// Scripted backend for tests
pub struct FakeBackend {
    alive: bool,
    responses: Mutex<VecDeque<Result<String, BackendError>>>,
    call_count: Mutex<usize>,
    prompts: Mutex<Vec<String>>,
}

impl FakeBackend {
    /// A live backend answering with the given responses in order
    pub fn new(responses: Vec<Result<String, BackendError>>) -> Self {
        Self {
            alive: true,
            responses: Mutex::new(responses.into()),
            call_count: Mutex::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A live backend that always answers with `text`
    pub fn answering(text: &str) -> Self {
        Self::new(vec![Ok(text.to_string())])
    }

    /// A backend whose liveness probe fails
    pub fn unreachable() -> Self {
        Self {
            alive: false,
            ..Self::new(Vec::new())
        }
    }

    /// Number of `invoke` calls made
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Prompts received so far
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Backend for FakeBackend {
    fn is_alive(&self) -> bool {
        self.alive
    }

    fn invoke(&self, prompt: &str, _timeout: Duration) -> Result<String, BackendError> {
        *self.call_count.lock().unwrap_or_else(|e| e.into_inner()) += 1;
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(prompt.to_string());

        let mut responses = self.responses.lock().unwrap_or_else(|e| e.into_inner());
        match responses.len() {
            0 => Err(BackendError::EmptyResponse),
            // Keep returning the last response
            1 => responses[0].clone(),
            _ => responses.pop_front().unwrap_or(Err(BackendError::EmptyResponse)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ollama_backend_trims_trailing_slash() {
        let backend = OllamaBackend::new("http://127.0.0.1:11434/", DEFAULT_MODEL);
        assert_eq!(backend.base_url(), "http://127.0.0.1:11434");
        assert_eq!(backend.model(), "lfm2.5-thinking");
    }

    #[test]
    fn test_unreachable_ollama_is_not_alive() {
        // Port 9 (discard) is not an Ollama server
        let backend = OllamaBackend::new("http://127.0.0.1:9", DEFAULT_MODEL)
            .with_health_timeout(Duration::from_millis(200));
        assert!(!backend.is_alive());
    }

    #[test]
    fn test_fake_backend_sequence() {
        let backend = FakeBackend::new(vec![
            Ok("one".to_string()),
            Err(BackendError::Timeout(30)),
            Ok("last".to_string()),
        ]);
        let t = Duration::from_secs(1);
        assert_eq!(backend.invoke("a", t), Ok("one".to_string()));
        assert_eq!(backend.invoke("b", t), Err(BackendError::Timeout(30)));
        assert_eq!(backend.invoke("c", t), Ok("last".to_string()));
        assert_eq!(backend.invoke("d", t), Ok("last".to_string()));
        assert_eq!(backend.call_count(), 4);
        assert_eq!(backend.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_fake_backend_unreachable() {
        let backend = FakeBackend::unreachable();
        assert!(!backend.is_alive());
        assert_eq!(backend.call_count(), 0);
    }
}
