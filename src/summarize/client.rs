use crate::config::SummarizerSettings;
use crate::summarize::{Summarizer, SummaryError};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    messages: Vec<ChatMessage<'a>>,
    model: &'a str,
    private: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

/// Summarizer backed by a text-generation HTTP endpoint
///
/// Sends the content as a single user message and returns the response
/// body verbatim.
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    endpoint: String,
    model: String,
}

impl HttpSummarizer {
    pub fn new(settings: &SummarizerSettings) -> Result<Self, SummaryError> {
        let client = Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| SummaryError::Unavailable(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(&self, content: &str) -> Result<String, SummaryError> {
        let request = ChatRequest {
            messages: vec![ChatMessage {
                role: "user",
                content,
            }],
            model: &self.model,
            private: true,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummaryError::Unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SummaryError::RateLimited);
        }
        if !status.is_success() {
            return Err(SummaryError::Unavailable(format!(
                "Request failed with status code {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SummaryError::Unavailable(e.to_string()))
    }
}
