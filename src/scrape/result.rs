use crate::extract::ExtractedDocument;
use crate::fetch::FetchMethod;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scrape invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeRequest {
    pub url: String,
    #[serde(default)]
    pub prompt: Option<String>,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            prompt: None,
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    /// The prompt, if it has any non-whitespace content
    pub fn prompt(&self) -> Option<&str> {
        self.prompt
            .as_deref()
            .map(str::trim)
            .filter(|prompt| !prompt.is_empty())
    }
}

/// Successful scrape, serialized as one flat object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeResult {
    pub url: String,
    pub method_used: FetchMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub document: ExtractedDocument,
    pub scraped_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract_document;
    use url::Url;

    #[test]
    fn test_prompt_blank_is_absent() {
        assert_eq!(ScrapeRequest::new("https://a.com").prompt(), None);
        assert_eq!(
            ScrapeRequest::new("https://a.com").with_prompt("   ").prompt(),
            None
        );
        assert_eq!(
            ScrapeRequest::new("https://a.com")
                .with_prompt(" Summarize ")
                .prompt(),
            Some("Summarize")
        );
    }

    #[test]
    fn test_request_from_json() {
        let request: ScrapeRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap();
        assert_eq!(request.url, "https://example.com");
        assert_eq!(request.prompt, None);

        assert!(serde_json::from_str::<ScrapeRequest>(r#"{"prompt": "x"}"#).is_err());
    }

    #[test]
    fn test_result_is_flat() {
        let url = Url::parse("https://example.com/").unwrap();
        let result = ScrapeResult {
            url: url.to_string(),
            method_used: FetchMethod::Http,
            summary: None,
            document: extract_document("<title>Flat</title>", &url),
            scraped_at: Utc::now(),
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["methodUsed"], "HTTP");
        assert_eq!(json["title"], "Flat");
        assert!(json["techStack"].is_array());
        assert!(json["scrapedAt"].is_string());
        assert!(json.get("summary").is_none());
        assert!(json.get("document").is_none());
        assert!(json.get("bodyTextLength").is_none());
    }
}
