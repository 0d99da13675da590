//! WordPress publishing sink using the JWT authentication plugin.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

use super::publish::{ContentPublisher, PublishReceipt};
use super::store::ContentRecord;
use crate::errors::{truncate_body, SinkError};

const TOKEN_PATH: &str = "/wp-json/jwt-auth/v1/token";
const POSTS_PATH: &str = "/wp-json/wp/v2/posts";

/// A [`ContentPublisher`] that posts to a WordPress site.
///
/// Each publish exchanges the credentials for a JWT, then creates the post
/// with that token.
#[derive(Clone)]
pub struct WordPressPublisher {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for WordPressPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressPublisher")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl WordPressPublisher {
    /// Creates a publisher for the site at `url`.
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, SinkError> {
        let base_url = url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SinkError::NotConfigured("WORDPRESS_URL is empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            username: username.into(),
            password: password.into(),
        })
    }

    async fn authenticate(&self) -> Result<String, SinkError> {
        let response = self
            .client
            .post(format!("{}{TOKEN_PATH}", self.base_url))
            .form(&[("username", self.username.as_str()), ("password", self.password.as_str())])
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(SinkError::Auth(format!(
                "token request returned {}: {}",
                status.as_u16(),
                truncate_body(&body)
            )));
        }
        parse_token(&body)
    }
}

#[async_trait]
impl ContentPublisher for WordPressPublisher {
    async fn publish(&self, record: &ContentRecord) -> Result<PublishReceipt, SinkError> {
        let token = self.authenticate().await?;

        let response = self
            .client
            .post(format!("{}{POSTS_PATH}", self.base_url))
            .bearer_auth(token)
            .json(&post_body(record))
            .send()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        if !status.is_success() {
            return Err(SinkError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let receipt = parse_post(&body)?;
        tracing::info!(url = %receipt.url, "Published post to WordPress");
        Ok(receipt)
    }
}

fn post_body(record: &ContentRecord) -> Value {
    json!({
        "title": record.title,
        "content": record.content,
        "excerpt": record.meta_description,
        "status": "publish"
    })
}

fn parse_token(body: &str) -> Result<String, SinkError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| SinkError::MalformedResponse(e.to_string()))?;
    json["token"]
        .as_str()
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(|| SinkError::Auth("token response has no token".to_string()))
}

fn parse_post(body: &str) -> Result<PublishReceipt, SinkError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| SinkError::MalformedResponse(e.to_string()))?;
    json["link"]
        .as_str()
        .map(|url| PublishReceipt { url: url.to_string() })
        .ok_or_else(|| SinkError::MalformedResponse("created post has no link".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BlogRequest, FinalContent};

    #[test]
    fn test_new_requires_url() {
        assert!(WordPressPublisher::new("", "u", "p").is_err());
        let publisher = WordPressPublisher::new("https://blog.example.com/", "u", "secret").unwrap();
        assert_eq!(publisher.base_url, "https://blog.example.com");
        assert!(!format!("{publisher:?}").contains("secret"));
    }

    #[test]
    fn test_parse_token() {
        assert_eq!(parse_token(r#"{"token": "abc"}"#).unwrap(), "abc");
        assert!(matches!(parse_token(r#"{"code": "bad"}"#), Err(SinkError::Auth(_))));
        assert!(matches!(parse_token("<html>"), Err(SinkError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_post() {
        let receipt = parse_post(r#"{"id": 9, "link": "https://blog.example.com/?p=9"}"#).unwrap();
        assert_eq!(receipt.url, "https://blog.example.com/?p=9");
        assert!(parse_post(r#"{"id": 9}"#).is_err());
    }

    #[test]
    fn test_post_body() {
        let content = FinalContent {
            title: "T".to_string(),
            content: "Body".to_string(),
            meta_description: "Meta".to_string(),
            headings: Vec::new(),
            word_count: 1,
            seo_score: 0.1,
        };
        let record = ContentRecord::new(&content, &BlogRequest::new("u", "T", ["k"]));
        let body = post_body(&record);
        assert_eq!(body["title"], "T");
        assert_eq!(body["excerpt"], "Meta");
        assert_eq!(body["status"], "publish");
    }
}
