use super::CmsClient;
use crate::config::CmsConfig;
use crate::error::{CmsError, Result};
use crate::types::{ApiErrorBody, Page, QueryRequest, QueryResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// HTTP client for a Notion-style database API.
#[derive(Clone)]
pub struct NotionClient {
    http: Client,
    api_base: String,
    api_version: String,
    token: Option<String>,
}

impl NotionClient {
    pub fn new(config: &CmsConfig, token: Option<String>) -> Self {
        Self {
            http: Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_version: config.api_version.clone(),
            token,
        }
    }

    pub fn query_url(&self, data_source_id: &str) -> String {
        format!("{}/databases/{}/query", self.api_base, data_source_id)
    }
}

/// Turn a non-2xx response into an API error, keeping the CMS error code when
/// the body carries one.
pub(crate) fn api_error(status: StatusCode, body: &str) -> CmsError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = if parsed.code.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown_error")
            .to_lowercase()
            .replace(' ', "_")
    } else {
        parsed.code
    };
    let message = if parsed.message.is_empty() {
        body.chars().take(200).collect()
    } else {
        parsed.message
    };
    CmsError::api(status.as_u16(), code, message)
}

#[async_trait]
impl CmsClient for NotionClient {
    async fn query_collection(&self, data_source_id: &str, query: &QueryRequest) -> Result<Vec<Page>> {
        let url = self.query_url(data_source_id);
        debug!(data_source_id, filtered = query.filter.is_some(), "Querying CMS collection");

        let mut request = self
            .http
            .post(&url)
            .header("Notion-Version", &self.api_version)
            .json(query);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        let parsed: QueryResponse = serde_json::from_str(&body)?;
        if parsed.has_more {
            debug!(data_source_id, "Source has more results; only the first page is read");
        }
        Ok(parsed.results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_query_url_without_double_slash() {
        let config = CmsConfig {
            api_base: "https://api.example.com/v1/".to_string(),
            ..CmsConfig::default()
        };
        let client = NotionClient::new(&config, None);
        assert_eq!(client.query_url("abc123"), "https://api.example.com/v1/databases/abc123/query");
    }

    #[test]
    fn maps_error_body_to_api_error() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"Could not find property with name or id: Published."}"#;
        let err = api_error(StatusCode::BAD_REQUEST, body);
        assert!(err.is_validation_error());
        assert!(err.to_string().contains("Published"));
    }

    #[test]
    fn falls_back_to_status_reason_for_opaque_errors() {
        match api_error(StatusCode::BAD_GATEWAY, "<html>upstream down</html>") {
            CmsError::Api { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, "bad_gateway");
                assert_eq!(message, "<html>upstream down</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
