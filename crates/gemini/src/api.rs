//! REST client for the Gemini HTTP endpoints.
//!
//! Wraps content generation, long-running video submission, operation
//! status lookup and generated-file download using [`reqwest`]. The API key
//! comes from the [`ProviderContext`] passed into every call.

use crate::config::ProviderContext;
use crate::error::{classify_api_error, ProviderError};
use crate::messages::{GenerateContentRequest, GenerateContentResponse, Operation, PredictVideoRequest};
use scriptboard_core::media::MediaBlob;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Content type assumed for downloads that do not declare one.
const DEFAULT_VIDEO_MIME_TYPE: &str = "video/mp4";

/// HTTP client for one Gemini API base URL.
#[derive(Debug, Clone)]
pub struct GeminiApi {
    client: reqwest::Client,
    api_url: String,
}

impl GeminiApi {
    /// Create an API client reusing an existing [`reqwest::Client`].
    ///
    /// * `api_url` - Base HTTP URL, e.g. `https://generativelanguage.googleapis.com`.
    pub fn with_client(client: reqwest::Client, api_url: String) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run a `generateContent` request against `model`.
    pub async fn generate_content(
        &self,
        ctx: &ProviderContext,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        tracing::debug!(model, "Sending generateContent request");

        let response = self
            .client
            .post(format!("{}/v1beta/models/{model}:generateContent", self.api_url))
            .header(API_KEY_HEADER, ctx.api_key())
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Submit a video generation job. Returns the operation handle.
    pub async fn predict_video(
        &self,
        ctx: &ProviderContext,
        model: &str,
        request: &PredictVideoRequest,
    ) -> Result<Operation, ProviderError> {
        tracing::debug!(model, "Submitting video generation");

        let response = self
            .client
            .post(format!("{}/v1beta/models/{model}:predictLongRunning", self.api_url))
            .header(API_KEY_HEADER, ctx.api_key())
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the current state of a long-running operation.
    pub async fn get_operation(
        &self,
        ctx: &ProviderContext,
        name: &str,
    ) -> Result<Operation, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1beta/{}", self.api_url, name.trim_start_matches('/')))
            .header(API_KEY_HEADER, ctx.api_key())
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Download a generated file.
    ///
    /// Download links are signed per key, so the active key is appended as
    /// the `key` query parameter.
    pub async fn download(
        &self,
        ctx: &ProviderContext,
        uri: &str,
    ) -> Result<MediaBlob, ProviderError> {
        let url = signed_download_url(uri, ctx)?;

        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_VIDEO_MIME_TYPE)
            .to_string();
        let bytes = response.bytes().await?;

        tracing::debug!(bytes = bytes.len(), %mime_type, "Downloaded generated file");
        Ok(MediaBlob::new(mime_type, bytes.to_vec()))
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a classified [`ProviderError`]
    /// built from the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            let err = classify_api_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %err, "Provider request failed");
            return Err(err);
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ProviderError::Parse(e.to_string()))
    }
}

/// Append the API key to a download link.
pub fn signed_download_url(
    uri: &str,
    ctx: &ProviderContext,
) -> Result<reqwest::Url, ProviderError> {
    let mut url = reqwest::Url::parse(uri)
        .map_err(|e| ProviderError::Parse(format!("Invalid download link '{uri}': {e}")))?;
    url.query_pairs_mut().append_pair("key", ctx.api_key());
    Ok(url)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn ctx() -> ProviderContext {
        ProviderContext::new("test-key").unwrap()
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = GeminiApi::with_client(reqwest::Client::new(), "https://example.com/".into());
        assert_eq!(api.api_url, "https://example.com");
    }

    #[test]
    fn download_url_keeps_existing_query() {
        let url = signed_download_url("https://files.example/v1beta/files/abc:download?alt=media", &ctx())
            .unwrap();
        assert_eq!(url.query(), Some("alt=media&key=test-key"));
    }

    #[test]
    fn download_url_without_query_gets_key() {
        let url = signed_download_url("https://files.example/video.mp4", &ctx()).unwrap();
        assert_eq!(url.query(), Some("key=test-key"));
    }

    #[test]
    fn invalid_download_link_is_parse_error() {
        assert_matches!(signed_download_url("not a url", &ctx()), Err(ProviderError::Parse(_)));
    }
}
