use std::time::Duration;

use reqwest::{Client, StatusCode, Url};

use crate::error::{PipelineError, PipelineResult};

/// Fetches a remote audio resource into a byte buffer.
#[allow(async_fn_in_trait)]
pub trait MediaResolver {
    async fn fetch(&self, url: &str) -> PipelineResult<Vec<u8>>;
}

/// HTTP media resolver with a bounded per-request timeout.
pub struct HttpMediaResolver {
    client: Client,
}

impl HttpMediaResolver {
    pub fn new(timeout: Duration) -> PipelineResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::transport("media", e))?;
        Ok(Self { client })
    }
}

impl MediaResolver for HttpMediaResolver {
    async fn fetch(&self, url: &str) -> PipelineResult<Vec<u8>> {
        let parsed = Url::parse(url)
            .map_err(|_| PipelineError::BadRequest(format!("malformed url: {url}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(PipelineError::BadRequest(format!(
                "unsupported url scheme: {}",
                parsed.scheme()
            )));
        }

        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| PipelineError::transport("media", e))?;

        match response.status() {
            status if status.is_success() => {
                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| PipelineError::transport("media", e))?;
                Ok(bytes.to_vec())
            }
            StatusCode::NOT_FOUND => Err(PipelineError::NotFound(url.to_string())),
            status => {
                let detail = response.text().await.unwrap_or_default();
                Err(PipelineError::ExternalService {
                    service: "media",
                    status: status.as_u16(),
                    detail,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_malformed_url_is_bad_request() {
        let resolver = HttpMediaResolver::new(Duration::from_secs(5)).unwrap();
        let err = resolver.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, PipelineError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_non_http_scheme_is_bad_request() {
        let resolver = HttpMediaResolver::new(Duration::from_secs(5)).unwrap();
        let err = resolver.fetch("ftp://example.com/call.mp3").await.unwrap_err();
        assert!(matches!(err, PipelineError::BadRequest(_)));
    }
}
