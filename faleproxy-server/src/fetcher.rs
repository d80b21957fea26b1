use async_trait::async_trait;
use faleproxy_http::{HttpClient, HttpError, RequestOpts};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8";

/// Source of page bodies for `POST /fetch`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body as text, whatever the content type.
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError>;
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Result<String, HttpError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        let opts = RequestOpts {
            headers: Some(headers),
            ..Default::default()
        };
        self.get_text(url, opts).await
    }
}
