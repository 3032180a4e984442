use super::error::DownloadError;
use super::types::ChunkRange;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, RANGE};
use std::future::Future;

pub type ByteStream = BoxStream<'static, Result<Bytes, DownloadError>>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadResponse {
    pub status: u16,
    pub content_length: Option<u64>,
}

pub struct RangeResponse {
    pub status: u16,
    /// Raw `Content-Range` header, if the server sent one.
    pub content_range: Option<String>,
    pub body: ByteStream,
}

/// The two HTTP operations the downloader needs.
///
/// Implementations report statuses as-is; deciding what counts as a failure
/// is left to the caller.
pub trait HttpTransport: Send + Sync {
    fn head(&self, url: &str) -> impl Future<Output = Result<HeadResponse, DownloadError>> + Send;

    /// Issues a GET for `range`. Implementations must send `Range: bytes=start-end`.
    fn get_range(
        &self,
        url: &str,
        range: &ChunkRange,
    ) -> impl Future<Output = Result<RangeResponse, DownloadError>> + Send;
}

#[derive(Clone, Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn http_error(url: &str) -> impl FnOnce(reqwest::Error) -> DownloadError {
    let url = url.to_string();
    move |source| DownloadError::Http { url, source }
}

impl HttpTransport for ReqwestTransport {
    async fn head(&self, url: &str) -> Result<HeadResponse, DownloadError> {
        let response = self.client.head(url).send().await.map_err(http_error(url))?;

        // `Response::content_length` reflects the (empty) HEAD body, so read the header.
        let content_length = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok());

        Ok(HeadResponse {
            status: response.status().as_u16(),
            content_length,
        })
    }

    async fn get_range(&self, url: &str, range: &ChunkRange) -> Result<RangeResponse, DownloadError> {
        let mut request = self.client.get(url);
        if let Some(range_header) = range.range_header() {
            request = request.header(RANGE, range_header);
        }

        let response = request.send().await.map_err(http_error(url))?;
        let status = response.status().as_u16();
        let content_range = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);

        let url = url.to_string();
        let body = response
            .bytes_stream()
            .map(move |block| {
                block.map_err(|source| DownloadError::Http {
                    url: url.clone(),
                    source,
                })
            })
            .boxed();

        Ok(RangeResponse {
            status,
            content_range,
            body,
        })
    }
}
