//! Asynchronous HTTP client abstraction.

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;
use futures_util::Stream;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// The minimal streaming interface the verification pipeline needs.
///
/// Implementations handle their own redirect following and map non-success
/// statuses to errors. Tests substitute mock transports through this trait.
pub trait HttpClient: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Open a streaming GET and return the response body as a byte stream.
    fn stream(
        &self,
        url: &str,
    ) -> impl Future<
        Output = std::result::Result<
            BoxStream<'static, std::result::Result<Bytes, Self::Error>>,
            Self::Error,
        >,
    > + Send;
}

/// Production client backed by `reqwest`.
///
/// Cheap to construct; each verification task builds its own instance so
/// concurrent downloads never share connection state.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for ReqwestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for ReqwestClient {
    type Error = reqwest::Error;

    async fn stream(
        &self,
        url: &str,
    ) -> std::result::Result<BoxStream<'static, std::result::Result<Bytes, Self::Error>>, Self::Error>
    {
        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(Box::pin(response.bytes_stream()))
    }
}
