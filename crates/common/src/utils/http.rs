use crate::error::Error;
use reqwest::Client;
use std::time::Duration;
use tracing::trace;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

/// Make a GET request to the target URL and return the raw response body.
///
/// A single attempt is made: a transport failure or a non-success status is
/// returned as a descriptive [`Error::FetchError`], and nothing is retried.
///
/// ```no_run
/// use crucible_common::utils::http::get_bytes_from_url;
///
/// let url = "https://example.com";
/// let timeout = 5;
/// // get_bytes_from_url(url, timeout).await;
/// ```
pub async fn get_bytes_from_url(url: &str, timeout: u64) -> Result<bytes::Bytes, Error> {
    trace!("GET {}", &url);

    let client = Client::builder()
        .user_agent(APP_USER_AGENT)
        .timeout(Duration::from_secs(timeout))
        .build()
        .map_err(|e| Error::FetchError(format!("failed to build http client: {e}")))?;

    let res = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::FetchError(format!("error fetching '{url}': {e}")))?;
    trace!("GET {}: {:?}", &url, &res.status());

    if !res.status().is_success() {
        return Err(Error::FetchError(format!("error retrieving binary: {}", res.status())));
    }

    res.bytes().await.map_err(|e| Error::FetchError(format!("error reading body: {e}")))
}
