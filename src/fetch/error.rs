use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Response from {url} is not a valid dataset")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("No base URL configured, cannot resolve '{0}'")]
    NoBaseUrl(String),
}
