use crate::fetch::error::FetchError;
use crate::types::dataset::Dataset;
use log::{info, warn};
use reqwest::Client;

/// Downloads dataset envelopes (`{from, to, unit, data}`) from a station viewer endpoint.
#[derive(Debug, Clone)]
pub struct DatasetFetcher {
    client: Client,
    base_url: Option<String>,
}

impl Default for DatasetFetcher {
    fn default() -> Self {
        Self::new(None)
    }
}

impl DatasetFetcher {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Joins `path` onto the configured base URL.
    pub fn resolve(&self, path: &str) -> Result<String, FetchError> {
        let base = self
            .base_url
            .as_deref()
            .ok_or_else(|| FetchError::NoBaseUrl(path.to_string()))?;
        Ok(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        ))
    }

    pub async fn fetch_path(&self, path: &str) -> Result<Dataset, FetchError> {
        let url = self.resolve(path)?;
        self.fetch(&url).await
    }

    pub async fn fetch(&self, url: &str) -> Result<Dataset, FetchError> {
        info!("Fetching dataset from {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(match e.status() {
                    Some(status) => FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    },
                    None => FetchError::NetworkRequest(url.to_string(), e),
                });
            }
        };

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        let dataset = Dataset::from_json_slice(&body).map_err(|e| {
            warn!("Could not decode dataset from {}: {}", url, e);
            FetchError::Decode {
                url: url.to_string(),
                source: e,
            }
        })?;
        info!(
            "Fetched {} records ({} buckets) from {}",
            dataset.data.len(),
            dataset.period(),
            url
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::period::BucketPeriod;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serves a single canned HTTP response on a local port and returns its base URL.
    async fn serve_once(status: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 4096];
            let _ = socket.read(&mut request).await;
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_resolve_joins_slashes() {
        let fetcher = DatasetFetcher::new(Some("http://station.local/wsview/".to_string()));
        assert_eq!(
            fetcher.resolve("/aggr/day").unwrap(),
            "http://station.local/wsview/aggr/day"
        );
        assert!(matches!(
            DatasetFetcher::default().resolve("aggr/day"),
            Err(FetchError::NoBaseUrl(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_decodes_envelope() -> Result<(), FetchError> {
        let base = serve_once(
            "200 OK",
            r#"{"from":"2024-03-01","to":"2024-04-01","unit":"day","data":[{"time":"2024-03-02","rain_fall":1.5}]}"#,
        )
        .await;
        let fetcher = DatasetFetcher::new(Some(base));
        let dataset = fetcher.fetch_path("aggr").await?;

        assert_eq!(dataset.period(), BucketPeriod::Day);
        assert_eq!(dataset.data.len(), 1);
        assert_eq!(dataset.data[0].get("rain_fall"), Some(1.5));
        assert!(dataset.to.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn test_http_status_is_reported() {
        let base = serve_once("404 Not Found", "{}").await;
        let err = DatasetFetcher::default()
            .fetch(&format!("{base}/missing"))
            .await
            .unwrap_err();
        match err {
            FetchError::HttpStatus { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_decode_error() {
        let base = serve_once("200 OK", r#"{"unit":"fortnight","data":[]}"#).await;
        let err = DatasetFetcher::default().fetch(&base).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
