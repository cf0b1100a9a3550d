use crate::errors::IngestError;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

pub struct HttpClient {
    client: Client,
    request_id: u64,
    stats: HttpClientStats,
}

#[derive(Default)]
struct HttpClientStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
}

impl HttpClient {
    /// Create a client with the default timeout.
    pub fn new() -> Self {
        Self::with_timeout(Duration::from_secs(30))
    }

    fn with_timeout(timeout: Duration) -> Self {
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            request_id: 0,
            stats: HttpClientStats::default(),
        }
    }

    // Wikipedia rejects requests without a browser-style User-Agent.
    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36",
            ),
        );
        headers
    }

    /// Issue a single GET and return the response body. One attempt
    /// only; a transport error or non-2xx status is returned to the
    /// caller as-is.
    pub async fn get(
        &mut self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<String, IngestError> {
        self.request_id += 1;
        log::debug!("Request {}: GET {}", self.request_id, url);

        let mut request = self.client.get(url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let result: Result<String, IngestError> = async {
            let response = request.send().await?.error_for_status()?;
            Ok(response.text().await?)
        }
        .await;

        match result {
            Ok(body) => {
                self.record_success();
                Ok(body)
            }
            Err(e) => {
                self.record_failure();
                Err(e)
            }
        }
    }

    fn record_success(&mut self) {
        self.stats.total_requests += 1;
        self.stats.successful_requests += 1;
    }

    fn record_failure(&mut self) {
        self.stats.total_requests += 1;
        self.stats.failed_requests += 1;
    }

    /// Print the current statistics (total requests, successes, failures)
    pub fn print_stats(&self) {
        println!(
            "Total Requests: {}, Successful: {}, Failed: {}",
            self.stats.total_requests, self.stats.successful_requests, self.stats.failed_requests
        );
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}
