// src/checker/http.rs
// =============================================================================
// This module checks if links are alive by making HTTP requests.
//
// Key functionality:
// - The `Probe` trait: "send one request to this URL, tell me the status"
// - HttpProbe: the real implementation, built on reqwest
// - validate_link: turns a probe outcome into a validated LinkRecord
// - validate_links: probes a whole batch concurrently, keeping input order
//
// The probe is passed in rather than created here. Tests hand in a fake probe
// and never touch the network; the binary hands in an HttpProbe.
//
// Every link gets exactly one request. There are no retries, and a failed
// request never stops the other links from being checked: the failure is
// written into that link's record as `error`.
//
// Rust concepts:
// - async-trait: Async methods on a trait we can use as `&dyn Probe`
// - join_all / buffered: Run many futures concurrently, results in order
// =============================================================================

use crate::checker::LinkRecord;
use crate::error::{ProbeError, Result};
use async_trait::async_trait;
use futures::future::join_all;
use futures::stream::{self, StreamExt}; // StreamExt gives us .buffered()
use reqwest::Client;
use std::error::Error as _;
use std::time::Duration;
use tracing::{debug, warn};

/// Sends a single request to a URL and reports the status code it got back.
#[async_trait]
pub trait Probe: Send + Sync {
    /// `Ok(status)` for any HTTP response, whatever the code.
    /// `Err` only when no response arrived at all.
    async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeError>;
}

/// Which HTTP method the probe uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProbeMethod {
    /// HEAD: headers only, no body download
    #[default]
    Head,
    /// GET: for servers that refuse HEAD
    Get,
}

/// Settings for [`HttpProbe`].
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Per-request timeout. `None` leaves it to reqwest (no timeout).
    pub timeout: Option<Duration>,
    /// Redirects to follow before giving up. 0 returns the 3xx itself.
    pub max_redirects: usize,
    pub method: ProbeMethod,
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Some(Duration::from_secs(10)),
            max_redirects: 5,
            method: ProbeMethod::Head,
            user_agent: concat!("md-links/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// The reqwest-backed [`Probe`].
///
/// One client is shared by every probe so connections get pooled.
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: Client,
    method: ProbeMethod,
}

impl HttpProbe {
    pub fn new(config: &ProbeConfig) -> Result<Self> {
        let redirect = if config.max_redirects == 0 {
            reqwest::redirect::Policy::none()
        } else {
            reqwest::redirect::Policy::limited(config.max_redirects)
        };

        let mut builder = Client::builder()
            .redirect(redirect)
            .user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            method: config.method,
        })
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeError> {
        let request = match self.method {
            ProbeMethod::Head => self.client.head(url),
            ProbeMethod::Get => self.client.get(url),
        };

        match request.send().await {
            Ok(response) => Ok(response.status().as_u16()),
            Err(e) => Err(categorize_error(&e)),
        }
    }
}

// Categorizes different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure
// - SSL certificate issues
// - Too many redirects
// - A URL reqwest cannot even build a request for (relative, mailto:, ...)
fn categorize_error(error: &reqwest::Error) -> ProbeError {
    // The interesting detail (dns, certificate) is in the nested source
    // errors. The top-level message carries the URL, so it is left out.
    let causes = source_chain_text(error).to_lowercase();

    if error.is_timeout() {
        ProbeError::Timeout
    } else if error.is_redirect() {
        ProbeError::TooManyRedirects
    } else if error.is_builder() {
        let reason = error
            .source()
            .map_or_else(|| error.to_string(), ToString::to_string);
        ProbeError::InvalidUrl(reason)
    } else if causes.contains("dns") {
        // hyper reports resolver failures as connect errors too
        ProbeError::Dns
    } else if causes.contains("certificate") || causes.contains("tls") || causes.contains("ssl") {
        ProbeError::Tls
    } else if error.is_connect() {
        ProbeError::Connect
    } else {
        ProbeError::Other(error.to_string())
    }
}

fn source_chain_text(error: &reqwest::Error) -> String {
    let mut text = String::new();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

/// Probes one link and returns it with `valid` and `status` or `error` set.
///
/// Never fails: a probe error becomes `valid: false` plus its message.
pub async fn validate_link(probe: &dyn Probe, link: LinkRecord) -> LinkRecord {
    match probe.probe(&link.url).await {
        Ok(status) => {
            debug!(url = %link.url, status, "probe answered");
            link.reached(status)
        }
        Err(e) => {
            warn!(url = %link.url, error = %e, "probe failed");
            link.failed(e.to_string())
        }
    }
}

/// Validates a batch of links concurrently.
///
/// With `max_concurrency: None` every probe is started at once; `Some(n)`
/// keeps at most `n` in flight. Either way `result[i]` belongs to `links[i]`.
pub async fn validate_links(
    probe: &dyn Probe,
    links: Vec<LinkRecord>,
    max_concurrency: Option<usize>,
) -> Vec<LinkRecord> {
    let checks = links.into_iter().map(|link| validate_link(probe, link));

    match max_concurrency {
        None => join_all(checks).await,
        // .buffered (unlike .buffer_unordered) yields results in input order
        Some(limit) => stream::iter(checks).buffered(limit.max(1)).collect().await,
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a trait for the probe?
//    - validate_link only needs "give me a status for this URL"
//    - Taking `&dyn Probe` means tests can pass a fake that answers
//      instantly, with no global HTTP client to swap out
//
// 2. Why #[async_trait]?
//    - It lets a trait have `async fn` and still be used as `dyn Probe`
//    - Under the hood it boxes the returned future
//
// 3. join_all vs buffered vs buffer_unordered
//    - join_all: start everything, results in input order
//    - buffered(n): at most n at a time, results in input order
//    - buffer_unordered(n): at most n at a time, results in completion order
//    - We never want completion order: result[i] must match links[i]
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const FILE: &str = "./files/test.md";

    /// Answers from a fixed table; later URLs answer sooner so completion
    /// order is the reverse of input order.
    struct FakeProbe {
        answers: HashMap<String, std::result::Result<u16, ProbeError>>,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl FakeProbe {
        fn new(answers: Vec<(&str, std::result::Result<u16, ProbeError>)>) -> Self {
            Self {
                answers: answers
                    .into_iter()
                    .map(|(url, answer)| (url.to_string(), answer))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                max_in_flight: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Probe for FakeProbe {
        async fn probe(&self, url: &str) -> std::result::Result<u16, ProbeError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = 50_u64.saturating_sub(url.len() as u64);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.answers
                .get(url)
                .cloned()
                .unwrap_or_else(|| Err(ProbeError::Other("unknown url".into())))
        }
    }

    fn link(text: &str, url: &str) -> LinkRecord {
        LinkRecord::new(text, url, FILE)
    }

    #[tokio::test]
    async fn test_validate_link_with_response() {
        let probe = FakeProbe::new(vec![("https://www.linkedin.com/feed/", Ok(200))]);
        let result = validate_link(&probe, link("Linkedin", "https://www.linkedin.com/feed/")).await;

        assert_eq!(
            result,
            LinkRecord {
                valid: Some(true),
                status: Some(200),
                ..link("Linkedin", "https://www.linkedin.com/feed/")
            }
        );
    }

    #[tokio::test]
    async fn test_validate_link_network_error() {
        let probe = FakeProbe::new(vec![(
            "https://invalidurl.example.com",
            Err(ProbeError::Other("Network error".into())),
        )]);
        let result = validate_link(&probe, link("test 2", "https://invalidurl.example.com")).await;

        assert_eq!(result.valid, Some(false));
        assert_eq!(result.error.as_deref(), Some("Network error"));
        assert_eq!(result.status, None);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "text": "test 2",
                "url": "https://invalidurl.example.com",
                "file": FILE,
                "valid": false,
                "error": "Network error",
            })
        );
    }

    #[tokio::test]
    async fn test_error_status_is_still_valid() {
        let probe = FakeProbe::new(vec![("https://x.org/gone", Ok(404))]);
        let result = validate_link(&probe, link("gone", "https://x.org/gone")).await;
        assert_eq!(result.valid, Some(true));
        assert_eq!(result.status, Some(404));
        assert!(result.is_broken());
    }

    #[tokio::test]
    async fn test_validate_links_keeps_input_order() {
        let urls = ["https://a.io", "https://bb.io/page", "https://ccc.io/a/much/longer/path"];
        let probe = FakeProbe::new(vec![
            (urls[0], Ok(200)),
            (urls[1], Err(ProbeError::Connect)),
            (urls[2], Ok(500)),
        ]);
        let links = urls.iter().map(|u| link("x", u)).collect();

        let results = validate_links(&probe, links, None).await;

        let got: Vec<_> = results.iter().map(|r| (r.url.as_str(), r.status)).collect();
        assert_eq!(
            got,
            vec![(urls[0], Some(200)), (urls[1], None), (urls[2], Some(500))]
        );
        assert_eq!(results[1].error.as_deref(), Some("Connection failed"));
        // nothing throttled them
        assert_eq!(probe.max_in_flight.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_validate_links_respects_concurrency_cap() {
        let urls: Vec<String> = (0..8).map(|i| format!("https://site{i}.dev/")).collect();
        let probe = FakeProbe::new(urls.iter().map(|u| (u.as_str(), Ok(200))).collect());
        let links = urls.iter().map(|u| link("x", u)).collect();

        let results = validate_links(&probe, links, Some(2)).await;

        assert_eq!(results.len(), 8);
        assert!(results.iter().zip(&urls).all(|(r, u)| &r.url == u));
        assert!(probe.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_validate_links_empty_batch() {
        let probe = FakeProbe::new(vec![]);
        assert!(validate_links(&probe, Vec::new(), None).await.is_empty());
    }

    #[tokio::test]
    async fn test_http_probe_reports_status_codes() {
        let mock_server = MockServer::start().await;

        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        Mock::given(method("HEAD"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let probe = HttpProbe::new(&ProbeConfig::default()).unwrap();
        let base = mock_server.uri();

        assert_eq!(probe.probe(&format!("{base}/ok")).await, Ok(200));
        assert_eq!(probe.probe(&format!("{base}/missing")).await, Ok(404));
    }

    #[tokio::test]
    async fn test_http_probe_get_method() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = ProbeConfig {
            method: ProbeMethod::Get,
            ..ProbeConfig::default()
        };
        let probe = HttpProbe::new(&config).unwrap();

        assert_eq!(probe.probe(&format!("{}/page", mock_server.uri())).await, Ok(204));
    }

    #[tokio::test]
    async fn test_http_probe_timeout() {
        let mock_server = MockServer::start().await;

        Mock::given(path("/slow"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let config = ProbeConfig {
            timeout: Some(Duration::from_millis(100)),
            ..ProbeConfig::default()
        };
        let probe = HttpProbe::new(&config).unwrap();

        assert_eq!(
            probe.probe(&format!("{}/slow", mock_server.uri())).await,
            Err(ProbeError::Timeout)
        );
    }

    #[tokio::test]
    async fn test_http_probe_redirect_loop() {
        let mock_server = MockServer::start().await;
        let looping = format!("{}/loop", mock_server.uri());

        Mock::given(path("/loop"))
            .respond_with(ResponseTemplate::new(302).insert_header("location", looping.as_str()))
            .mount(&mock_server)
            .await;

        let config = ProbeConfig {
            max_redirects: 2,
            ..ProbeConfig::default()
        };
        let probe = HttpProbe::new(&config).unwrap();

        assert_eq!(probe.probe(&looping).await, Err(ProbeError::TooManyRedirects));
    }

    #[tokio::test]
    async fn test_http_probe_without_redirects_returns_3xx() {
        let mock_server = MockServer::start().await;

        Mock::given(path("/moved"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
            .mount(&mock_server)
            .await;

        let config = ProbeConfig {
            max_redirects: 0,
            ..ProbeConfig::default()
        };
        let probe = HttpProbe::new(&config).unwrap();

        assert_eq!(probe.probe(&format!("{}/moved", mock_server.uri())).await, Ok(301));
    }

    #[tokio::test]
    async fn test_http_probe_connection_refused() {
        // grab a free port, then close it so nothing is listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = HttpProbe::new(&ProbeConfig::default()).unwrap();

        assert_eq!(
            probe.probe(&format!("http://127.0.0.1:{port}/")).await,
            Err(ProbeError::Connect)
        );
    }

    #[tokio::test]
    async fn test_connection_refused_ignores_url_spelling() {
        // "ssl" and "dns" in the URL must not decide the category
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let probe = HttpProbe::new(&ProbeConfig::default()).unwrap();

        for route in ["openssl-docs", "dnsimple", "tls-certificate-guide"] {
            assert_eq!(
                probe.probe(&format!("http://127.0.0.1:{port}/{route}")).await,
                Err(ProbeError::Connect),
                "route {route}"
            );
        }
    }

    #[tokio::test]
    async fn test_http_probe_relative_url() {
        let probe = HttpProbe::new(&ProbeConfig::default()).unwrap();
        let result = probe.probe("./docs/README.md").await;
        assert!(matches!(result, Err(ProbeError::InvalidUrl(_))), "got {result:?}");
    }
}
