//! Fetch strategies
//!
//! Which requests the gateway intercepts, and which policy each one gets.
//! API-marked URLs go network-first; everything else is cache-first.

use url::Url;

use crate::config::WorkerConfig;
use crate::request::{Method, Request};

/// Policy applied to an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// Serve from cache when present; fetch and store on miss.
    CacheFirst,
    /// Always try the network; fall back to cache on failure.
    NetworkFirst,
}

/// Whether the gateway handles this request at all. Declined requests fall
/// through to the host's default fetch.
pub fn should_intercept(config: &WorkerConfig, request: &Request) -> bool {
    if request.method != Method::Get {
        return false;
    }

    // Browser-extension pseudo-origins and anything else non-http pass through.
    match Url::parse(&request.url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        _ => return false,
    }

    // Analytics and other excluded hosts.
    if config
        .bypass_hosts
        .iter()
        .any(|host| request.url.contains(host.as_str()))
    {
        return false;
    }

    true
}

/// Whether the URL matches one of the configured API markers.
pub fn is_api_request(config: &WorkerConfig, request: &Request) -> bool {
    config
        .api_markers
        .iter()
        .any(|marker| request.url.contains(marker.as_str()))
}

/// Pick the policy for an intercepted request.
pub fn strategy_for(config: &WorkerConfig, request: &Request) -> FetchStrategy {
    if is_api_request(config, request) {
        FetchStrategy::NetworkFirst
    } else {
        FetchStrategy::CacheFirst
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> WorkerConfig {
        WorkerConfig::builder("shelf", "v3", Url::parse("https://shelf.example").unwrap()).build()
    }

    #[test]
    fn test_non_get_not_intercepted() {
        let config = config();
        let request = Request::new(Method::Post, "https://shelf.example/api/inventory");

        assert!(!should_intercept(&config, &request));
    }

    #[test]
    fn test_extension_scheme_not_intercepted() {
        let config = config();
        let request = Request::get("chrome-extension://abcdef/popup.html");

        assert!(!should_intercept(&config, &request));
    }

    #[test]
    fn test_analytics_host_not_intercepted() {
        let config = config();
        let request = Request::get("https://www.google-analytics.com/collect");

        assert!(!should_intercept(&config, &request));
    }

    #[test]
    fn test_plain_get_intercepted() {
        let config = config();
        let request = Request::get("https://shelf.example/index.html");

        assert!(should_intercept(&config, &request));
    }

    #[test]
    fn test_api_routes_network_first() {
        let config = config();

        let api = Request::get("https://shelf.example/api/products");
        assert_eq!(strategy_for(&config, &api), FetchStrategy::NetworkFirst);

        let asset = Request::get("https://shelf.example/styles.css");
        assert_eq!(strategy_for(&config, &asset), FetchStrategy::CacheFirst);
    }

    #[test]
    fn test_custom_api_marker() {
        let config = WorkerConfig::builder(
            "shelf",
            "v3",
            Url::parse("https://shelf.example").unwrap(),
        )
        .api_marker("/dynamic/")
        .build();

        let request = Request::get("https://shelf.example/dynamic/feed");
        assert_eq!(strategy_for(&config, &request), FetchStrategy::NetworkFirst);
    }
}
