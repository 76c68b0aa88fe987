//! Client address extraction from request metadata.

use axum::http::HeaderMap;
use std::net::SocketAddr;

/// Returns the best-effort client address for click analytics.
///
/// When `behind_proxy` is set the first `X-Forwarded-For` entry wins, then
/// `X-Real-IP`; the peer socket address is the fallback. Without a trusted
/// proxy only the peer address is used.
pub fn client_ip(
    headers: &HeaderMap,
    peer: Option<SocketAddr>,
    behind_proxy: bool,
) -> Option<String> {
    if behind_proxy {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty());

        let real_ip = || {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        if let Some(ip) = forwarded.or_else(real_ip) {
            return Some(ip.to_string());
        }
    }

    peer.map(|addr| addr.ip().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer() -> Option<SocketAddr> {
        Some("10.1.2.3:5555".parse().unwrap())
    }

    #[test]
    fn test_forwarded_for_first_entry_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7, 10.0.0.1".parse().unwrap());

        assert_eq!(
            client_ip(&headers, peer(), true).as_deref(),
            Some("203.0.113.7")
        );
    }

    #[test]
    fn test_real_ip_fallback_behind_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", "198.51.100.4".parse().unwrap());

        assert_eq!(
            client_ip(&headers, peer(), true).as_deref(),
            Some("198.51.100.4")
        );
    }

    #[test]
    fn test_headers_ignored_without_proxy() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.7".parse().unwrap());

        assert_eq!(client_ip(&headers, peer(), false).as_deref(), Some("10.1.2.3"));
    }

    #[test]
    fn test_no_source_yields_none() {
        assert!(client_ip(&HeaderMap::new(), None, true).is_none());
    }
}
