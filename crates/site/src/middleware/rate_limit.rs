//! Rate limiting for form posts using governor and `tower_governor`.
//!
//! - `login_rate_limiter`: admin login attempts (~10/min per IP)
//! - `contact_rate_limiter`: contact form submissions (~4/min per IP)
//!
//! Clients are keyed by the socket peer address. Proxy headers are only
//! read when `PORTFOLIO_TRUST_PROXY_HEADERS` is set.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

/// Proxy headers consulted for the client address, most trusted first.
const CLIENT_IP_HEADERS: &[&str] = &["cf-connecting-ip", "x-real-ip", "fly-client-ip"];

/// Key extractor for the client address.
///
/// With `trust_proxy_headers` it prefers proxy-supplied addresses and falls
/// back to the socket peer address; without it only the peer address counts.
#[derive(Debug, Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    #[must_use]
    pub const fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }

    fn from_headers(headers: &HeaderMap) -> Option<IpAddr> {
        let from_header = CLIENT_IP_HEADERS.iter().find_map(|name| {
            headers
                .get(*name)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        });

        // First hop of X-Forwarded-For
        from_header.or_else(|| {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.split(',').next())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = Self::from_headers(req.headers())
        {
            return Ok(ip);
        }

        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

fn rate_limiter(
    key_extractor: ClientIpKeyExtractor,
    replenish_seconds: u64,
    burst: u32,
) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(key_extractor)
        .per_second(replenish_seconds)
        .burst_size(burst)
        .finish()
        .expect("rate limiter config with non-zero period and burst is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Admin login: one attempt replenished every 6 seconds, burst of 5.
///
/// # Panics
///
/// Does not panic: the period and burst are fixed non-zero values.
#[must_use]
pub fn login_rate_limiter(key_extractor: ClientIpKeyExtractor) -> RateLimiterLayer {
    rate_limiter(key_extractor, 6, 5)
}

/// Contact form: one submission replenished every 15 seconds, burst of 3.
///
/// # Panics
///
/// Does not panic: the period and burst are fixed non-zero values.
#[must_use]
pub fn contact_rate_limiter(key_extractor: ClientIpKeyExtractor) -> RateLimiterLayer {
    rate_limiter(key_extractor, 15, 3)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    const BEHIND_PROXY: ClientIpKeyExtractor = ClientIpKeyExtractor::new(true);
    const DIRECT: ClientIpKeyExtractor = ClientIpKeyExtractor::new(false);

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    fn with_peer(mut req: Request<()>, peer: &str) -> Request<()> {
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        req
    }

    #[test]
    fn test_prefers_cloudflare_header() {
        let req = request(&[
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("cf-connecting-ip", "203.0.113.9"),
        ]);
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("203.0.113.9"));
    }

    #[test]
    fn test_uses_first_forwarded_hop() {
        let req = request(&[("x-forwarded-for", "198.51.100.4, 10.0.0.2")]);
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("198.51.100.4"));
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let req = with_peer(request(&[("x-real-ip", "garbage")]), "192.0.2.1:5555");
        assert_eq!(BEHIND_PROXY.extract(&req).unwrap(), ip("192.0.2.1"));
    }

    #[test]
    fn test_direct_mode_ignores_client_supplied_headers() {
        let req = with_peer(
            request(&[
                ("cf-connecting-ip", "203.0.113.9"),
                ("x-forwarded-for", "198.51.100.4"),
            ]),
            "192.0.2.1:5555",
        );
        assert_eq!(DIRECT.extract(&req).unwrap(), ip("192.0.2.1"));

        let spoofed = request(&[("x-forwarded-for", "198.51.100.4")]);
        assert!(DIRECT.extract(&spoofed).is_err());
    }

    #[test]
    fn test_no_address_is_an_error() {
        assert!(BEHIND_PROXY.extract(&request(&[])).is_err());
        assert!(DIRECT.extract(&request(&[])).is_err());
    }
}
