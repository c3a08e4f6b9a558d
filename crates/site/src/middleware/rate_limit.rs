//! Rate limiting middleware using governor and `tower_governor`.
//!
//! - `login_rate_limiter`: credential checks (~10/min per IP)
//! - `contact_rate_limiter`: contact form relay (~4/min per IP)

use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;

use axum::http::Request;
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// IP Key Extractor for Fly.io
// =============================================================================

/// Key extractor reading the client IP from proxy headers.
///
/// Checks `Fly-Client-IP`, then the first hop of `X-Forwarded-For`, then
/// `X-Real-IP`. Requests with none of these share a single bucket keyed by
/// the unspecified address, so a misconfigured proxy throttles instead of
/// failing every request.
#[derive(Clone, Copy)]
pub struct ProxyIpKeyExtractor;

fn header_ip<T>(req: &Request<T>, name: &str) -> Option<IpAddr> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
}

impl tower_governor::key_extractor::KeyExtractor for ProxyIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        Ok(["fly-client-ip", "x-forwarded-for", "x-real-ip"]
            .iter()
            .find_map(|name| header_ip(req, name))
            .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)))
    }
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ProxyIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for login: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn login_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(6)
        .burst_size(5)
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

/// Create rate limiter for the contact relay: ~4 requests per minute per IP.
///
/// Configuration: 1 request every 15 seconds (replenish), burst of 3.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn contact_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ProxyIpKeyExtractor)
        .per_second(15)
        .burst_size(3)
        .finish()
        .expect("rate limiter config with per_second(15) and burst_size(3) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request(headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri("/contact");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap_or_default()
    }

    #[test]
    fn test_fly_header_wins() {
        let req = request(&[
            ("fly-client-ip", "203.0.113.7"),
            ("x-forwarded-for", "198.51.100.1"),
        ]);
        let ip = ProxyIpKeyExtractor.extract(&req).ok();
        assert_eq!(ip, "203.0.113.7".parse().ok());
    }

    #[test]
    fn test_first_forwarded_hop() {
        let req = request(&[("x-forwarded-for", "198.51.100.1, 10.0.0.1")]);
        let ip = ProxyIpKeyExtractor.extract(&req).ok();
        assert_eq!(ip, "198.51.100.1".parse().ok());
    }

    #[test]
    fn test_missing_headers_share_a_bucket() {
        let ip = ProxyIpKeyExtractor.extract(&request(&[])).ok();
        assert_eq!(ip, Some(IpAddr::V4(Ipv4Addr::UNSPECIFIED)));
    }
}
