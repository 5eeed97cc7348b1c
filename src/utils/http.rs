//! The http module helper functions useful for serving http content
use actix_web::http::header::HeaderMap;
use actix_web::HttpRequest;

/// Forwarded-for header set by proxies in front of the service.
const X_FORWARDED_FOR: &str = "X-Forwarded-For";

/// `client_ip` returns the address recorded on article revisions.
/// The last entry of `X-Forwarded-For` wins, since that is the one appended
/// by the proxy closest to us. Without the header, the peer address is used.
#[must_use]
pub fn client_ip(req: &HttpRequest) -> Option<String> {
    forwarded_for(req.headers()).or_else(|| req.peer_addr().map(|addr| addr.ip().to_string()))
}

/// Last non-empty entry of the `X-Forwarded-For` header.
fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next_back())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
