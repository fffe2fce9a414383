//! Client identity extraction

use axum::http::HeaderMap;

/// Get the real client IP address: first X-Forwarded-For entry (the original
/// client when a reverse proxy appends its chain), falling back to the direct
/// connection address.
pub fn real_ip(headers: &HeaderMap, fallback_ip: &str) -> String {
    if let Some(forwarded) = headers.get("x-forwarded-for") {
        if let Ok(ips) = forwarded.to_str() {
            if let Some(first_ip) = ips.split(',').next() {
                let ip = first_ip.trim();
                if !ip.is_empty() {
                    return ip.to_string();
                }
            }
        }
    }

    fallback_ip.to_string()
}

/// Client user-agent, with a sentinel for agents that send none
pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}
