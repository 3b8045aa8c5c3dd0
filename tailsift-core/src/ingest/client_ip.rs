//! Client address resolution and normalization.
//!
//! The log line carries several candidate addresses: headers injected by an
//! edge CDN or a reverse proxy, the address the web server itself decided on,
//! and the raw TCP peer. They are consulted in a fixed priority order.

use crate::ingest::parse::RawRequest;
use std::net::IpAddr;

/// Where a candidate client address comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpSource {
    /// A header holding a single address.
    Header(&'static str),
    /// A comma separated proxy chain; only the left-most entry is used.
    ForwardedFor(&'static str),
    /// The address the server resolved after its own trusted-proxy handling.
    ClientIp,
    /// The TCP peer address.
    RemoteIp,
}

/// First non-empty source wins.
pub const CLIENT_IP_PRIORITY: &[IpSource] = &[
    IpSource::Header("Cf-Connecting-Ip"),
    IpSource::Header("X-Real-Ip"),
    IpSource::ForwardedFor("X-Forwarded-For"),
    IpSource::ClientIp,
    IpSource::RemoteIp,
];

pub(crate) fn resolve_client_ip(request: &RawRequest) -> String {
    CLIENT_IP_PRIORITY
        .iter()
        .find_map(|source| {
            let candidate = match source {
                IpSource::Header(name) => request.header(name).map(str::trim),
                IpSource::ForwardedFor(name) => request
                    .header(name)
                    .and_then(|chain| chain.split(',').next())
                    .map(str::trim),
                IpSource::ClientIp => request.client_ip.as_deref().map(str::trim),
                IpSource::RemoteIp => request.remote_ip.as_deref().map(str::trim),
            };
            candidate.filter(|ip| !ip.is_empty())
        })
        .map(str::to_string)
        .unwrap_or_default()
}

/// Reduces an address as it appears in logs to its canonical form.
///
/// Strips a port (`1.2.3.4:443`, `[::1]:443`), brackets and IPv6 zone ids.
/// IPv4-mapped IPv6 addresses (`::ffff:1.2.3.4`) come back as plain IPv4.
/// Anything that does not parse as an address is returned trimmed but
/// otherwise unchanged.
pub fn normalize_ip(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Ok(ip) = trimmed.parse::<IpAddr>() {
        return ip.to_canonical().to_string();
    }

    let candidate = if let Some(rest) = trimmed.strip_prefix('[') {
        rest.split(']').next().unwrap_or(rest)
    } else if trimmed.matches(':').count() == 1 {
        trimmed.split(':').next().unwrap_or(trimmed)
    } else {
        trimmed
    };

    let without_zone = candidate.split('%').next().unwrap_or(candidate);

    match without_zone.parse::<IpAddr>() {
        Ok(ip) => ip.to_canonical().to_string(),
        Err(_) => trimmed.to_string(),
    }
}
