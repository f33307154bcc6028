//! Request context: the header-like inputs the panel looks at.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::{HeaderMap, HeaderValue};

/// One input the panel's IP detection reads.
///
/// Variants are declared in resolution precedence order, so the derived
/// `Ord` matches [`SourceField::PRECEDENCE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SourceField {
    ClientIp,
    XForwardedFor,
    ForwardedFor,
    XForwarded,
    Forwarded,
    CfConnectingIp,
    RemoteAddr,
}

impl SourceField {
    /// Order in which the panel picks the caller's address.
    pub const PRECEDENCE: [SourceField; 7] = [
        SourceField::ClientIp,
        SourceField::XForwardedFor,
        SourceField::ForwardedFor,
        SourceField::XForwarded,
        SourceField::Forwarded,
        SourceField::CfConnectingIp,
        SourceField::RemoteAddr,
    ];

    /// Order used when echoing the environment: connection address first.
    pub const DISPLAY_ORDER: [SourceField; 7] = [
        SourceField::RemoteAddr,
        SourceField::ClientIp,
        SourceField::XForwardedFor,
        SourceField::ForwardedFor,
        SourceField::XForwarded,
        SourceField::Forwarded,
        SourceField::CfConnectingIp,
    ];

    /// CGI server variable name, as the panel sees it.
    pub fn server_var(self) -> &'static str {
        match self {
            SourceField::ClientIp => "HTTP_CLIENT_IP",
            SourceField::XForwardedFor => "HTTP_X_FORWARDED_FOR",
            SourceField::ForwardedFor => "HTTP_FORWARDED_FOR",
            SourceField::XForwarded => "HTTP_X_FORWARDED",
            SourceField::Forwarded => "HTTP_FORWARDED",
            SourceField::CfConnectingIp => "HTTP_CF_CONNECTING_IP",
            SourceField::RemoteAddr => "REMOTE_ADDR",
        }
    }

    /// HTTP header carrying this input; `None` for the connection address.
    pub fn header_name(self) -> Option<&'static str> {
        match self {
            SourceField::ClientIp => Some("client-ip"),
            SourceField::XForwardedFor => Some("x-forwarded-for"),
            SourceField::ForwardedFor => Some("forwarded-for"),
            SourceField::XForwarded => Some("x-forwarded"),
            SourceField::Forwarded => Some("forwarded"),
            SourceField::CfConnectingIp => Some("cf-connecting-ip"),
            SourceField::RemoteAddr => None,
        }
    }
}

impl fmt::Display for SourceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.server_var())
    }
}

/// Error for an unrecognised header or server variable name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown IP source '{0}'")]
pub struct UnknownSource(pub String);

impl FromStr for SourceField {
    type Err = UnknownSource;

    /// Accepts either the header name (`X-Forwarded-For`) or the server
    /// variable (`HTTP_X_FORWARDED_FOR`), case-insensitively.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let trimmed = name.trim();
        SourceField::PRECEDENCE
            .into_iter()
            .find(|field| {
                field.server_var().eq_ignore_ascii_case(trimmed)
                    || field
                        .header_name()
                        .is_some_and(|header| header.eq_ignore_ascii_case(trimmed))
            })
            .ok_or_else(|| UnknownSource(name.to_string()))
    }
}

/// Immutable snapshot of the inputs for one diagnosis.
///
/// A field that is absent is "not set"; a field set to the empty string is
/// present but empty, which the resolver skips. Values are raw bytes: header
/// values need not be UTF-8.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    values: BTreeMap<SourceField, Vec<u8>>,
}

impl RequestContext {
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Build from a live HTTP request.
    ///
    /// A repeated header is folded into one value joined with `", "`, as the
    /// web server hands it to the panel.
    pub fn from_headers(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let mut builder = Self::builder();
        for field in SourceField::PRECEDENCE {
            let Some(name) = field.header_name() else {
                continue;
            };
            let values: Vec<&[u8]> = headers
                .get_all(name)
                .iter()
                .map(HeaderValue::as_bytes)
                .collect();
            if !values.is_empty() {
                builder = builder.set(field, values.join(&b", "[..]));
            }
        }
        if let Some(peer) = peer {
            builder = builder.set(SourceField::RemoteAddr, peer.ip().to_string());
        }
        builder.build()
    }

    pub fn get(&self, field: SourceField) -> Option<&[u8]> {
        self.values.get(&field).map(Vec::as_slice)
    }

    /// Value for display; bytes that are not UTF-8 show as U+FFFD.
    pub fn text(&self, field: SourceField) -> Option<Cow<'_, str>> {
        self.get(field).map(String::from_utf8_lossy)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Builder for [`RequestContext`]; later writes to a field win.
#[derive(Debug, Default)]
pub struct RequestContextBuilder {
    values: BTreeMap<SourceField, Vec<u8>>,
}

impl RequestContextBuilder {
    pub fn set(mut self, field: SourceField, value: impl Into<Vec<u8>>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    pub fn remote_addr(self, value: impl Into<Vec<u8>>) -> Self {
        self.set(SourceField::RemoteAddr, value)
    }

    pub fn build(self) -> RequestContext {
        RequestContext {
            values: self.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source_names() {
        assert_eq!("X-Forwarded-For".parse(), Ok(SourceField::XForwardedFor));
        assert_eq!("http_cf_connecting_ip".parse(), Ok(SourceField::CfConnectingIp));
        assert_eq!("REMOTE_ADDR".parse(), Ok(SourceField::RemoteAddr));
        assert_eq!("Client-IP".parse(), Ok(SourceField::ClientIp));
        assert!("X-Real-IP".parse::<SourceField>().is_err());
    }

    #[test]
    fn test_precedence_matches_ordering() {
        let mut sorted = SourceField::DISPLAY_ORDER;
        sorted.sort();
        assert_eq!(sorted, SourceField::PRECEDENCE);
    }

    #[test]
    fn test_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("198.51.100.7, 10.0.0.1"));
        headers.insert("cf-connecting-ip", HeaderValue::from_static(""));
        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.99"));

        let peer: SocketAddr = "10.0.0.1:51234".parse().unwrap();
        let ctx = RequestContext::from_headers(&headers, Some(peer));

        assert_eq!(ctx.get(SourceField::XForwardedFor), Some(&b"198.51.100.7, 10.0.0.1"[..]));
        assert_eq!(ctx.get(SourceField::CfConnectingIp), Some(&b""[..]));
        assert_eq!(ctx.get(SourceField::RemoteAddr), Some(&b"10.0.0.1"[..]));
        assert_eq!(ctx.get(SourceField::ClientIp), None);
    }

    #[test]
    fn test_from_headers_joins_repeated_header() {
        let mut headers = HeaderMap::new();
        headers.append("x-forwarded-for", HeaderValue::from_static("198.51.100.7"));
        headers.append("x-forwarded-for", HeaderValue::from_static("10.0.0.1"));
        headers.append("forwarded", HeaderValue::from_static("for=192.0.2.60"));

        let ctx = RequestContext::from_headers(&headers, None);
        assert_eq!(ctx.get(SourceField::XForwardedFor), Some(&b"198.51.100.7, 10.0.0.1"[..]));
        assert_eq!(ctx.get(SourceField::Forwarded), Some(&b"for=192.0.2.60"[..]));
        assert_eq!(ctx.get(SourceField::RemoteAddr), None);
    }

    #[test]
    fn test_from_headers_keeps_raw_bytes() {
        let mut headers = HeaderMap::new();
        headers.insert("client-ip", HeaderValue::from_bytes(b"1.2.3.4\xa0").unwrap());

        let ctx = RequestContext::from_headers(&headers, None);
        assert_eq!(ctx.get(SourceField::ClientIp), Some(&b"1.2.3.4\xa0"[..]));
        assert_eq!(ctx.text(SourceField::ClientIp).as_deref(), Some("1.2.3.4\u{fffd}"));
    }

    #[test]
    fn test_builder_last_write_wins() {
        let ctx = RequestContext::builder()
            .remote_addr("127.0.0.1")
            .remote_addr("192.0.2.1")
            .build();
        assert_eq!(ctx.text(SourceField::RemoteAddr).as_deref(), Some("192.0.2.1"));
    }
}
