//! Address family classification and byte-level inspection.

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

/// What a detected IP string parses as.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
    Invalid,
}

impl AddressFamily {
    /// Strict parse; surrounding whitespace, a port or non-UTF-8 bytes make
    /// it invalid.
    pub fn classify(value: &[u8]) -> Self {
        let Ok(value) = std::str::from_utf8(value) else {
            return AddressFamily::Invalid;
        };
        if value.parse::<Ipv4Addr>().is_ok() {
            AddressFamily::V4
        } else if value.parse::<Ipv6Addr>().is_ok() {
            AddressFamily::V6
        } else {
            AddressFamily::Invalid
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AddressFamily::V4 => "IPv4",
            AddressFamily::V6 => "IPv6",
            AddressFamily::Invalid => "Invalid",
        })
    }
}

/// Lowercase hex of the raw bytes, for spotting invisible characters.
pub fn hex_dump(value: &[u8]) -> String {
    value.iter().map(|b| format!("{b:02x}")).collect()
}
