//! Best-effort external address discovery for the standalone mode.
//!
//! # Data Flow
//! ```text
//! AddressLookup::lookup(IPv4) ─┐ (concurrently)
//! AddressLookup::lookup(IPv6) ─┴→ synthesize_context
//!     → REMOTE_ADDR = IPv4, else IPv6, else fallback
//! ```
//!
//! # Design Decisions
//! - A failed lookup is a finding, never an error
//! - Every lookup has a deadline
//! - The lookup sits behind a trait so tests stay offline

use std::fmt;
use std::future::Future;

pub mod echo;

pub use echo::HttpLookup;

use crate::request::{RequestContext, RequestContextBuilder};

/// Address family to pin a lookup to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Family::V4 => "IPv4",
            Family::V6 => "IPv6",
        })
    }
}

/// Discovers the host's public address for one family.
pub trait AddressLookup: Send + Sync {
    /// `None` when the address could not be determined in time.
    fn lookup(&self, family: Family) -> impl Future<Output = Option<String>> + Send;
}

/// Lookup that never reaches the network.
#[derive(Debug, Clone, Default)]
pub struct NoLookup;

impl AddressLookup for NoLookup {
    async fn lookup(&self, _family: Family) -> Option<String> {
        None
    }
}

/// What the standalone mode discovered, for the report banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupReport {
    pub ipv4: Option<String>,
    pub ipv6: Option<String>,
    /// Address actually used as `REMOTE_ADDR`.
    pub remote_addr: String,
}

/// Build a standalone request context from external lookups.
///
/// The returned builder already carries `REMOTE_ADDR`; callers may layer
/// simulated headers on top before building.
pub async fn synthesize_context<L: AddressLookup>(
    lookup: &L,
    fallback: &str,
) -> (RequestContextBuilder, LookupReport) {
    let (ipv4, ipv6) = tokio::join!(lookup.lookup(Family::V4), lookup.lookup(Family::V6));

    let remote_addr = ipv4
        .clone()
        .or_else(|| ipv6.clone())
        .unwrap_or_else(|| fallback.to_string());

    tracing::info!(
        ipv4 = ipv4.as_deref().unwrap_or("unavailable"),
        ipv6 = ipv6.as_deref().unwrap_or("unavailable"),
        remote_addr = %remote_addr,
        "Standalone request context synthesized"
    );

    let builder = RequestContext::builder().remote_addr(remote_addr.clone());
    (
        builder,
        LookupReport {
            ipv4,
            ipv6,
            remote_addr,
        },
    )
}
