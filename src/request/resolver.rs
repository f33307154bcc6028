//! Client IP resolution, mirroring the panel's own heuristic.

use std::borrow::Cow;

use crate::request::context::{RequestContext, SourceField};

/// The address the panel would attribute the request to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIp {
    /// Raw bytes, unvalidated and untrimmed. Empty when nothing was set.
    pub value: Vec<u8>,
    /// Input that supplied the value.
    pub source: Option<SourceField>,
}

impl ResolvedIp {
    pub fn as_bytes(&self) -> &[u8] {
        &self.value
    }

    /// Lossy UTF-8 rendering for messages and logs.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// Pick the first non-empty input in [`SourceField::PRECEDENCE`] order.
///
/// Values are taken verbatim: a multi-hop `X-Forwarded-For` list is returned
/// whole, exactly as the panel compares it.
pub fn resolve(ctx: &RequestContext) -> ResolvedIp {
    SourceField::PRECEDENCE
        .into_iter()
        .find_map(|field| {
            ctx.get(field)
                .filter(|value| !value.is_empty())
                .map(|value| ResolvedIp {
                    value: value.to_vec(),
                    source: Some(field),
                })
        })
        .unwrap_or(ResolvedIp {
            value: Vec::new(),
            source: None,
        })
}
