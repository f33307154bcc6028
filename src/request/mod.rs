//! Request inputs and client IP resolution.
//!
//! # Data Flow
//! ```text
//! web mode:        HTTP headers + peer address ─┐
//!                                               ├→ context.rs (RequestContext, immutable)
//! standalone mode: lookup + --header overrides ─┘        → resolver.rs (first non-empty wins)
//! ```
//!
//! # Design Decisions
//! - The context is built once and never mutated
//! - The resolver is a pure function of the context
//! - No validation or trimming at this stage

pub mod context;
pub mod resolver;

pub use context::{RequestContext, RequestContextBuilder, SourceField, UnknownSource};
pub use resolver::{resolve, ResolvedIp};
