//! Access decisions, reproduced for diagnosis.
//!
//! # Data Flow
//! ```text
//! detected IP + API_ALLOWED_IP
//!     → allowlist.rs (panel's membership check, verbatim)
//!     → address.rs (family classification, hex dump)
//!     → Reported, never enforced
//! ```
//!
//! # Design Decisions
//! - Mirror the panel's check exactly, quirks included
//! - The implicit empty-string entry is kept and shown in the report

pub mod address;
pub mod allowlist;

pub use address::{hex_dump, AddressFamily};
pub use allowlist::{evaluate, listed_verbatim, truthy, AllowList, Verdict, ALLOW_ALL};
