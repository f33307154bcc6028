//! HestiaCP API IP diagnostic library.

pub mod config;
pub mod diagnose;
pub mod http;
pub mod lifecycle;
pub mod lookup;
pub mod observability;
pub mod panel;
pub mod report;
pub mod request;
pub mod security;

pub use config::DebugConfig;
pub use diagnose::{DiagnoseError, Diagnosis, Doctor};
pub use http::HttpServer;
