//! CORS Forwarding Proxy Library
//!
//! A small HTTP proxy that forwards GET requests to a host named by the
//! `cors-host` query parameter and relays the body back with a permissive
//! `Access-Control-Allow-Origin: *` header, so browser clients can reach
//! resources blocked by same-origin policy.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ProxyConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
