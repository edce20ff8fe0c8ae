//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, catch-all route, shared client)
//!     → forward.rs (control params, target URL, bounded fetch)
//!     → 200 + Access-Control-Allow-Origin: * + body, or 500 "Error"
//! ```

pub mod forward;
pub mod server;

pub use server::HttpServer;
