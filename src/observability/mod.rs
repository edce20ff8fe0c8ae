//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (request counter, latency histogram)
//!
//! Consumers:
//!     → Log output (stdout, free text)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Every inbound URI is logged; every failure is logged with the
//!   outbound target URL and the underlying cause
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
