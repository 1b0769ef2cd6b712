//! # influxline
//!
//! A small synchronous InfluxDB client:
//! - Type-sequenced line-protocol builder (illegal call orders don't compile)
//! - Single-shot HTTP/1.1 client over a fresh TCP connection
//! - Content-Length and chunked response decoding
//! - Fire-and-forget UDP delivery
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐        ┌──────────────────────┐
//! │    line::Builder     │        │  client::query /     │
//! │ (measurement → tags  │        │  client::create_db   │
//! │  → fields → ts)      │        └──────────┬───────────┘
//! └───────┬────────┬─────┘                   │ urlencode
//!         │        │                         │
//!   post_http   send_udp                     │
//!         │        │                         │
//!         ▼        ▼                         ▼
//! ┌─────────────┐ ┌─────────┐     ┌──────────────────────┐
//! │    http     │ │   udp   │     │         http         │
//! │ (TCP, 1 req)│ │(1 dgram)│     │ (TCP, 1 req)         │
//! └─────────────┘ └─────────┘     └──────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod urlencode;
pub mod http;
pub mod udp;
pub mod line;
pub mod client;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{result_code, Error, Result};
pub use config::ServerInfo;
pub use line::{Builder, FieldValue};
pub use client::{create_db, query};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of influxline
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
