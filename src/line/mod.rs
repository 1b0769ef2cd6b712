//! Line Protocol Module
//!
//! Builds InfluxDB line protocol through a type-sequenced builder.
//!
//! ## Line Format
//! ```text
//! measurement[,tag=val...] field=val[,field=val...][ timestamp]
//! ```
//! Points are joined with `\n`.
//!
//! ## Call Order
//! ```text
//! Start ──measurement──▶ Tags ──field──▶ Fields ──timestamp──▶ Stamped
//!                        │  ▲            │  ▲                    │
//!                        └tag┘           └field┘                 │
//!                ▲                       │                       │
//!                └─────measurement───────┴───────────────────────┘
//! ```
//! `post_http` and `send_udp` exist only on `Fields` and `Stamped`.
//!
//! ```
//! use influxline::Builder;
//!
//! let lines = Builder::new()
//!     .measurement("cpu")
//!     .tag("host", "a")
//!     .field("value", 0.64)
//!     .timestamp(1234)
//!     .into_string();
//! assert_eq!(lines, "cpu,host=a value=0.64 1234");
//! ```
//!
//! Out-of-order calls do not compile. A field needs a measurement first:
//! ```compile_fail
//! use influxline::Builder;
//! let _ = Builder::new().field("value", 1);
//! ```
//! Tags cannot follow fields:
//! ```compile_fail
//! use influxline::Builder;
//! let _ = Builder::new().measurement("cpu").field("value", 1).tag("host", "a");
//! ```
//! A point takes one timestamp:
//! ```compile_fail
//! use influxline::Builder;
//! let _ = Builder::new().measurement("cpu").field("value", 1).timestamp(1).timestamp(2);
//! ```
//! Nothing can be sent before the first field:
//! ```compile_fail
//! use influxline::{Builder, ServerInfo};
//! let _ = Builder::new().measurement("cpu").tag("host", "a").post_http(&ServerInfo::default());
//! ```

mod builder;
mod escape;
mod value;

pub use builder::{state, Builder, Complete, DEFAULT_PRECISION, HIGH_PRECISION, MAX_PRECISION};
pub use escape::{escape, escape_into, KEY, MEASUREMENT, STRING_VALUE};
pub use value::FieldValue;
