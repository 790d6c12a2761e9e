//! Gateway types module
//!
//! - [`request`]: body extractors with plain-text rejections

pub mod request;

pub use request::{FulfillOrderJson, RequestBodyRejection};
