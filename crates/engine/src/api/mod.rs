//! API layer - HTTP entry points.

mod error;
pub mod http;

pub use error::ApiError;
