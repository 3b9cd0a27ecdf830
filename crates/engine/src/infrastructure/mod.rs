//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod http_table_adapter;
pub mod payment;
pub mod ports;
pub mod sqlite;
pub mod timed_table_adapter;
