//! Speaks a one-line summary of CPU, memory, disk, uptime or network usage.

pub mod byte_count;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod number;
pub mod report;
pub mod speech;

pub use error::{Error, Result};
