//! Foundation module - Core utilities and types
//!
//! - Handle-keyed asset storage and ordered result sets
//! - Logging setup

pub mod collections;
pub mod logging;
