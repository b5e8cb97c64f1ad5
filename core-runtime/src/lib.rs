//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the metadata resolver:
//! - Logging and tracing infrastructure
//! - Configuration management (provider credentials, rate limits, timeouts)
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the other workspace crates
//! depend on. It establishes the logging conventions and the fail-fast
//! configuration validation used at startup.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{MetadataApiConfig, RateLimitConfig, ResolverConfig};
pub use error::{Error, Result};
