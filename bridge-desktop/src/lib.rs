//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest` with rustls
//!
//! Image probing does not need a desktop-specific adapter: the core ships
//! `core_metadata::probe::HttpImageProbe`, which works on top of any
//! `HttpClient`.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let http_client = Arc::new(ReqwestHttpClient::new()?);
//!     // Hand it to AgentRegistry::from_config(...)
//!     Ok(())
//! }
//! ```

mod http;

pub use http::ReqwestHttpClient;
