//! # Host Bridge Traits
//!
//! Capability traits the metadata core consumes but does not implement itself.
//!
//! ## Overview
//!
//! The resolution core talks to the outside world through two seams:
//!
//! - [`HttpClient`](http::HttpClient) - Async HTTP requests to provider endpoints
//! - [`ImageProbe`](image::ImageProbe) - Pixel-dimension probing for remote images
//!
//! Each host ships concrete adapters (the desktop adapter lives in
//! `bridge-desktop`). Tests inject scripted in-memory implementations.
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Platform
//! implementations should convert their native errors into it and keep the
//! message actionable (URL, status, timeout).
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so a single instance can be shared
//! across the concurrent tasks of an aggregate call.
//!
//! ## Examples
//!
//! ### Implementing HttpClient
//!
//! ```ignore
//! use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
//! use bridge_traits::error::Result;
//! use async_trait::async_trait;
//!
//! pub struct MyHttpClient {
//!     client: reqwest::Client,
//! }
//!
//! #[async_trait]
//! impl HttpClient for MyHttpClient {
//!     async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
//!         // Implementation
//!         todo!()
//!     }
//! }
//! ```

pub mod error;
pub mod http;
pub mod image;

pub use error::BridgeError;

pub use http::{HttpClient, HttpRequest, HttpResponse};
pub use image::{ImageDimensions, ImageProbe};
