//! SecOps SOAR REST API client.
//!
//! This crate provides a lightweight client for the SOAR external API. It
//! focuses on:
//!
//! - Constructing an HTTP client with sensible defaults and the `AppKey` header
//! - Validating the configured base URL
//! - Decoding JSON responses and turning transport, status and decode
//!   problems into [`ApiError`]
//!
//! The primary entry point is [`SoarClient`]. Callers that only need to issue
//! requests depend on the [`SoarBackend`] trait so tests can substitute a
//! recording fake.
//!
//! # Example
//!
//! ```ignore
//! use soar_api::{SoarBackend, SoarClient, endpoints};
//!
//! async fn scopes() -> Result<(), soar_api::ApiError> {
//!     let client = SoarClient::new("https://soar.example.com", Some("app-key"), SoarClient::DEFAULT_TIMEOUT)?;
//!     let scopes = soar_api::fetch_valid_scopes(&client).await?;
//!     println!("{scopes:?}");
//!     Ok(())
//! }
//! ```

mod backend;
mod client;
pub mod endpoints;
mod error;

pub use backend::{SoarBackend, fetch_valid_scopes};
pub use client::SoarClient;
pub use error::ApiError;
