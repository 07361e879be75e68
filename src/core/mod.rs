//! Core components of the `gettex-rs` client.
//!
//! This module contains the foundational building blocks of the library, including:
//! - The main [`GxClient`] and its builder.
//! - The primary [`GxError`] type.
//! - The field table and the [`FieldMatrix`] returned by quote queries.
//! - Internal networking, authentication and caching logic.

/// The main client (`GxClient`), builder, auth chain and field cache.
pub mod client;
/// Injectable wall clock.
pub mod clock;
/// The primary error type (`GxError`) for the crate.
pub mod error;
/// Field ids, field groups and field values.
pub mod fields;
/// Extraction of the homepage login configuration.
pub mod scrape;

pub(crate) mod net;

// convenient re-exports so most code can just `use crate::core::GxClient`
pub use client::{
    AuthPhase, BearerToken, CacheMode, GxClient, GxClientBuilder, GxConfig, SessionCredentials,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::GxError;
pub use fields::{Field, FieldGroup, FieldMatrix, FieldValue};
pub use scrape::{AuthConfig, extract_auth_config};
