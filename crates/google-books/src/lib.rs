//! Google Books volumes API client.
//!
//! Wraps the `GET /books/v1/volumes?q=...` search endpoint: a typed client
//! for live requests, a fixture source serving recorded responses, and the
//! wire types both return.

pub mod client;
pub mod error;
pub mod fixture;
pub mod types;

pub use client::GoogleBooksClient;
pub use error::GoogleBooksError;
pub use fixture::FixtureVolumes;
pub use types::{ImageLinks, PanelizationSummary, Volume, VolumeInfo, Volumes};
