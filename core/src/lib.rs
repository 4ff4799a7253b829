//! Blocking API client core for the posts service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern); a [`Transport`] performs the
//! round-trip. [`PostsApi`] wires the two together with the persisted bearer
//! token and exposes the post operations in the caller's record shape.
//!
//! # Design
//! - `PostsClient` is stateless and holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `Post` (caller shape) and `BackPost` (wire shape) are mapped with
//!   `From` impls; missing required wire fields are sent as empty strings.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod http;
pub mod storage;
pub mod transport;
pub mod types;

pub use api::PostsApi;
pub use client::{PostsClient, RequestOptions};
pub use config::ApiConfig;
pub use error::{ApiError, ConfigError, StorageError};
pub use form::{FormVariant, PostForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Payload};
pub use storage::{FileStorage, MemoryStorage, Storage, TokenStorage};
pub use transport::{Transport, UreqTransport};
pub use types::{to_back, to_front, BackPost, PageParams, Post, PostDraft};
