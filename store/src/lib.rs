//! # Remote store
//!
//! Shared access layer for the hosted backend-as-a-service that holds all
//! persistent state: the relational tables behind the admin dashboard, the
//! object-storage buckets for uploaded media, and the admin auth sessions.
//!
//! Everything here is a thin typed wrapper over the service's HTTP surface.
//! There is no local persistence and no caching at this layer; callers own
//! both.
//!
//! ## Tables
//! - `categories`: product categories, ordered by `order_index`
//! - `products`: products, each referencing one category
//! - `videos`: promotional videos shown on the TV video board
//! - `galeria`: promotional images shown on the TV gallery board
//! - `products_with_category`: read-only view joining product and category
//!
//! ## Buckets
//! - `videos`: uploaded video files
//! - `gallery`: uploaded gallery images

pub mod auth;
pub mod data;
pub mod error;
pub mod models;
pub mod storage;

pub use auth::{AuthClient, AuthUser, Session};
pub use data::{DataClient, Query};
pub use error::StoreError;
pub use storage::StorageClient;

/// Bucket holding promotional video files.
pub const VIDEO_BUCKET: &str = "videos";

/// Bucket holding gallery images.
pub const GALLERY_BUCKET: &str = "gallery";
