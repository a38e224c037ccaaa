//! Common types used across the application.

pub mod etag;
pub mod practitioner_id;

pub use etag::mint_etag;
pub use practitioner_id::{is_valid_practitioner_id, mint_practitioner_id};
