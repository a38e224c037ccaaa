//! Attachment metadata and anti-virus gating.
//!
//! Attachment bytes live in the file-transfer service; the case store holds
//! metadata only.

pub mod service;
pub mod types;

pub use service::{AttachmentService, AttachmentStore};
pub use types::{
    Attachment, AttachmentDetails, AttachmentLinks, AttachmentStatus, AttachmentType,
};
