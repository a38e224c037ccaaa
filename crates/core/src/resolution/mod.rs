//! The winding-up resolution sub-resource.

pub mod service;
pub mod types;

pub use service::{ResolutionService, ResolutionStore};
pub use types::{CreateResolution, RESOLUTION_KIND, Resolution};
