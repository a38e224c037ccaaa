//! Authorisation interceptors and panic recovery.

pub mod allow_list;
pub mod permissions;
pub mod recovery;
