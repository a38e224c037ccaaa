//! API route definitions.
//!
//! Every module exposes a `routes()` function merged into the
//! `/transactions/{transaction_id}/insolvency` nest, except `health`,
//! which sits at the root and is unauthenticated.

pub mod attachments;
pub mod case;
pub mod filings;
pub mod health;
pub mod practitioners;
pub mod progress_report;
pub mod resolution;
pub mod statement_of_affairs;
pub mod validation_status;
