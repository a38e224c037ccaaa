//! The statement-of-affairs sub-resource.

pub mod service;
pub mod types;

pub use service::{StatementOfAffairsService, StatementOfAffairsStore};
pub use types::{CreateStatementOfAffairs, STATEMENT_OF_AFFAIRS_KIND, StatementOfAffairs};
