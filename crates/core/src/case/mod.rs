//! The insolvency case aggregate root.

pub mod service;
pub mod types;

pub use service::{CaseService, CaseStore};
pub use types::{
    CASE_KIND, CaseLinks, CaseType, CreateCase, DUPLICATE_CASE_ERROR, InsolvencyCase,
    check_company_restrictions,
};
