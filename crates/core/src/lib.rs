//! Domain model and business rules for Windup.
//!
//! Everything that makes an insolvency case a *case* lives here: the
//! aggregate and its sub-resources, the per-operation business rules, the
//! whole-case submission validator, and thin clients for the upstream
//! services the rules consult. Persistence is abstracted behind per-module
//! store traits implemented by the db crate.
//!
//! # Modules
//!
//! - `case` - the aggregate root and case creation rules
//! - `practitioner` - practitioners and their appointments
//! - `attachment` - attachment metadata and anti-virus gating
//! - `resolution`, `statement_of_affairs`, `progress_report` - the dated
//!   sub-resources
//! - `submission` - the whole-case validation gate
//! - `clients` - transaction, company-profile, alpha-key, file-transfer and
//!   allow-list service clients
//! - `validation` - date and field validators shared by the rules

pub mod attachment;
pub mod case;
pub mod clients;
pub mod links;
pub mod practitioner;
pub mod progress_report;
pub mod resolution;
pub mod statement_of_affairs;
pub mod submission;
pub mod validation;
