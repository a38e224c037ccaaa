//! `SeaORM` entity definitions for the case store.

pub mod appointments;
pub mod attachments;
pub mod cases;
pub mod practitioners;
