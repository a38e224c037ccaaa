//! Initial schema for the case store.
//!
//! One cases table keyed by transaction id with the embedded sub-resources
//! as JSONB, plus sibling tables for practitioners, appointments and
//! attachments. The unique indexes are what enforce id and ip_code
//! uniqueness under concurrent writes.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS attachments, appointments, practitioners, cases CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Case aggregate root, one row per filing transaction
CREATE TABLE cases (
    transaction_id TEXT PRIMARY KEY,
    case_type TEXT NOT NULL,
    company_number TEXT NOT NULL,
    company_name TEXT NOT NULL,
    etag VARCHAR(56) NOT NULL,
    kind TEXT NOT NULL,
    practitioner_links JSONB NOT NULL DEFAULT '{}'::jsonb,
    resolution JSONB,
    statement_of_affairs JSONB,
    progress_report JSONB,
    links JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Practitioners, at most five per case
CREATE TABLE practitioners (
    transaction_id TEXT NOT NULL REFERENCES cases(transaction_id) ON DELETE CASCADE,
    id VARCHAR(10) NOT NULL,
    ip_code TEXT NOT NULL,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL,
    telephone_number TEXT,
    email TEXT,
    address JSONB NOT NULL,
    role TEXT NOT NULL,
    etag VARCHAR(56) NOT NULL,
    kind TEXT NOT NULL,
    links JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (transaction_id, id)
);

-- An IP code appears once per case
CREATE UNIQUE INDEX idx_practitioners_ip_code ON practitioners(transaction_id, ip_code);

-- Appointments, at most one per practitioner
CREATE TABLE appointments (
    transaction_id TEXT NOT NULL,
    practitioner_id VARCHAR(10) NOT NULL,
    appointed_on DATE NOT NULL,
    made_by TEXT NOT NULL,
    etag VARCHAR(56) NOT NULL,
    kind TEXT NOT NULL,
    links JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (transaction_id, practitioner_id),
    FOREIGN KEY (transaction_id, practitioner_id)
        REFERENCES practitioners(transaction_id, id) ON DELETE CASCADE
);

-- Attachment metadata; bytes live in the file-transfer service
CREATE TABLE attachments (
    transaction_id TEXT NOT NULL REFERENCES cases(transaction_id) ON DELETE CASCADE,
    id TEXT NOT NULL,
    attachment_type TEXT NOT NULL,
    status TEXT NOT NULL,
    links JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    PRIMARY KEY (transaction_id, id)
);
";
