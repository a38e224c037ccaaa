//! `SeaORM` entity for the cases table.
//!
//! The case row embeds the practitioner link map and the three
//! sub-resources (resolution, statement of affairs, progress report) as
//! JSONB, matching the persisted aggregate layout; practitioners,
//! appointments and attachments live in sibling tables.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub transaction_id: String,
    pub case_type: String,
    pub company_number: String,
    pub company_name: String,
    pub etag: String,
    pub kind: String,
    pub practitioner_links: Json,
    pub resolution: Option<Json>,
    pub statement_of_affairs: Option<Json>,
    pub progress_report: Option<Json>,
    pub links: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::practitioners::Entity")]
    Practitioners,
    #[sea_orm(has_many = "super::attachments::Entity")]
    Attachments,
}

impl Related<super::practitioners::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Practitioners.def()
    }
}

impl Related<super::attachments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attachments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
