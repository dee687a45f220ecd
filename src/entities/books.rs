use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "books")]
pub struct Model {
    /// Open Library work id, e.g. "OL45883W"
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub title: String,
    /// Comma-joined author names, "Unknown" when empty
    #[sea_orm(indexed)]
    pub author: String,
    pub cover: Option<String>,
    pub total_pages: Option<i32>,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
