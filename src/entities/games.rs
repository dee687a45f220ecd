use sea_orm::entity::prelude::*;

use crate::models::content::Difficulty;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "games")]
pub struct Model {
    /// RAWG game id, stored as a string
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub title: String,
    /// First platform name reported by RAWG, empty when none
    pub platform: String,
    pub cover: Option<String>,
    /// Derived from playtime; stays null when no estimate exists
    pub difficulty: Option<Difficulty>,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
