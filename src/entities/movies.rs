use sea_orm::entity::prelude::*;

use crate::models::content::MediaKind;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    /// TMDB id, stored as a string
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub title: String,
    pub year: i32,
    /// "N/A" when the credits lookup yields nothing
    pub director: String,
    pub poster: Option<String>,
    pub season: Option<i32>,
    pub episode: Option<i32>,
    #[sea_orm(column_name = "type")]
    pub kind: MediaKind,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
