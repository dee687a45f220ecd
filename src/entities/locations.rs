use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    /// Open-Meteo geocoding id, stored as a string
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(indexed)]
    pub name: String,
    #[sea_orm(indexed)]
    pub city: String,
    #[sea_orm(indexed)]
    pub country: String,
    pub image: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<f64>,
    pub timezone: Option<String>,
    pub url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
