use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "shares")]
pub struct Model {
    /// Opaque generated id, "s_" + 12 hex chars
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    /// cinema | music | games | books | travel
    #[sea_orm(indexed)]
    pub category: String,

    /// Id of a row in one of the content caches
    pub content_id: String,

    pub title: String,

    pub image: Option<String>,

    /// Hex color code #RRGGBB
    pub dominant_color: Option<String>,

    pub caption: Option<String>,

    #[sea_orm(indexed)]
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::UserId",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
