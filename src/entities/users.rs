use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Opaque generated id, "u_" + 12 hex chars
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Argon2id password hash, never serialized
    pub password_hash: String,

    pub avatar: Option<String>,

    pub bio: Option<String>,

    /// JSON array of hex color codes stored as a string
    pub aura_colors: Option<String>,

    /// JSON array of aesthetic style tags stored as a string
    pub aesthetic_tags: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::shares::Entity")]
    Shares,
}

impl Related<super::shares::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shares.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
