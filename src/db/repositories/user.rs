use crate::entities::{prelude::*, users};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter, Set};

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts a fully-populated user row. Unique collisions on email or
    /// username surface as a `DbErr` the caller can inspect.
    pub async fn create(&self, user: users::Model) -> anyhow::Result<()> {
        Users::insert(user.into_active_model())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get_by_id(&self, user_id: &str) -> anyhow::Result<Option<users::Model>> {
        Ok(Users::find_by_id(user_id).one(&self.conn).await?)
    }

    pub async fn get_by_email(&self, email: &str) -> anyhow::Result<Option<users::Model>> {
        Ok(Users::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.conn)
            .await?)
    }

    pub async fn get_by_username(&self, username: &str) -> anyhow::Result<Option<users::Model>> {
        Ok(Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?)
    }

    /// Applies the provided profile fields. The outer `Option` is "was the
    /// field supplied at all"; the inner one is the new value, `None`
    /// clearing the column.
    pub async fn update_profile(
        &self,
        user_id: &str,
        avatar: Option<Option<String>>,
        bio: Option<Option<String>>,
    ) -> anyhow::Result<users::Model> {
        let mut active = users::ActiveModel {
            user_id: Set(user_id.to_string()),
            updated_at: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        if let Some(avatar) = avatar {
            active.avatar = Set(avatar);
        }
        if let Some(bio) = bio {
            active.bio = Set(bio);
        }

        Ok(Users::update(active).exec(&self.conn).await?)
    }

    /// Aura fields are stored as JSON strings; callers serialize before
    /// handing them over. Same double-`Option` convention as
    /// `update_profile`.
    pub async fn update_aura(
        &self,
        user_id: &str,
        aura_colors: Option<Option<String>>,
        aesthetic_tags: Option<Option<String>>,
    ) -> anyhow::Result<users::Model> {
        let mut active = users::ActiveModel {
            user_id: Set(user_id.to_string()),
            updated_at: Set(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        if let Some(colors) = aura_colors {
            active.aura_colors = Set(colors);
        }
        if let Some(tags) = aesthetic_tags {
            active.aesthetic_tags = Set(tags);
        }

        Ok(Users::update(active).exec(&self.conn).await?)
    }
}
