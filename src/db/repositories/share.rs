use crate::entities::{prelude::*, shares};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect,
};

pub struct ShareRepository {
    conn: DatabaseConnection,
}

impl ShareRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn create(&self, share: shares::Model) -> anyhow::Result<()> {
        Shares::insert(share.into_active_model())
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn list_for_user(
        &self,
        user_id: &str,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<shares::Model>, u64)> {
        let query = Shares::find().filter(shares::Column::UserId.eq(user_id));

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_desc(shares::Column::CreatedAt)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows, total))
    }

    pub async fn recent_for_user(
        &self,
        user_id: &str,
        limit: u64,
    ) -> anyhow::Result<Vec<shares::Model>> {
        Ok(Shares::find()
            .filter(shares::Column::UserId.eq(user_id))
            .order_by_desc(shares::Column::CreatedAt)
            .limit(limit)
            .all(&self.conn)
            .await?)
    }

    /// Share counts per category for one user, unordered.
    pub async fn category_counts(&self, user_id: &str) -> anyhow::Result<Vec<(String, i64)>> {
        Ok(Shares::find()
            .select_only()
            .column(shares::Column::Category)
            .column_as(shares::Column::Id.count(), "count")
            .filter(shares::Column::UserId.eq(user_id))
            .group_by(shares::Column::Category)
            .into_tuple()
            .all(&self.conn)
            .await?)
    }
}
