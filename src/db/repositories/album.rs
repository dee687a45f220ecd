use crate::entities::{albums, prelude::*};
use crate::models::content::Album;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct AlbumRepository {
    conn: DatabaseConnection,
}

impl AlbumRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: albums::Model) -> Album {
        Album {
            id: model.id,
            title: model.title,
            artist: model.artist,
            cover: model.cover,
            duration: model.duration,
            url: model.url,
        }
    }

    pub async fn upsert(&self, album: &Album) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let active = albums::ActiveModel {
            id: Set(album.id.clone()),
            title: Set(album.title.clone()),
            artist: Set(album.artist.clone()),
            cover: Set(album.cover.clone()),
            duration: Set(album.duration),
            url: Set(album.url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Albums::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(albums::Column::Id)
                    .update_columns([
                        albums::Column::Title,
                        albums::Column::Artist,
                        albums::Column::Cover,
                        albums::Column::Duration,
                        albums::Column::Url,
                        albums::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Album>> {
        Ok(Albums::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::to_record))
    }

    pub async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<(Vec<Album>, u64)> {
        let query = Albums::find();
        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(albums::Column::Title)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Self::to_record).collect(), total))
    }

    pub async fn search(&self, term: &str, limit: u64) -> anyhow::Result<Vec<Album>> {
        let rows = Albums::find()
            .filter(
                Condition::any()
                    .add(albums::Column::Title.contains(term))
                    .add(albums::Column::Artist.contains(term)),
            )
            .order_by_asc(albums::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::to_record).collect())
    }
}
