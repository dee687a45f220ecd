use crate::entities::{movies, prelude::*};
use crate::models::content::{MediaKind, Movie};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: movies::Model) -> Movie {
        Movie {
            id: model.id,
            title: model.title,
            year: model.year,
            director: model.director,
            poster: model.poster,
            season: model.season,
            episode: model.episode,
            kind: model.kind,
            url: model.url,
        }
    }

    pub async fn upsert(&self, movie: &Movie) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let active = movies::ActiveModel {
            id: Set(movie.id.clone()),
            title: Set(movie.title.clone()),
            year: Set(movie.year),
            director: Set(movie.director.clone()),
            poster: Set(movie.poster.clone()),
            season: Set(movie.season),
            episode: Set(movie.episode),
            kind: Set(movie.kind),
            url: Set(movie.url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Movies::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(movies::Column::Id)
                    .update_columns([
                        movies::Column::Title,
                        movies::Column::Year,
                        movies::Column::Director,
                        movies::Column::Poster,
                        movies::Column::Season,
                        movies::Column::Episode,
                        movies::Column::Kind,
                        movies::Column::Url,
                        movies::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Movie>> {
        Ok(Movies::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::to_record))
    }

    pub async fn list(
        &self,
        year: Option<i32>,
        kind: Option<MediaKind>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<Movie>, u64)> {
        let mut query = Movies::find();
        if let Some(year) = year {
            query = query.filter(movies::Column::Year.eq(year));
        }
        if let Some(kind) = kind {
            query = query.filter(movies::Column::Kind.eq(kind));
        }

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(movies::Column::Title)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Self::to_record).collect(), total))
    }

    pub async fn search(&self, term: &str, limit: u64) -> anyhow::Result<Vec<Movie>> {
        let rows = Movies::find()
            .filter(
                Condition::any()
                    .add(movies::Column::Title.contains(term))
                    .add(movies::Column::Director.contains(term)),
            )
            .order_by_asc(movies::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::to_record).collect())
    }
}
