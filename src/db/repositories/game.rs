use crate::entities::{games, prelude::*};
use crate::models::content::{Difficulty, Game};
use chrono::Utc;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

pub struct GameRepository {
    conn: DatabaseConnection,
}

impl GameRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: games::Model) -> Game {
        Game {
            id: model.id,
            title: model.title,
            platform: model.platform,
            cover: model.cover,
            difficulty: model.difficulty,
            url: model.url,
        }
    }

    pub async fn upsert(&self, game: &Game) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let active = games::ActiveModel {
            id: Set(game.id.clone()),
            title: Set(game.title.clone()),
            platform: Set(game.platform.clone()),
            cover: Set(game.cover.clone()),
            difficulty: Set(game.difficulty),
            url: Set(game.url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Games::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(games::Column::Id)
                    .update_columns([
                        games::Column::Title,
                        games::Column::Platform,
                        games::Column::Cover,
                        games::Column::Difficulty,
                        games::Column::Url,
                        games::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Game>> {
        Ok(Games::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::to_record))
    }

    pub async fn list(
        &self,
        platform: Option<&str>,
        difficulty: Option<Difficulty>,
        limit: u64,
        offset: u64,
    ) -> anyhow::Result<(Vec<Game>, u64)> {
        let mut query = Games::find();
        if let Some(platform) = platform {
            query = query.filter(games::Column::Platform.contains(platform));
        }
        if let Some(difficulty) = difficulty {
            query = query.filter(games::Column::Difficulty.eq(difficulty));
        }

        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(games::Column::Title)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Self::to_record).collect(), total))
    }

    pub async fn search(&self, term: &str, limit: u64) -> anyhow::Result<Vec<Game>> {
        let rows = Games::find()
            .filter(games::Column::Title.contains(term))
            .order_by_asc(games::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::to_record).collect())
    }
}
