use crate::entities::{books, prelude::*};
use crate::models::content::Book;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct BookRepository {
    conn: DatabaseConnection,
}

impl BookRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: books::Model) -> Book {
        Book {
            id: model.id,
            title: model.title,
            author: model.author,
            cover: model.cover,
            total_pages: model.total_pages,
            url: model.url,
        }
    }

    pub async fn upsert(&self, book: &Book) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let active = books::ActiveModel {
            id: Set(book.id.clone()),
            title: Set(book.title.clone()),
            author: Set(book.author.clone()),
            cover: Set(book.cover.clone()),
            total_pages: Set(book.total_pages),
            url: Set(book.url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Books::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(books::Column::Id)
                    .update_columns([
                        books::Column::Title,
                        books::Column::Author,
                        books::Column::Cover,
                        books::Column::TotalPages,
                        books::Column::Url,
                        books::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Book>> {
        Ok(Books::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::to_record))
    }

    pub async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<(Vec<Book>, u64)> {
        let query = Books::find();
        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(books::Column::Title)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Self::to_record).collect(), total))
    }

    pub async fn search(&self, term: &str, limit: u64) -> anyhow::Result<Vec<Book>> {
        let rows = Books::find()
            .filter(
                Condition::any()
                    .add(books::Column::Title.contains(term))
                    .add(books::Column::Author.contains(term)),
            )
            .order_by_asc(books::Column::Title)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::to_record).collect())
    }
}
