use crate::entities::{locations, prelude::*};
use crate::models::content::Location;
use chrono::Utc;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn to_record(model: locations::Model) -> Location {
        Location {
            id: model.id,
            name: model.name,
            city: model.city,
            country: model.country,
            image: model.image,
            weather: model.weather,
            temperature: model.temperature,
            timezone: model.timezone,
            url: model.url,
        }
    }

    pub async fn upsert(&self, location: &Location) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();
        let active = locations::ActiveModel {
            id: Set(location.id.clone()),
            name: Set(location.name.clone()),
            city: Set(location.city.clone()),
            country: Set(location.country.clone()),
            image: Set(location.image.clone()),
            weather: Set(location.weather.clone()),
            temperature: Set(location.temperature),
            timezone: Set(location.timezone.clone()),
            url: Set(location.url.clone()),
            created_at: Set(now.clone()),
            updated_at: Set(now),
        };

        Locations::insert(active)
            .on_conflict(
                sea_orm::sea_query::OnConflict::column(locations::Column::Id)
                    .update_columns([
                        locations::Column::Name,
                        locations::Column::City,
                        locations::Column::Country,
                        locations::Column::Image,
                        locations::Column::Weather,
                        locations::Column::Temperature,
                        locations::Column::Timezone,
                        locations::Column::Url,
                        locations::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.conn)
            .await?;
        Ok(())
    }

    pub async fn get(&self, id: &str) -> anyhow::Result<Option<Location>> {
        Ok(Locations::find_by_id(id)
            .one(&self.conn)
            .await?
            .map(Self::to_record))
    }

    pub async fn list(&self, limit: u64, offset: u64) -> anyhow::Result<(Vec<Location>, u64)> {
        let query = Locations::find();
        let total = query.clone().count(&self.conn).await?;
        let rows = query
            .order_by_asc(locations::Column::Name)
            .offset(offset)
            .limit(limit)
            .all(&self.conn)
            .await?;

        Ok((rows.into_iter().map(Self::to_record).collect(), total))
    }

    pub async fn search(&self, term: &str, limit: u64) -> anyhow::Result<Vec<Location>> {
        let rows = Locations::find()
            .filter(
                Condition::any()
                    .add(locations::Column::Name.contains(term))
                    .add(locations::Column::City.contains(term))
                    .add(locations::Column::Country.contains(term)),
            )
            .order_by_asc(locations::Column::Name)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows.into_iter().map(Self::to_record).collect())
    }
}
