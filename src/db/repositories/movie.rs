use crate::entities::{movies, prelude::*};
use anyhow::Result;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use tracing::info;

/// Repository for movie watchlist entries
pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: movies::Model) -> Movie {
        Movie {
            id: m.id,
            title: m.title,
            year: m.year,
        }
    }

    pub async fn add(&self, title: &str, year: &str) -> Result<i32> {
        let active = movies::ActiveModel {
            title: Set(title.to_string()),
            year: Set(year.to_string()),
            ..Default::default()
        };

        let res = Movies::insert(active).exec(&self.conn).await?;
        info!("Added movie {}: {} ({})", res.last_insert_id, title, year);
        Ok(res.last_insert_id)
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let result = Movies::find_by_id(id).one(&self.conn).await?;
        Ok(result.map(Self::map_model))
    }

    pub async fn list_all(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model).collect())
    }

    pub async fn update(&self, id: i32, title: &str, year: &str) -> Result<bool> {
        let result = Movies::update_many()
            .col_expr(movies::Column::Title, sea_orm::sea_query::Expr::value(title))
            .col_expr(movies::Column::Year, sea_orm::sea_query::Expr::value(year))
            .filter(movies::Column::Id.eq(id))
            .exec(&self.conn)
            .await?;

        Ok(result.rows_affected > 0)
    }

    pub async fn remove(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id).exec(&self.conn).await?;
        Ok(result.rows_affected > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = Movies::find().count(&self.conn).await?;
        Ok(count)
    }
}

// ============================================================================
// Data Types
// ============================================================================

#[derive(Debug, Clone)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub year: String,
}
