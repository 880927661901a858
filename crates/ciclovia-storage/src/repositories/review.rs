#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::{BikeReview, StationReview};
use sqlx::SqlitePool;

/// Repository trait for post-rental ratings
///
/// Write-side only; the admin reports read the ratings through their own
/// aggregate queries.
pub trait ReviewRepository: Send + Sync {
    /// Record a bike rating for a completed rental
    async fn create_bike_review(&self, review: &BikeReview) -> StorageResult<i64>;

    /// Record a station rating for a completed rental
    async fn create_station_review(&self, review: &StationReview) -> StorageResult<i64>;
}

/// SQLite implementation of ReviewRepository
pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    /// Create a new SQLite review repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl ReviewRepository for SqliteReviewRepository {
    async fn create_bike_review(&self, review: &BikeReview) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO comentarios_bike (aluguel_id, nota, texto)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(review.aluguel_id)
        .bind(review.nota)
        .bind(&review.texto)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn create_station_review(&self, review: &StationReview) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO comentarios_ponto (aluguel_id, nota, texto)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(review.aluguel_id)
        .bind(review.nota)
        .bind(&review.texto)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
