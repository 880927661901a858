#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::Bike;
use sqlx::SqlitePool;

/// Repository trait for Bike entity operations
///
/// Reads and registration only. Status flips (rental checkout/return,
/// maintenance open/close) always happen inside a workflow transaction
/// through [`crate::transaction`], never through this trait, so the
/// status/station invariant cannot be broken by a lone update.
pub trait BikeRepository: Send + Sync {
    /// Find a bike by its fleet registration number
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Bike>>;

    /// Create a new bike, returning its registration number
    async fn create(&self, bike: &Bike) -> StorageResult<i64>;
}

/// SQLite implementation of BikeRepository
pub struct SqliteBikeRepository {
    pool: SqlitePool,
}

impl SqliteBikeRepository {
    /// Create a new SQLite bike repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl BikeRepository for SqliteBikeRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Bike>> {
        let bike = sqlx::query_as::<_, Bike>(
            r#"
            SELECT id, modelo, ano_fabricacao, cor, status,
                   qnt_alugueis, tempo_total_utilizado, ponto_atual_id, created_at
            FROM bikes
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(bike)
    }

    async fn create(&self, bike: &Bike) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO bikes (
                modelo, ano_fabricacao, cor, status,
                qnt_alugueis, tempo_total_utilizado, ponto_atual_id
            )
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&bike.modelo)
        .bind(bike.ano_fabricacao)
        .bind(&bike.cor)
        .bind(&bike.status)
        .bind(bike.qnt_alugueis)
        .bind(bike.tempo_total_utilizado)
        .bind(bike.ponto_atual_id)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
