#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::MaintenanceTicket;
use sqlx::SqlitePool;

/// Repository trait for MaintenanceTicket entity operations
///
/// Ticket creation and closure normally happen inside the maintenance
/// workflow transaction (see [`crate::transaction`]); this trait covers
/// the reads plus direct inserts for seeding.
pub trait MaintenanceRepository: Send + Sync {
    /// Find the open ticket (data_fim NULL) for a bike, if any
    async fn find_open_by_bike(&self, bike_id: i64) -> StorageResult<Option<MaintenanceTicket>>;

    /// Insert a ticket row, returning its id
    async fn create(&self, ticket: &MaintenanceTicket) -> StorageResult<i64>;
}

/// SQLite implementation of MaintenanceRepository
pub struct SqliteMaintenanceRepository {
    pool: SqlitePool,
}

impl SqliteMaintenanceRepository {
    /// Create a new SQLite maintenance repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl MaintenanceRepository for SqliteMaintenanceRepository {
    async fn find_open_by_bike(&self, bike_id: i64) -> StorageResult<Option<MaintenanceTicket>> {
        let ticket = sqlx::query_as::<_, MaintenanceTicket>(
            r#"
            SELECT id, bike_id, tipo, descricao_problema,
                   data_inicio, data_fim, valor
            FROM manutencoes
            WHERE bike_id = ? AND data_fim IS NULL
            ORDER BY id DESC
            LIMIT 1
            "#,
        )
        .bind(bike_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ticket)
    }

    async fn create(&self, ticket: &MaintenanceTicket) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO manutencoes (
                bike_id, tipo, descricao_problema, data_inicio, data_fim, valor
            )
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(ticket.bike_id)
        .bind(&ticket.tipo)
        .bind(&ticket.descricao_problema)
        .bind(ticket.data_inicio)
        .bind(ticket.data_fim)
        .bind(ticket.valor)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
