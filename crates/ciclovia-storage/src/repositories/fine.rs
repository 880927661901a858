#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::Fine;
use sqlx::SqlitePool;

/// Repository trait for Fine (multa) entity operations
///
/// Fines attach to a rental; the "user" queries below join through the
/// `alugueis` table because that is where the CPF lives. The unpaid
/// count is the hard gate checked by rental-start.
pub trait FineRepository: Send + Sync {
    /// Create a new fine, returning its id
    async fn create(&self, fine: &Fine) -> StorageResult<i64>;

    /// Count unpaid fines across all rentals of a user
    async fn count_unpaid_by_user(&self, cpf: &str) -> StorageResult<i64>;

    /// Total unpaid amount across all rentals of a user
    async fn total_unpaid_by_user(&self, cpf: &str) -> StorageResult<f64>;

    /// List the unpaid fines of a user, earliest due date first
    async fn list_unpaid_by_user(&self, cpf: &str) -> StorageResult<Vec<Fine>>;
}

/// SQLite implementation of FineRepository
pub struct SqliteFineRepository {
    pool: SqlitePool,
}

impl SqliteFineRepository {
    /// Create a new SQLite fine repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl FineRepository for SqliteFineRepository {
    async fn create(&self, fine: &Fine) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO multas (aluguel_id, valor, tipo, vencimento, is_paid)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(fine.aluguel_id)
        .bind(fine.valor)
        .bind(&fine.tipo)
        .bind(fine.vencimento)
        .bind(fine.is_paid)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn count_unpaid_by_user(&self, cpf: &str) -> StorageResult<i64> {
        let result: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM multas M
            JOIN alugueis A ON M.aluguel_id = A.id
            WHERE A.usuario_cpf = ? AND M.is_paid = 0
            "#,
        )
        .bind(cpf)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn total_unpaid_by_user(&self, cpf: &str) -> StorageResult<f64> {
        let result: (f64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(M.valor), 0.0)
            FROM multas M
            JOIN alugueis A ON M.aluguel_id = A.id
            WHERE A.usuario_cpf = ? AND M.is_paid = 0
            "#,
        )
        .bind(cpf)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    async fn list_unpaid_by_user(&self, cpf: &str) -> StorageResult<Vec<Fine>> {
        let fines = sqlx::query_as::<_, Fine>(
            r#"
            SELECT M.id, M.aluguel_id, M.valor, M.tipo, M.vencimento, M.is_paid
            FROM multas M
            JOIN alugueis A ON M.aluguel_id = A.id
            WHERE A.usuario_cpf = ? AND M.is_paid = 0
            ORDER BY M.vencimento
            "#,
        )
        .bind(cpf)
        .fetch_all(&self.pool)
        .await?;

        Ok(fines)
    }
}
