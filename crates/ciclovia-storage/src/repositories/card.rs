#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::Card;
use sqlx::SqlitePool;

/// Repository trait for Card entity operations
pub trait CardRepository: Send + Sync {
    /// Find the card belonging to a user (one card per user)
    async fn find_by_user(&self, cpf: &str) -> StorageResult<Option<Card>>;

    /// Create a new card, returning its id
    async fn create(&self, card: &Card) -> StorageResult<i64>;
}

/// SQLite implementation of CardRepository
pub struct SqliteCardRepository {
    pool: SqlitePool,
}

impl SqliteCardRepository {
    /// Create a new SQLite card repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CardRepository for SqliteCardRepository {
    async fn find_by_user(&self, cpf: &str) -> StorageResult<Option<Card>> {
        let card = sqlx::query_as::<_, Card>(
            r#"
            SELECT id, usuario_cpf, saldo, data_validade, data_emissao, created_at
            FROM cartoes
            WHERE usuario_cpf = ?
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    async fn create(&self, card: &Card) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO cartoes (usuario_cpf, saldo, data_validade, data_emissao)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&card.usuario_cpf)
        .bind(card.saldo)
        .bind(card.data_validade)
        .bind(card.data_emissao)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}
