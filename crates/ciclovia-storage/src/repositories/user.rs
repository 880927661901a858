#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::User;
use sqlx::SqlitePool;

/// Repository trait for User entity operations
///
/// This trait defines the contract for user data access, enabling
/// testability through mock implementations and separation of concerns.
///
/// # Implementation Note
///
/// This trait uses native async trait methods (Edition 2024 feature),
/// eliminating the need for the async-trait crate while maintaining
/// full async/await support in trait methods.
pub trait UserRepository: Send + Sync {
    /// Find a user by their CPF
    async fn find_by_cpf(&self, cpf: &str) -> StorageResult<Option<User>>;

    /// Check if a CPF is already registered
    async fn exists_by_cpf(&self, cpf: &str) -> StorageResult<bool>;

    /// Create a new user
    async fn create(&self, user: &User) -> StorageResult<()>;
}

/// SQLite implementation of UserRepository
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new SQLite user repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserRepository for SqliteUserRepository {
    async fn find_by_cpf(&self, cpf: &str) -> StorageResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT cpf, nome, data_nasc, rua, numero, bairro,
                   cidade, uf, is_cad_unico, created_at
            FROM usuarios
            WHERE cpf = ?
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn exists_by_cpf(&self, cpf: &str) -> StorageResult<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios WHERE cpf = ?")
            .bind(cpf)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn create(&self, user: &User) -> StorageResult<()> {
        sqlx::query(
            r#"
            INSERT INTO usuarios (
                cpf, nome, data_nasc, rua, numero, bairro,
                cidade, uf, is_cad_unico
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.cpf)
        .bind(&user.nome)
        .bind(user.data_nasc)
        .bind(&user.rua)
        .bind(&user.numero)
        .bind(&user.bairro)
        .bind(&user.cidade)
        .bind(&user.uf)
        .bind(user.is_cad_unico)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
