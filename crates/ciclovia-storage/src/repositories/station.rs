#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::Station;
use sqlx::SqlitePool;

/// Repository trait for Station (ponto) entity operations
pub trait StationRepository: Send + Sync {
    /// Find a station by its id
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Station>>;

    /// Check if a station exists
    async fn exists(&self, id: i64) -> StorageResult<bool>;

    /// Create a new station, returning its id
    async fn create(&self, station: &Station) -> StorageResult<i64>;
}

/// SQLite implementation of StationRepository
pub struct SqliteStationRepository {
    pool: SqlitePool,
}

impl SqliteStationRepository {
    /// Create a new SQLite station repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl StationRepository for SqliteStationRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            r#"
            SELECT id, rua, numero, bairro, cidade, uf,
                   referencia, capacidade_maxima, created_at
            FROM pontos
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    async fn exists(&self, id: i64) -> StorageResult<bool> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pontos WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(result.0 > 0)
    }

    async fn create(&self, station: &Station) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO pontos (rua, numero, bairro, cidade, uf, referencia, capacidade_maxima)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&station.rua)
        .bind(&station.numero)
        .bind(&station.bairro)
        .bind(&station.cidade)
        .bind(&station.uf)
        .bind(&station.referencia)
        .bind(station.capacidade_maxima)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use chrono::Utc;

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    fn create_test_station(rua: &str, capacidade: i64) -> Station {
        Station {
            id: 0,
            rua: rua.to_string(),
            numero: Some("100".to_string()),
            bairro: Some("Centro".to_string()),
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            referencia: None,
            capacidade_maxima: capacidade,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_create_and_find_station() {
        let db = setup_test_db().await;
        let repo = SqliteStationRepository::new(db.pool().clone());

        let id = repo
            .create(&create_test_station("Av. Trabalhador", 20))
            .await
            .unwrap();
        assert!(id > 0);

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.rua, "Av. Trabalhador");
        assert_eq!(found.capacidade_maxima, 20);
    }

    #[tokio::test]
    async fn test_exists() {
        let db = setup_test_db().await;
        let repo = SqliteStationRepository::new(db.pool().clone());

        let id = repo
            .create(&create_test_station("Rua Episcopal", 10))
            .await
            .unwrap();

        assert!(repo.exists(id).await.unwrap());
        assert!(!repo.exists(id + 100).await.unwrap());
    }

    #[tokio::test]
    async fn test_capacity_bounds_enforced_by_schema() {
        let db = setup_test_db().await;
        let repo = SqliteStationRepository::new(db.pool().clone());

        assert!(repo.create(&create_test_station("Rua X", 0)).await.is_err());
        assert!(
            repo.create(&create_test_station("Rua Y", 101))
                .await
                .is_err()
        );
    }
}
