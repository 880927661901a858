#![allow(async_fn_in_trait)]

use crate::error::StorageResult;
use crate::models::Rental;
use sqlx::SqlitePool;

/// Repository trait for Rental (aluguel) entity operations
///
/// Rental creation normally happens inside the rental-start transaction
/// (see [`crate::transaction::create_rental`]); the standalone `create`
/// here inserts a complete row directly and exists for seeding and for
/// the few flows that replay historical data.
pub trait RentalRepository: Send + Sync {
    /// Find a rental by its id
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Rental>>;

    /// Find the in-progress rentals of a user
    async fn find_active_by_user(&self, cpf: &str) -> StorageResult<Vec<Rental>>;

    /// Insert a complete rental row, returning its id
    async fn create(&self, rental: &Rental) -> StorageResult<i64>;
}

/// SQLite implementation of RentalRepository
pub struct SqliteRentalRepository {
    pool: SqlitePool,
}

impl SqliteRentalRepository {
    /// Create a new SQLite rental repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl RentalRepository for SqliteRentalRepository {
    async fn find_by_id(&self, id: i64) -> StorageResult<Option<Rental>> {
        let rental = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, bike_id, usuario_cpf, ponto_retirada_id,
                   data_hora_inicio, data_hora_fim, ponto_devolucao_id,
                   status, valor_aluguel
            FROM alugueis
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(rental)
    }

    async fn find_active_by_user(&self, cpf: &str) -> StorageResult<Vec<Rental>> {
        let rentals = sqlx::query_as::<_, Rental>(
            r#"
            SELECT id, bike_id, usuario_cpf, ponto_retirada_id,
                   data_hora_inicio, data_hora_fim, ponto_devolucao_id,
                   status, valor_aluguel
            FROM alugueis
            WHERE usuario_cpf = ? AND status = 'EM_ANDAMENTO'
            ORDER BY data_hora_inicio DESC
            "#,
        )
        .bind(cpf)
        .fetch_all(&self.pool)
        .await?;

        Ok(rentals)
    }

    async fn create(&self, rental: &Rental) -> StorageResult<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO alugueis (
                bike_id, usuario_cpf, ponto_retirada_id,
                data_hora_inicio, data_hora_fim, ponto_devolucao_id,
                status, valor_aluguel
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(rental.bike_id)
        .bind(&rental.usuario_cpf)
        .bind(rental.ponto_retirada_id)
        .bind(rental.data_hora_inicio)
        .bind(rental.data_hora_fim)
        .bind(rental.ponto_devolucao_id)
        .bind(&rental.status)
        .bind(rental.valor_aluguel)
        .execute(&self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::models::{Bike, Station, User};
    use crate::repositories::{
        BikeRepository, SqliteBikeRepository, SqliteStationRepository, SqliteUserRepository,
        StationRepository, UserRepository,
    };
    use chrono::{Duration, NaiveDate, Utc};
    use ciclovia_core::{BikeStatus, RentalStatus};

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    async fn seed_fleet(db: &Database, cpf: &str) -> (i64, i64) {
        let user = User {
            cpf: cpf.to_string(),
            nome: "Rider".to_string(),
            data_nasc: NaiveDate::from_ymd_opt(1992, 7, 1).unwrap(),
            rua: None,
            numero: None,
            bairro: None,
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            is_cad_unico: false,
            created_at: Utc::now(),
        };
        SqliteUserRepository::new(db.pool().clone())
            .create(&user)
            .await
            .unwrap();

        let station = Station {
            id: 0,
            rua: "Rua 1".to_string(),
            numero: None,
            bairro: None,
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            referencia: None,
            capacidade_maxima: 10,
            created_at: Utc::now(),
        };
        let ponto_id = SqliteStationRepository::new(db.pool().clone())
            .create(&station)
            .await
            .unwrap();

        let bike = Bike {
            id: 0,
            modelo: "Monark".to_string(),
            ano_fabricacao: 2020,
            cor: "Preta".to_string(),
            status: BikeStatus::Disponivel.as_str().to_string(),
            qnt_alugueis: 0,
            tempo_total_utilizado: 0.0,
            ponto_atual_id: Some(ponto_id),
            created_at: Utc::now(),
        };
        let bike_id = SqliteBikeRepository::new(db.pool().clone())
            .create(&bike)
            .await
            .unwrap();

        (bike_id, ponto_id)
    }

    fn active_rental(bike_id: i64, cpf: &str, ponto_id: i64, minutes_ago: i64) -> Rental {
        Rental {
            id: 0,
            bike_id,
            usuario_cpf: cpf.to_string(),
            ponto_retirada_id: ponto_id,
            data_hora_inicio: Utc::now() - Duration::minutes(minutes_ago),
            data_hora_fim: None,
            ponto_devolucao_id: None,
            status: RentalStatus::EmAndamento.as_str().to_string(),
            valor_aluguel: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_find_rental() {
        let db = setup_test_db().await;
        let (bike_id, ponto_id) = seed_fleet(&db, "11111111111").await;

        let repo = SqliteRentalRepository::new(db.pool().clone());
        let id = repo
            .create(&active_rental(bike_id, "11111111111", ponto_id, 5))
            .await
            .unwrap();

        let found = repo.find_by_id(id).await.unwrap().unwrap();
        assert!(found.is_em_andamento());
        assert_eq!(found.bike_id, bike_id);
        assert!(found.data_hora_fim.is_none());
        assert!(found.valor_aluguel.is_none());
    }

    #[tokio::test]
    async fn test_find_active_by_user() {
        let db = setup_test_db().await;
        let (bike_id, ponto_id) = seed_fleet(&db, "22222222222").await;

        let repo = SqliteRentalRepository::new(db.pool().clone());
        repo.create(&active_rental(bike_id, "22222222222", ponto_id, 5))
            .await
            .unwrap();

        let mut completed = active_rental(bike_id, "22222222222", ponto_id, 60);
        completed.status = RentalStatus::Concluido.as_str().to_string();
        completed.data_hora_fim = Some(Utc::now());
        completed.ponto_devolucao_id = Some(ponto_id);
        completed.valor_aluguel = Some(5.50);
        repo.create(&completed).await.unwrap();

        let active = repo.find_active_by_user("22222222222").await.unwrap();
        assert_eq!(active.len(), 1);
        assert!(active[0].is_em_andamento());
    }
}
