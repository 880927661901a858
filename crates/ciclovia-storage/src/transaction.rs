//! Transaction-aware repository operations for atomic multistep workflows.
//!
//! These functions accept a SQLite transaction reference, allowing
//! multiple writes to be grouped into a single atomic unit. Every
//! workflow that touches more than one table goes through here:
//!
//! - **Registration**: user insert + card insert
//! - **Rental start**: rental insert + bike status flip
//! - **Rental return**: rental completion + bike stats/status update
//! - **Maintenance**: ticket open/close + bike status flip
//!
//! # Usage Pattern
//!
//! ```no_run
//! use ciclovia_storage::{Database, DatabaseConfig, transaction};
//! use ciclovia_core::BikeStatus;
//!
//! # async fn example(rental: ciclovia_storage::models::Rental) -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("ciclovia.db")).await?;
//!
//! // Begin transaction
//! let mut tx = db.pool().begin().await?;
//!
//! // Perform multiple operations atomically
//! let rental_id = transaction::create_rental(&mut tx, &rental).await?;
//! transaction::set_bike_status(&mut tx, rental.bike_id, BikeStatus::EmUso, None).await?;
//!
//! // Commit - both operations succeed or both fail
//! tx.commit().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Atomic Guarantees
//!
//! All operations within a transaction are guaranteed to either all
//! succeed or all fail. On any error the caller rolls the transaction
//! back (explicitly, or by dropping it) before reporting the failure, so
//! no partial write is ever visible.

use crate::error::{StorageError, StorageResult};
use crate::models::{Card, MaintenanceTicket, Rental, User};
use chrono::{DateTime, Utc};
use ciclovia_core::{BikeStatus, RentalStatus};
use sqlx::{Sqlite, Transaction};

/// Create a new user within a transaction
///
/// # Errors
///
/// Returns error if:
/// - Unique constraint violation (duplicate CPF)
/// - Database constraints violated
/// - Transaction is already committed or rolled back
pub async fn create_user(tx: &mut Transaction<'_, Sqlite>, user: &User) -> StorageResult<()> {
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
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Create a new card within a transaction
///
/// # Returns
///
/// Returns the auto-generated card ID on success
///
/// # Errors
///
/// Returns error if:
/// - Unique constraint violation (user already has a card)
/// - Foreign key constraint violation (unknown CPF)
/// - Transaction is already committed or rolled back
pub async fn create_card(tx: &mut Transaction<'_, Sqlite>, card: &Card) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Create a new rental within a transaction
///
/// # Returns
///
/// Returns the auto-generated rental ID on success
///
/// # Errors
///
/// Returns error on foreign key violations (unknown bike, user, or
/// pickup station) or if the transaction is no longer active.
pub async fn create_rental(
    tx: &mut Transaction<'_, Sqlite>,
    rental: &Rental,
) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Flip a bike's status and docking station in one statement.
///
/// Status and station move together (the `bikes` CHECK enforces it):
/// pass the station for `DISPONIVEL`, `None` for `EM_USO`/`MANUTENCAO`.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the bike does not exist.
pub async fn set_bike_status(
    tx: &mut Transaction<'_, Sqlite>,
    bike_id: i64,
    status: BikeStatus,
    ponto_id: Option<i64>,
) -> StorageResult<()> {
    let result = sqlx::query("UPDATE bikes SET status = ?, ponto_atual_id = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(ponto_id)
        .bind(bike_id)
        .execute(&mut **tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity_type: "Bike".to_string(),
            field: "id".to_string(),
            value: bike_id.to_string(),
        });
    }

    Ok(())
}

/// Move a rental to its terminal state within a transaction.
///
/// Sets the end timestamp, return station, CONCLUIDO status, and the
/// computed fee in a single statement.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the rental does not exist.
pub async fn complete_rental(
    tx: &mut Transaction<'_, Sqlite>,
    rental_id: i64,
    ponto_devolucao_id: i64,
    fim: DateTime<Utc>,
    valor: f64,
) -> StorageResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE alugueis
        SET data_hora_fim = ?, ponto_devolucao_id = ?, status = ?, valor_aluguel = ?
        WHERE id = ?
        "#,
    )
    .bind(fim)
    .bind(ponto_devolucao_id)
    .bind(RentalStatus::Concluido.as_str())
    .bind(valor)
    .bind(rental_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity_type: "Rental".to_string(),
            field: "id".to_string(),
            value: rental_id.to_string(),
        });
    }

    Ok(())
}

/// Apply a completed return to the bike in one statement: back to
/// DISPONIVEL at the return station, rental count + 1, cumulative usage
/// minutes + the computed duration.
///
/// # Errors
///
/// Returns `StorageError::NotFound` if the bike does not exist.
pub async fn apply_return_to_bike(
    tx: &mut Transaction<'_, Sqlite>,
    bike_id: i64,
    ponto_id: i64,
    minutos: f64,
) -> StorageResult<()> {
    let result = sqlx::query(
        r#"
        UPDATE bikes
        SET status = ?,
            ponto_atual_id = ?,
            qnt_alugueis = qnt_alugueis + 1,
            tempo_total_utilizado = tempo_total_utilizado + ?
        WHERE id = ?
        "#,
    )
    .bind(BikeStatus::Disponivel.as_str())
    .bind(ponto_id)
    .bind(minutos)
    .bind(bike_id)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(StorageError::NotFound {
            entity_type: "Bike".to_string(),
            field: "id".to_string(),
            value: bike_id.to_string(),
        });
    }

    Ok(())
}

/// Open a maintenance ticket within a transaction
///
/// # Returns
///
/// Returns the auto-generated ticket ID on success
pub async fn open_maintenance(
    tx: &mut Transaction<'_, Sqlite>,
    ticket: &MaintenanceTicket,
) -> StorageResult<i64> {
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
    .execute(&mut **tx)
    .await?;

    Ok(result.last_insert_rowid())
}

/// Close the open ticket (data_fim NULL) of a bike, recording the end
/// timestamp and the repair cost.
///
/// Returns the number of rows affected so the caller can reject the
/// operation (and leave the bike untouched) when no ticket was open.
pub async fn close_open_maintenance(
    tx: &mut Transaction<'_, Sqlite>,
    bike_id: i64,
    fim: DateTime<Utc>,
    valor: f64,
) -> StorageResult<u64> {
    let result = sqlx::query(
        r#"
        UPDATE manutencoes
        SET data_fim = ?, valor = ?
        WHERE bike_id = ? AND data_fim IS NULL
        "#,
    )
    .bind(fim)
    .bind(valor)
    .bind(bike_id)
    .execute(&mut **tx)
    .await?;

    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::models::{Bike, Station};
    use crate::repositories::{
        BikeRepository, SqliteBikeRepository, SqliteStationRepository, StationRepository,
    };
    use chrono::NaiveDate;

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    fn test_user(cpf: &str) -> User {
        User {
            cpf: cpf.to_string(),
            nome: "Transaction Test".to_string(),
            data_nasc: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            rua: None,
            numero: None,
            bairro: None,
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            is_cad_unico: false,
            created_at: Utc::now(),
        }
    }

    fn test_card(cpf: &str) -> Card {
        Card {
            id: 0,
            usuario_cpf: cpf.to_string(),
            saldo: 25.00,
            data_validade: (Utc::now() + chrono::Duration::days(90)).date_naive(),
            data_emissao: Utc::now(),
            created_at: Utc::now(),
        }
    }

    async fn seed_bike(db: &Database) -> (i64, i64) {
        let station = Station {
            id: 0,
            rua: "Rua TX".to_string(),
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
            modelo: "TX Bike".to_string(),
            ano_fabricacao: 2020,
            cor: "Cinza".to_string(),
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

    #[tokio::test]
    async fn test_user_and_card_commit_together() {
        let db = setup_test_db().await;
        let mut tx = db.pool().begin().await.unwrap();

        create_user(&mut tx, &test_user("10000000001")).await.unwrap();
        let card_id = create_card(&mut tx, &test_card("10000000001")).await.unwrap();
        assert!(card_id > 0);

        tx.commit().await.unwrap();

        let found: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM cartoes WHERE usuario_cpf = '10000000001'")
                .fetch_optional(db.pool())
                .await
                .unwrap();

        assert!(found.is_some());
    }

    #[tokio::test]
    async fn test_rollback_discards_user() {
        let db = setup_test_db().await;
        let mut tx = db.pool().begin().await.unwrap();

        create_user(&mut tx, &test_user("10000000002")).await.unwrap();

        // Explicitly rollback
        tx.rollback().await.unwrap();

        let found: Option<(String,)> =
            sqlx::query_as("SELECT cpf FROM usuarios WHERE cpf = '10000000002'")
                .fetch_optional(db.pool())
                .await
                .unwrap();

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_set_bike_status_flips_station_together() {
        let db = setup_test_db().await;
        let (bike_id, ponto_id) = seed_bike(&db).await;

        let mut tx = db.pool().begin().await.unwrap();
        set_bike_status(&mut tx, bike_id, BikeStatus::EmUso, None)
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::EmUso));
        assert!(bike.ponto_atual_id.is_none());

        // And back to available at the station
        let mut tx = db.pool().begin().await.unwrap();
        set_bike_status(&mut tx, bike_id, BikeStatus::Disponivel, Some(ponto_id))
            .await
            .unwrap();
        tx.commit().await.unwrap();

        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::Disponivel));
        assert_eq!(bike.ponto_atual_id, Some(ponto_id));
    }

    #[tokio::test]
    async fn test_set_bike_status_missing_bike() {
        let db = setup_test_db().await;

        let mut tx = db.pool().begin().await.unwrap();
        let result = set_bike_status(&mut tx, 999, BikeStatus::EmUso, None).await;

        assert!(matches!(result, Err(StorageError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_close_open_maintenance_reports_zero_rows() {
        let db = setup_test_db().await;
        let (bike_id, _) = seed_bike(&db).await;

        let mut tx = db.pool().begin().await.unwrap();
        let rows = close_open_maintenance(&mut tx, bike_id, Utc::now(), 50.00)
            .await
            .unwrap();

        assert_eq!(rows, 0);
    }
}
