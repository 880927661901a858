use crate::error::StorageResult;
use crate::messages::DisplayMessages;
use crate::models::MaintenanceTicket;
use crate::repositories::{
    BikeRepository, SqliteBikeRepository, SqliteStationRepository, StationRepository,
};
use crate::transaction;
use chrono::Utc;
use ciclovia_core::{BikeStatus, MaintenanceKind};
use sqlx::SqlitePool;
use tracing::{info, warn};

/// Result of opening a maintenance ticket.
#[derive(Debug)]
pub enum OpenOutcome {
    /// Ticket created; bike moved to MANUTENCAO
    Opened { ticket_id: i64 },
    /// The bike already has an open ticket; warning, nothing changed
    AlreadyInMaintenance,
    /// Blocked (unknown bike, or bike on an active rental)
    Denied(String),
}

/// Result of closing a maintenance ticket.
#[derive(Debug)]
pub enum CloseOutcome {
    /// Ticket closed; bike re-docked DISPONIVEL at the destination
    Closed { bike_id: i64, valor: f64, ponto_id: i64 },
    /// Rejected (unknown station, or no open ticket for the bike)
    Denied(String),
}

/// Maintenance workflow: open and close repair tickets.
///
/// Opening blocks while the bike is rented (EM_USO) and is a warning
/// no-op when the bike is already MANUTENCAO, so at most one open ticket
/// exists per bike. Both open and close pair the ticket write with the
/// bike status flip in a single transaction.
pub struct MaintenanceService {
    pool: SqlitePool,
    bike_repo: SqliteBikeRepository,
    station_repo: SqliteStationRepository,
}

impl MaintenanceService {
    /// Create a new maintenance service over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            bike_repo: SqliteBikeRepository::new(pool.clone()),
            station_repo: SqliteStationRepository::new(pool.clone()),
            pool,
        }
    }

    /// Open a ticket for a bike and take it out of service.
    ///
    /// # Errors
    ///
    /// Returns error only on database failures; business blocks come
    /// back as `OpenOutcome::Denied` / `OpenOutcome::AlreadyInMaintenance`.
    pub async fn open(
        &self,
        bike_id: i64,
        kind: MaintenanceKind,
        descricao_problema: &str,
    ) -> StorageResult<OpenOutcome> {
        let Some(bike) = self.bike_repo.find_by_id(bike_id).await? else {
            return Ok(OpenOutcome::Denied(
                DisplayMessages::BIKE_NOT_FOUND.to_string(),
            ));
        };

        match bike.get_status() {
            Some(BikeStatus::EmUso) => {
                warn!(bike_id, "manutencao bloqueada: bike alugada");
                return Ok(OpenOutcome::Denied(DisplayMessages::BIKE_RENTED.to_string()));
            }
            Some(BikeStatus::Manutencao) => {
                return Ok(OpenOutcome::AlreadyInMaintenance);
            }
            _ => {}
        }

        let ticket = MaintenanceTicket {
            id: 0,
            bike_id,
            tipo: kind.as_str().to_string(),
            descricao_problema: descricao_problema.to_string(),
            data_inicio: Utc::now(),
            data_fim: None,
            valor: 0.0,
        };

        let mut tx = self.pool.begin().await?;
        let ticket_id = match transaction::open_maintenance(&mut tx, &ticket).await {
            Ok(id) => id,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        if let Err(e) =
            transaction::set_bike_status(&mut tx, bike_id, BikeStatus::Manutencao, None).await
        {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;

        info!(ticket_id, bike_id, kind = kind.as_str(), "manutencao aberta");
        Ok(OpenOutcome::Opened { ticket_id })
    }

    /// Close the open ticket of a bike, recording the repair cost, and
    /// re-dock the bike at the destination station.
    ///
    /// Zero matched tickets means nothing to close: the operation is
    /// rejected and the bike record is not touched.
    ///
    /// # Errors
    ///
    /// Returns error only on database failures.
    pub async fn close(
        &self,
        bike_id: i64,
        valor: f64,
        ponto_destino_id: i64,
    ) -> StorageResult<CloseOutcome> {
        if !self.station_repo.exists(ponto_destino_id).await? {
            return Ok(CloseOutcome::Denied(
                DisplayMessages::STATION_NOT_FOUND.to_string(),
            ));
        }

        let fim = Utc::now();

        let mut tx = self.pool.begin().await?;
        let rows = match transaction::close_open_maintenance(&mut tx, bike_id, fim, valor).await {
            Ok(rows) => rows,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        if rows == 0 {
            tx.rollback().await?;
            warn!(bike_id, "nenhuma manutencao aberta para fechar");
            return Ok(CloseOutcome::Denied(
                DisplayMessages::NO_OPEN_TICKET.to_string(),
            ));
        }
        if let Err(e) = transaction::set_bike_status(
            &mut tx,
            bike_id,
            BikeStatus::Disponivel,
            Some(ponto_destino_id),
        )
        .await
        {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;

        info!(bike_id, valor, ponto_destino_id, "manutencao encerrada");
        Ok(CloseOutcome::Closed {
            bike_id,
            valor,
            ponto_id: ponto_destino_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::Database;
    use crate::models::{Bike, Station};
    use crate::repositories::{MaintenanceRepository, SqliteMaintenanceRepository};

    async fn setup_test_db() -> Database {
        Database::in_memory().await.unwrap()
    }

    async fn seed_station(db: &Database) -> i64 {
        let station = Station {
            id: 0,
            rua: "Rua Oficina".to_string(),
            numero: None,
            bairro: None,
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            referencia: None,
            capacidade_maxima: 10,
            created_at: Utc::now(),
        };
        SqliteStationRepository::new(db.pool().clone())
            .create(&station)
            .await
            .unwrap()
    }

    async fn seed_bike(db: &Database, ponto_id: i64, status: BikeStatus) -> i64 {
        let bike = Bike {
            id: 0,
            modelo: "Oficina Bike".to_string(),
            ano_fabricacao: 2020,
            cor: "Prata".to_string(),
            status: status.as_str().to_string(),
            qnt_alugueis: 0,
            tempo_total_utilizado: 0.0,
            ponto_atual_id: if status == BikeStatus::Disponivel {
                Some(ponto_id)
            } else {
                None
            },
            created_at: Utc::now(),
        };
        SqliteBikeRepository::new(db.pool().clone())
            .create(&bike)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_open_then_close_round_trip() {
        let db = setup_test_db().await;
        let ponto_id = seed_station(&db).await;
        let bike_id = seed_bike(&db, ponto_id, BikeStatus::Disponivel).await;

        let service = MaintenanceService::new(db.pool().clone());

        let OpenOutcome::Opened { ticket_id } = service
            .open(bike_id, MaintenanceKind::Corretiva, "Pneu dianteiro furado")
            .await
            .unwrap()
        else {
            panic!("expected ticket to open");
        };
        assert!(ticket_id > 0);

        // Bike held by the ticket, station cleared
        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::Manutencao));
        assert!(bike.ponto_atual_id.is_none());

        let CloseOutcome::Closed { valor, .. } =
            service.close(bike_id, 75.50, ponto_id).await.unwrap()
        else {
            panic!("expected ticket to close");
        };
        assert_eq!(valor, 75.50);

        // Ticket closed with the cost recorded
        let open = SqliteMaintenanceRepository::new(db.pool().clone())
            .find_open_by_bike(bike_id)
            .await
            .unwrap();
        assert!(open.is_none());

        // Bike back in service at the destination
        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::Disponivel));
        assert_eq!(bike.ponto_atual_id, Some(ponto_id));
    }

    #[tokio::test]
    async fn test_open_blocked_while_rented() {
        let db = setup_test_db().await;
        let ponto_id = seed_station(&db).await;
        let bike_id = seed_bike(&db, ponto_id, BikeStatus::EmUso).await;

        let service = MaintenanceService::new(db.pool().clone());
        let outcome = service
            .open(bike_id, MaintenanceKind::Preventiva, "Revisao geral programada")
            .await
            .unwrap();

        let OpenOutcome::Denied(reason) = outcome else {
            panic!("expected block");
        };
        assert_eq!(reason, DisplayMessages::BIKE_RENTED);

        // Bike record unchanged
        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::EmUso));

        // And no ticket was created
        let open = SqliteMaintenanceRepository::new(db.pool().clone())
            .find_open_by_bike(bike_id)
            .await
            .unwrap();
        assert!(open.is_none());
    }

    #[tokio::test]
    async fn test_open_twice_is_warning_noop() {
        let db = setup_test_db().await;
        let ponto_id = seed_station(&db).await;
        let bike_id = seed_bike(&db, ponto_id, BikeStatus::Disponivel).await;

        let service = MaintenanceService::new(db.pool().clone());
        service
            .open(bike_id, MaintenanceKind::Corretiva, "Cambio desregulado total")
            .await
            .unwrap();

        let outcome = service
            .open(bike_id, MaintenanceKind::Corretiva, "Tentativa duplicada aqui")
            .await
            .unwrap();
        assert!(matches!(outcome, OpenOutcome::AlreadyInMaintenance));

        // Still exactly one open ticket
        let repo = SqliteMaintenanceRepository::new(db.pool().clone());
        let ticket = repo.find_open_by_bike(bike_id).await.unwrap().unwrap();
        assert_eq!(ticket.descricao_problema, "Cambio desregulado total");
    }

    #[tokio::test]
    async fn test_open_denied_for_unknown_bike() {
        let db = setup_test_db().await;
        let service = MaintenanceService::new(db.pool().clone());

        let outcome = service
            .open(999, MaintenanceKind::Antecipada, "Troca antecipada de pecas")
            .await
            .unwrap();

        let OpenOutcome::Denied(reason) = outcome else {
            panic!("expected denial");
        };
        assert_eq!(reason, DisplayMessages::BIKE_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_close_without_open_ticket_leaves_bike_unchanged() {
        let db = setup_test_db().await;
        let ponto_id = seed_station(&db).await;
        let bike_id = seed_bike(&db, ponto_id, BikeStatus::Disponivel).await;

        let service = MaintenanceService::new(db.pool().clone());
        let outcome = service.close(bike_id, 10.00, ponto_id).await.unwrap();

        let CloseOutcome::Denied(reason) = outcome else {
            panic!("expected denial");
        };
        assert_eq!(reason, DisplayMessages::NO_OPEN_TICKET);

        let bike = SqliteBikeRepository::new(db.pool().clone())
            .find_by_id(bike_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(bike.get_status(), Some(BikeStatus::Disponivel));
        assert_eq!(bike.ponto_atual_id, Some(ponto_id));
    }

    #[tokio::test]
    async fn test_close_denied_for_unknown_station() {
        let db = setup_test_db().await;
        let ponto_id = seed_station(&db).await;
        let bike_id = seed_bike(&db, ponto_id, BikeStatus::Disponivel).await;

        let service = MaintenanceService::new(db.pool().clone());
        service
            .open(bike_id, MaintenanceKind::Corretiva, "Guidao torto apos queda")
            .await
            .unwrap();

        let outcome = service.close(bike_id, 40.00, 999).await.unwrap();
        let CloseOutcome::Denied(reason) = outcome else {
            panic!("expected denial");
        };
        assert_eq!(reason, DisplayMessages::STATION_NOT_FOUND);

        // Ticket still open
        let open = SqliteMaintenanceRepository::new(db.pool().clone())
            .find_open_by_bike(bike_id)
            .await
            .unwrap();
        assert!(open.is_some());
    }
}
