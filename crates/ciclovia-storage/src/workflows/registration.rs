use crate::error::{StorageError, StorageResult};
use crate::models::{Bike, Card, Station, User};
use crate::repositories::{
    BikeRepository, SqliteBikeRepository, SqliteStationRepository, SqliteUserRepository,
    StationRepository, UserRepository,
};
use crate::transaction;
use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::info;

/// Result of the unified user + card registration.
#[derive(Debug)]
pub enum UserRegistration {
    /// User and card created together
    Registered { card_id: i64 },
    /// The CPF is already registered; nothing inserted
    DuplicateCpf,
}

/// Result of registering a bike.
#[derive(Debug)]
pub enum BikeRegistration {
    Registered { bike_id: i64 },
    /// The initial docking station does not exist
    StationNotFound,
}

/// Registration workflows: user + card, docking station, bike.
///
/// Field-level validation (CPF shape, dates, UF, capacity and year
/// bounds, card validity window) happens at the prompt layer before
/// these methods run; here the remaining checks are uniqueness and
/// referential existence, followed by the inserts. The user + card pair
/// is one atomic unit: a failure inserting the card keeps the user out
/// as well.
pub struct RegistrationService {
    pool: SqlitePool,
    user_repo: SqliteUserRepository,
    station_repo: SqliteStationRepository,
    bike_repo: SqliteBikeRepository,
}

impl RegistrationService {
    /// Create a new registration service over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repo: SqliteUserRepository::new(pool.clone()),
            station_repo: SqliteStationRepository::new(pool.clone()),
            bike_repo: SqliteBikeRepository::new(pool.clone()),
            pool,
        }
    }

    /// Register a user together with their card, atomically.
    ///
    /// The card is issued now with the given opening balance and expiry
    /// date (window-validated upstream).
    ///
    /// # Errors
    ///
    /// Returns error only on database failures; a duplicate CPF comes
    /// back as `UserRegistration::DuplicateCpf`.
    pub async fn register_user_with_card(
        &self,
        user: &User,
        saldo_inicial: f64,
        data_validade: NaiveDate,
    ) -> StorageResult<UserRegistration> {
        if self.user_repo.exists_by_cpf(&user.cpf).await? {
            return Ok(UserRegistration::DuplicateCpf);
        }

        let card = Card {
            id: 0,
            usuario_cpf: user.cpf.clone(),
            saldo: saldo_inicial,
            data_validade,
            data_emissao: Utc::now(),
            created_at: Utc::now(),
        };

        let mut tx = self.pool.begin().await?;
        if let Err(e) = transaction::create_user(&mut tx, user).await {
            tx.rollback().await?;
            return Err(e);
        }
        let card_id = match transaction::create_card(&mut tx, &card).await {
            Ok(id) => id,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        tx.commit().await?;

        info!(cpf = %user.cpf, card_id, "usuario cadastrado com cartao");
        Ok(UserRegistration::Registered { card_id })
    }

    /// Register a docking station, returning its id.
    pub async fn register_station(&self, station: &Station) -> StorageResult<i64> {
        let id = self.station_repo.create(station).await?;
        info!(ponto_id = id, capacidade = station.capacidade_maxima, "ponto registrado");
        Ok(id)
    }

    /// Register a bike at its initial docking station.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ReferentialIntegrity` if the bike comes
    /// without an initial station; an unknown station id comes back as
    /// `BikeRegistration::StationNotFound`.
    pub async fn register_bike(&self, bike: &Bike) -> StorageResult<BikeRegistration> {
        let Some(ponto_id) = bike.ponto_atual_id else {
            return Err(StorageError::ReferentialIntegrity(
                "bike registration requires an initial docking station".to_string(),
            ));
        };

        if !self.station_repo.exists(ponto_id).await? {
            return Ok(BikeRegistration::StationNotFound);
        }

        let bike_id = self.bike_repo.create(bike).await?;
        info!(bike_id, ponto_id, modelo = %bike.modelo, "bike adicionada a frota");
        Ok(BikeRegistration::Registered { bike_id })
    }
}
