use crate::error::{StorageError, StorageResult};
use crate::messages::DisplayMessages;
use crate::models::{Bike, Rental, Station};
use crate::repositories::{
    BikeRepository, CardRepository, FineRepository, RentalRepository, SqliteBikeRepository,
    SqliteCardRepository, SqliteFineRepository, SqliteRentalRepository, SqliteStationRepository,
    SqliteUserRepository, StationRepository, UserRepository,
};
use crate::transaction;
use chrono::{DateTime, Utc};
use ciclovia_core::{BikeStatus, Cpf, RentalStatus};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{info, warn};

/// Pre-flight data shown to the operator before confirming a rental.
#[derive(Debug)]
pub struct StartQuote {
    /// Renting user's name
    pub user_nome: String,

    /// Card balance at check time (R$)
    pub saldo: f64,

    /// The bike to be rented
    pub bike: Bike,

    /// Station where the bike is currently docked
    pub station: Station,
}

/// Result of the read-only rental-start pre-flight.
#[derive(Debug)]
pub enum StartCheck {
    /// All gates passed; quote data for the confirmation prompt
    Eligible(StartQuote),
    /// A gate failed; message identifies the blocking condition
    Denied(String),
}

/// Data describing a rental that was just started.
#[derive(Debug)]
pub struct StartedRental {
    pub rental_id: i64,
    pub bike_id: i64,
    pub user_nome: String,
    pub inicio: DateTime<Utc>,
}

/// Result of the rental-start workflow.
#[derive(Debug)]
pub enum StartOutcome {
    Started(StartedRental),
    Denied(String),
}

/// Data describing a rental that was just returned.
#[derive(Debug)]
pub struct CompletedReturn {
    pub rental_id: i64,
    pub bike_id: i64,
    pub bike_modelo: String,
    pub user_nome: String,
    pub ponto_devolucao_id: i64,
    /// Elapsed duration in fractional minutes (fee basis)
    pub duracao_minutos: f64,
    /// Computed fee (R$)
    pub valor: f64,
}

impl CompletedReturn {
    /// Duration truncated to whole minutes, for display only.
    #[must_use]
    pub fn whole_minutes(&self) -> i64 {
        self.duracao_minutos as i64
    }
}

/// Result of the rental-return workflow.
#[derive(Debug)]
pub enum ReturnOutcome {
    Completed(CompletedReturn),
    Denied(String),
}

/// Rental lifecycle workflow: gated checkout and atomic return.
///
/// # Checkout Flow
///
/// `start` executes a strict sequence of gates, failing fast at the
/// first denial:
///
/// 1. **User Lookup**: deny if the CPF is not registered
/// 2. **Fine Gate**: deny if the user has ANY unpaid fine; the message
///    carries the blocking fine count
/// 3. **Balance Gate**: deny if the user has no card or the balance is
///    below R$ 5,00; the message carries the current balance
/// 4. **Bike Lookup**: deny if the bike does not exist
/// 5. **Availability**: deny unless the bike is DISPONIVEL; the message
///    carries the actual current status
/// 6. **Write**: insert the EM_ANDAMENTO rental (pickup = the bike's
///    station, start = now) and flip the bike to EM_USO with its station
///    cleared, in one transaction: both writes or neither
///
/// # Return Flow
///
/// `finish` validates the rental and the return station, computes the
/// elapsed duration in fractional minutes and the fee (R$ 0,10/min,
/// rounded to cents), then completes the rental and re-docks the bike
/// (DISPONIVEL at the return station, rental count + 1, cumulative
/// minutes + duration) in one transaction.
///
/// The fee is recorded on the rental; the card balance is read by the
/// gate but never debited.
pub struct RentalService {
    pool: SqlitePool,
    user_repo: SqliteUserRepository,
    card_repo: SqliteCardRepository,
    fine_repo: SqliteFineRepository,
    bike_repo: SqliteBikeRepository,
    station_repo: SqliteStationRepository,
    rental_repo: SqliteRentalRepository,
}

impl RentalService {
    /// Create a new rental service over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            user_repo: SqliteUserRepository::new(pool.clone()),
            card_repo: SqliteCardRepository::new(pool.clone()),
            fine_repo: SqliteFineRepository::new(pool.clone()),
            bike_repo: SqliteBikeRepository::new(pool.clone()),
            station_repo: SqliteStationRepository::new(pool.clone()),
            rental_repo: SqliteRentalRepository::new(pool.clone()),
            pool,
        }
    }

    /// Read-only pre-flight: runs every checkout gate without writing.
    ///
    /// The console uses this to show the quote (user, balance, bike
    /// location) and ask for confirmation before calling [`start`].
    ///
    /// [`start`]: RentalService::start
    pub async fn check_start(&self, cpf: &Cpf, bike_id: i64) -> StorageResult<StartCheck> {
        match self.eligibility(cpf, bike_id).await? {
            Ok(quote) => Ok(StartCheck::Eligible(quote)),
            Err(reason) => Ok(StartCheck::Denied(reason)),
        }
    }

    /// Start a rental: run the gates, then insert the rental and flip
    /// the bike atomically.
    ///
    /// # Errors
    ///
    /// Returns error only on database failures; every business-rule
    /// rejection comes back as `StartOutcome::Denied` with the message
    /// identifying the blocking condition.
    pub async fn start(&self, cpf: &Cpf, bike_id: i64) -> StorageResult<StartOutcome> {
        let quote = match self.eligibility(cpf, bike_id).await? {
            Ok(quote) => quote,
            Err(reason) => {
                warn!(cpf = %cpf, bike_id, %reason, "aluguel negado");
                return Ok(StartOutcome::Denied(reason));
            }
        };

        let inicio = Utc::now();
        let rental = Rental {
            id: 0,
            bike_id,
            usuario_cpf: cpf.as_str().to_string(),
            ponto_retirada_id: quote.station.id,
            data_hora_inicio: inicio,
            data_hora_fim: None,
            ponto_devolucao_id: None,
            status: RentalStatus::EmAndamento.as_str().to_string(),
            valor_aluguel: None,
        };

        let mut tx = self.pool.begin().await?;
        let rental_id = match Self::write_start(&mut tx, &rental).await {
            Ok(id) => id,
            Err(e) => {
                tx.rollback().await?;
                return Err(e);
            }
        };
        tx.commit().await?;

        info!(rental_id, bike_id, cpf = %cpf, "aluguel registrado");

        Ok(StartOutcome::Started(StartedRental {
            rental_id,
            bike_id,
            user_nome: quote.user_nome,
            inicio,
        }))
    }

    /// Return a rental at the given station.
    ///
    /// # Errors
    ///
    /// Returns error only on database failures; rejections (unknown
    /// rental/station, rental not in progress) come back as
    /// `ReturnOutcome::Denied`.
    pub async fn finish(
        &self,
        rental_id: i64,
        ponto_devolucao_id: i64,
    ) -> StorageResult<ReturnOutcome> {
        let Some(rental) = self.rental_repo.find_by_id(rental_id).await? else {
            return Ok(ReturnOutcome::Denied(
                DisplayMessages::RENTAL_NOT_FOUND.to_string(),
            ));
        };

        if !self.station_repo.exists(ponto_devolucao_id).await? {
            return Ok(ReturnOutcome::Denied(
                DisplayMessages::STATION_NOT_FOUND.to_string(),
            ));
        }

        if !rental.is_em_andamento() {
            return Ok(ReturnOutcome::Denied(format!(
                "{} (status: {})",
                DisplayMessages::RENTAL_NOT_ACTIVE,
                rental.status
            )));
        }

        // Display data, fetched before the writes
        let user_nome = self
            .user_repo
            .find_by_cpf(&rental.usuario_cpf)
            .await?
            .map(|u| u.nome)
            .ok_or_else(|| {
                StorageError::ReferentialIntegrity(format!(
                    "rental {rental_id} references unknown user {}",
                    rental.usuario_cpf
                ))
            })?;
        let bike_modelo = self
            .bike_repo
            .find_by_id(rental.bike_id)
            .await?
            .map(|b| b.modelo)
            .ok_or_else(|| {
                StorageError::ReferentialIntegrity(format!(
                    "rental {rental_id} references unknown bike {}",
                    rental.bike_id
                ))
            })?;

        let fim = Utc::now();
        // Fractional minutes feed the fee; truncation is display-only
        let duracao_minutos = rental.elapsed_minutes(fim);
        let valor = Rental::fee_for(duracao_minutos);

        let mut tx = self.pool.begin().await?;
        if let Err(e) = Self::write_return(
            &mut tx,
            rental_id,
            rental.bike_id,
            ponto_devolucao_id,
            fim,
            duracao_minutos,
            valor,
        )
        .await
        {
            tx.rollback().await?;
            return Err(e);
        }
        tx.commit().await?;

        info!(
            rental_id,
            bike_id = rental.bike_id,
            ponto_devolucao_id,
            valor,
            "devolucao concluida"
        );

        Ok(ReturnOutcome::Completed(CompletedReturn {
            rental_id,
            bike_id: rental.bike_id,
            bike_modelo,
            user_nome,
            ponto_devolucao_id,
            duracao_minutos,
            valor,
        }))
    }

    /// Run every checkout gate; `Err(message)` is a business denial.
    async fn eligibility(
        &self,
        cpf: &Cpf,
        bike_id: i64,
    ) -> StorageResult<Result<StartQuote, String>> {
        // Gate 1: user exists
        let Some(user) = self.user_repo.find_by_cpf(cpf.as_str()).await? else {
            return Ok(Err(DisplayMessages::USER_NOT_FOUND.to_string()));
        };

        // Gate 2: unpaid fines block every new rental
        let multas = self.fine_repo.count_unpaid_by_user(cpf.as_str()).await?;
        if multas > 0 {
            return Ok(Err(format!(
                "{} ({} multa(s) pendente(s))",
                DisplayMessages::UNPAID_FINES,
                multas
            )));
        }

        // Gate 3: card present with minimum balance
        let Some(card) = self.card_repo.find_by_user(cpf.as_str()).await? else {
            return Ok(Err(DisplayMessages::NO_CARD.to_string()));
        };
        if !card.has_min_balance() {
            return Ok(Err(format!(
                "{} (saldo atual: R$ {:.2})",
                DisplayMessages::INSUFFICIENT_BALANCE,
                card.saldo
            )));
        }

        // Gate 4: bike exists
        let Some(bike) = self.bike_repo.find_by_id(bike_id).await? else {
            return Ok(Err(DisplayMessages::BIKE_NOT_FOUND.to_string()));
        };

        // Gate 5: bike available; report the actual status otherwise
        if !bike.is_disponivel() {
            return Ok(Err(format!(
                "{} (status atual: {})",
                DisplayMessages::BIKE_UNAVAILABLE,
                bike.status
            )));
        }

        // DISPONIVEL guarantees a docking station (schema invariant)
        let ponto_id = bike.ponto_atual_id.ok_or_else(|| {
            StorageError::ReferentialIntegrity(format!(
                "bike {bike_id} is DISPONIVEL with no docking station"
            ))
        })?;
        let station = self.station_repo.find_by_id(ponto_id).await?.ok_or_else(|| {
            StorageError::ReferentialIntegrity(format!(
                "bike {bike_id} references unknown station {ponto_id}"
            ))
        })?;

        Ok(Ok(StartQuote {
            user_nome: user.nome,
            saldo: card.saldo,
            bike,
            station,
        }))
    }

    async fn write_start(tx: &mut Transaction<'_, Sqlite>, rental: &Rental) -> StorageResult<i64> {
        let rental_id = transaction::create_rental(tx, rental).await?;
        transaction::set_bike_status(tx, rental.bike_id, BikeStatus::EmUso, None).await?;
        Ok(rental_id)
    }

    #[allow(clippy::too_many_arguments)]
    async fn write_return(
        tx: &mut Transaction<'_, Sqlite>,
        rental_id: i64,
        bike_id: i64,
        ponto_devolucao_id: i64,
        fim: DateTime<Utc>,
        duracao_minutos: f64,
        valor: f64,
    ) -> StorageResult<()> {
        transaction::complete_rental(tx, rental_id, ponto_devolucao_id, fim, valor).await?;
        transaction::apply_return_to_bike(tx, bike_id, ponto_devolucao_id, duracao_minutos).await?;
        Ok(())
    }
}
