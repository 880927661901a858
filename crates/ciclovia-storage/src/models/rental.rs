use chrono::{DateTime, Utc};
use ciclovia_core::{RentalStatus, constants::FEE_PER_MINUTE};
use serde::{Deserialize, Serialize};

/// Rental entity (aluguel): one bike checked out by one user.
///
/// Created `EM_ANDAMENTO` when the rental starts and mutated exactly
/// once, at return, to the terminal `CONCLUIDO` state with the end
/// timestamp, return station, and computed fee filled in.
///
/// # Database Schema
///
/// Maps to the `alugueis` table:
/// - `ponto_retirada_id` is the bike's station at checkout time
/// - `data_hora_fim`, `ponto_devolucao_id`, `valor_aluguel` are NULL
///   while the rental is in progress
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rental {
    /// Auto-increment primary key
    pub id: i64,

    /// Rented bike
    pub bike_id: i64,

    /// Renting user's CPF
    pub usuario_cpf: String,

    /// Pickup station
    pub ponto_retirada_id: i64,

    /// Checkout timestamp
    pub data_hora_inicio: DateTime<Utc>,

    /// Return timestamp (NULL while in progress)
    pub data_hora_fim: Option<DateTime<Utc>>,

    /// Return station (NULL while in progress)
    pub ponto_devolucao_id: Option<i64>,

    /// Persisted status code (EM_ANDAMENTO, CONCLUIDO)
    pub status: String,

    /// Computed fee in R$ (NULL while in progress)
    pub valor_aluguel: Option<f64>,
}

impl Rental {
    /// Get the status as a typed enum, `None` for unknown codes.
    #[must_use]
    pub fn get_status(&self) -> Option<RentalStatus> {
        self.status.parse().ok()
    }

    /// Whether the rental is still in progress.
    #[must_use]
    pub fn is_em_andamento(&self) -> bool {
        self.get_status() == Some(RentalStatus::EmAndamento)
    }

    /// Elapsed duration in fractional minutes at the given instant.
    ///
    /// Sub-minute precision is retained here because the fee is computed
    /// from the fractional value; truncation to whole minutes happens
    /// only at display time.
    #[must_use]
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> f64 {
        (now - self.data_hora_inicio).num_milliseconds() as f64 / 60_000.0
    }

    /// Fee for the given fractional duration: R$ 0,10 per minute,
    /// rounded to two decimal places.
    #[must_use]
    pub fn fee_for(minutes: f64) -> f64 {
        (minutes * FEE_PER_MINUTE * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rstest::rstest;

    fn create_test_rental(started_minutes_ago: i64) -> Rental {
        Rental {
            id: 1,
            bike_id: 1,
            usuario_cpf: "12345678901".to_string(),
            ponto_retirada_id: 1,
            data_hora_inicio: Utc::now() - Duration::minutes(started_minutes_ago),
            data_hora_fim: None,
            ponto_devolucao_id: None,
            status: "EM_ANDAMENTO".to_string(),
            valor_aluguel: None,
        }
    }

    #[test]
    fn test_is_em_andamento() {
        let mut rental = create_test_rental(10);
        assert!(rental.is_em_andamento());

        rental.status = "CONCLUIDO".to_string();
        assert!(!rental.is_em_andamento());
    }

    #[test]
    fn test_elapsed_minutes_keeps_fraction() {
        let rental = Rental {
            data_hora_inicio: Utc::now() - Duration::seconds(90),
            ..create_test_rental(0)
        };

        let minutes = rental.elapsed_minutes(Utc::now());
        assert!(minutes > 1.49 && minutes < 1.51, "got {minutes}");
    }

    #[rstest]
    #[case(45.0, 4.50)]
    #[case(0.0, 0.0)]
    #[case(12.34, 1.23)] // R$ 1.234 rounds down
    #[case(12.55, 1.26)] // R$ 1.255 rounds up
    #[case(1.0, 0.10)]
    fn test_fee_for(#[case] minutes: f64, #[case] expected: f64) {
        assert_eq!(Rental::fee_for(minutes), expected);
    }
}
