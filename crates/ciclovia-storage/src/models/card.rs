use chrono::{DateTime, NaiveDate, Utc};
use ciclovia_core::constants::MIN_RENTAL_BALANCE;
use serde::{Deserialize, Serialize};

/// Card entity holding a user's prepaid balance.
///
/// One-to-one with [`super::User`] (the `usuario_cpf` column is unique).
/// The balance gates the rental-start workflow; the computed rental fee
/// is recorded on the rental itself and is never debited here.
///
/// # Database Schema
///
/// Maps to the `cartoes` table:
/// - `usuario_cpf` is unique (one card per user)
/// - `saldo` is non-negative
/// - `data_validade` is checked against the issuance window (>= 30 days,
///   <= 5 years from today) at registration time
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Card {
    /// Auto-increment primary key
    pub id: i64,

    /// Owner's CPF (unique FK into usuarios)
    pub usuario_cpf: String,

    /// Prepaid balance (R$)
    pub saldo: f64,

    /// Card expiry date
    pub data_validade: NaiveDate,

    /// Issuance timestamp
    pub data_emissao: DateTime<Utc>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Whether the balance satisfies the rental-start minimum (R$ 5,00).
    #[must_use]
    pub fn has_min_balance(&self) -> bool {
        self.saldo >= MIN_RENTAL_BALANCE
    }
}
