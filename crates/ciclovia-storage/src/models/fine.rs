use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fine (multa) attached to a rental.
///
/// Any unpaid fine for a user blocks ALL new rentals for that user; the
/// rental-start workflow counts unpaid fines through the rental join
/// before anything is written.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Fine {
    /// Auto-increment primary key
    pub id: i64,

    /// Rental that originated the fine
    pub aluguel_id: i64,

    /// Amount in R$
    pub valor: f64,

    /// Fine type (free text: atraso, dano, ...)
    pub tipo: String,

    /// Due date
    pub vencimento: NaiveDate,

    /// Whether the fine has been settled
    pub is_paid: bool,
}

impl Fine {
    /// Whether the fine still blocks new rentals.
    #[must_use]
    pub fn is_open(&self) -> bool {
        !self.is_paid
    }
}
