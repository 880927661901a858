use chrono::{DateTime, Utc};
use ciclovia_core::BikeStatus;
use serde::{Deserialize, Serialize};

/// Bike entity with cumulative usage statistics.
///
/// # Fields
///
/// * `id` - Fleet registration number (auto-increment primary key)
/// * `modelo` - Model name
/// * `ano_fabricacao` - Manufacture year (1900..=current year)
/// * `cor` - Color
/// * `status` - Persisted TEXT code (DISPONIVEL, EM_USO, MANUTENCAO);
///   use [`get_status`](Bike::get_status) for the typed enum
/// * `qnt_alugueis` - Cumulative completed-rental count
/// * `tempo_total_utilizado` - Cumulative usage in minutes (fractional)
/// * `ponto_atual_id` - Current docking station; NULL while the bike is
///   rented or in maintenance
/// * `created_at` - Record creation timestamp
///
/// # Invariant
///
/// Status and station nullability move together: `DISPONIVEL` requires a
/// station, `EM_USO` and `MANUTENCAO` both clear it. The constraint is
/// also enforced by a CHECK on the `bikes` table, and every status flip
/// goes through [`crate::transaction::set_bike_status`] so both columns
/// change in the same statement.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Bike {
    /// Fleet registration number (primary key)
    pub id: i64,

    /// Model name
    pub modelo: String,

    /// Manufacture year
    pub ano_fabricacao: i64,

    /// Color
    pub cor: String,

    /// Persisted status code (DISPONIVEL, EM_USO, MANUTENCAO)
    pub status: String,

    /// Cumulative completed-rental count
    pub qnt_alugueis: i64,

    /// Cumulative usage minutes (fractional)
    pub tempo_total_utilizado: f64,

    /// Current docking station (NULL while rented or in maintenance)
    pub ponto_atual_id: Option<i64>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Bike {
    /// Get the status as a typed enum, `None` for unknown codes.
    #[must_use]
    pub fn get_status(&self) -> Option<BikeStatus> {
        self.status.parse().ok()
    }

    /// Whether the bike can be rented right now.
    #[must_use]
    pub fn is_disponivel(&self) -> bool {
        self.get_status().is_some_and(BikeStatus::is_disponivel)
    }
}
