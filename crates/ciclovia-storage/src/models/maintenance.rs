use chrono::{DateTime, Utc};
use ciclovia_core::MaintenanceKind;
use serde::{Deserialize, Serialize};

/// Maintenance ticket tracking a bike's out-of-service repair period.
///
/// Exactly one open ticket (`data_fim` NULL) may exist per bike at a
/// time; the open workflow refuses to create a second one (the bike is
/// already MANUTENCAO) and the close workflow targets the open ticket.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MaintenanceTicket {
    /// Auto-increment primary key
    pub id: i64,

    /// Bike under maintenance
    pub bike_id: i64,

    /// Persisted kind code (PREVENTIVA, CORRETIVA, ANTECIPADA)
    pub tipo: String,

    /// Problem description (>= 10 characters)
    pub descricao_problema: String,

    /// When the ticket was opened
    pub data_inicio: DateTime<Utc>,

    /// When the ticket was closed (NULL while open)
    pub data_fim: Option<DateTime<Utc>>,

    /// Repair cost in R$ (0 until the ticket is closed)
    pub valor: f64,
}

impl MaintenanceTicket {
    /// Get the kind as a typed enum, `None` for unknown codes.
    #[must_use]
    pub fn get_kind(&self) -> Option<MaintenanceKind> {
        self.tipo.parse().ok()
    }

    /// Whether the ticket is still open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.data_fim.is_none()
    }
}
