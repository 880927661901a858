use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Docking station (ponto) where bikes are picked up and returned.
///
/// Maps to the `pontos` table; `capacidade_maxima` is bounded 1-100 at
/// registration.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Station {
    /// Auto-increment primary key
    pub id: i64,

    /// Street, required
    pub rua: String,

    /// Street number, optional
    pub numero: Option<String>,

    /// Neighborhood, optional
    pub bairro: Option<String>,

    /// City, required
    pub cidade: String,

    /// State code (UF)
    pub uf: String,

    /// Landmark/complement, optional
    pub referencia: Option<String>,

    /// Maximum number of docked bikes
    pub capacidade_maxima: i64,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Station {
    /// Short address used in console output: "rua, bairro" (or just the
    /// street when the neighborhood is absent).
    #[must_use]
    pub fn short_address(&self) -> String {
        match &self.bairro {
            Some(bairro) => format!("{}, {}", self.rua, bairro),
            None => self.rua.clone(),
        }
    }
}
