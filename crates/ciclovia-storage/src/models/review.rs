use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rating (0-10) left for the bike after a completed rental.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct BikeReview {
    /// Auto-increment primary key
    pub id: i64,

    /// Reviewed rental
    pub aluguel_id: i64,

    /// Rating, 0-10
    pub nota: i64,

    /// Optional free-text comment
    pub texto: Option<String>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Rating (0-10) left for the return station after a completed rental.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StationReview {
    /// Auto-increment primary key
    pub id: i64,

    /// Reviewed rental
    pub aluguel_id: i64,

    /// Rating, 0-10
    pub nota: i64,

    /// Optional free-text comment
    pub texto: Option<String>,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}
