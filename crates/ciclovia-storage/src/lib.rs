//! Storage layer for the ciclovia bike-share management system.
//!
//! This crate provides SQLite-backed persistence for users, cards,
//! docking stations, bikes, rentals, fines, and maintenance tickets,
//! along with the workflow services that sequence the multi-table
//! business operations (registration, rental lifecycle, maintenance)
//! inside scoped transactions.
//!
//! # Architecture
//!
//! The storage layer uses a repository pattern with the following components:
//!
//! - [`Database`] - Connection pool manager with automatic migrations
//! - [`UserRepository`], [`BikeRepository`], [`RentalRepository`], ... - Data access traits
//! - [`transaction`] - Transaction-aware operations for atomic multi-step workflows
//! - [`RentalService`], [`MaintenanceService`], [`RegistrationService`] - Business workflows
//! - [`Reports`] - Read-only administrative aggregates
//!
//! # Core Concepts
//!
//! ## One Transaction Per Workflow
//!
//! Every business operation that writes more than one row (start a
//! rental + flip the bike, close a ticket + re-dock the bike, register
//! user + card) acquires one transaction, performs all writes through
//! the [`transaction`] module, commits on full success, and rolls back
//! explicitly on any error. No partial write is ever visible.
//!
//! ## Denials Are Values
//!
//! Business-rule rejections (unpaid fines, insufficient balance,
//! unavailable bike, no open ticket, duplicate CPF) are returned as
//! denial variants carrying an operator-facing Portuguese message from
//! [`DisplayMessages`]. `Err` is reserved for real database failures.
//!
//! # Examples
//!
//! ## Basic Setup and a Gated Rental
//!
//! ```no_run
//! use ciclovia_storage::{Database, DatabaseConfig, RentalService, StartOutcome};
//! use ciclovia_core::Cpf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Initialize database with automatic migrations
//! let config = DatabaseConfig::new("ciclovia.db")
//!     .max_connections(10)
//!     .auto_migrate(true);
//!
//! let db = Database::new(config).await?;
//!
//! // Start a rental: every gate (user, fines, balance, bike
//! // availability) runs before the atomic insert + status flip
//! let service = RentalService::new(db.pool().clone());
//! let cpf = Cpf::new("123.456.789-01")?;
//!
//! match service.start(&cpf, 7).await? {
//!     StartOutcome::Started(started) => {
//!         println!("Aluguel {} registrado", started.rental_id);
//!     }
//!     StartOutcome::Denied(reason) => {
//!         println!("[BLOQUEIO] {reason}");
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Using Repositories Directly
//!
//! ```no_run
//! use ciclovia_storage::{Database, DatabaseConfig};
//! use ciclovia_storage::repositories::{UserRepository, SqliteUserRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DatabaseConfig::new("ciclovia.db");
//! let db = Database::new(config).await?;
//!
//! let user_repo = SqliteUserRepository::new(db.pool().clone());
//!
//! if let Some(user) = user_repo.find_by_cpf("12345678901").await? {
//!     println!("Found user: {} ({})", user.nome, user.profile_label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! All queries use parameterized statements via SQLx; no operator input
//! is ever interpolated into SQL text. The database location comes from
//! configuration (CLI flag or environment), never from embedded
//! credentials.
//!
//! # Performance
//!
//! - Connection pooling with configurable limits (default: 10 max, 2 min)
//! - WAL mode, foreign keys enforced, 10s busy timeout
//! - Indexed columns for the gate queries (fines by payment state,
//!   rentals by user/status, bikes by station)

pub mod connection;
pub mod error;
pub mod messages;
pub mod models;
pub mod reports;
pub mod repositories;
pub mod transaction;
pub mod workflows;

pub use connection::{DATABASE_PATH_ENV, Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use messages::DisplayMessages;
pub use models::{Bike, Card, Fine, MaintenanceTicket, Rental, Station, User};
pub use reports::{
    BikeRankingRow, DebtRow, MaintenanceAuditRow, PowerUserRow, Reports, StationLoadRow,
    UserHistoryRow, UserSituation,
};
pub use repositories::{
    BikeRepository, CardRepository, FineRepository, MaintenanceRepository, RentalRepository,
    ReviewRepository, SqliteBikeRepository, SqliteCardRepository, SqliteFineRepository,
    SqliteMaintenanceRepository, SqliteRentalRepository, SqliteReviewRepository,
    SqliteStationRepository, SqliteUserRepository, StationRepository, UserRepository,
};
pub use workflows::{
    BikeRegistration, CloseOutcome, CompletedReturn, MaintenanceService, OpenOutcome,
    RegistrationService, RentalService, ReturnOutcome, StartCheck, StartOutcome, StartQuote,
    StartedRental, UserRegistration,
};
