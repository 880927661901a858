use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    // Identifier errors
    #[error("Invalid CPF: {0}")]
    InvalidCpf(String),

    #[error("Invalid UF: {0}")]
    InvalidUf(String),

    // Field validation errors
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid phone number: {0}")]
    InvalidPhone(String),

    #[error("Value out of range: {0}")]
    OutOfRange(String),

    // Persisted status codes
    #[error("Unknown bike status: {0}")]
    UnknownBikeStatus(String),

    #[error("Unknown rental status: {0}")]
    UnknownRentalStatus(String),

    #[error("Unknown maintenance kind: {0}")]
    UnknownMaintenanceKind(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
