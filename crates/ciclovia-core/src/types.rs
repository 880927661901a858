use crate::{
    Result,
    constants::{CPF_LENGTH, UF_LENGTH},
    error::Error,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// CPF (Cadastro de Pessoas Físicas), the national user identifier.
///
/// Stored and compared as exactly 11 ASCII digits. Punctuation from the
/// common display form (`123.456.789-01`) is stripped on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cpf(String);

impl Cpf {
    /// Create a CPF with validation.
    ///
    /// The input is normalized first: separators (`.`, `-`) and
    /// surrounding whitespace are removed.
    ///
    /// # Errors
    /// Returns `Error::InvalidCpf` if the normalized value is not exactly
    /// 11 ASCII digits.
    pub fn new(cpf: &str) -> Result<Self> {
        let digits: String = cpf
            .trim()
            .chars()
            .filter(|c| !matches!(c, '.' | '-'))
            .collect();

        if digits.len() != CPF_LENGTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidCpf(format!(
                "CPF must be exactly {CPF_LENGTH} digits, got '{cpf}'"
            )));
        }

        Ok(Cpf(digits))
    }

    /// Get the normalized digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Format for display: `123.456.789-01`.
    #[must_use]
    pub fn formatted(&self) -> String {
        format!(
            "{}.{}.{}-{}",
            &self.0[..3],
            &self.0[3..6],
            &self.0[6..9],
            &self.0[9..]
        )
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Cpf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Cpf::new(s)
    }
}

/// Brazilian state code (UF, 2 letters, stored uppercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uf(String);

impl Uf {
    /// Create a state code with validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidUf` if the trimmed value is not exactly
    /// 2 ASCII letters.
    pub fn new(uf: &str) -> Result<Self> {
        let uf = uf.trim().to_uppercase();

        if uf.len() != UF_LENGTH || !uf.bytes().all(|b| b.is_ascii_alphabetic()) {
            return Err(Error::InvalidUf(format!(
                "UF must be {UF_LENGTH} letters (e.g. SP, RJ), got '{uf}'"
            )));
        }

        Ok(Uf(uf))
    }

    /// Get the uppercase state code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uf {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Uf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uf::new(s)
    }
}

/// Bike availability status.
///
/// Persisted as TEXT codes in the `bikes` table. The status moves
/// together with the bike's docking station: `Disponivel` requires a
/// station, `EmUso` and `Manutencao` both clear it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BikeStatus {
    /// Docked at a station and free to rent.
    Disponivel,
    /// Checked out on an active rental.
    EmUso,
    /// Held by an open maintenance ticket.
    Manutencao,
}

impl BikeStatus {
    /// Persisted TEXT code for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disponivel => "DISPONIVEL",
            Self::EmUso => "EM_USO",
            Self::Manutencao => "MANUTENCAO",
        }
    }

    /// Human-readable name in Portuguese.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Disponivel => "Disponível",
            Self::EmUso => "Em uso",
            Self::Manutencao => "Em manutenção",
        }
    }

    /// Returns `true` if the bike can be rented.
    #[inline]
    #[must_use]
    pub fn is_disponivel(self) -> bool {
        matches!(self, Self::Disponivel)
    }
}

impl fmt::Display for BikeStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BikeStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "DISPONIVEL" => Ok(Self::Disponivel),
            "EM_USO" => Ok(Self::EmUso),
            "MANUTENCAO" => Ok(Self::Manutencao),
            other => Err(Error::UnknownBikeStatus(other.to_string())),
        }
    }
}

/// Rental lifecycle status.
///
/// A rental is created `EmAndamento` and mutated exactly once, at return,
/// to the terminal `Concluido` state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RentalStatus {
    EmAndamento,
    Concluido,
}

impl RentalStatus {
    /// Persisted TEXT code for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmAndamento => "EM_ANDAMENTO",
            Self::Concluido => "CONCLUIDO",
        }
    }

    /// Human-readable name in Portuguese.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::EmAndamento => "Em andamento",
            Self::Concluido => "Concluído",
        }
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for RentalStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "EM_ANDAMENTO" => Ok(Self::EmAndamento),
            "CONCLUIDO" => Ok(Self::Concluido),
            other => Err(Error::UnknownRentalStatus(other.to_string())),
        }
    }
}

/// Kind of maintenance performed on a bike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaintenanceKind {
    Preventiva,
    Corretiva,
    Antecipada,
}

impl MaintenanceKind {
    /// Persisted TEXT code for this kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Preventiva => "PREVENTIVA",
            Self::Corretiva => "CORRETIVA",
            Self::Antecipada => "ANTECIPADA",
        }
    }

    /// Human-readable name in Portuguese.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Preventiva => "Preventiva",
            Self::Corretiva => "Corretiva",
            Self::Antecipada => "Antecipada",
        }
    }
}

impl fmt::Display for MaintenanceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaintenanceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Operator input arrives in any case
        match s.trim().to_uppercase().as_str() {
            "PREVENTIVA" => Ok(Self::Preventiva),
            "CORRETIVA" => Ok(Self::Corretiva),
            "ANTECIPADA" => Ok(Self::Antecipada),
            other => Err(Error::UnknownMaintenanceKind(other.to_string())),
        }
    }
}
