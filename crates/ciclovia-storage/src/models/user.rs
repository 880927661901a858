use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// User entity representing a registered rider.
///
/// # Fields
///
/// * `cpf` - CPF (Cadastro de Pessoas Físicas), 11 digits, natural primary key
/// * `nome` - Full name, minimum 3 characters, required
/// * `data_nasc` - Birth date; must be in the past (validated at registration)
/// * `rua` / `numero` / `bairro` - Optional address components
/// * `cidade` - City, required
/// * `uf` - Brazilian state code, 2 uppercase letters
/// * `is_cad_unico` - Subsidy-eligibility flag (CadÚnico enrollment)
/// * `created_at` - Record creation timestamp
///
/// # Database Schema
///
/// Maps to the `usuarios` table. The CPF is stored normalized (digits
/// only) and is unique by construction; the row is created once at
/// registration, together with the user's card, and never mutated by the
/// core workflows.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// CPF, 11 normalized digits (natural primary key)
    pub cpf: String,

    /// Full name
    pub nome: String,

    /// Birth date (always in the past)
    pub data_nasc: NaiveDate,

    /// Street, optional
    pub rua: Option<String>,

    /// Street number, optional
    pub numero: Option<String>,

    /// Neighborhood, optional
    pub bairro: Option<String>,

    /// City, required
    pub cidade: String,

    /// State code (UF), 2 uppercase letters
    pub uf: String,

    /// Whether the user is enrolled in CadÚnico (subsidized profile)
    pub is_cad_unico: bool,

    /// Record creation timestamp
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Operator-facing profile label derived from the subsidy flag.
    #[must_use]
    pub fn profile_label(&self) -> &'static str {
        if self.is_cad_unico {
            "Isento (CadUnico)"
        } else {
            "Pagante"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(is_cad_unico: bool) -> User {
        User {
            cpf: "12345678901".to_string(),
            nome: "João Silva".to_string(),
            data_nasc: NaiveDate::from_ymd_opt(1990, 5, 10).unwrap(),
            rua: Some("Rua das Flores".to_string()),
            numero: Some("100".to_string()),
            bairro: Some("Centro".to_string()),
            cidade: "São Carlos".to_string(),
            uf: "SP".to_string(),
            is_cad_unico,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_profile_label_subsidized() {
        let user = create_test_user(true);
        assert_eq!(user.profile_label(), "Isento (CadUnico)");
    }

    #[test]
    fn test_profile_label_paying() {
        let user = create_test_user(false);
        assert_eq!(user.profile_label(), "Pagante");
    }
}
