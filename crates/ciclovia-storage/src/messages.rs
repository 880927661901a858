//! Display messages for workflow results.
//!
//! This module provides constants for all operator-facing messages
//! produced by the registration, rental, and maintenance workflows.
//! Messages are in Brazilian Portuguese, ASCII only, so they render the
//! same on any console encoding.
//!
//! Every business-rule denial carries one of these messages; workflows
//! append the variable part (current status, fine count, balance) when
//! the denial must identify the blocking condition.

/// Operator-facing messages for workflow results (Portuguese/Brazilian)
pub struct DisplayMessages;

impl DisplayMessages {
    // ------------------------------------------------------------------
    // Rental start denials
    // ------------------------------------------------------------------

    /// CPF does not exist in the usuarios table.
    pub const USER_NOT_FOUND: &'static str = "Usuario nao encontrado";

    /// The user has at least one unpaid fine; all new rentals are blocked.
    pub const UNPAID_FINES: &'static str = "Usuario possui multas pendentes";

    /// The user has no card on file.
    pub const NO_CARD: &'static str = "Usuario nao possui cartao";

    /// Card balance is below the minimum required to start a rental.
    pub const INSUFFICIENT_BALANCE: &'static str = "Saldo insuficiente para aluguel";

    /// Bike id does not exist in the fleet.
    pub const BIKE_NOT_FOUND: &'static str = "Bicicleta nao encontrada";

    /// Bike exists but is not DISPONIVEL; the workflow appends the
    /// current status.
    pub const BIKE_UNAVAILABLE: &'static str = "Bike indisponivel";

    // ------------------------------------------------------------------
    // Rental return denials
    // ------------------------------------------------------------------

    /// Rental id does not exist.
    pub const RENTAL_NOT_FOUND: &'static str = "Aluguel nao encontrado";

    /// Rental exists but is not EM_ANDAMENTO; the workflow appends the
    /// current status.
    pub const RENTAL_NOT_ACTIVE: &'static str = "Aluguel nao esta ativo";

    /// Docking station id does not exist.
    pub const STATION_NOT_FOUND: &'static str = "Ponto nao encontrado";

    // ------------------------------------------------------------------
    // Maintenance denials
    // ------------------------------------------------------------------

    /// The bike is on an active rental and cannot enter maintenance.
    pub const BIKE_RENTED: &'static str = "Bike alugada, aguarde devolucao";

    /// The bike is already under an open maintenance ticket (warning, no-op).
    pub const ALREADY_IN_MAINTENANCE: &'static str = "Bike ja esta em manutencao";

    /// No open ticket exists for the bike; nothing to close.
    pub const NO_OPEN_TICKET: &'static str = "Nenhuma manutencao aberta para esta bike";

    // ------------------------------------------------------------------
    // Registration denials
    // ------------------------------------------------------------------

    /// CPF already registered.
    pub const DUPLICATE_CPF: &'static str = "CPF ja cadastrado";

    // ------------------------------------------------------------------
    // Success messages
    // ------------------------------------------------------------------

    pub const USER_REGISTERED: &'static str = "Usuario cadastrado com sucesso";
    pub const STATION_REGISTERED: &'static str = "Ponto registrado";
    pub const BIKE_REGISTERED: &'static str = "Bicicleta adicionada a frota";
    pub const RENTAL_STARTED: &'static str = "Aluguel registrado";
    pub const RETURN_COMPLETED: &'static str = "Devolucao realizada com sucesso";
    pub const MAINTENANCE_OPENED: &'static str = "Bike enviada para manutencao";
    pub const MAINTENANCE_CLOSED: &'static str = "Bike disponivel novamente";
}
