//! Read-only administrative reports.
//!
//! Each report is one fixed aggregate query over the pool; no mutation,
//! no transactional concerns beyond the read consistency SQLite already
//! provides. Date arithmetic goes through `julianday` so the comparison
//! is numeric regardless of how the timestamp was encoded.

use crate::error::StorageResult;
use chrono::{DateTime, NaiveDate, Utc};
use ciclovia_core::constants::{BIKE_RANKING_LIMIT, OCCUPANCY_ALERT_RATIO, REPORT_WINDOW_DAYS};
use serde::Serialize;
use sqlx::SqlitePool;

/// User whose pickups cover every station of the target neighborhood.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct PowerUserRow {
    pub nome: String,
    pub cpf: String,
    pub pontos_distintos: i64,
}

/// Bike ranking entry: average rating over completed rentals.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BikeRankingRow {
    pub bike_id: i64,
    pub modelo: String,
    pub total_alugueis: i64,
    pub nota_media: Option<f64>,
    pub minutos_uso: f64,
}

/// Per-user outstanding debt: unpaid fine count and total.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DebtRow {
    pub nome: String,
    pub cpf: String,
    pub multas_pendentes: i64,
    pub valor_total: f64,
}

/// Open maintenance ticket with its age in days.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MaintenanceAuditRow {
    pub bike_id: i64,
    pub modelo: String,
    pub tipo: String,
    pub valor: f64,
    pub data_inicio: DateTime<Utc>,
    pub dias_em_manutencao: f64,
    pub descricao_problema: String,
}

/// Station whose recent movements exceed the capacity-relative threshold.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct StationLoadRow {
    pub ponto_id: i64,
    pub rua: String,
    pub bairro: Option<String>,
    pub capacidade_maxima: i64,
    pub movimentacoes: i64,
    pub taxa_ocupacao: f64,
}

/// Usage summary for one user.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserHistoryRow {
    pub nome: String,
    pub total_alugueis: i64,
    pub minutos_totais: f64,
    pub nota_media_bikes: Option<f64>,
    pub nota_media_pontos: Option<f64>,
}

/// Full situation card for one user (menu 8).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserSituation {
    pub nome: String,
    pub cidade: String,
    pub is_cad_unico: bool,
    /// Card balance; NULL when the user has no card
    pub saldo: Option<f64>,
    /// Card expiry; NULL when the user has no card
    pub data_validade: Option<NaiveDate>,
    pub alugueis_ativos: i64,
    pub multas_pendentes: i64,
    pub valor_multas: f64,
}

impl UserSituation {
    /// Whether the user is clear to start new rentals.
    #[must_use]
    pub fn is_regular(&self) -> bool {
        self.multas_pendentes == 0
    }
}

/// Fixed administrative report queries over the pool.
pub struct Reports {
    pool: SqlitePool,
}

impl Reports {
    /// Create the report runner over the given pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fidelity report: users whose pickups cover EVERY station of the
    /// given neighborhood/city.
    pub async fn power_users(
        &self,
        bairro: &str,
        cidade: &str,
    ) -> StorageResult<Vec<PowerUserRow>> {
        let rows = sqlx::query_as::<_, PowerUserRow>(
            r#"
            SELECT U.nome, U.cpf, COUNT(DISTINCT A.ponto_retirada_id) AS pontos_distintos
            FROM usuarios U
            JOIN alugueis A ON U.cpf = A.usuario_cpf
            JOIN pontos P ON A.ponto_retirada_id = P.id
            WHERE P.bairro = ? AND P.cidade = ?
            GROUP BY U.cpf, U.nome
            HAVING COUNT(DISTINCT A.ponto_retirada_id) = (
                SELECT COUNT(*) FROM pontos WHERE bairro = ? AND cidade = ?
            )
            ORDER BY pontos_distintos DESC
            "#,
        )
        .bind(bairro)
        .bind(cidade)
        .bind(bairro)
        .bind(cidade)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Top bikes by average rating among bikes with at least one rental.
    pub async fn bike_ranking(&self) -> StorageResult<Vec<BikeRankingRow>> {
        let rows = sqlx::query_as::<_, BikeRankingRow>(
            r#"
            SELECT B.id AS bike_id, B.modelo,
                   COUNT(DISTINCT A.id) AS total_alugueis,
                   ROUND(AVG(CB.nota), 2) AS nota_media,
                   B.tempo_total_utilizado AS minutos_uso
            FROM bikes B
            LEFT JOIN alugueis A ON B.id = A.bike_id
            LEFT JOIN comentarios_bike CB ON A.id = CB.aluguel_id
            GROUP BY B.id, B.modelo
            HAVING COUNT(DISTINCT A.id) > 0
            ORDER BY nota_media IS NULL, nota_media DESC
            LIMIT ?
            "#,
        )
        .bind(BIKE_RANKING_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Users with outstanding debt, largest total first.
    pub async fn outstanding_debts(&self) -> StorageResult<Vec<DebtRow>> {
        let rows = sqlx::query_as::<_, DebtRow>(
            r#"
            SELECT U.nome, U.cpf,
                   COUNT(M.id) AS multas_pendentes,
                   COALESCE(SUM(M.valor), 0.0) AS valor_total
            FROM usuarios U
            LEFT JOIN alugueis A ON U.cpf = A.usuario_cpf
            LEFT JOIN multas M ON A.id = M.aluguel_id AND M.is_paid = 0
            GROUP BY U.cpf, U.nome
            HAVING COALESCE(SUM(M.valor), 0) > 0
            ORDER BY valor_total DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Open maintenance tickets, longest-running first.
    pub async fn maintenance_audit(&self) -> StorageResult<Vec<MaintenanceAuditRow>> {
        let rows = sqlx::query_as::<_, MaintenanceAuditRow>(
            r#"
            SELECT B.id AS bike_id, B.modelo, M.tipo, M.valor, M.data_inicio,
                   julianday('now') - julianday(M.data_inicio) AS dias_em_manutencao,
                   M.descricao_problema
            FROM bikes B
            JOIN manutencoes M ON B.id = M.bike_id
            WHERE M.data_fim IS NULL
            ORDER BY dias_em_manutencao DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Stations whose movements (pickup or return) in the report window
    /// exceed the capacity-relative threshold.
    pub async fn overloaded_stations(&self) -> StorageResult<Vec<StationLoadRow>> {
        let rows = sqlx::query_as::<_, StationLoadRow>(
            r#"
            SELECT P.id AS ponto_id, P.rua, P.bairro, P.capacidade_maxima,
                   COUNT(A.id) AS movimentacoes,
                   ROUND(COUNT(A.id) * 100.0 / P.capacidade_maxima, 2) AS taxa_ocupacao
            FROM pontos P
            JOIN alugueis A ON (P.id = A.ponto_retirada_id OR P.id = A.ponto_devolucao_id)
            WHERE julianday(A.data_hora_inicio) >= julianday('now') - ?
            GROUP BY P.id, P.rua, P.bairro, P.capacidade_maxima
            HAVING COUNT(A.id) > P.capacidade_maxima * ?
            ORDER BY taxa_ocupacao DESC
            "#,
        )
        .bind(REPORT_WINDOW_DAYS)
        .bind(OCCUPANCY_ALERT_RATIO)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Usage summary for one user: rental count, total minutes on
    /// completed rentals, and average ratings given.
    pub async fn user_history(&self, cpf: &str) -> StorageResult<Option<UserHistoryRow>> {
        let row = sqlx::query_as::<_, UserHistoryRow>(
            r#"
            SELECT U.nome,
                   (SELECT COUNT(*) FROM alugueis A
                     WHERE A.usuario_cpf = U.cpf) AS total_alugueis,
                   (SELECT COALESCE(SUM(
                        (julianday(A.data_hora_fim) - julianday(A.data_hora_inicio)) * 1440.0
                    ), 0.0) FROM alugueis A
                     WHERE A.usuario_cpf = U.cpf AND A.data_hora_fim IS NOT NULL
                   ) AS minutos_totais,
                   (SELECT ROUND(AVG(CB.nota), 2) FROM comentarios_bike CB
                     JOIN alugueis A ON CB.aluguel_id = A.id
                     WHERE A.usuario_cpf = U.cpf) AS nota_media_bikes,
                   (SELECT ROUND(AVG(CP.nota), 2) FROM comentarios_ponto CP
                     JOIN alugueis A ON CP.aluguel_id = A.id
                     WHERE A.usuario_cpf = U.cpf) AS nota_media_pontos
            FROM usuarios U
            WHERE U.cpf = ?
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// Full situation card for one user: profile, card, active rentals,
    /// and outstanding fines.
    pub async fn user_situation(&self, cpf: &str) -> StorageResult<Option<UserSituation>> {
        let row = sqlx::query_as::<_, UserSituation>(
            r#"
            SELECT U.nome, U.cidade, U.is_cad_unico,
                   C.saldo, C.data_validade,
                   (SELECT COUNT(*) FROM alugueis A
                     WHERE A.usuario_cpf = U.cpf AND A.status = 'EM_ANDAMENTO'
                   ) AS alugueis_ativos,
                   (SELECT COUNT(*) FROM multas M
                     JOIN alugueis A ON M.aluguel_id = A.id
                     WHERE A.usuario_cpf = U.cpf AND M.is_paid = 0
                   ) AS multas_pendentes,
                   (SELECT COALESCE(SUM(M.valor), 0.0) FROM multas M
                     JOIN alugueis A ON M.aluguel_id = A.id
                     WHERE A.usuario_cpf = U.cpf AND M.is_paid = 0
                   ) AS valor_multas
            FROM usuarios U
            LEFT JOIN cartoes C ON U.cpf = C.usuario_cpf
            WHERE U.cpf = ?
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }
}
