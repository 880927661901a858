//! ciclovia: console de gestão de bike-share.
//!
//! Interactive operator console for the ciclovia fleet: registration,
//! rental lifecycle, maintenance, and administrative reports over a
//! local SQLite database.
//!
//! ```sh
//! # Run with the default database (./ciclovia.db)
//! ciclovia
//!
//! # Custom database path (flag or CICLOVIA_DATABASE env var)
//! ciclovia --database /var/lib/ciclovia/frota.db
//!
//! # Validate configuration without opening the menu
//! ciclovia --check
//! ```

mod menu;
mod prompt;

use clap::Parser;
use tracing::{error, info};

use ciclovia_storage::{Database, DatabaseConfig};

/// ciclovia: sistema de gestão de bikes compartilhadas.
#[derive(Parser, Debug)]
#[command(
    name = "ciclovia",
    version,
    about = "Console de gestão para frota de bikes compartilhadas",
    long_about = "ciclovia: menu interativo para cadastro de usuários, pontos e \
                  bikes, ciclo de aluguel/devolução, manutenção e relatórios \
                  gerenciais sobre um banco SQLite local."
)]
struct Cli {
    /// Path to the SQLite database file.
    #[arg(short, long, env = "CICLOVIA_DATABASE")]
    database: Option<String>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,

    /// Validate the configuration and exit without opening the menu.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let mut config = match cli.database {
        Some(path) => DatabaseConfig::new(path),
        None => DatabaseConfig::from_env(),
    };
    config = config.auto_migrate(!cli.no_migrate);

    if cli.check {
        println!("Configuração válida");
        println!("   Banco de dados : {}", config.database_path);
        println!("   Migrações      : {}", if config.auto_migrate { "sim" } else { "não" });
        return Ok(());
    }

    println!("\n============================================================");
    println!("SISTEMA DE GESTÃO DE BIKES COMPARTILHADAS");
    println!("============================================================");

    // A failed initial connection is fatal; everything after this point
    // is contained per workflow.
    let db = match Database::new(config).await {
        Ok(db) => db,
        Err(e) => {
            error!("conexão com o banco falhou: {e}");
            eprintln!("[ERRO CRÍTICO] Conexão falhou: {e}");
            std::process::exit(1);
        }
    };

    info!("banco de dados conectado");
    println!("Conectado ao banco de dados com sucesso!");

    let result = menu::run(&db).await;

    db.close().await;
    println!("Conexão com o banco encerrada.");

    result
}
