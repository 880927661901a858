//! Interactive menu loop and workflow dispatch.
//!
//! One operator drives one workflow to completion before the next
//! begins. Every workflow contains its own failures: a database error is
//! printed and the menu continues; only a closed stdin ends the loop.

use crate::prompt;
use anyhow::Result;
use chrono::{Local, Utc};
use ciclovia_core::BikeStatus;
use ciclovia_core::constants::MIN_NAME_LENGTH;
use ciclovia_storage::models::{Bike, BikeReview, Station, StationReview, User};
use ciclovia_storage::repositories::{
    FineRepository, ReviewRepository, SqliteFineRepository, SqliteReviewRepository,
    SqliteStationRepository, SqliteUserRepository, StationRepository, UserRepository,
};
use ciclovia_storage::workflows::{
    BikeRegistration, CloseOutcome, MaintenanceService, OpenOutcome, RegistrationService,
    RentalService, ReturnOutcome, StartCheck, StartOutcome, UserRegistration,
};
use ciclovia_storage::{Database, Reports};

const DIVIDER: &str = "============================================================";

/// Run the main menu until the operator exits or stdin closes.
pub async fn run(db: &Database) -> Result<()> {
    let registration = RegistrationService::new(db.pool().clone());
    let rentals = RentalService::new(db.pool().clone());
    let maintenance = MaintenanceService::new(db.pool().clone());
    let reports = Reports::new(db.pool().clone());

    loop {
        print_main_menu();
        let op = prompt::menu_choice(8)?;

        if op == 0 {
            println!("\nObrigado por usar o Sistema de Gestão de Bikes!");
            return Ok(());
        }

        let result = match op {
            1 => reports_menu(&reports).await,
            2 => register_user(db, &registration).await,
            3 => register_station(&registration).await,
            4 => register_bike(db, &registration).await,
            5 => maintenance_menu(&maintenance).await,
            6 => rental_start(&rentals).await,
            7 => rental_return(db, &rentals).await,
            8 => user_situation(db, &reports).await,
            _ => unreachable!("menu_choice bounds the option"),
        };

        // Persistence errors are contained per workflow; a closed stdin
        // is the only error that ends the session.
        if let Err(e) = result {
            if e.downcast_ref::<std::io::Error>().is_some() {
                return Err(e);
            }
            println!("\n[ERRO DE BANCO] {e}");
        }
    }
}

fn print_main_menu() {
    println!("\n{DIVIDER}");
    println!("MENU PRINCIPAL");
    println!("{DIVIDER}");
    println!("1. Relatórios Gerenciais");
    println!("2. Cadastrar Usuário e Cartão");
    println!("3. Cadastrar Ponto de Estacionamento");
    println!("4. Cadastrar Nova Bike");
    println!("5. Gerir Manutenção");
    println!("6. Realizar Aluguel");
    println!("7. Informar Devolução");
    println!("8. Consultar Situação do Usuário");
    println!("0. Sair");
    println!("{}", "-".repeat(DIVIDER.len()));
}

async fn register_user(db: &Database, registration: &RegistrationService) -> Result<()> {
    println!("\n--- CADASTRO UNIFICADO (USUÁRIO + CARTÃO) ---");
    println!(">> Dados Pessoais:");

    let user_repo = SqliteUserRepository::new(db.pool().clone());
    let cpf = loop {
        let cpf = prompt::cpf("CPF (apenas números, 11 dígitos): ")?;
        if user_repo.exists_by_cpf(cpf.as_str()).await? {
            println!("[ERRO] CPF {} já cadastrado!", cpf.formatted());
            continue;
        }
        break cpf;
    };

    let nome = prompt::min_len(
        "Nome Completo: ",
        MIN_NAME_LENGTH,
        "Nome deve ter pelo menos 3 caracteres.",
    )?;
    let data_nasc = prompt::past_date("Data de Nascimento (DD/MM/AAAA): ")?;
    let rua = prompt::optional("Rua: ")?;
    let numero = prompt::optional("Número: ")?;
    let bairro = prompt::optional("Bairro: ")?;
    let cidade = prompt::nonempty("Cidade: ", "Cidade")?;
    let uf = prompt::uf("UF (2 letras): ")?;
    let is_cad_unico = prompt::yes_no("Possui CadÚnico? (S/N): ")?;

    println!("\n>> Emissão do Cartão:");
    let saldo = prompt::non_negative_decimal("Saldo Inicial (R$): ", "Saldo")?;
    let validade = prompt::card_expiry("Validade do Cartão (DD/MM/AAAA): ")?;

    let user = User {
        cpf: cpf.as_str().to_string(),
        nome: nome.clone(),
        data_nasc,
        rua,
        numero,
        bairro,
        cidade,
        uf: uf.as_str().to_string(),
        is_cad_unico,
        created_at: Utc::now(),
    };

    match registration
        .register_user_with_card(&user, saldo, validade)
        .await?
    {
        UserRegistration::Registered { .. } => {
            println!("\n[SUCESSO] Usuário {nome} cadastrado com sucesso!");
            println!("   CPF: {}", cpf.formatted());
            println!("   Cartão emitido com saldo: R$ {saldo:.2}");
            println!("   Validade: {}", prompt::format_br_date(validade));
        }
        UserRegistration::DuplicateCpf => {
            println!("\n[ERRO] CPF {} já cadastrado!", cpf.formatted());
        }
    }

    Ok(())
}

async fn register_station(registration: &RegistrationService) -> Result<()> {
    println!("\nNOVO PONTO DE ESTACIONAMENTO");

    let rua = prompt::nonempty("Rua: ", "Rua")?;
    let numero = prompt::optional("Número: ")?;
    let bairro = prompt::optional("Bairro: ")?;
    let cidade = prompt::nonempty("Cidade: ", "Cidade")?;
    let uf = prompt::uf("UF (2 letras): ")?;
    let referencia = prompt::optional("Referência/Complemento: ")?;
    let capacidade = prompt::station_capacity("Capacidade Máxima (1-100): ")?;

    let station = Station {
        id: 0,
        rua,
        numero,
        bairro,
        cidade,
        uf: uf.as_str().to_string(),
        referencia,
        capacidade_maxima: capacidade,
        created_at: Utc::now(),
    };

    let id = registration.register_station(&station).await?;
    println!("[SUCESSO] Ponto {id} registrado com capacidade para {capacidade} bikes.");

    Ok(())
}

async fn register_bike(db: &Database, registration: &RegistrationService) -> Result<()> {
    println!("\nNOVA BICICLETA");

    let modelo = prompt::nonempty("Modelo: ", "Modelo")?;
    let ano = prompt::manufacture_year()?;
    let cor = prompt::optional("Cor: ")?
        .unwrap_or_else(|| "Não especificada".to_string());

    let station_repo = SqliteStationRepository::new(db.pool().clone());
    let ponto_id = loop {
        let id = prompt::positive_int("ID do Ponto de Estacionamento Inicial: ", "ID do ponto")?;
        if station_repo.exists(id).await? {
            break id;
        }
        println!("[ERRO] Ponto não encontrado. Verifique o ID.");
    };

    let bike = Bike {
        id: 0,
        modelo: modelo.clone(),
        ano_fabricacao: ano,
        cor,
        status: BikeStatus::Disponivel.as_str().to_string(),
        qnt_alugueis: 0,
        tempo_total_utilizado: 0.0,
        ponto_atual_id: Some(ponto_id),
        created_at: Utc::now(),
    };

    match registration.register_bike(&bike).await? {
        BikeRegistration::Registered { bike_id } => {
            println!("[SUCESSO] Bicicleta {modelo} {ano} adicionada à frota (registro {bike_id}).");
        }
        BikeRegistration::StationNotFound => {
            println!("[ERRO] Ponto não encontrado. Verifique o ID.");
        }
    }

    Ok(())
}

async fn rental_start(rentals: &RentalService) -> Result<()> {
    println!("\n--- NOVO ALUGUEL ---");

    let cpf = prompt::cpf("CPF do Usuário (11 dígitos): ")?;
    let bike_id = prompt::positive_int("Número de Registro da Bike: ", "ID da bike")?;

    let quote = match rentals.check_start(&cpf, bike_id).await? {
        StartCheck::Eligible(quote) => quote,
        StartCheck::Denied(reason) => {
            println!("[BLOQUEIO] {reason}");
            return Ok(());
        }
    };

    println!("\nBike disponível no ponto: {}", quote.station.short_address());
    println!("Usuário: {}", quote.user_nome);
    println!("Saldo disponível: R$ {:.2}", quote.saldo);

    if !prompt::yes_no("\nConfirmar aluguel? (S/N): ")? {
        println!("Aluguel cancelado pelo usuário.");
        return Ok(());
    }

    match rentals.start(&cpf, bike_id).await? {
        StartOutcome::Started(started) => {
            println!("\n[SUCESSO] Aluguel registrado!");
            println!("   Aluguel: {}", started.rental_id);
            println!("   Bike: {bike_id}");
            println!("   Usuário: {}", started.user_nome);
            println!(
                "   Hora de início: {}",
                started.inicio.with_timezone(&Local).format("%H:%M")
            );
        }
        StartOutcome::Denied(reason) => {
            // State changed between the quote and the confirmation
            println!("[BLOQUEIO] {reason}");
        }
    }

    Ok(())
}

async fn rental_return(db: &Database, rentals: &RentalService) -> Result<()> {
    println!("\nDEVOLUÇÃO DE BIKE");

    let rental_id = prompt::positive_int("ID do Aluguel: ", "ID do aluguel")?;

    let station_repo = SqliteStationRepository::new(db.pool().clone());
    let ponto_id = loop {
        let id = prompt::positive_int("ID do Ponto de Devolução: ", "ID do ponto")?;
        if station_repo.exists(id).await? {
            break id;
        }
        println!("[ERRO] Ponto não encontrado.");
    };

    let done = match rentals.finish(rental_id, ponto_id).await? {
        ReturnOutcome::Completed(done) => done,
        ReturnOutcome::Denied(reason) => {
            println!("[ERRO] {reason}");
            return Ok(());
        }
    };

    println!("\n[SUCESSO] Devolução realizada com sucesso!");
    println!("   Usuário: {}", done.user_nome);
    println!("   Bike: {} (ID: {})", done.bike_modelo, done.bike_id);
    println!("   Tempo de uso: {} minutos", done.whole_minutes());
    println!("   Valor do aluguel: R$ {:.2}", done.valor);
    println!("   Ponto de devolução: {}", done.ponto_devolucao_id);

    // Post-return ratings feed the admin reports
    if prompt::yes_no("\nDeseja avaliar a experiência? (S/N): ")? {
        let nota_bike = prompt::rating("Nota para a bike (0-10): ")?;
        let nota_ponto = prompt::rating("Nota para o ponto de devolução (0-10): ")?;
        let texto = prompt::optional("Comentário (opcional): ")?;

        let review_repo = SqliteReviewRepository::new(db.pool().clone());
        review_repo
            .create_bike_review(&BikeReview {
                id: 0,
                aluguel_id: done.rental_id,
                nota: nota_bike,
                texto: texto.clone(),
                created_at: Utc::now(),
            })
            .await?;
        review_repo
            .create_station_review(&StationReview {
                id: 0,
                aluguel_id: done.rental_id,
                nota: nota_ponto,
                texto,
                created_at: Utc::now(),
            })
            .await?;

        println!("Avaliação registrada. Obrigado!");
    }

    Ok(())
}

async fn maintenance_menu(maintenance: &MaintenanceService) -> Result<()> {
    println!("\nGESTÃO DE MANUTENÇÃO");
    println!("1. Enviar Bike para Manutenção (Início)");
    println!("2. Receber Bike da Manutenção (Fim)");
    println!("0. Voltar");

    match prompt::menu_choice(2)? {
        1 => {
            let bike_id = prompt::positive_int("ID da Bike: ", "ID da bike")?;
            let kind = prompt::maintenance_kind("Tipo (PREVENTIVA/CORRETIVA/ANTECIPADA): ")?;
            let descricao = prompt::problem_description()?;

            match maintenance.open(bike_id, kind, &descricao).await? {
                OpenOutcome::Opened { .. } => {
                    println!("[SUCESSO] Bike {bike_id} enviada para manutenção.");
                }
                OpenOutcome::AlreadyInMaintenance => {
                    println!("[AVISO] Bike já está em manutenção.");
                }
                OpenOutcome::Denied(reason) => {
                    println!("[BLOQUEIO] {reason}");
                }
            }
        }
        2 => {
            let bike_id = prompt::positive_int("ID da Bike voltando da oficina: ", "ID da bike")?;
            let custo = prompt::non_negative_decimal("Custo final do reparo (R$): ", "Custo")?;
            let ponto_id =
                prompt::positive_int("ID do Ponto onde ela será colocada: ", "ID do ponto")?;

            match maintenance.close(bike_id, custo, ponto_id).await? {
                CloseOutcome::Closed { valor, .. } => {
                    println!("[SUCESSO] Bike {bike_id} disponível novamente.");
                    println!("   Custo da manutenção: R$ {valor:.2}");
                }
                CloseOutcome::Denied(reason) => {
                    println!("[ERRO] {reason}");
                }
            }
        }
        _ => {}
    }

    Ok(())
}

async fn reports_menu(reports: &Reports) -> Result<()> {
    loop {
        println!("\n{DIVIDER}");
        println!("[ADM] PAINEL DE RELATÓRIOS");
        println!("{DIVIDER}");
        println!("1. Relatório de Fidelidade (usuários que cobrem todos os pontos do bairro)");
        println!("2. Ranking de Melhores Bikes");
        println!("3. Relatório de Inadimplência");
        println!("4. Auditoria de Manutenção");
        println!("5. Pontos Sobrecarregados");
        println!("6. Histórico de Usuário");
        println!("0. Voltar");

        match prompt::menu_choice(6)? {
            0 => return Ok(()),
            1 => {
                let bairro = prompt::optional("Bairro [Centro]: ")?
                    .unwrap_or_else(|| "Centro".to_string());
                let cidade = prompt::optional("Cidade [São Carlos]: ")?
                    .unwrap_or_else(|| "São Carlos".to_string());

                println!("\nUSUÁRIOS 'POWER USER' (Fidelidade {bairro})");
                let rows = reports.power_users(&bairro, &cidade).await?;
                if rows.is_empty() {
                    println!("   Nenhum registro encontrado para esta consulta");
                } else {
                    for (i, row) in rows.iter().enumerate() {
                        println!(
                            "{:2}. {} ({}) - {} ponto(s)",
                            i + 1,
                            row.nome,
                            row.cpf,
                            row.pontos_distintos
                        );
                    }
                    println!("\nTotal de registros: {}", rows.len());
                }
            }
            2 => {
                println!("\nRANKING DE BIKES (por avaliação)");
                let rows = reports.bike_ranking().await?;
                if rows.is_empty() {
                    println!("   Nenhum registro encontrado para esta consulta");
                } else {
                    for (i, row) in rows.iter().enumerate() {
                        let nota = row
                            .nota_media
                            .map_or_else(|| "N/A".to_string(), |n| format!("{n:.2}"));
                        println!(
                            "{:2}. Bike {} {} - nota {} - {} aluguéis - {:.0} min de uso",
                            i + 1,
                            row.bike_id,
                            row.modelo,
                            nota,
                            row.total_alugueis,
                            row.minutos_uso
                        );
                    }
                }
            }
            3 => {
                println!("\nRELATÓRIO DE DÍVIDAS");
                let rows = reports.outstanding_debts().await?;
                if rows.is_empty() {
                    println!("   Nenhum registro encontrado para esta consulta");
                } else {
                    for (i, row) in rows.iter().enumerate() {
                        println!(
                            "{:2}. {} ({}) - {} multa(s) - R$ {:.2}",
                            i + 1,
                            row.nome,
                            row.cpf,
                            row.multas_pendentes,
                            row.valor_total
                        );
                    }
                }
            }
            4 => {
                println!("\nAUDITORIA DE MANUTENÇÃO");
                let rows = reports.maintenance_audit().await?;
                if rows.is_empty() {
                    println!("   Nenhum registro encontrado para esta consulta");
                } else {
                    for (i, row) in rows.iter().enumerate() {
                        println!(
                            "{:2}. Bike {} {} - {} - {:.1} dia(s) em manutenção - {}",
                            i + 1,
                            row.bike_id,
                            row.modelo,
                            row.tipo,
                            row.dias_em_manutencao,
                            row.descricao_problema
                        );
                    }
                }
            }
            5 => {
                println!("\nPONTOS COM ALTA OCUPAÇÃO");
                let rows = reports.overloaded_stations().await?;
                if rows.is_empty() {
                    println!("   Nenhum registro encontrado para esta consulta");
                } else {
                    for (i, row) in rows.iter().enumerate() {
                        println!(
                            "{:2}. Ponto {} ({}) - {} movimentações - {:.2}% da capacidade",
                            i + 1,
                            row.ponto_id,
                            row.rua,
                            row.movimentacoes,
                            row.taxa_ocupacao
                        );
                    }
                }
            }
            6 => {
                println!("\nHISTÓRICO COMPLETO DO USUÁRIO");
                let cpf = prompt::cpf("Digite o CPF do usuário: ")?;

                match reports.user_history(cpf.as_str()).await? {
                    Some(h) => {
                        println!("\nRESUMO DO USUÁRIO: {}", h.nome);
                        println!("   Total de aluguéis: {}", h.total_alugueis);
                        println!(
                            "   Tempo total de uso: {:.0} minutos ({:.1} horas)",
                            h.minutos_totais,
                            h.minutos_totais / 60.0
                        );
                        let bikes = h
                            .nota_media_bikes
                            .map_or_else(|| "N/A".to_string(), |n| format!("{n:.2}"));
                        let pontos = h
                            .nota_media_pontos
                            .map_or_else(|| "N/A".to_string(), |n| format!("{n:.2}"));
                        println!("   Nota média das bikes: {bikes}/10");
                        println!("   Nota média dos pontos: {pontos}/10");
                    }
                    None => println!("Usuário não encontrado ou sem histórico."),
                }
            }
            _ => unreachable!("menu_choice bounds the option"),
        }
    }
}

async fn user_situation(db: &Database, reports: &Reports) -> Result<()> {
    println!("\nCONSULTA DE SITUAÇÃO DO USUÁRIO");

    let cpf = prompt::cpf("Digite o CPF para consultar (11 dígitos): ")?;

    let Some(s) = reports.user_situation(cpf.as_str()).await? else {
        println!("Nenhum usuário encontrado com o CPF {}.", cpf.formatted());
        return Ok(());
    };

    let cartao = match s.saldo {
        Some(saldo) => {
            let validade = s
                .data_validade
                .map_or_else(|| "Não definida".to_string(), prompt::format_br_date);
            format!("R$ {saldo:.2} (Validade: {validade})")
        }
        None => "Sem Cartão".to_string(),
    };
    let perfil = if s.is_cad_unico {
        "Isento (CadÚnico)"
    } else {
        "Pagante"
    };

    println!("\n{DIVIDER}");
    println!("FICHA DO USUÁRIO: {}", s.nome);
    println!("{DIVIDER}");
    println!("Local: {}", s.cidade);
    println!("Perfil: {perfil}");
    println!("Cartão: {cartao}");
    println!("Aluguéis em Andamento: {}", s.alugueis_ativos);
    println!("Multas Pendentes: {}", s.multas_pendentes);
    if s.valor_multas > 0.0 {
        println!("Valor Total em Multas: R$ {:.2}", s.valor_multas);
    }
    println!("{}", "-".repeat(DIVIDER.len()));

    if !s.is_regular() {
        println!("[ALERTA] Este usuário possui pendências financeiras!");
        println!("   Bloqueado para novos aluguéis até regularização.");

        let fines = SqliteFineRepository::new(db.pool().clone())
            .list_unpaid_by_user(cpf.as_str())
            .await?;
        if !fines.is_empty() {
            println!("\nDetalhes das Multas Pendentes:");
            for fine in &fines {
                println!(
                    "   - ID {}: {} - R$ {:.2} (Vence: {})",
                    fine.id,
                    fine.tipo,
                    fine.valor,
                    prompt::format_br_date(fine.vencimento)
                );
            }
        }
    } else if s.alugueis_ativos > 0 {
        println!("[INFO] Usuário está utilizando uma bicicleta no momento.");
    } else {
        println!("[SITUAÇÃO REGULAR] Liberado para novos aluguéis.");
    }
    println!("{DIVIDER}");

    Ok(())
}
