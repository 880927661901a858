//! Validated console prompts.
//!
//! Every helper re-prompts until the operator types an acceptable value,
//! so malformed input never reaches the workflows or the database. The
//! only hard stop is end-of-input (closed stdin), surfaced as an
//! `io::Error` so the menu loop can exit cleanly.

use chrono::{Datelike, Local, NaiveDate};
use ciclovia_core::constants::{
    BR_DATE_FORMAT, MAX_RATING, MAX_STATION_CAPACITY, MIN_MANUFACTURE_YEAR,
    MIN_PROBLEM_DESCRIPTION_LENGTH, MIN_RATING, MIN_STATION_CAPACITY,
};
use ciclovia_core::validation::{parse_br_date, validate_card_validity, validate_past_date};
use ciclovia_core::{Cpf, MaintenanceKind, Uf};
use std::io::{self, Write};

/// Read one trimmed line, erroring on end-of-input.
pub fn read_line(label: &str) -> io::Result<String> {
    print!("{label}");
    io::stdout().flush()?;

    let mut buf = String::new();
    let bytes = io::stdin().read_line(&mut buf)?;
    if bytes == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "entrada encerrada",
        ));
    }

    Ok(buf.trim().to_string())
}

/// Prompt for a CPF until it validates.
pub fn cpf(label: &str) -> io::Result<Cpf> {
    loop {
        match Cpf::new(&read_line(label)?) {
            Ok(cpf) => return Ok(cpf),
            Err(_) => println!("[ERRO] CPF inválido! Deve conter exatamente 11 números."),
        }
    }
}

/// Prompt for a non-empty string.
pub fn nonempty(label: &str, field: &str) -> io::Result<String> {
    loop {
        let value = read_line(label)?;
        if !value.is_empty() {
            return Ok(value);
        }
        println!("[ERRO] {field} é obrigatório.");
    }
}

/// Prompt for an optional string; empty input becomes `None`.
pub fn optional(label: &str) -> io::Result<Option<String>> {
    let value = read_line(label)?;
    Ok(if value.is_empty() { None } else { Some(value) })
}

/// Prompt for a string with a minimum length.
pub fn min_len(label: &str, min: usize, message: &str) -> io::Result<String> {
    loop {
        let value = read_line(label)?;
        if value.len() >= min {
            return Ok(value);
        }
        println!("[ERRO] {message}");
    }
}

/// Prompt for a birth-style date: valid DD/MM/AAAA, strictly in the past.
pub fn past_date(label: &str) -> io::Result<NaiveDate> {
    loop {
        match parse_br_date(&read_line(label)?) {
            Ok(date) if validate_past_date(date).is_ok() => return Ok(date),
            Ok(_) => println!("[ERRO] Data deve estar no passado."),
            Err(_) => println!("[ERRO] Data inválida! Use formato DD/MM/AAAA."),
        }
    }
}

/// Prompt for a card expiry date inside the issuance window
/// (>= 30 days, <= 5 years from today).
pub fn card_expiry(label: &str) -> io::Result<NaiveDate> {
    loop {
        match parse_br_date(&read_line(label)?) {
            Ok(date) => match validate_card_validity(date) {
                Ok(()) => return Ok(date),
                Err(e) => println!("[ERRO] {e}"),
            },
            Err(_) => println!("[ERRO] Data inválida! Use formato DD/MM/AAAA."),
        }
    }
}

/// Prompt for a state code (UF).
pub fn uf(label: &str) -> io::Result<Uf> {
    loop {
        match Uf::new(&read_line(label)?) {
            Ok(uf) => return Ok(uf),
            Err(_) => println!("[ERRO] UF inválida! Use 2 letras (ex: SP, RJ)."),
        }
    }
}

/// Prompt for a S/N answer.
pub fn yes_no(label: &str) -> io::Result<bool> {
    loop {
        match read_line(label)?.to_uppercase().as_str() {
            "S" => return Ok(true),
            "N" => return Ok(false),
            _ => println!("[ERRO] Digite apenas 'S' ou 'N'."),
        }
    }
}

/// Prompt for a strictly positive integer (ids, registration numbers).
pub fn positive_int(label: &str, field: &str) -> io::Result<i64> {
    loop {
        match read_line(label)?.parse::<i64>() {
            Ok(value) if value > 0 => return Ok(value),
            _ => println!("[ERRO] {field} deve ser um número inteiro positivo."),
        }
    }
}

/// Prompt for an integer inside an inclusive range.
pub fn int_in_range(label: &str, field: &str, min: i64, max: i64) -> io::Result<i64> {
    loop {
        match read_line(label)?.parse::<i64>() {
            Ok(value) if (min..=max).contains(&value) => return Ok(value),
            _ => println!("[ERRO] {field} deve estar entre {min} e {max}."),
        }
    }
}

/// Prompt for a non-negative decimal; comma accepted as the decimal
/// separator (Brazilian keyboards).
pub fn non_negative_decimal(label: &str, field: &str) -> io::Result<f64> {
    loop {
        match read_line(label)?.replace(',', ".").parse::<f64>() {
            Ok(value) if value >= 0.0 && value.is_finite() => return Ok(value),
            _ => println!("[ERRO] {field} deve ser um número positivo (ex: 50.00)."),
        }
    }
}

/// Prompt for a menu option in `0..=max`.
pub fn menu_choice(max: i64) -> io::Result<i64> {
    loop {
        let label = format!("Escolha uma opção (0-{max}): ");
        match read_line(&label)?.parse::<i64>() {
            Ok(value) if (0..=max).contains(&value) => return Ok(value),
            _ => println!("[ERRO] Digite um número entre 0 e {max}."),
        }
    }
}

/// Prompt for a maintenance kind.
pub fn maintenance_kind(label: &str) -> io::Result<MaintenanceKind> {
    loop {
        match read_line(label)?.parse::<MaintenanceKind>() {
            Ok(kind) => return Ok(kind),
            Err(_) => {
                println!("[ERRO] Tipo inválido. Escolha entre: PREVENTIVA, CORRETIVA ou ANTECIPADA.")
            }
        }
    }
}

/// Prompt for a 0-10 rating.
pub fn rating(label: &str) -> io::Result<i64> {
    int_in_range(label, "Nota", MIN_RATING, MAX_RATING)
}

/// Prompt for a station capacity (1-100).
pub fn station_capacity(label: &str) -> io::Result<i64> {
    int_in_range(
        label,
        "Capacidade",
        MIN_STATION_CAPACITY,
        MAX_STATION_CAPACITY,
    )
}

/// Prompt for a manufacture year (1900 to the current year).
pub fn manufacture_year() -> io::Result<i64> {
    let current = i64::from(Local::now().year());
    let label = format!("Ano de Fabricação ({MIN_MANUFACTURE_YEAR}-{current}): ");
    int_in_range(&label, "Ano", i64::from(MIN_MANUFACTURE_YEAR), current)
}

/// Prompt for a maintenance problem description (>= 10 characters).
pub fn problem_description() -> io::Result<String> {
    min_len(
        "Descrição do problema (mínimo 10 caracteres): ",
        MIN_PROBLEM_DESCRIPTION_LENGTH,
        "Descrição muito curta. Forneça mais detalhes.",
    )
}

/// Format a date for display in the Brazilian convention.
pub fn format_br_date(date: NaiveDate) -> String {
    date.format(BR_DATE_FORMAT).to_string()
}
