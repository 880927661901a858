//! Field validation helpers for operator-supplied input.
//!
//! These functions back the console prompt layer: every value typed by
//! the operator is checked here (or by the typed constructors in
//! [`crate::types`]) before it is allowed anywhere near a SQL statement.
//! All checks are pure and synchronous.
//!
//! Dates use the Brazilian `DD/MM/AAAA` convention and are compared
//! against the local calendar date, matching how the operators reason
//! about birth dates and card expiry.

use crate::{
    Result,
    constants::{
        BR_DATE_FORMAT, MAX_CARD_VALIDITY_DAYS, MIN_CARD_VALIDITY_DAYS, PHONE_MAX_DIGITS,
        PHONE_MIN_DIGITS,
    },
    error::Error,
};
use chrono::{Duration, Local, NaiveDate};

/// Parse a date in `DD/MM/AAAA` format.
///
/// # Errors
/// Returns `Error::InvalidDate` if the string does not parse.
pub fn parse_br_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), BR_DATE_FORMAT)
        .map_err(|e| Error::InvalidDate(format!("'{s}' is not a valid DD/MM/AAAA date: {e}")))
}

/// Check that a date lies strictly in the past (e.g. a birth date).
///
/// # Errors
/// Returns `Error::InvalidDate` if the date is today or later.
pub fn validate_past_date(date: NaiveDate) -> Result<()> {
    if date >= Local::now().date_naive() {
        return Err(Error::InvalidDate(format!(
            "{} must be in the past",
            date.format(BR_DATE_FORMAT)
        )));
    }
    Ok(())
}

/// Check that a date lies strictly in the future.
///
/// # Errors
/// Returns `Error::InvalidDate` if the date is today or earlier.
pub fn validate_future_date(date: NaiveDate) -> Result<()> {
    if date <= Local::now().date_naive() {
        return Err(Error::InvalidDate(format!(
            "{} must be in the future",
            date.format(BR_DATE_FORMAT)
        )));
    }
    Ok(())
}

/// Check that a card expiry date falls inside the issuance window:
/// at least 30 days and at most 5 years from today.
///
/// # Errors
/// Returns `Error::OutOfRange` naming the violated bound.
pub fn validate_card_validity(expiry: NaiveDate) -> Result<()> {
    let today = Local::now().date_naive();
    let min = today + Duration::days(MIN_CARD_VALIDITY_DAYS);
    let max = today + Duration::days(MAX_CARD_VALIDITY_DAYS);

    if expiry < min {
        return Err(Error::OutOfRange(format!(
            "card expiry must be at least {MIN_CARD_VALIDITY_DAYS} days ahead (got {})",
            expiry.format(BR_DATE_FORMAT)
        )));
    }
    if expiry > max {
        return Err(Error::OutOfRange(format!(
            "card expiry must be at most 5 years ahead (got {})",
            expiry.format(BR_DATE_FORMAT)
        )));
    }
    Ok(())
}

/// Check the basic shape of an e-mail address: `local@domain.tld`.
///
/// This intentionally checks shape only, not deliverability.
///
/// # Errors
/// Returns `Error::InvalidEmail` if the shape does not match.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    let invalid = || Error::InvalidEmail(format!("'{email}' is not a valid e-mail address"));

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let (host, tld) = domain.rsplit_once('.').ok_or_else(invalid)?;
    if host.is_empty() || tld.len() < 2 || !tld.bytes().all(|b| b.is_ascii_alphabetic()) {
        return Err(invalid());
    }

    Ok(())
}

/// Check a phone number: 10 or 11 digits after stripping separators.
///
/// # Errors
/// Returns `Error::InvalidPhone` for any other digit count.
pub fn validate_phone(phone: &str) -> Result<()> {
    let digits = phone.bytes().filter(u8::is_ascii_digit).count();

    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Err(Error::InvalidPhone(format!(
            "phone must have {PHONE_MIN_DIGITS}-{PHONE_MAX_DIGITS} digits, got {digits}"
        )));
    }
    Ok(())
}

/// Check that an integer value lies within an inclusive range.
///
/// # Errors
/// Returns `Error::OutOfRange` naming the field and bounds.
pub fn validate_range(field: &str, value: i64, min: i64, max: i64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(Error::OutOfRange(format!(
            "{field} must be between {min} and {max}, got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_br_date() {
        let date = parse_br_date("25/12/2020").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2020, 12, 25).unwrap());
    }

    #[rstest]
    #[case("2020-12-25")] // ISO format rejected
    #[case("32/01/2020")] // day out of range
    #[case("25/13/2020")] // month out of range
    #[case("banana")]
    fn test_parse_br_date_invalid(#[case] input: &str) {
        assert!(parse_br_date(input).is_err());
    }

    #[test]
    fn test_past_and_future_dates() {
        let today = Local::now().date_naive();
        let yesterday = today - Duration::days(1);
        let tomorrow = today + Duration::days(1);

        assert!(validate_past_date(yesterday).is_ok());
        assert!(validate_past_date(today).is_err());
        assert!(validate_past_date(tomorrow).is_err());

        assert!(validate_future_date(tomorrow).is_ok());
        assert!(validate_future_date(today).is_err());
        assert!(validate_future_date(yesterday).is_err());
    }

    #[test]
    fn test_card_validity_window() {
        let today = Local::now().date_naive();

        // Inside the window
        assert!(validate_card_validity(today + Duration::days(60)).is_ok());
        assert!(validate_card_validity(today + Duration::days(MIN_CARD_VALIDITY_DAYS)).is_ok());
        assert!(validate_card_validity(today + Duration::days(MAX_CARD_VALIDITY_DAYS)).is_ok());

        // Too close and too far
        assert!(validate_card_validity(today + Duration::days(10)).is_err());
        assert!(
            validate_card_validity(today + Duration::days(MAX_CARD_VALIDITY_DAYS + 1)).is_err()
        );
    }

    #[rstest]
    #[case("user@example.com")]
    #[case("maria.silva+bike@provedor.com.br")]
    fn test_email_valid(#[case] input: &str) {
        assert!(validate_email(input).is_ok());
    }

    #[rstest]
    #[case("no-at-sign")]
    #[case("@example.com")]
    #[case("user@domain")]
    #[case("user@.com")]
    #[case("user@example.c")]
    #[case("user@@example.com")]
    fn test_email_invalid(#[case] input: &str) {
        assert!(validate_email(input).is_err());
    }

    #[rstest]
    #[case("(11) 91234-5678")] // 11 digits, mobile
    #[case("1134567890")] // 10 digits, landline
    fn test_phone_valid(#[case] input: &str) {
        assert!(validate_phone(input).is_ok());
    }

    #[rstest]
    #[case("123456789")] // 9 digits
    #[case("123456789012")] // 12 digits
    #[case("")]
    fn test_phone_invalid(#[case] input: &str) {
        assert!(validate_phone(input).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("capacidade", 50, 1, 100).is_ok());
        assert!(validate_range("capacidade", 0, 1, 100).is_err());
        assert!(validate_range("capacidade", 101, 1, 100).is_err());
    }
}
