//! Business constants for the bike-share management system.
//!
//! This module centralizes every tariff, threshold, and format used by the
//! registration, rental, maintenance, and reporting workflows. Changing a
//! value here changes system behavior everywhere; there are no duplicated
//! literals in the workflow code.

// ============================================================================
// Rental Gating
// ============================================================================

/// Minimum card balance required to start a rental (R$).
///
/// Users whose card balance is below this value are blocked from new
/// rentals, regardless of fleet availability.
pub const MIN_RENTAL_BALANCE: f64 = 5.00;

/// Rental fee per minute of use (R$).
///
/// The fee is computed at return time from the fractional elapsed
/// duration and rounded to two decimal places.
pub const FEE_PER_MINUTE: f64 = 0.10;

// ============================================================================
// Card Issuance
// ============================================================================

/// Minimum card validity, counted from the issuance date (days).
pub const MIN_CARD_VALIDITY_DAYS: i64 = 30;

/// Maximum card validity, counted from the issuance date (days).
pub const MAX_CARD_VALIDITY_DAYS: i64 = 5 * 365;

// ============================================================================
// Fleet Registration
// ============================================================================

/// Oldest accepted manufacture year for a bike.
///
/// The upper bound is the current calendar year, checked at input time.
pub const MIN_MANUFACTURE_YEAR: i32 = 1900;

/// Minimum docking capacity of a station.
pub const MIN_STATION_CAPACITY: i64 = 1;

/// Maximum docking capacity of a station.
pub const MAX_STATION_CAPACITY: i64 = 100;

// ============================================================================
// Reporting
// ============================================================================

/// Window of rental activity considered by the station occupancy report (days).
pub const REPORT_WINDOW_DAYS: i64 = 30;

/// Capacity-relative movement ratio above which a station is flagged
/// as overloaded by the occupancy report.
pub const OCCUPANCY_ALERT_RATIO: f64 = 0.8;

/// Number of entries shown by the bike ranking report.
pub const BIKE_RANKING_LIMIT: i64 = 10;

// ============================================================================
// Field Formats
// ============================================================================

/// Exact digit count of a normalized CPF.
pub const CPF_LENGTH: usize = 11;

/// Exact letter count of a state code (UF).
pub const UF_LENGTH: usize = 2;

/// Minimum accepted length for a person's name.
pub const MIN_NAME_LENGTH: usize = 3;

/// Minimum accepted length for a maintenance problem description.
pub const MIN_PROBLEM_DESCRIPTION_LENGTH: usize = 10;

/// Accepted digit counts for a phone number (landline or mobile).
pub const PHONE_MIN_DIGITS: usize = 10;
pub const PHONE_MAX_DIGITS: usize = 11;

/// Rating bounds for bike and station reviews.
pub const MIN_RATING: i64 = 0;
pub const MAX_RATING: i64 = 10;

/// Operator-facing date format (Brazilian convention).
pub const BR_DATE_FORMAT: &str = "%d/%m/%Y";
