// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use thiserror::Error;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

pub type ValidationResult<T> = Result<T, ValidationError>;

/// User-facing rejection of a form or settings draft. Nothing is committed
/// when one of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required -- enter a value and retry")]
    Required { field: &'static str },
    #[error("{field} must be an email address -- include an @ and retry")]
    InvalidEmail { field: &'static str },
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("{field} must start with http:// or https://")]
    InvalidUrl { field: &'static str },
    #[error("{field} must be a number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} must be a YYYY-MM-DD date, got {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Required { field }
            | Self::InvalidEmail { field }
            | Self::OutOfRange { field, .. }
            | Self::InvalidUrl { field }
            | Self::InvalidNumber { field, .. }
            | Self::InvalidDate { field, .. } => field,
        }
    }
}

pub fn required_text(field: &'static str, value: &str) -> ValidationResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_owned())
}

pub fn required_email(field: &'static str, value: &str) -> ValidationResult<String> {
    let email = required_text(field, value)?;
    if !email.contains('@') {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(email)
}

/// Blank is allowed; anything else must look like an address.
pub fn optional_email(field: &'static str, value: &str) -> ValidationResult<String> {
    let email = value.trim();
    if !email.is_empty() && !email.contains('@') {
        return Err(ValidationError::InvalidEmail { field });
    }
    Ok(email.to_owned())
}

/// Coerces free-form count input. Anything that is not a number counts as
/// zero; fractions are truncated; negatives clamp to zero.
pub fn coerce_count(raw: &str) -> i64 {
    let trimmed = raw.trim().replace(',', "");
    let parsed = trimmed
        .parse::<i64>()
        .ok()
        .or_else(|| {
            trimmed
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .map(|value| value.trunc() as i64)
        })
        .unwrap_or(0);
    clamp_count(parsed)
}

pub fn clamp_count(value: i64) -> i64 {
    value.max(0)
}

pub fn clamp_percent(value: i64) -> i64 {
    value.clamp(0, 100)
}

pub fn parse_number(field: &'static str, raw: &str) -> ValidationResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ValidationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
}

pub fn parse_decimal(field: &'static str, raw: &str) -> ValidationResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| ValidationError::InvalidNumber {
            field,
            value: raw.to_owned(),
        })
}

pub fn ensure_range(field: &'static str, value: i64, min: i64, max: i64) -> ValidationResult<i64> {
    if value < min || value > max {
        return Err(ValidationError::OutOfRange { field, min, max });
    }
    Ok(value)
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

pub fn parse_date(field: &'static str, raw: &str) -> ValidationResult<Date> {
    Date::parse(raw.trim(), DATE_FORMAT).map_err(|_| ValidationError::InvalidDate {
        field,
        value: raw.to_owned(),
    })
}

pub fn format_date(date: Date) -> String {
    date.format(DATE_FORMAT).unwrap_or_default()
}

pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("http://") || value.starts_with("https://")
}

/// Formats a whole-dong amount with thousands separators.
pub fn format_vnd(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, digit) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    let sign = if amount < 0 { "-" } else { "" };
    format!("{sign}{grouped} VND")
}

#[cfg(test)]
mod tests {
    use super::{
        ValidationError, coerce_count, format_date, format_vnd, optional_email, parse_date,
        required_email, required_text,
    };
    use time::{Date, Month};

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(required_text("name", "  Ana  "), Ok("Ana".to_owned()));
        assert_eq!(
            required_text("name", "   "),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn email_needs_an_at_sign() {
        assert!(required_email("email", "a@b").is_ok());
        let error = required_email("email", "nope").expect_err("missing @ should fail");
        assert_eq!(error, ValidationError::InvalidEmail { field: "email" });
        assert!(error.to_string().contains("include an @"));
    }

    #[test]
    fn optional_email_allows_blank_only() {
        assert_eq!(optional_email("email", "   "), Ok(String::new()));
        assert_eq!(optional_email("email", " a@b "), Ok("a@b".to_owned()));
        assert_eq!(
            optional_email("email", "nope"),
            Err(ValidationError::InvalidEmail { field: "email" })
        );
    }

    #[test]
    fn counts_coerce_to_non_negative_integers() {
        assert_eq!(coerce_count("12"), 12);
        assert_eq!(coerce_count(" 7.9 "), 7);
        assert_eq!(coerce_count("1,250"), 1250);
        assert_eq!(coerce_count("-4"), 0);
        assert_eq!(coerce_count("abc"), 0);
        assert_eq!(coerce_count(""), 0);
    }

    #[test]
    fn dates_use_iso_format() {
        let date = parse_date("joined", "2025-03-09").expect("valid date");
        assert_eq!(
            date,
            Date::from_calendar_date(2025, Month::March, 9).expect("calendar date")
        );
        assert_eq!(format_date(date), "2025-03-09");
        let early = Date::from_calendar_date(987, Month::January, 5).expect("calendar date");
        assert_eq!(parse_date("joined", &format_date(early)), Ok(early));
        assert!(parse_date("joined", "09/03/2025").is_err());
    }

    #[test]
    fn vnd_amounts_group_thousands() {
        assert_eq!(format_vnd(0), "0 VND");
        assert_eq!(format_vnd(299_000), "299,000 VND");
        assert_eq!(format_vnd(1_234_567), "1,234,567 VND");
    }
}
