//! Field validators for the form layer and the appointment slot check.

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use thiserror::Error;

use crate::data::record::{Record, RowId, Value};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("este campo es obligatorio")]
    Required,
    #[error("correo electrónico no válido")]
    Email,
    #[error("teléfono no válido")]
    Phone,
    #[error("monto no válido")]
    Money,
    #[error("fecha no válida (AAAA-MM-DD)")]
    Date,
    #[error("hora no válida (HH:MM)")]
    Time,
    #[error("el técnico ya tiene una cita en ese horario")]
    SlotTaken,
}

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap())
}

fn phone_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9][0-9 \-()]{5,18}$").unwrap())
}

pub fn required(input: &str) -> Result<(), FieldError> {
    if input.trim().is_empty() {
        Err(FieldError::Required)
    } else {
        Ok(())
    }
}

pub fn email(input: &str) -> Result<(), FieldError> {
    if email_re().is_match(input.trim()) {
        Ok(())
    } else {
        Err(FieldError::Email)
    }
}

pub fn phone(input: &str) -> Result<(), FieldError> {
    if phone_re().is_match(input.trim()) {
        Ok(())
    } else {
        Err(FieldError::Phone)
    }
}

/// Parse a money amount, tolerating `$` and thousands separators.
pub fn parse_money(input: &str) -> Result<f64, FieldError> {
    let cleaned: String = input
        .trim()
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();
    let amount: f64 = cleaned.parse().map_err(|_| FieldError::Money)?;
    if amount.is_finite() && amount >= 0.0 {
        Ok(amount)
    } else {
        Err(FieldError::Money)
    }
}

pub fn parse_date(input: &str) -> Result<NaiveDate, FieldError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| FieldError::Date)
}

pub fn parse_time(input: &str) -> Result<NaiveTime, FieldError> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M").map_err(|_| FieldError::Time)
}

/// Whether a technician already holds a non-cancelled appointment at the
/// exact slot. `exclude` skips the record being edited.
pub fn slot_taken(
    appointments: &[Record],
    tecnico: &str,
    fecha: NaiveDate,
    hora: NaiveTime,
    exclude: Option<RowId>,
) -> bool {
    appointments.iter().any(|cita| {
        if exclude == Some(cita.id()) {
            return false;
        }
        if cita.display("estado") == "Cancelada" {
            return false;
        }
        cita.display("tecnico") == tecnico
            && cita.get("fecha") == Some(&Value::Date(fecha))
            && cita.get("hora") == Some(&Value::Time(hora))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required() {
        assert_eq!(required("  "), Err(FieldError::Required));
        assert_eq!(required("x"), Ok(()));
    }

    #[test]
    fn test_email() {
        assert!(email("juan@taller.mx").is_ok());
        assert!(email("juan@taller").is_err());
        assert!(email("no-arroba").is_err());
    }

    #[test]
    fn test_phone() {
        assert!(phone("555-123-4567").is_ok());
        assert!(phone("+52 55 1234 5678").is_ok());
        assert!(phone("abc").is_err());
        assert!(phone("12").is_err());
    }

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("$1,250.50"), Ok(1250.5));
        assert_eq!(parse_money("300"), Ok(300.0));
        assert!(parse_money("-5").is_err());
        assert!(parse_money("mil").is_err());
    }

    #[test]
    fn test_parse_date_and_time() {
        assert!(parse_date("2026-02-28").is_ok());
        assert!(parse_date("28/02/2026").is_err());
        assert!(parse_time("09:30").is_ok());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_slot_taken() {
        let fecha = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let hora = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let citas = vec![Record::new(1)
            .with("tecnico", Value::text("Luis Romero"))
            .with("fecha", Value::Date(fecha))
            .with("hora", Value::Time(hora))
            .with("estado", Value::status("Pendiente"))];

        assert!(slot_taken(&citas, "Luis Romero", fecha, hora, None));
        // Editing the same appointment is not a conflict with itself.
        assert!(!slot_taken(&citas, "Luis Romero", fecha, hora, Some(1)));
        // A different hour is free.
        let otra = NaiveTime::from_hms_opt(11, 0, 0).unwrap();
        assert!(!slot_taken(&citas, "Luis Romero", fecha, otra, None));
    }

    #[test]
    fn test_cancelled_slot_is_free() {
        let fecha = NaiveDate::from_ymd_opt(2026, 8, 10).unwrap();
        let hora = NaiveTime::from_hms_opt(10, 0, 0).unwrap();
        let citas = vec![Record::new(1)
            .with("tecnico", Value::text("Luis Romero"))
            .with("fecha", Value::Date(fecha))
            .with("hora", Value::Time(hora))
            .with("estado", Value::status("Cancelada"))];
        assert!(!slot_taken(&citas, "Luis Romero", fecha, hora, None));
    }
}
