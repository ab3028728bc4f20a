//! Plain-text quote rendering for the "Imprimir" tail action.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use color_eyre::eyre::{eyre, Result};

use crate::data::record::Record;

/// Render a quote into `dir` as `cotizacion_<id>.txt`.
pub fn write_quote(record: &Record, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(format!("cotizacion_{}.txt", record.id()));

    let mut out = String::new();
    let _ = writeln!(out, "COTIZACIÓN #{}", record.id());
    let _ = writeln!(out, "{}", "=".repeat(40));
    let labels = [
        ("cliente", "Cliente"),
        ("concepto", "Concepto"),
        ("monto", "Monto"),
        ("fecha", "Fecha"),
        ("estado", "Estado"),
    ];
    for (key, label) in labels {
        let _ = writeln!(out, "{label:10} {}", record.display(key));
    }

    std::fs::write(&path, out)?;
    Ok(path)
}

/// Render a quote into the user data directory.
pub fn print_quote(record: &Record, app_name: &str) -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .ok_or_else(|| eyre!("Could not determine data directory"))?
        .join(app_name);
    write_quote(record, &dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::record::Value;
    use chrono::NaiveDate;

    #[test]
    fn test_write_quote_contents() {
        let record = Record::new(42)
            .with("cliente", Value::text("María López"))
            .with("concepto", Value::text("Mantenimiento anual"))
            .with("monto", Value::Money(18500.0))
            .with(
                "fecha",
                Value::Date(NaiveDate::from_ymd_opt(2026, 7, 20).unwrap()),
            )
            .with("estado", Value::status("Aprobada"));

        let dir = std::env::temp_dir().join("gestui-print-test");
        let path = write_quote(&record, &dir).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("COTIZACIÓN #42"));
        assert!(text.contains("María López"));
        assert!(text.contains("$18,500.00"));
        assert!(text.contains("20/07/2026"));
    }
}
