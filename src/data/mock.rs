//! Built-in seed rows and the optional JSON seed loader.

use std::path::Path;

use chrono::{NaiveDate, NaiveTime};
use color_eyre::eyre::{eyre, Result};

use crate::data::record::Value;
use crate::modules::{self, FieldKind, Module};
use crate::store::Store;

fn date(y: i32, m: u32, d: u32) -> Value {
    // Seed literals are static and always in range.
    Value::Date(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

fn time(h: u32, m: u32) -> Value {
    Value::Time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
}

fn fields(pairs: &[(&str, Value)]) -> Vec<(String, Value)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

/// The demo dataset every fresh session starts with.
pub fn seed_store() -> Store {
    let mut store = Store::empty();

    for (nombre, descripcion) in [
        ("General", "Clientes sin convenio"),
        ("Frecuente", "Visitas mensuales o más"),
        ("Empresarial", "Cuentas corporativas"),
        ("Garantía", "Servicios cubiertos por garantía"),
    ] {
        store.seed(
            Module::Categories,
            fields(&[
                ("nombre", Value::text(nombre)),
                ("descripcion", Value::text(descripcion)),
                ("estado", Value::status("Activo")),
            ]),
        );
    }

    for (nombre, especialidad, telefono) in [
        ("Luis Romero", "Electricidad", "555-201-1187"),
        ("Carmen Díaz", "Refrigeración", "555-318-0042"),
        ("Óscar Mena", "Línea blanca", "555-440-7731"),
        ("Paola Ruiz", "Electrónica", "555-587-2209"),
    ] {
        store.seed(
            Module::Technicians,
            fields(&[
                ("nombre", Value::text(nombre)),
                ("especialidad", Value::text(especialidad)),
                ("telefono", Value::text(telefono)),
                ("estado", Value::status("Activo")),
            ]),
        );
    }

    for (nombre, correo, telefono, categoria, estado) in [
        ("Juan Pérez", "juan.perez@gmail.com", "555-101-2233", "General", "Activo"),
        ("Ana Torres", "ana.torres@hotmail.com", "555-102-8841", "Frecuente", "Activo"),
        ("María López", "mlopez@empresa.mx", "555-103-5520", "Empresarial", "Activo"),
        ("Carlos Gómez", "cgomez@gmail.com", "555-104-9017", "General", "Inactivo"),
        ("Lucía Fernández", "lucia.fdz@yahoo.com", "555-105-3348", "Frecuente", "Activo"),
        ("Pedro Sánchez", "psanchez@outlook.com", "555-106-7090", "General", "Activo"),
        ("Sofía Ramírez", "sofia.r@gmail.com", "555-107-1184", "Garantía", "Activo"),
        ("Diego Castro", "dcastro@empresa.mx", "555-108-6672", "Empresarial", "Inactivo"),
        ("Elena Vargas", "evargas@gmail.com", "555-109-4456", "General", "Activo"),
        ("Raúl Mendoza", "raul.mendoza@hotmail.com", "555-110-2291", "Frecuente", "Activo"),
        ("Isabel Cruz", "icruz@yahoo.com", "555-111-8873", "General", "Activo"),
        ("Jorge Herrera", "jherrera@outlook.com", "555-112-5067", "Garantía", "Inactivo"),
    ] {
        store.seed(
            Module::Clients,
            fields(&[
                ("nombre", Value::text(nombre)),
                ("correo", Value::text(correo)),
                ("telefono", Value::text(telefono)),
                ("categoria", Value::text(categoria)),
                ("estado", Value::status(estado)),
            ]),
        );
    }

    for (nombre, contacto, correo, telefono) in [
        ("Refacciones del Norte", "Martín Aguilar", "ventas@refnorte.mx", "555-700-1100"),
        ("Electropartes SA", "Gloria Peña", "contacto@electropartes.mx", "555-700-2200"),
        ("Suministros Delta", "Hugo Lara", "pedidos@sdelta.mx", "555-700-3300"),
        ("Importadora Pacífico", "Rita Solís", "rita@impacifico.mx", "555-700-4400"),
    ] {
        store.seed(
            Module::Suppliers,
            fields(&[
                ("nombre", Value::text(nombre)),
                ("contacto", Value::text(contacto)),
                ("correo", Value::text(correo)),
                ("telefono", Value::text(telefono)),
                ("estado", Value::status("Activo")),
            ]),
        );
    }

    for (cliente, tecnico, f, h, servicio, estado) in [
        ("Juan Pérez", "Luis Romero", (2026, 8, 10), (9, 0), "Revisión de instalación", "Pendiente"),
        ("Ana Torres", "Carmen Díaz", (2026, 8, 10), (11, 30), "Mantenimiento de refrigerador", "Pendiente"),
        ("María López", "Óscar Mena", (2026, 8, 11), (10, 0), "Reparación de lavadora", "Pendiente"),
        ("Lucía Fernández", "Paola Ruiz", (2026, 8, 11), (16, 0), "Diagnóstico de televisor", "Pendiente"),
        ("Pedro Sánchez", "Luis Romero", (2026, 8, 12), (9, 0), "Cambio de contactos", "Pendiente"),
        ("Sofía Ramírez", "Carmen Díaz", (2026, 7, 28), (12, 0), "Carga de gas", "Atendida"),
        ("Elena Vargas", "Óscar Mena", (2026, 7, 30), (13, 30), "Ajuste de secadora", "Atendida"),
        ("Raúl Mendoza", "Paola Ruiz", (2026, 8, 3), (17, 0), "Cambio de pantalla", "Cancelada"),
        ("Isabel Cruz", "Luis Romero", (2026, 8, 13), (11, 0), "Revisión de tablero", "Pendiente"),
        ("Ana Torres", "Óscar Mena", (2026, 8, 14), (10, 30), "Instalación de estufa", "Pendiente"),
    ] {
        store.seed(
            Module::Appointments,
            fields(&[
                ("cliente", Value::text(cliente)),
                ("tecnico", Value::text(tecnico)),
                ("fecha", date(f.0, f.1, f.2)),
                ("hora", time(h.0, h.1)),
                ("servicio", Value::text(servicio)),
                ("estado", Value::status(estado)),
            ]),
        );
    }

    for (proveedor, concepto, monto, f, estado) in [
        ("Refacciones del Norte", "Compresores 1/4 HP", 8450.00, (2026, 7, 6), "Pagada"),
        ("Electropartes SA", "Tarjetas de control", 5120.75, (2026, 7, 14), "Pagada"),
        ("Suministros Delta", "Cable calibre 12 (rollo)", 1890.00, (2026, 7, 21), "Pagada"),
        ("Importadora Pacífico", "Motores de lavadora", 12300.50, (2026, 7, 29), "Pendiente"),
        ("Refacciones del Norte", "Filtros y gas R134a", 3275.25, (2026, 8, 3), "Pendiente"),
        ("Electropartes SA", "Fuentes conmutadas", 2480.00, (2026, 8, 5), "Pendiente"),
        ("Suministros Delta", "Herramienta de medición", 6700.00, (2026, 8, 6), "Pagada"),
        ("Importadora Pacífico", "Bandas y rodamientos", 1540.80, (2026, 8, 7), "Pendiente"),
    ] {
        store.seed(
            Module::Purchases,
            fields(&[
                ("proveedor", Value::text(proveedor)),
                ("concepto", Value::text(concepto)),
                ("monto", Value::Money(monto)),
                ("fecha", date(f.0, f.1, f.2)),
                ("estado", Value::status(estado)),
            ]),
        );
    }

    for (cliente, concepto, monto, f, estado) in [
        ("María López", "Mantenimiento anual de equipos", 18500.00, (2026, 7, 20), "Aprobada"),
        ("Juan Pérez", "Instalación de minisplit", 7250.00, (2026, 7, 25), "Pendiente"),
        ("Diego Castro", "Cableado de oficina", 22400.00, (2026, 7, 27), "Rechazada"),
        ("Ana Torres", "Cambio de compresor", 4980.50, (2026, 8, 1), "Aprobada"),
        ("Lucía Fernández", "Reparación de pantalla", 3150.00, (2026, 8, 2), "Pendiente"),
        ("Pedro Sánchez", "Revisión eléctrica completa", 2600.00, (2026, 8, 4), "Pendiente"),
        ("Sofía Ramírez", "Cambio de termostato", 1890.75, (2026, 8, 5), "Aprobada"),
        ("Isabel Cruz", "Balanceo de cargas", 5400.00, (2026, 8, 6), "Pendiente"),
    ] {
        store.seed(
            Module::Quotes,
            fields(&[
                ("cliente", Value::text(cliente)),
                ("concepto", Value::text(concepto)),
                ("monto", Value::Money(monto)),
                ("fecha", date(f.0, f.1, f.2)),
                ("estado", Value::status(estado)),
            ]),
        );
    }

    store
}

fn value_from_json(kind: FieldKind, raw: &serde_json::Value) -> Result<Value> {
    let as_str = || {
        raw.as_str()
            .ok_or_else(|| eyre!("se esperaba texto, llegó {raw}"))
    };
    Ok(match kind {
        FieldKind::Money => match raw {
            serde_json::Value::Number(n) => {
                Value::Money(n.as_f64().ok_or_else(|| eyre!("monto no válido: {n}"))?)
            }
            _ => Value::Money(crate::validate::parse_money(as_str()?)?),
        },
        FieldKind::Date => Value::Date(crate::validate::parse_date(as_str()?)?),
        FieldKind::Time => Value::Time(crate::validate::parse_time(as_str()?)?),
        FieldKind::Status(_) => Value::status(as_str()?),
        _ => Value::text(as_str()?),
    })
}

/// Load a seed file: a JSON object with one array of row objects per
/// module (missing modules fall back to empty). Field types come from the
/// module specs, so nothing is inferred from the strings themselves.
pub fn load_seed(path: &Path) -> Result<Store> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre!("no se pudo leer {}: {e}", path.display()))?;
    let root: serde_json::Value = serde_json::from_str(&text)
        .map_err(|e| eyre!("JSON no válido en {}: {e}", path.display()))?;

    let mut store = Store::empty();
    for module in Module::ALL {
        let Some(rows) = root.get(module.key()).and_then(|v| v.as_array()) else {
            continue;
        };
        let spec = modules::spec(module);
        for (i, row) in rows.iter().enumerate() {
            let mut converted = Vec::with_capacity(spec.fields.len());
            for field in spec.fields {
                let Some(raw) = row.get(field.key) else {
                    continue;
                };
                let value = value_from_json(field.kind, raw).map_err(|e| {
                    eyre!("{}[{}].{}: {e}", module.key(), i, field.key)
                })?;
                converted.push((field.key.to_string(), value));
            }
            store.seed(module, converted);
        }
    }
    Ok(store)
}
