//! In-memory store for the business collections.
//!
//! Mutations validate their business rules *before* touching state: a
//! rejected mutation leaves every collection exactly as it was, so the
//! UI never needs compensating rollbacks.

use log::{info, warn};
use thiserror::Error;

use crate::data::record::{Record, RowId, Value};
use crate::modules::Module;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("registro {0} no encontrado")]
    NotFound(RowId),
    #[error("no se puede eliminar: en uso por {count} {by}")]
    InUse { count: usize, by: &'static str },
    #[error("una cita {estado} no se puede {action}")]
    InvalidState { action: &'static str, estado: String },
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: RowId,
    clients: Vec<Record>,
    categories: Vec<Record>,
    appointments: Vec<Record>,
    purchases: Vec<Record>,
    quotes: Vec<Record>,
    suppliers: Vec<Record>,
    technicians: Vec<Record>,
}

impl Store {
    pub fn empty() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    pub fn rows(&self, module: Module) -> &[Record] {
        match module {
            Module::Clients => &self.clients,
            Module::Categories => &self.categories,
            Module::Appointments => &self.appointments,
            Module::Purchases => &self.purchases,
            Module::Quotes => &self.quotes,
            Module::Suppliers => &self.suppliers,
            Module::Technicians => &self.technicians,
        }
    }

    fn rows_mut(&mut self, module: Module) -> &mut Vec<Record> {
        match module {
            Module::Clients => &mut self.clients,
            Module::Categories => &mut self.categories,
            Module::Appointments => &mut self.appointments,
            Module::Purchases => &mut self.purchases,
            Module::Quotes => &mut self.quotes,
            Module::Suppliers => &mut self.suppliers,
            Module::Technicians => &mut self.technicians,
        }
    }

    pub fn get(&self, module: Module, id: RowId) -> Option<&Record> {
        self.rows(module).iter().find(|r| r.id() == id)
    }

    pub fn create(&mut self, module: Module, fields: Vec<(String, Value)>) -> RowId {
        let id = self.next_id;
        self.next_id += 1;
        let mut record = Record::new(id);
        for (key, value) in fields {
            record.set(key, value);
        }
        self.rows_mut(module).push(record);
        info!("created {} #{id}", module.singular());
        id
    }

    pub fn update(
        &mut self,
        module: Module,
        id: RowId,
        fields: Vec<(String, Value)>,
    ) -> Result<(), StoreError> {
        let record = self
            .rows_mut(module)
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        for (key, value) in fields {
            record.set(key, value);
        }
        info!("updated {} #{id}", module.singular());
        Ok(())
    }

    pub fn delete(&mut self, module: Module, id: RowId) -> Result<(), StoreError> {
        let name = self
            .get(module, id)
            .ok_or(StoreError::NotFound(id))?
            .display("nombre");

        // Referential rules, checked before any state changes.
        let usage = match module {
            Module::Categories => count_refs(&self.clients, "categoria", &name, "clientes"),
            Module::Technicians => count_refs(&self.appointments, "tecnico", &name, "citas"),
            Module::Suppliers => count_refs(&self.purchases, "proveedor", &name, "compras"),
            Module::Clients => count_refs(&self.appointments, "cliente", &name, "citas")
                .or_else(|| count_refs(&self.quotes, "cliente", &name, "cotizaciones")),
            _ => None,
        };
        if let Some((count, by)) = usage {
            warn!("delete of {} #{id} rejected: {count} {by}", module.singular());
            return Err(StoreError::InUse { count, by });
        }

        self.rows_mut(module).retain(|r| r.id() != id);
        info!("deleted {} #{id}", module.singular());
        Ok(())
    }

    pub fn cancel_appointment(&mut self, id: RowId) -> Result<(), StoreError> {
        self.transition_appointment(id, "cancelar", "Cancelada", "Atendida")
    }

    pub fn check_appointment(&mut self, id: RowId) -> Result<(), StoreError> {
        self.transition_appointment(id, "atender", "Atendida", "Cancelada")
    }

    fn transition_appointment(
        &mut self,
        id: RowId,
        action: &'static str,
        to: &str,
        blocked_from: &str,
    ) -> Result<(), StoreError> {
        let cita = self
            .appointments
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or(StoreError::NotFound(id))?;
        let estado = cita.display("estado");
        if estado == blocked_from || estado == to {
            warn!("appointment #{id} {action} rejected from estado {estado}");
            return Err(StoreError::InvalidState {
                action,
                estado: estado.to_lowercase(),
            });
        }
        cita.set("estado", Value::status(to));
        info!("appointment #{id} -> {to}");
        Ok(())
    }

    /// Seed one record with a known shape. Used by the mock seeder and
    /// the JSON loader; ids still come from the store.
    pub fn seed(&mut self, module: Module, fields: Vec<(String, Value)>) -> RowId {
        self.create(module, fields)
    }
}

fn count_refs(
    rows: &[Record],
    key: &str,
    name: &str,
    by: &'static str,
) -> Option<(usize, &'static str)> {
    if name.is_empty() {
        return None;
    }
    let count = rows.iter().filter(|r| r.display(key) == name).count();
    (count > 0).then_some((count, by))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(nombre: &str) -> Vec<(String, Value)> {
        vec![
            ("nombre".into(), Value::text(nombre)),
            ("estado".into(), Value::status("Activo")),
        ]
    }

    #[test]
    fn test_create_assigns_increasing_ids() {
        let mut store = Store::empty();
        let a = store.create(Module::Categories, named("General"));
        let b = store.create(Module::Categories, named("Premium"));
        assert!(b > a);
        assert_eq!(store.rows(Module::Categories).len(), 2);
    }

    #[test]
    fn test_delete_in_use_category_fails_untouched() {
        let mut store = Store::empty();
        let cat = store.create(Module::Categories, named("General"));
        store.create(
            Module::Clients,
            vec![
                ("nombre".into(), Value::text("Juan")),
                ("categoria".into(), Value::text("General")),
            ],
        );

        let err = store.delete(Module::Categories, cat).unwrap_err();
        assert_eq!(
            err,
            StoreError::InUse {
                count: 1,
                by: "clientes"
            }
        );
        assert_eq!(store.rows(Module::Categories).len(), 1);
    }

    #[test]
    fn test_cancel_then_check_is_rejected() {
        let mut store = Store::empty();
        let cita = store.create(
            Module::Appointments,
            vec![("estado".into(), Value::status("Pendiente"))],
        );
        store.cancel_appointment(cita).unwrap();
        let err = store.check_appointment(cita).unwrap_err();
        assert!(matches!(err, StoreError::InvalidState { .. }));
        assert_eq!(
            store.get(Module::Appointments, cita).unwrap().display("estado"),
            "Cancelada"
        );
    }

    #[test]
    fn test_update_missing_row() {
        let mut store = Store::empty();
        assert_eq!(
            store.update(Module::Clients, 99, vec![]),
            Err(StoreError::NotFound(99))
        );
    }
}
