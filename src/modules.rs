//! The seven business modules and their table/form wiring.

use crate::table::{ColumnSpec, Matcher, Priority, SearchKey};

/// Enabled estados for the general-purpose modules.
pub const ESTADOS_GENERAL: &[&str] = &["Activo", "Inactivo"];
/// Appointment lifecycle estados.
pub const ESTADOS_CITA: &[&str] = &["Pendiente", "Atendida", "Cancelada"];
/// Purchase estados.
pub const ESTADOS_COMPRA: &[&str] = &["Pendiente", "Pagada"];
/// Quote estados.
pub const ESTADOS_COTIZACION: &[&str] = &["Pendiente", "Aprobada", "Rechazada"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Module {
    Clients,
    Categories,
    Appointments,
    Purchases,
    Quotes,
    Suppliers,
    Technicians,
}

impl Module {
    pub const ALL: [Module; 7] = [
        Module::Clients,
        Module::Categories,
        Module::Appointments,
        Module::Purchases,
        Module::Quotes,
        Module::Suppliers,
        Module::Technicians,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Module::Clients => "Clientes",
            Module::Categories => "Categorías",
            Module::Appointments => "Citas",
            Module::Purchases => "Compras",
            Module::Quotes => "Cotizaciones",
            Module::Suppliers => "Proveedores",
            Module::Technicians => "Técnicos",
        }
    }

    /// Singular form used in toasts and modal titles.
    pub fn singular(&self) -> &'static str {
        match self {
            Module::Clients => "cliente",
            Module::Categories => "categoría",
            Module::Appointments => "cita",
            Module::Purchases => "compra",
            Module::Quotes => "cotización",
            Module::Suppliers => "proveedor",
            Module::Technicians => "técnico",
        }
    }

    /// Canonical unaccented key, used on the command line and as the
    /// per-module array name in JSON seed files.
    pub fn key(&self) -> &'static str {
        match self {
            Module::Clients => "clientes",
            Module::Categories => "categorias",
            Module::Appointments => "citas",
            Module::Purchases => "compras",
            Module::Quotes => "cotizaciones",
            Module::Suppliers => "proveedores",
            Module::Technicians => "tecnicos",
        }
    }

    pub fn from_cli_name(name: &str) -> Option<Module> {
        let name = name.trim().to_lowercase();
        Module::ALL.into_iter().find(|m| {
            m.key() == name || m.title().to_lowercase() == name || m.singular() == name
        })
    }
}

/// Row-level actions a module exposes. The app dispatches these from key
/// presses against the selected row; `Create` is module-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAction {
    Create,
    View,
    Edit,
    Delete,
    Cancel,
    Check,
    Print,
}

impl RowAction {
    pub fn key(&self) -> char {
        match self {
            RowAction::Create => 'n',
            RowAction::View => 'v',
            RowAction::Edit => 'e',
            RowAction::Delete => 'd',
            RowAction::Cancel => 'x',
            RowAction::Check => 'a',
            RowAction::Print => 'p',
        }
    }

    /// Key as a string slice, for the controls strip.
    pub fn key_str(&self) -> &'static str {
        match self {
            RowAction::Create => "n",
            RowAction::View => "v",
            RowAction::Edit => "e",
            RowAction::Delete => "d",
            RowAction::Cancel => "x",
            RowAction::Check => "a",
            RowAction::Print => "p",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RowAction::Create => "Nuevo",
            RowAction::View => "Ver",
            RowAction::Edit => "Editar",
            RowAction::Delete => "Eliminar",
            RowAction::Cancel => "Cancelar",
            RowAction::Check => "Atender",
            RowAction::Print => "Imprimir",
        }
    }

    /// Destructive actions go through the confirm dialog first.
    pub fn needs_confirm(&self) -> bool {
        matches!(self, RowAction::Delete | RowAction::Cancel)
    }
}

/// Input/validation kind for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Phone,
    Money,
    Date,
    Time,
    /// Fixed option cycle (estado vocabularies).
    Status(&'static [&'static str]),
    /// Option cycle over another module's `nombre` values.
    Reference(Module),
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub key: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            required: true,
        }
    }

    const fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// Optional extra rendered column at the table's tail, bound to an action.
#[derive(Debug, Clone, Copy)]
pub struct TailColumn {
    pub header: &'static str,
    pub action: RowAction,
}

/// Everything the app needs to mount one module: table shape, search
/// keys, row actions and form fields.
pub struct ModuleSpec {
    pub module: Module,
    pub create_label: &'static str,
    pub placeholder: &'static str,
    pub columns: Vec<ColumnSpec>,
    pub search_keys: Vec<SearchKey>,
    pub actions: &'static [RowAction],
    pub fields: &'static [FieldSpec],
    pub tail: Option<TailColumn>,
}

pub fn spec(module: Module) -> ModuleSpec {
    match module {
        Module::Clients => ModuleSpec {
            module,
            create_label: "Nuevo cliente",
            placeholder: "Buscar clientes...",
            columns: vec![
                ColumnSpec::new("nombre", "Nombre").width(22),
                ColumnSpec::new("correo", "Correo").priority(Priority::Medium),
                ColumnSpec::new("telefono", "Teléfono").width(14),
                ColumnSpec::new("categoria", "Categoría").priority(Priority::Low),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(10),
            ],
            search_keys: vec![
                SearchKey::new("nombre"),
                SearchKey::new("correo"),
                SearchKey::new("telefono"),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new("nombre", "Nombre", FieldKind::Text),
                FieldSpec::new("correo", "Correo", FieldKind::Email),
                FieldSpec::new("telefono", "Teléfono", FieldKind::Phone),
                FieldSpec::new(
                    "categoria",
                    "Categoría",
                    FieldKind::Reference(Module::Categories),
                ),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_GENERAL)),
            ] },
            tail: None,
        },
        Module::Categories => ModuleSpec {
            module,
            create_label: "Nueva categoría",
            placeholder: "Buscar categorías...",
            columns: vec![
                ColumnSpec::new("nombre", "Nombre").width(20),
                ColumnSpec::new("descripcion", "Descripción").priority(Priority::Medium),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(10),
            ],
            search_keys: vec![
                SearchKey::new("nombre"),
                SearchKey::new("descripcion"),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new("nombre", "Nombre", FieldKind::Text),
                FieldSpec::new("descripcion", "Descripción", FieldKind::Text).optional(),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_GENERAL)),
            ] },
            tail: None,
        },
        Module::Appointments => ModuleSpec {
            module,
            create_label: "Nueva cita",
            placeholder: "Buscar citas...",
            columns: vec![
                ColumnSpec::new("cliente", "Cliente").width(20),
                ColumnSpec::new("tecnico", "Técnico").width(20),
                ColumnSpec::new("fecha", "Fecha")
                    .priority(Priority::High)
                    .width(12),
                ColumnSpec::new("hora", "Hora")
                    .priority(Priority::High)
                    .width(7),
                ColumnSpec::new("servicio", "Servicio").priority(Priority::Low),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(11),
            ],
            search_keys: vec![
                SearchKey::new("cliente"),
                SearchKey::new("tecnico"),
                SearchKey::new("fecha"),
                SearchKey::new("estado"),
            ],
            actions: &[
                RowAction::View,
                RowAction::Edit,
                RowAction::Cancel,
                RowAction::Check,
            ],
            fields: const { &[
                FieldSpec::new("cliente", "Cliente", FieldKind::Reference(Module::Clients)),
                FieldSpec::new(
                    "tecnico",
                    "Técnico",
                    FieldKind::Reference(Module::Technicians),
                ),
                FieldSpec::new("fecha", "Fecha (AAAA-MM-DD)", FieldKind::Date),
                FieldSpec::new("hora", "Hora (HH:MM)", FieldKind::Time),
                FieldSpec::new("servicio", "Servicio", FieldKind::Text),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_CITA)),
            ] },
            tail: None,
        },
        Module::Purchases => ModuleSpec {
            module,
            create_label: "Nueva compra",
            placeholder: "Buscar compras...",
            columns: vec![
                ColumnSpec::new("proveedor", "Proveedor").width(20),
                ColumnSpec::new("concepto", "Concepto").priority(Priority::Medium),
                ColumnSpec::new("monto", "Monto")
                    .priority(Priority::High)
                    .width(12),
                ColumnSpec::new("fecha", "Fecha").width(12),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(10),
            ],
            search_keys: vec![
                SearchKey::new("proveedor"),
                SearchKey::new("concepto"),
                SearchKey::new("monto").with_matcher(Matcher::Numeric),
                SearchKey::new("fecha").with_matcher(Matcher::Date),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new(
                    "proveedor",
                    "Proveedor",
                    FieldKind::Reference(Module::Suppliers),
                ),
                FieldSpec::new("concepto", "Concepto", FieldKind::Text),
                FieldSpec::new("monto", "Monto", FieldKind::Money),
                FieldSpec::new("fecha", "Fecha (AAAA-MM-DD)", FieldKind::Date),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_COMPRA)),
            ] },
            tail: None,
        },
        Module::Quotes => ModuleSpec {
            module,
            create_label: "Nueva cotización",
            placeholder: "Buscar cotizaciones...",
            columns: vec![
                ColumnSpec::new("cliente", "Cliente").width(20),
                ColumnSpec::new("concepto", "Concepto").priority(Priority::Medium),
                ColumnSpec::new("monto", "Monto")
                    .priority(Priority::High)
                    .width(12),
                ColumnSpec::new("fecha", "Fecha")
                    .priority(Priority::Low)
                    .width(12),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(11),
            ],
            search_keys: vec![
                SearchKey::new("cliente"),
                SearchKey::new("concepto"),
                SearchKey::new("monto").with_matcher(Matcher::Numeric),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new("cliente", "Cliente", FieldKind::Reference(Module::Clients)),
                FieldSpec::new("concepto", "Concepto", FieldKind::Text),
                FieldSpec::new("monto", "Monto", FieldKind::Money),
                FieldSpec::new("fecha", "Fecha (AAAA-MM-DD)", FieldKind::Date),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_COTIZACION)),
            ] },
            tail: Some(TailColumn {
                header: "Imprimir",
                action: RowAction::Print,
            }),
        },
        Module::Suppliers => ModuleSpec {
            module,
            create_label: "Nuevo proveedor",
            placeholder: "Buscar proveedores...",
            columns: vec![
                ColumnSpec::new("nombre", "Nombre").width(22),
                ColumnSpec::new("contacto", "Contacto").priority(Priority::Medium),
                ColumnSpec::new("correo", "Correo").priority(Priority::Low),
                ColumnSpec::new("telefono", "Teléfono").width(14),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(10),
            ],
            search_keys: vec![
                SearchKey::new("nombre"),
                SearchKey::new("contacto"),
                SearchKey::new("correo"),
                SearchKey::new("telefono"),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new("nombre", "Nombre", FieldKind::Text),
                FieldSpec::new("contacto", "Contacto", FieldKind::Text).optional(),
                FieldSpec::new("correo", "Correo", FieldKind::Email).optional(),
                FieldSpec::new("telefono", "Teléfono", FieldKind::Phone),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_GENERAL)),
            ] },
            tail: None,
        },
        Module::Technicians => ModuleSpec {
            module,
            create_label: "Nuevo técnico",
            placeholder: "Buscar técnicos...",
            columns: vec![
                ColumnSpec::new("nombre", "Nombre").width(22),
                ColumnSpec::new("especialidad", "Especialidad"),
                ColumnSpec::new("telefono", "Teléfono")
                    .priority(Priority::Medium)
                    .width(14),
                ColumnSpec::new("estado", "Estado")
                    .priority(Priority::High)
                    .width(10),
            ],
            search_keys: vec![
                SearchKey::new("nombre"),
                SearchKey::new("especialidad"),
                SearchKey::new("estado"),
            ],
            actions: &[RowAction::View, RowAction::Edit, RowAction::Delete],
            fields: const { &[
                FieldSpec::new("nombre", "Nombre", FieldKind::Text),
                FieldSpec::new("especialidad", "Especialidad", FieldKind::Text),
                FieldSpec::new("telefono", "Teléfono", FieldKind::Phone).optional(),
                FieldSpec::new("estado", "Estado", FieldKind::Status(ESTADOS_GENERAL)),
            ] },
            tail: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_module_has_a_spec() {
        for module in Module::ALL {
            let spec = spec(module);
            assert!(!spec.columns.is_empty());
            assert!(!spec.search_keys.is_empty());
            assert!(!spec.fields.is_empty());
            assert!(!spec.actions.is_empty());
        }
    }

    #[test]
    fn test_search_keys_are_column_or_field_keys() {
        for module in Module::ALL {
            let spec = spec(module);
            for sk in &spec.search_keys {
                assert!(
                    spec.fields.iter().any(|f| f.key == sk.key),
                    "{:?} search key {} has no field",
                    module,
                    sk.key
                );
            }
        }
    }

    #[test]
    fn test_module_lookup_by_name() {
        assert_eq!(Module::from_cli_name("clientes"), Some(Module::Clients));
        assert_eq!(Module::from_cli_name("Citas"), Some(Module::Appointments));
        assert_eq!(Module::from_cli_name("nada"), None);
    }
}
