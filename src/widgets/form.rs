use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Widget},
};

use crate::config::Theme;
use crate::data::record::{Record, RowId, Value};
use crate::modules::{FieldKind, FieldSpec, Module, ModuleSpec};
use crate::store::Store;
use crate::validate::{self, FieldError};
use crate::widgets::centered_rect;
use crate::widgets::text_input::TextInput;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormEvent {
    None,
    Submitted,
    Cancelled,
}

struct FormField {
    spec: FieldSpec,
    input: TextInput,
    options: Vec<String>,
    option_idx: usize,
    error: Option<FieldError>,
}

impl FormField {
    fn is_select(&self) -> bool {
        matches!(
            self.spec.kind,
            FieldKind::Status(_) | FieldKind::Reference(_)
        )
    }

    fn raw_value(&self) -> String {
        if self.is_select() {
            self.options
                .get(self.option_idx)
                .cloned()
                .unwrap_or_default()
        } else {
            self.input.value().trim().to_string()
        }
    }

    fn cycle(&mut self, delta: i64) {
        if self.options.is_empty() {
            return;
        }
        let len = self.options.len() as i64;
        self.option_idx = ((self.option_idx as i64 + delta).rem_euclid(len)) as usize;
    }
}

/// Create/edit modal. Validation runs on submit; a form with errors never
/// reaches the store.
#[derive(Default)]
pub struct FormModal {
    pub active: bool,
    title: String,
    module: Option<Module>,
    pub editing: Option<RowId>,
    fields: Vec<FormField>,
    focus: usize,
}

impl FormModal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn module(&self) -> Option<Module> {
        self.module
    }

    pub fn open_create(&mut self, spec: &ModuleSpec, store: &Store) {
        self.open(spec, store, None);
        self.title = spec.create_label.to_string();
    }

    pub fn open_edit(&mut self, spec: &ModuleSpec, store: &Store, record: &Record) {
        self.open(spec, store, Some(record));
        self.title = format!("Editar {}", spec.module.singular());
    }

    fn open(&mut self, spec: &ModuleSpec, store: &Store, existing: Option<&Record>) {
        self.active = true;
        self.module = Some(spec.module);
        self.editing = existing.map(Record::id);
        self.focus = 0;
        self.fields = spec
            .fields
            .iter()
            .map(|field| {
                let options = match field.kind {
                    FieldKind::Status(estados) => {
                        estados.iter().map(|s| s.to_string()).collect()
                    }
                    FieldKind::Reference(module) => store
                        .rows(module)
                        .iter()
                        .map(|r| r.display("nombre"))
                        .collect(),
                    _ => Vec::new(),
                };
                let current = existing.map(|r| r.display(field.key)).unwrap_or_default();
                let option_idx = options
                    .iter()
                    .position(|o| *o == current)
                    .unwrap_or(0);
                let mut input = TextInput::new();
                // Select fields keep their value in the option cycle.
                if options.is_empty() {
                    input.set_value(&current);
                }
                FormField {
                    spec: *field,
                    input,
                    options,
                    option_idx,
                    error: None,
                }
            })
            .collect();
        self.sync_focus();
    }

    pub fn close(&mut self) {
        self.active = false;
        self.module = None;
        self.editing = None;
        self.fields.clear();
    }

    fn sync_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.input.set_focused(i == self.focus);
        }
    }

    fn move_focus(&mut self, delta: i64) {
        if self.fields.is_empty() {
            return;
        }
        let len = self.fields.len() as i64;
        self.focus = ((self.focus as i64 + delta).rem_euclid(len)) as usize;
        self.sync_focus();
    }

    pub fn key(&mut self, key: KeyEvent) -> FormEvent {
        match key.code {
            KeyCode::Esc => return FormEvent::Cancelled,
            KeyCode::Tab | KeyCode::Down => self.move_focus(1),
            KeyCode::BackTab | KeyCode::Up => self.move_focus(-1),
            KeyCode::Enter => return FormEvent::Submitted,
            code => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    if field.is_select() {
                        match code {
                            KeyCode::Left => field.cycle(-1),
                            KeyCode::Right | KeyCode::Char(' ') => field.cycle(1),
                            _ => {}
                        }
                    } else {
                        field.input.key(key);
                    }
                }
            }
        }
        FormEvent::None
    }

    /// Validate every field against its kind. Returns true when clean;
    /// errors stay attached to the fields for rendering.
    pub fn validate(&mut self, store: &Store) -> bool {
        for field in &mut self.fields {
            let raw = field.raw_value();
            field.error = if raw.is_empty() {
                field.spec.required.then_some(FieldError::Required)
            } else {
                match field.spec.kind {
                    FieldKind::Email => validate::email(&raw).err(),
                    FieldKind::Phone => validate::phone(&raw).err(),
                    FieldKind::Money => validate::parse_money(&raw).err(),
                    FieldKind::Date => validate::parse_date(&raw).err(),
                    FieldKind::Time => validate::parse_time(&raw).err(),
                    _ => None,
                }
            };
        }

        if self.module == Some(Module::Appointments) {
            self.check_slot(store);
        }

        self.fields.iter().all(|f| f.error.is_none())
    }

    /// Reject double-booking a technician on the exact date and time.
    fn check_slot(&mut self, store: &Store) {
        let value_of = |fields: &[FormField], key: &str| {
            fields
                .iter()
                .find(|f| f.spec.key == key)
                .map(|f| f.raw_value())
        };
        let (Some(tecnico), Some(fecha), Some(hora)) = (
            value_of(&self.fields, "tecnico"),
            value_of(&self.fields, "fecha"),
            value_of(&self.fields, "hora"),
        ) else {
            return;
        };
        let (Ok(fecha), Ok(hora)) = (validate::parse_date(&fecha), validate::parse_time(&hora))
        else {
            return;
        };
        if validate::slot_taken(
            store.rows(Module::Appointments),
            &tecnico,
            fecha,
            hora,
            self.editing,
        ) {
            if let Some(field) = self.fields.iter_mut().find(|f| f.spec.key == "hora") {
                field.error = Some(FieldError::SlotTaken);
            }
        }
    }

    /// Typed values for the store. Only meaningful after a clean
    /// [`validate`](Self::validate) pass; unparseable leftovers degrade to
    /// `Empty` rather than panicking.
    pub fn values(&self) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|field| {
                let raw = field.raw_value();
                let value = match field.spec.kind {
                    FieldKind::Money => validate::parse_money(&raw)
                        .map(Value::Money)
                        .unwrap_or(Value::Empty),
                    FieldKind::Date => validate::parse_date(&raw)
                        .map(Value::Date)
                        .unwrap_or(Value::Empty),
                    FieldKind::Time => validate::parse_time(&raw)
                        .map(Value::Time)
                        .unwrap_or(Value::Empty),
                    FieldKind::Status(_) => Value::status(raw),
                    _ => {
                        if raw.is_empty() {
                            Value::Empty
                        } else {
                            Value::text(raw)
                        }
                    }
                };
                (field.spec.key.to_string(), value)
            })
            .collect()
    }

    pub fn render(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if !self.active {
            return;
        }
        let error_lines = self.fields.iter().filter(|f| f.error.is_some()).count() as u16;
        let height = (self.fields.len() as u16 + error_lines + 4).min(area.height);
        let rect = centered_rect(area, 58, height);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if error_lines > 0 {
                theme.get("modal_border_error")
            } else {
                theme.get("modal_border")
            }))
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let label_width = self
            .fields
            .iter()
            .map(|f| f.spec.label.chars().count() + usize::from(f.spec.required))
            .max()
            .unwrap_or(0);

        let mut y = inner.y;
        for (i, field) in self.fields.iter().enumerate() {
            if y >= inner.y + inner.height.saturating_sub(1) {
                break;
            }
            let focused = i == self.focus;
            let marker = if field.spec.required { "*" } else { "" };
            let label = format!("{}{marker}", field.spec.label);
            let label_style = if focused {
                Style::default().fg(theme.get("primary")).bold()
            } else {
                Style::default().fg(theme.get("dimmed"))
            };
            Paragraph::new(Line::from(Span::styled(
                format!("{label:label_width$} "),
                label_style,
            )))
            .render(Rect { y, height: 1, ..inner }, buf);

            let value_area = Rect {
                x: inner.x + label_width as u16 + 1,
                y,
                width: inner.width.saturating_sub(label_width as u16 + 1),
                height: 1,
            };
            if field.is_select() {
                let value = field.raw_value();
                let text = if focused {
                    format!("◂ {value} ▸")
                } else {
                    value
                };
                Paragraph::new(text).render(value_area, buf);
            } else {
                field.input.render(value_area, buf);
            }
            y += 1;

            if let Some(error) = &field.error {
                if y < inner.y + inner.height {
                    Paragraph::new(format!("{:label_width$} ▲ {error}", ""))
                        .style(Style::default().fg(theme.get("error")))
                        .render(Rect { y, height: 1, ..inner }, buf);
                    y += 1;
                }
            }
        }

        Paragraph::new("Enter Guardar · Tab Campo · ◂ ▸ Opción · Esc Cancelar")
            .style(Style::default().fg(theme.get("dimmed")))
            .centered()
            .render(
                Rect {
                    y: inner.y + inner.height.saturating_sub(1),
                    height: 1,
                    ..inner
                },
                buf,
            );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules;
    use crossterm::event::KeyModifiers;

    fn press(form: &mut FormModal, code: KeyCode) -> FormEvent {
        form.key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_text(form: &mut FormModal, text: &str) {
        for c in text.chars() {
            press(form, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_empty_required_fields_fail_validation() {
        let store = Store::empty();
        let spec = modules::spec(Module::Categories);
        let mut form = FormModal::new();
        form.open_create(&spec, &store);
        assert!(!form.validate(&store));
    }

    #[test]
    fn test_valid_category_form_produces_values() {
        let store = Store::empty();
        let spec = modules::spec(Module::Categories);
        let mut form = FormModal::new();
        form.open_create(&spec, &store);
        type_text(&mut form, "Premium");
        assert!(form.validate(&store));

        let values = form.values();
        assert!(values.contains(&("nombre".to_string(), Value::text("Premium"))));
        assert!(values.contains(&("estado".to_string(), Value::status("Activo"))));
    }

    #[test]
    fn test_select_cycles_options() {
        let store = Store::empty();
        let spec = modules::spec(Module::Categories);
        let mut form = FormModal::new();
        form.open_create(&spec, &store);
        // nombre, descripcion, estado: move to the select field.
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Right);
        let values = form.values();
        assert!(values.contains(&("estado".to_string(), Value::status("Inactivo"))));
    }

    #[test]
    fn test_edit_prefills_existing_values() {
        let mut store = Store::empty();
        let id = store.create(
            Module::Categories,
            vec![
                ("nombre".into(), Value::text("General")),
                ("estado".into(), Value::status("Inactivo")),
            ],
        );
        let spec = modules::spec(Module::Categories);
        let record = store.get(Module::Categories, id).unwrap().clone();
        let mut form = FormModal::new();
        form.open_edit(&spec, &store, &record);
        assert_eq!(form.editing, Some(id));

        let values = form.values();
        assert!(values.contains(&("nombre".to_string(), Value::text("General"))));
        assert!(values.contains(&("estado".to_string(), Value::status("Inactivo"))));
    }

    #[test]
    fn test_double_booking_is_rejected() {
        let mut store = Store::empty();
        store.create(
            Module::Technicians,
            vec![
                ("nombre".into(), Value::text("Luis Romero")),
                ("estado".into(), Value::status("Activo")),
            ],
        );
        store.create(
            Module::Clients,
            vec![("nombre".into(), Value::text("Juan Pérez"))],
        );
        store.create(
            Module::Appointments,
            vec![
                ("cliente".into(), Value::text("Juan Pérez")),
                ("tecnico".into(), Value::text("Luis Romero")),
                (
                    "fecha".into(),
                    Value::Date(chrono::NaiveDate::from_ymd_opt(2026, 8, 10).unwrap()),
                ),
                (
                    "hora".into(),
                    Value::Time(chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap()),
                ),
                ("estado".into(), Value::status("Pendiente")),
            ],
        );

        let spec = modules::spec(Module::Appointments);
        let mut form = FormModal::new();
        form.open_create(&spec, &store);
        // cliente and tecnico selects default to the only options; fill
        // the remaining text fields.
        press(&mut form, KeyCode::Tab);
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "2026-08-10");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "09:00");
        press(&mut form, KeyCode::Tab);
        type_text(&mut form, "Revisión");
        assert!(!form.validate(&store));
    }
}
