use std::sync::mpsc::Sender;

use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use log::debug;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Widget};
use ratatui::{buffer::Buffer, widgets::Wrap};

pub mod auth;
pub mod config;
pub mod data;
pub mod modules;
pub mod print;
pub mod store;
pub mod table;
pub mod validate;
pub mod widgets;

pub use config::{AppConfig, ConfigManager, Theme};
pub use gestui_cli::Args;

use auth::Session;
use data::record::RowId;
use modules::{Module, ModuleSpec, RowAction};
use store::Store;
use table::{TableQuery, Viewport};
use widgets::confirm::ConfirmModal;
use widgets::controls::Controls;
use widgets::datatable::DataTable;
use widgets::detail::DetailModal;
use widgets::form::{FormEvent, FormModal};
use widgets::text_input::{TextInput, TextInputEvent};
use widgets::toast::{ToastStack, Toasts};

/// Application name used for config, data and log paths.
pub const APP_NAME: &str = "gestui";

pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    /// Periodic heartbeat from the event loop; drives toast expiry.
    Tick,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Login,
    Dashboard,
}

/// Login screen state: two inputs and a focus toggle.
struct LoginForm {
    user: TextInput,
    pin: TextInput,
    focus: usize,
}

impl LoginForm {
    fn new() -> Self {
        let mut user = TextInput::new().with_placeholder("usuario");
        user.set_focused(true);
        Self {
            user,
            pin: TextInput::new().with_placeholder("PIN").with_mask('•'),
            focus: 0,
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = 1 - self.focus;
        self.user.set_focused(self.focus == 0);
        self.pin.set_focused(self.focus == 1);
    }

    fn reset(&mut self) {
        self.user.clear();
        self.pin.clear();
        if self.focus != 0 {
            self.toggle_focus();
        }
    }
}

/// Apply CLI overrides onto the loaded configuration.
pub fn apply_cli_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(page_size) = args.page_size {
        config.display.page_size = page_size;
    }
    if args.debug {
        config.debug.enabled = true;
    }
}

pub struct App {
    events: Sender<AppEvent>,
    config: AppConfig,
    theme: Theme,
    session: Session,
    screen: Screen,
    login: LoginForm,
    store: Store,
    active_module: Module,
    module_spec: ModuleSpec,
    table: TableQuery,
    search_input: TextInput,
    search_active: bool,
    form: FormModal,
    confirm: ConfirmModal,
    confirm_pending: Option<(RowAction, RowId)>,
    detail: DetailModal,
    toasts: Toasts,
    viewport: Viewport,
    forced_narrow: bool,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        let config = AppConfig::default();
        let theme = Theme::from_config(&config.theme).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to create default theme: {}. Using fallback.", e);
            Theme {
                colors: std::collections::HashMap::new(),
            }
        });
        Self::new_with_config(events, theme, config)
    }

    pub fn new_with_config(events: Sender<AppEvent>, theme: Theme, config: AppConfig) -> App {
        let active_module = Module::Clients;
        let mut session = Session::new();
        session.set_ready();
        let mut app = App {
            events,
            session,
            screen: Screen::Login,
            login: LoginForm::new(),
            store: data::mock::seed_store(),
            active_module,
            module_spec: modules::spec(active_module),
            table: TableQuery::new(config.display.page_size),
            search_input: TextInput::new(),
            search_active: false,
            form: FormModal::new(),
            confirm: ConfirmModal::new(),
            confirm_pending: None,
            detail: DetailModal::new(),
            toasts: Toasts::new(config.performance.toast_ttl_ticks),
            viewport: Viewport::Wide,
            forced_narrow: false,
            theme,
            config,
        };
        app.open_module(active_module);
        app
    }

    pub fn send_event(&mut self, event: AppEvent) -> Result<()> {
        self.events.send(event)?;
        Ok(())
    }

    pub fn set_store(&mut self, store: Store) {
        self.store = store;
        self.open_module(self.active_module);
    }

    /// Pin the viewport class regardless of terminal size.
    pub fn force_narrow(&mut self) {
        self.forced_narrow = true;
        self.viewport = Viewport::Narrow;
    }

    /// Mount a module: fresh interaction state, nothing carried over.
    pub fn open_module(&mut self, module: Module) {
        self.active_module = module;
        self.module_spec = modules::spec(module);
        self.table = TableQuery::new(self.config.display.page_size);
        self.search_input.clear();
        self.search_active = false;
        debug!("opened module {}", module.title());
    }

    pub fn active_module(&self) -> Module {
        self.active_module
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        match event {
            AppEvent::Tick => {
                self.toasts.tick();
                None
            }
            AppEvent::Resize(width, _) => {
                if !self.forced_narrow {
                    self.viewport =
                        Viewport::classify(*width, self.config.display.narrow_threshold);
                }
                None
            }
            AppEvent::Key(key) => self.key(*key),
            AppEvent::Exit => None,
        }
    }

    fn key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        // Route guard: nothing on the dashboard reacts while the session
        // is closed.
        if !self.session.guard() {
            self.screen = Screen::Login;
            return self.login_key(key);
        }

        if self.form.active {
            self.form_key(key);
            return None;
        }
        if self.confirm.active {
            if let Some(outcome) = self.confirm.key(key) {
                self.confirm.close();
                self.resolve_confirm(outcome);
            }
            return None;
        }
        if self.detail.active {
            if self.detail.key(key) {
                self.detail.close();
            }
            return None;
        }
        if self.search_active {
            self.search_key(key);
            return None;
        }
        self.normal_key(key)
    }

    fn login_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Down | KeyCode::Up => {
                self.login.toggle_focus()
            }
            KeyCode::Enter => {
                let user = self.login.user.value().to_string();
                let pin = self.login.pin.value().to_string();
                match self.session.login(&user, &pin, &self.config.session) {
                    Ok(()) => {
                        self.screen = Screen::Dashboard;
                        self.login.reset();
                        self.toasts
                            .success(format!("Bienvenido, {}", user.trim()));
                    }
                    Err(e) => {
                        self.login.pin.clear();
                        self.toasts.error(e.to_string());
                    }
                }
            }
            KeyCode::Esc => return Some(AppEvent::Exit),
            _ => {
                let input = if self.login.focus == 0 {
                    &mut self.login.user
                } else {
                    &mut self.login.pin
                };
                input.key(key);
            }
        }
        None
    }

    fn search_key(&mut self, key: KeyEvent) {
        match self.search_input.key(key) {
            TextInputEvent::Changed => {
                self.table.set_search(self.search_input.value());
            }
            TextInputEvent::Submit => {
                self.search_active = false;
                self.search_input.set_focused(false);
            }
            TextInputEvent::Cancel => {
                self.search_active = false;
                self.search_input.clear();
                self.search_input.set_focused(false);
                self.table.set_search("");
            }
            TextInputEvent::None => {}
        }
    }

    fn normal_key(&mut self, key: KeyEvent) -> Option<AppEvent> {
        let filtered_len = self.current_view_len();
        match key.code {
            KeyCode::Char('q') => return Some(AppEvent::Exit),
            KeyCode::Char('/') => {
                self.search_active = true;
                self.search_input.set_focused(true);
            }
            KeyCode::Tab => self.cycle_module(1),
            KeyCode::BackTab => self.cycle_module(-1),
            KeyCode::Char(c @ '1'..='7') => {
                let idx = (c as usize) - ('1' as usize);
                self.open_module(Module::ALL[idx]);
            }
            KeyCode::Left | KeyCode::PageUp => self.table.prev_page(filtered_len),
            KeyCode::Right | KeyCode::PageDown => self.table.next_page(filtered_len),
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Char(' ') => {
                if let Some(id) = self.selected_id() {
                    self.table.toggle_expanded(id);
                }
            }
            KeyCode::Char('l') => {
                self.session.logout();
                self.screen = Screen::Login;
                self.toasts.info("Sesión cerrada");
            }
            KeyCode::Char('n') => {
                self.form.open_create(&self.module_spec, &self.store);
            }
            KeyCode::Char(c) => self.action_key(c),
            _ => {}
        }
        None
    }

    fn action_key(&mut self, c: char) {
        let action = self
            .module_spec
            .actions
            .iter()
            .copied()
            .chain(self.module_spec.tail.map(|t| t.action))
            .find(|a| a.key() == c);
        let Some(action) = action else { return };
        let Some(id) = self.selected_id() else {
            self.toasts.warning("No hay fila seleccionada");
            return;
        };

        if action.needs_confirm() {
            let singular = self.active_module.singular();
            let (title, message) = match action {
                RowAction::Cancel => (
                    "Cancelar cita".to_string(),
                    "¿Cancelar la cita seleccionada?".to_string(),
                ),
                _ => (
                    format!("Eliminar {singular}"),
                    format!("¿Eliminar {} seleccionado? Esta acción no se puede deshacer.", singular),
                ),
            };
            self.confirm.open(title, message);
            self.confirm_pending = Some((action, id));
            return;
        }

        self.run_action(action, id);
    }

    fn resolve_confirm(&mut self, outcome: bool) {
        let Some((action, id)) = self.confirm_pending.take() else {
            return;
        };
        if outcome {
            self.run_action(action, id);
        }
    }

    fn run_action(&mut self, action: RowAction, id: RowId) {
        let module = self.active_module;
        match action {
            RowAction::View => {
                if let Some(record) = self.store.get(module, id) {
                    self.detail.open(
                        format!("{} #{id}", capitalize(module.singular())),
                        record,
                        &self.module_spec.columns,
                    );
                }
            }
            RowAction::Edit => {
                if let Some(record) = self.store.get(module, id).cloned() {
                    self.form.open_edit(&self.module_spec, &self.store, &record);
                }
            }
            RowAction::Delete => match self.store.delete(module, id) {
                Ok(()) => self
                    .toasts
                    .success(format!("{} eliminado", capitalize(module.singular()))),
                Err(e) => self.toasts.error(e.to_string()),
            },
            RowAction::Cancel => match self.store.cancel_appointment(id) {
                Ok(()) => self.toasts.success("Cita cancelada"),
                Err(e) => self.toasts.error(e.to_string()),
            },
            RowAction::Check => match self.store.check_appointment(id) {
                Ok(()) => self.toasts.success("Cita atendida"),
                Err(e) => self.toasts.error(e.to_string()),
            },
            RowAction::Print => {
                if let Some(record) = self.store.get(module, id) {
                    match print::print_quote(record, APP_NAME) {
                        Ok(path) => self
                            .toasts
                            .info(format!("Cotización impresa en {}", path.display())),
                        Err(e) => self.toasts.error(format!("No se pudo imprimir: {e}")),
                    }
                }
            }
            RowAction::Create => {}
        }
    }

    fn form_key(&mut self, key: KeyEvent) {
        match self.form.key(key) {
            FormEvent::Cancelled => self.form.close(),
            FormEvent::Submitted => {
                if !self.form.validate(&self.store) {
                    self.toasts.warning("Revisa los campos marcados");
                    return;
                }
                let values = self.form.values();
                let module = self.form.module().unwrap_or(self.active_module);
                let result = match self.form.editing {
                    Some(id) => self
                        .store
                        .update(module, id, values)
                        .map(|()| format!("{} actualizado", capitalize(module.singular()))),
                    None => {
                        let id = self.store.create(module, values);
                        Ok(format!("{} #{id} creado", capitalize(module.singular())))
                    }
                };
                match result {
                    Ok(message) => {
                        self.toasts.success(message);
                        self.form.close();
                    }
                    Err(e) => self.toasts.error(e.to_string()),
                }
            }
            FormEvent::None => {}
        }
    }

    /// Filtered length for the active module under the current search.
    fn current_view_len(&mut self) -> usize {
        let rows = self.store.rows(self.active_module);
        self.table
            .view(rows, &self.module_spec.search_keys)
            .filtered_len
    }

    fn move_selection(&mut self, delta: i64) {
        let rows = self.store.rows(self.active_module);
        let page_len = self
            .table
            .view(rows, &self.module_spec.search_keys)
            .page_len();
        self.table.select_delta(delta, page_len);
    }

    fn selected_id(&mut self) -> Option<RowId> {
        let rows = self.store.rows(self.active_module);
        self.table
            .view(rows, &self.module_spec.search_keys)
            .selected_record()
            .map(|r| r.id())
    }

    fn cycle_module(&mut self, delta: i64) {
        let len = Module::ALL.len() as i64;
        let current = Module::ALL
            .iter()
            .position(|m| *m == self.active_module)
            .unwrap_or(0) as i64;
        let next = (current + delta).rem_euclid(len) as usize;
        self.open_module(Module::ALL[next]);
    }

    fn render_login(&mut self, area: Rect, buf: &mut Buffer) {
        let rect = widgets::centered_rect(area, 44, 9);
        Clear.render(rect, buf);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.get("modal_border")))
            .title("gestui — Iniciar sesión")
            .padding(Padding::horizontal(1));
        let inner = block.inner(rect);
        block.render(rect, buf);

        let rows = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ],
        )
        .split(inner);

        Paragraph::new("Gestión del taller en la terminal")
            .style(Style::default().fg(self.theme.get("dimmed")))
            .render(rows[0], buf);

        let label_style = Style::default().fg(self.theme.get("dimmed"));
        Paragraph::new("Usuario").style(label_style).render(rows[2], buf);
        self.login.user.render(
            Rect {
                x: rows[2].x + 9,
                width: rows[2].width.saturating_sub(9),
                ..rows[2]
            },
            buf,
        );
        Paragraph::new("PIN").style(label_style).render(rows[3], buf);
        self.login.pin.render(
            Rect {
                x: rows[3].x + 9,
                width: rows[3].width.saturating_sub(9),
                ..rows[3]
            },
            buf,
        );

        Paragraph::new("Enter Entrar · Tab Campo · Esc Salir")
            .style(Style::default().fg(self.theme.get("dimmed")))
            .centered()
            .render(rows[4], buf);
    }

    fn render_tabs(&self, area: Rect, buf: &mut Buffer) {
        let mut spans: Vec<Span> = Vec::new();
        for (i, module) in Module::ALL.iter().enumerate() {
            let label = format!(" {} {} ", i + 1, module.title());
            if *module == self.active_module {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(self.theme.get("text_inverse"))
                        .bg(self.theme.get("primary"))
                        .bold(),
                ));
            } else {
                spans.push(Span::styled(
                    label,
                    Style::default().fg(self.theme.get("dimmed")),
                ));
            }
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }

    fn controls_entries(&self) -> Vec<(&'static str, &'static str)> {
        let mut entries: Vec<(&'static str, &'static str)> = vec![
            ("/", "Buscar"),
            ("n", self.module_spec.create_label),
        ];
        for action in self.module_spec.actions {
            entries.push((action.key_str(), action.label()));
        }
        if let Some(tail) = self.module_spec.tail {
            entries.push((tail.action.key_str(), tail.action.label()));
        }
        entries.push(("l", "Cerrar sesión"));
        entries.push(("q", "Salir"));
        entries
    }

    fn render_dashboard(&mut self, area: Rect, buf: &mut Buffer) {
        let layout = Layout::new(
            Direction::Vertical,
            [
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
            ],
        )
        .split(area);

        self.render_tabs(layout[0], buf);

        let rows = self.store.rows(self.active_module);
        let table = DataTable {
            rows,
            columns: &self.module_spec.columns,
            search_keys: &self.module_spec.search_keys,
            viewport: self.viewport,
            placeholder: self.module_spec.placeholder,
            create_label: self.module_spec.create_label,
            search_active: self.search_active,
            tail: self.module_spec.tail.as_ref(),
            card_height: self.config.display.card_height,
            cell_padding: 2,
            theme: &self.theme,
        };
        ratatui::widgets::StatefulWidget::render(table, layout[1], buf, &mut self.table);

        let entries = self.controls_entries();
        let mut controls = Controls::new(&entries)
            .with_dimmed(self.search_active)
            .with_background(self.theme.get("controls_bg"));
        if self.config.ui.show_row_count {
            controls = controls.with_row_count(rows.len());
        }
        (&controls).render(layout[2], buf);
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        // Paint the background once; widgets draw on top.
        Paragraph::new("")
            .style(Style::default().bg(self.theme.get("background")))
            .wrap(Wrap { trim: false })
            .render(area, buf);

        match self.screen {
            Screen::Login => self.render_login(area, buf),
            Screen::Dashboard => self.render_dashboard(area, buf),
        }

        self.form.render(area, buf, &self.theme);
        self.confirm.render(area, buf, &self.theme);
        self.detail.render(area, buf, &self.theme);

        if !self.toasts.is_empty() {
            ToastStack {
                toasts: &self.toasts,
                theme: &self.theme,
            }
            .render(area, buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc::channel;

    fn app() -> App {
        let (tx, _rx) = channel::<AppEvent>();
        App::new(tx)
    }

    fn press(app: &mut App, code: KeyCode) -> Option<AppEvent> {
        app.event(&AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    fn login(app: &mut App) {
        for c in "admin".chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Tab);
        for c in "1234".chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_dashboard_is_guarded() {
        let mut app = app();
        assert_eq!(app.screen(), Screen::Login);
        // Module switch keys do nothing while logged out; they land in
        // the login input instead.
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.screen(), Screen::Login);
        press(&mut app, KeyCode::Backspace);

        login(&mut app);
        assert_eq!(app.screen(), Screen::Dashboard);
    }

    #[test]
    fn test_wrong_pin_stays_on_login() {
        let mut app = app();
        for c in "admin".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Tab);
        for c in "0000".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.screen(), Screen::Login);
    }

    #[test]
    fn test_module_switching() {
        let mut app = app();
        login(&mut app);
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.active_module(), Module::Appointments);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.active_module(), Module::Purchases);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.active_module(), Module::Appointments);
    }

    #[test]
    fn test_search_flow_filters_and_resets() {
        let mut app = app();
        login(&mut app);
        press(&mut app, KeyCode::Char('/'));
        for c in "juan".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        assert_eq!(app.table.search(), "juan");
        // Esc clears the search entirely.
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.table.search(), "");
    }

    #[test]
    fn test_delete_flow_with_confirm() {
        let mut app = app();
        login(&mut app);
        let before = app.store().rows(Module::Clients).len();
        // Select Carlos Gómez, who has no appointments or quotes.
        for _ in 0..3 {
            press(&mut app, KeyCode::Down);
        }
        press(&mut app, KeyCode::Char('d'));
        // Reject first: nothing changes.
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.store().rows(Module::Clients).len(), before);
        // Accept: the row goes away.
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.store().rows(Module::Clients).len(), before - 1);
    }

    #[test]
    fn test_delete_referenced_client_is_rejected() {
        let mut app = app();
        login(&mut app);
        let before = app.store().rows(Module::Clients).len();
        // First row is Juan Pérez, who has appointments and quotes.
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.store().rows(Module::Clients).len(), before);
    }

    #[test]
    fn test_logout_returns_to_login() {
        let mut app = app();
        login(&mut app);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.screen(), Screen::Login);
        // And the guard is closed again.
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.screen(), Screen::Login);
    }

    #[test]
    fn test_quit_event() {
        let mut app = app();
        login(&mut app);
        assert!(matches!(press(&mut app, KeyCode::Char('q')), Some(AppEvent::Exit)));
    }
}
