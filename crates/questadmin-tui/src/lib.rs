// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use questadmin_app::{
    ActionState, AppCommand, AppEvent, AppMode, AppState, AuthClient, ConfirmState, DeleteDialog,
    FormDialog, FormFields, FormMode, FormPayload, FormState, Labeled, MonitoringSnapshot,
    OverviewCounts, PageKind, RecordId, RecordKind, SITE_NAME, SignInField, SignInForm,
    SystemSettings, TablePage, TimeRange, ValidationError, format_basis_points, format_latency,
    format_usd_cents, format_vnd, settings_section_of, settings_section_start,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::Date;
use tracing::{debug, warn};

const STATUS_CLEAR_SECS: u64 = 4;
const CURSOR_MARK: &str = "›";

/// Settings draft as shown on the settings page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SettingsView {
    pub draft: SystemSettings,
    pub dirty: bool,
    pub action: ActionState,
}

/// Result of handing a form to the runtime. Store failures travel as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved(RecordId),
    Rejected(ValidationError),
}

/// Everything the front end needs from the data side.
pub trait AdminRuntime: AuthClient {
    fn today(&self) -> Date;
    fn overview(&mut self) -> Result<OverviewCounts>;
    fn table_page(&mut self, kind: RecordKind) -> Result<TablePage>;
    fn set_keyword(&mut self, kind: RecordKind, keyword: &str) -> Result<()>;
    fn cycle_filter(&mut self, kind: RecordKind, slot: usize) -> Result<()>;
    fn goto_page(&mut self, kind: RecordKind, page: usize) -> Result<()>;
    fn blank_form(&mut self, kind: RecordKind) -> Result<FormState<FormPayload>>;
    fn edit_form(
        &mut self,
        kind: RecordKind,
        id: &RecordId,
    ) -> Result<Option<FormState<FormPayload>>>;
    fn submit_form(
        &mut self,
        kind: RecordKind,
        form: FormState<FormPayload>,
    ) -> Result<SubmitOutcome>;
    fn delete_confirm(&mut self, kind: RecordKind, id: &RecordId) -> Result<Option<ConfirmState>>;
    fn confirm_delete(&mut self, kind: RecordKind, confirm: &ConfirmState) -> Result<bool>;
    /// Returns a status line describing where the download went.
    fn download_report(&mut self, id: &RecordId) -> Result<String>;
    fn settings(&mut self) -> Result<SettingsView>;
    fn edit_setting(&mut self, index: usize, value: &str) -> Result<(), ValidationError>;
    fn cycle_setting(&mut self, index: usize);
    fn save_settings(&mut self) -> Result<(), ValidationError>;
    fn revert_settings(&mut self);
    fn refresh_monitoring(&mut self, range: TimeRange) -> Result<MonitoringSnapshot>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalEvent {
    ClearStatus { token: u64 },
}

#[derive(Debug, Clone, PartialEq, Default)]
struct ViewData {
    overview: OverviewCounts,
    table: Option<TablePage>,
    selected_row: usize,
    monitoring: Option<MonitoringSnapshot>,
    settings: SettingsView,
    settings_cursor: usize,
    sign_in: SignInForm,
    search: String,
    form: FormDialog<FormPayload>,
    form_cursor: usize,
    /// Text being typed into the focused form or settings field.
    field_edit: Option<String>,
    delete: DeleteDialog,
    /// Record shown read-only in the detail popup.
    detail: Option<FormState<FormPayload>>,
    status_token: u64,
}

pub fn run_app<R: AdminRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    if let Err(error) = refresh_view_data(state, runtime, &mut view_data) {
        state.dispatch(AppCommand::SetStatus(format!("load failed: {error}")));
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, &view_data, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event
            && let Event::Key(key) = event::read().context("read event")?
            && handle_key_event(state, runtime, &mut view_data, &internal_tx, key)
        {
            break;
        }
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events(
    state: &mut AppState,
    view_data: &ViewData,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        match event {
            InternalEvent::ClearStatus { token } if token == view_data.status_token => {
                state.dispatch(AppCommand::ClearStatus);
            }
            InternalEvent::ClearStatus { .. } => {}
        }
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_secs(STATUS_CLEAR_SECS));
        let _ = sender.send(InternalEvent::ClearStatus { token });
    });
}

fn emit_status(
    state: &mut AppState,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    message: impl Into<String>,
) {
    state.dispatch(AppCommand::SetStatus(message.into()));
    view_data.status_token = view_data.status_token.saturating_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn handle_key_event<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.mode {
        AppMode::SignIn => handle_sign_in_key(state, runtime, view_data, internal_tx, key),
        AppMode::Help => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
                dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            }
        }
        AppMode::Search => handle_search_key(state, runtime, view_data, internal_tx, key),
        AppMode::Form(kind) => handle_form_key(state, runtime, view_data, internal_tx, kind, key),
        AppMode::Detail(kind) => {
            handle_detail_key(state, runtime, view_data, internal_tx, kind, key);
        }
        AppMode::ConfirmDelete => handle_delete_key(state, runtime, view_data, internal_tx, key),
        AppMode::Settings => handle_settings_key(state, runtime, view_data, internal_tx, key),
        AppMode::Nav => handle_nav_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_sign_in_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let form = &mut view_data.sign_in;
    match key.code {
        KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
        KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.next().next(),
        KeyCode::Backspace => form.pop_char(),
        KeyCode::Char(' ') if form.focus == SignInField::Remember => form.toggle_remember(),
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            form.push_char(ch);
        }
        KeyCode::Enter => {
            if let Ok(session) = form.submit(&mut *runtime) {
                view_data.sign_in = SignInForm::with_email(&session.email);
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::SignedIn(session),
                    internal_tx,
                );
            }
        }
        _ => {}
    }
}

fn handle_nav_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('f'), KeyModifiers::NONE) | (KeyCode::Tab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::NextPage, internal_tx);
            return;
        }
        (KeyCode::Char('b'), KeyModifiers::NONE) | (KeyCode::BackTab, _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::PrevPage, internal_tx);
            return;
        }
        (KeyCode::Char(digit), KeyModifiers::NONE) if digit.is_ascii_digit() => {
            let index = match digit.to_digit(10) {
                Some(0) => 9,
                Some(n) => n as usize - 1,
                None => return,
            };
            if let Some(page) = PageKind::ALL.get(index) {
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::GoTo(*page),
                    internal_tx,
                );
            }
            return;
        }
        (KeyCode::Char('?'), _) => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ShowHelp, internal_tx);
            return;
        }
        (KeyCode::Char('L'), _) => {
            sign_out(state, runtime, view_data, internal_tx);
            return;
        }
        _ => {}
    }

    match state.active_page {
        PageKind::Overview => {
            if key.code == KeyCode::Char('r') {
                reload(state, runtime, view_data, internal_tx);
                emit_status(state, view_data, internal_tx, "overview refreshed");
            }
        }
        PageKind::AiMonitoring => match key.code {
            KeyCode::Char('r') => {
                reload(state, runtime, view_data, internal_tx);
                let range = state.monitoring_range;
                emit_status(state, view_data, internal_tx, format!("refreshed {range}"));
            }
            KeyCode::Char('R') => {
                dispatch_and_refresh(state, runtime, view_data, AppCommand::CycleRange, internal_tx);
            }
            _ => {}
        },
        PageKind::SystemSettings => {
            if matches!(key.code, KeyCode::Char('e') | KeyCode::Enter) {
                view_data.field_edit = None;
                dispatch_and_refresh(
                    state,
                    runtime,
                    view_data,
                    AppCommand::EditSettings,
                    internal_tx,
                );
            }
        }
        page => {
            if let Some(kind) = page.record_kind() {
                handle_record_page_key(state, runtime, view_data, internal_tx, kind, key);
            }
        }
    }
}

fn handle_record_page_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => move_selected_row(view_data, 1),
        KeyCode::Char('k') | KeyCode::Up => move_selected_row(view_data, -1),
        KeyCode::Char('/') => {
            view_data.search = view_data
                .table
                .as_ref()
                .map(|table| table.keyword.clone())
                .unwrap_or_default();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::StartSearch, internal_tx);
        }
        KeyCode::Char('t') => apply_filter_cycle(state, runtime, view_data, internal_tx, kind, 0),
        KeyCode::Char('T') => apply_filter_cycle(state, runtime, view_data, internal_tx, kind, 1),
        KeyCode::Char('n') => step_page(state, runtime, view_data, internal_tx, kind, 1),
        KeyCode::Char('p') => step_page(state, runtime, view_data, internal_tx, kind, -1),
        KeyCode::Char('a') => match runtime.blank_form(kind) {
            Ok(form) => open_form(state, runtime, view_data, internal_tx, kind, form),
            Err(error) => emit_status(state, view_data, internal_tx, format!("{error:#}")),
        },
        KeyCode::Char('e') | KeyCode::Enter => {
            let Some(id) = selected_row_id(view_data) else {
                emit_status(state, view_data, internal_tx, "nothing selected");
                return;
            };
            match runtime.edit_form(kind, &id) {
                Ok(Some(form)) => open_form(state, runtime, view_data, internal_tx, kind, form),
                Ok(None) => {
                    reload(state, runtime, view_data, internal_tx);
                    emit_status(state, view_data, internal_tx, format!("{id} no longer exists"));
                }
                Err(error) => emit_status(state, view_data, internal_tx, format!("{error:#}")),
            }
        }
        KeyCode::Char('v') => {
            let Some(id) = selected_row_id(view_data) else {
                emit_status(state, view_data, internal_tx, "nothing selected");
                return;
            };
            match runtime.edit_form(kind, &id) {
                Ok(Some(record)) => {
                    view_data.detail = Some(record);
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        AppCommand::ShowDetail(kind),
                        internal_tx,
                    );
                }
                Ok(None) => {
                    reload(state, runtime, view_data, internal_tx);
                    emit_status(state, view_data, internal_tx, format!("{id} no longer exists"));
                }
                Err(error) => emit_status(state, view_data, internal_tx, format!("{error:#}")),
            }
        }
        KeyCode::Char('d') => {
            let Some(id) = selected_row_id(view_data) else {
                emit_status(state, view_data, internal_tx, "nothing selected");
                return;
            };
            match runtime.delete_confirm(kind, &id) {
                Ok(Some(confirm)) => {
                    view_data.delete.request(confirm);
                    dispatch_and_refresh(
                        state,
                        runtime,
                        view_data,
                        AppCommand::RequestDelete,
                        internal_tx,
                    );
                }
                Ok(None) => {
                    reload(state, runtime, view_data, internal_tx);
                    emit_status(state, view_data, internal_tx, format!("{id} no longer exists"));
                }
                Err(error) => emit_status(state, view_data, internal_tx, format!("{error:#}")),
            }
        }
        KeyCode::Char('x') if kind == RecordKind::Report => {
            let Some(id) = selected_row_id(view_data) else {
                emit_status(state, view_data, internal_tx, "nothing selected");
                return;
            };
            let message = match runtime.download_report(&id) {
                Ok(message) => message,
                Err(error) => format!("download failed: {error:#}"),
            };
            reload(state, runtime, view_data, internal_tx);
            emit_status(state, view_data, internal_tx, message);
        }
        _ => {}
    }
}

fn handle_search_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(kind) = state.active_page.record_kind() else {
        dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        return;
    };
    match key.code {
        KeyCode::Enter => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            return;
        }
        KeyCode::Esc => {
            view_data.search.clear();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        }
        KeyCode::Backspace => {
            view_data.search.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            view_data.search.push(ch);
        }
        _ => return,
    }
    if let Err(error) = runtime.set_keyword(kind, &view_data.search) {
        emit_status(state, view_data, internal_tx, format!("{error:#}"));
        return;
    }
    view_data.selected_row = 0;
    reload(state, runtime, view_data, internal_tx);
}

fn handle_form_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    key: KeyEvent,
) {
    if let Some(mut buffer) = view_data.field_edit.take() {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => commit_form_field(view_data, &buffer),
            KeyCode::Backspace => {
                buffer.pop();
                view_data.field_edit = Some(buffer);
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(ch);
                view_data.field_edit = Some(buffer);
            }
            _ => view_data.field_edit = Some(buffer),
        }
        return;
    }

    let field_count = view_data
        .form
        .form()
        .map_or(0, |form| form.draft.fields().len());
    match (key.code, key.modifiers) {
        (KeyCode::Esc, _) => {
            view_data.form.close();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("{} form canceled", kind.as_str()),
            );
        }
        (KeyCode::Char('s'), modifiers) if modifiers.contains(KeyModifiers::CONTROL) => {
            submit_open_form(state, runtime, view_data, internal_tx, kind);
        }
        (KeyCode::Down | KeyCode::Tab, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => {
            view_data.form_cursor = step_index(view_data.form_cursor, 1, field_count);
        }
        (KeyCode::Up | KeyCode::BackTab, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => {
            view_data.form_cursor = step_index(view_data.form_cursor, -1, field_count);
        }
        (KeyCode::Enter | KeyCode::Char(' '), _) => {
            let index = view_data.form_cursor;
            let Some(form) = view_data.form.form_mut() else {
                return;
            };
            let Some(entry) = form.draft.fields().get(index) else {
                return;
            };
            if entry.input.is_typed() {
                if key.code == KeyCode::Enter {
                    view_data.field_edit = Some(form.draft.field_text(index));
                }
            } else {
                form.draft.cycle_field(index);
            }
        }
        _ => {}
    }
}

fn commit_form_field(view_data: &mut ViewData, value: &str) {
    let index = view_data.form_cursor;
    let Some(form) = view_data.form.form_mut() else {
        return;
    };
    match form.draft.set_field_text(index, value) {
        Ok(()) => {
            if let FormDialog::Open { error, .. } = &mut view_data.form {
                *error = None;
            }
        }
        Err(error) => view_data.form.fail(error.to_string()),
    }
}

fn submit_open_form<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
) {
    let Some(form) = view_data.form.form().cloned() else {
        return;
    };
    match runtime.submit_form(kind, form) {
        Ok(SubmitOutcome::Saved(id)) => {
            view_data.form.close();
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
            reload(state, runtime, view_data, internal_tx);
            emit_status(
                state,
                view_data,
                internal_tx,
                format!("saved {} {id}", kind.as_str()),
            );
        }
        Ok(SubmitOutcome::Rejected(error)) => view_data.form.fail(error.to_string()),
        Err(error) => view_data.form.fail(format!("save failed: {error:#}")),
    }
}

fn handle_detail_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('v') => {
            view_data.detail = None;
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        }
        KeyCode::Char('e') => {
            if let Some(record) = view_data.detail.take() {
                open_form(state, runtime, view_data, internal_tx, kind, record);
            }
        }
        _ => {}
    }
}

fn handle_delete_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let message = match key.code {
        KeyCode::Char('y') => {
            let (Some(kind), Some(confirm)) =
                (state.active_page.record_kind(), view_data.delete.confirm())
            else {
                return;
            };
            match runtime.confirm_delete(kind, &confirm) {
                Ok(true) => format!("deleted {}", confirm.label),
                Ok(false) => format!("{} was already gone", confirm.label),
                Err(error) => format!("delete failed: {error:#}"),
            }
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            view_data.delete.cancel();
            "delete canceled".to_owned()
        }
        _ => return,
    };
    dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
    reload(state, runtime, view_data, internal_tx);
    emit_status(state, view_data, internal_tx, message);
}

fn handle_settings_key<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let index = view_data.settings_cursor;
    if let Some(mut buffer) = view_data.field_edit.take() {
        match key.code {
            KeyCode::Esc => {}
            KeyCode::Enter => {
                if let Err(error) = runtime.edit_setting(index, &buffer) {
                    emit_status(state, view_data, internal_tx, error.to_string());
                }
                reload(state, runtime, view_data, internal_tx);
            }
            KeyCode::Backspace => {
                buffer.pop();
                view_data.field_edit = Some(buffer);
            }
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                buffer.push(ch);
                view_data.field_edit = Some(buffer);
            }
            _ => view_data.field_edit = Some(buffer),
        }
        return;
    }

    let fields = view_data.settings.draft.fields();
    match key.code {
        KeyCode::Esc => {
            dispatch_and_refresh(state, runtime, view_data, AppCommand::ExitToNav, internal_tx);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            view_data.settings_cursor = step_index(index, 1, fields.len());
        }
        KeyCode::Up | KeyCode::Char('k') => {
            view_data.settings_cursor = step_index(index, -1, fields.len());
        }
        KeyCode::Tab => {
            let section = settings_section_of(index).next();
            view_data.settings_cursor = settings_section_start(section);
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            let Some(entry) = fields.get(index) else {
                return;
            };
            if entry.input.is_typed() {
                if key.code == KeyCode::Enter {
                    view_data.field_edit = Some(view_data.settings.draft.field_text(index));
                }
            } else {
                runtime.cycle_setting(index);
                reload(state, runtime, view_data, internal_tx);
            }
        }
        KeyCode::Char('w') => {
            let message = match runtime.save_settings() {
                Ok(()) => "settings saved".to_owned(),
                Err(error) => format!("settings not saved: {error}"),
            };
            reload(state, runtime, view_data, internal_tx);
            emit_status(state, view_data, internal_tx, message);
        }
        KeyCode::Char('u') => {
            runtime.revert_settings();
            reload(state, runtime, view_data, internal_tx);
            emit_status(state, view_data, internal_tx, "settings reverted");
        }
        _ => {}
    }
}

fn open_form<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    form: FormState<FormPayload>,
) {
    view_data.form.open(form);
    view_data.form_cursor = 0;
    view_data.field_edit = None;
    dispatch_and_refresh(state, runtime, view_data, AppCommand::OpenForm(kind), internal_tx);
}

fn apply_filter_cycle<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    slot: usize,
) {
    let slots = view_data
        .table
        .as_ref()
        .map_or(0, |table| table.filters.len());
    if slot >= slots {
        return;
    }
    if let Err(error) = runtime.cycle_filter(kind, slot) {
        emit_status(state, view_data, internal_tx, format!("{error:#}"));
        return;
    }
    view_data.selected_row = 0;
    reload(state, runtime, view_data, internal_tx);
    if let Some(filter) = view_data
        .table
        .as_ref()
        .and_then(|table| table.filters.get(slot))
    {
        let message = format!("{}: {}", filter.name, filter.value);
        emit_status(state, view_data, internal_tx, message);
    }
}

fn step_page<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    kind: RecordKind,
    delta: isize,
) {
    let Some(window) = view_data.table.as_ref().map(|table| table.window) else {
        return;
    };
    let allowed = if delta > 0 {
        window.has_next()
    } else {
        window.has_prev()
    };
    if !allowed {
        return;
    }
    let target = window.page.saturating_add_signed(delta);
    if let Err(error) = runtime.goto_page(kind, target) {
        emit_status(state, view_data, internal_tx, format!("{error:#}"));
        return;
    }
    view_data.selected_row = 0;
    reload(state, runtime, view_data, internal_tx);
}

fn sign_out<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(session) = state.session.clone() else {
        return;
    };
    runtime.sign_out(&session);
    view_data.sign_in = SignInForm::with_email(&session.email);
    dispatch_and_refresh(state, runtime, view_data, AppCommand::SignOut, internal_tx);
}

fn move_selected_row(view_data: &mut ViewData, delta: isize) {
    let rows = view_data.table.as_ref().map_or(0, |table| table.rows.len());
    if rows == 0 {
        view_data.selected_row = 0;
        return;
    }
    let next = view_data.selected_row.saturating_add_signed(delta);
    view_data.selected_row = next.min(rows - 1);
}

fn step_index(index: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (index as isize + delta).rem_euclid(len as isize) as usize
}

fn selected_row_id(view_data: &ViewData) -> Option<RecordId> {
    view_data
        .table
        .as_ref()
        .and_then(|table| table.rows.get(view_data.selected_row))
        .map(|row| row.id.clone())
}

fn dispatch_and_refresh<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    command: AppCommand,
    internal_tx: &Sender<InternalEvent>,
) {
    let events = state.dispatch(command);
    if should_refresh_view(&events) {
        debug!(page = state.active_page.key(), "refreshing view");
        reload(state, runtime, view_data, internal_tx);
    }
    if events
        .iter()
        .any(|event| matches!(event, AppEvent::StatusUpdated(_)))
    {
        view_data.status_token = view_data.status_token.saturating_add(1);
        schedule_status_clear(internal_tx, view_data.status_token);
    }
}

fn should_refresh_view(events: &[AppEvent]) -> bool {
    events.iter().any(|event| {
        matches!(
            event,
            AppEvent::PageChanged(_) | AppEvent::RangeChanged(_) | AppEvent::SessionStarted(_)
        )
    })
}

fn reload<R: AdminRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    if let Err(error) = refresh_view_data(state, runtime, view_data) {
        warn!(page = state.active_page.key(), "load failed: {error:#}");
        emit_status(state, view_data, internal_tx, format!("load failed: {error}"));
    }
}

fn refresh_view_data<R: AdminRuntime>(
    state: &AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
) -> Result<()> {
    if !state.is_signed_in() {
        return Ok(());
    }
    if let Some(kind) = state.active_page.record_kind() {
        let table = runtime.table_page(kind)?;
        let same_kind = view_data
            .table
            .as_ref()
            .is_some_and(|previous| previous.kind == kind);
        if !same_kind {
            view_data.selected_row = 0;
        }
        view_data.selected_row = view_data
            .selected_row
            .min(table.rows.len().saturating_sub(1));
        view_data.table = Some(table);
        return Ok(());
    }
    match state.active_page {
        PageKind::AiMonitoring => {
            view_data.monitoring = Some(runtime.refresh_monitoring(state.monitoring_range)?);
        }
        PageKind::SystemSettings => {
            view_data.settings = runtime.settings()?;
        }
        _ => {
            view_data.overview = runtime.overview()?;
        }
    }
    Ok(())
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    if state.mode == AppMode::SignIn {
        let area = centered_rect(50, 45, frame.area());
        let sign_in = Paragraph::new(render_sign_in_text(&view_data.sign_in)).block(
            Block::default()
                .title(format!("Sign in | {SITE_NAME}"))
                .borders(Borders::ALL),
        );
        frame.render_widget(sign_in, area);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(2),
        ])
        .split(frame.area());

    let selected = PageKind::ALL
        .iter()
        .position(|page| *page == state.active_page)
        .unwrap_or(0);
    let tabs = Tabs::new(PageKind::ALL.iter().map(|page| page.label()).collect::<Vec<_>>())
        .block(
            Block::default()
                .title(state.active_page.document_title())
                .borders(Borders::ALL),
        )
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .select(selected);
    frame.render_widget(tabs, layout[0]);

    match state.active_page {
        PageKind::Overview => {
            let body = Paragraph::new(render_overview_text(&view_data.overview))
                .block(Block::default().borders(Borders::ALL).title("overview"));
            frame.render_widget(body, layout[1]);
        }
        PageKind::AiMonitoring => {
            let text = view_data
                .monitoring
                .as_ref()
                .map(render_monitoring_text)
                .unwrap_or_default();
            let body = Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("AI monitoring | {}", state.monitoring_range)),
            );
            frame.render_widget(body, layout[1]);
        }
        PageKind::SystemSettings => {
            let body = Paragraph::new(render_settings_text(
                view_data,
                state.mode == AppMode::Settings,
            ))
            .block(Block::default().borders(Borders::ALL).title("settings"));
            frame.render_widget(body, layout[1]);
        }
        _ => render_table(frame, layout[1], state, view_data),
    }

    let status = Paragraph::new(status_text(state, view_data))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, layout[2]);

    match state.mode {
        AppMode::Form(kind) => {
            let area = centered_rect(60, 70, frame.area());
            frame.render_widget(Clear, area);
            let popup = Paragraph::new(render_form_text(view_data)).block(
                Block::default()
                    .title(form_title(kind, view_data.form.form()))
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Cyan)),
            );
            frame.render_widget(popup, area);
        }
        AppMode::Detail(kind) => {
            let area = centered_rect(60, 60, frame.area());
            frame.render_widget(Clear, area);
            let popup = Paragraph::new(render_detail_text(view_data)).block(
                Block::default()
                    .title(detail_title(kind, view_data.detail.as_ref()))
                    .borders(Borders::ALL),
            );
            frame.render_widget(popup, area);
        }
        AppMode::ConfirmDelete => {
            let area = centered_rect(50, 20, frame.area());
            frame.render_widget(Clear, area);
            let popup = Paragraph::new(render_delete_text(&view_data.delete))
                .block(Block::default().title("delete").borders(Borders::ALL));
            frame.render_widget(popup, area);
        }
        AppMode::Help => {
            let area = centered_rect(80, 70, frame.area());
            frame.render_widget(Clear, area);
            let help = Paragraph::new(help_overlay_text())
                .block(Block::default().title("help").borders(Borders::ALL));
            frame.render_widget(help, area);
        }
        AppMode::SignIn | AppMode::Nav | AppMode::Search | AppMode::Settings => {}
    }
}

fn render_table(
    frame: &mut ratatui::Frame<'_>,
    area: Rect,
    state: &AppState,
    view_data: &ViewData,
) {
    let Some(table) = &view_data.table else {
        let empty = Paragraph::new(String::new()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(state.active_page.label()),
        );
        frame.render_widget(empty, area);
        return;
    };

    let widths = vec![Constraint::Min(8); table.columns.len().max(1)];
    let header = Row::new(table.columns.iter().map(|column| {
        Cell::from(*column).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    }));
    let rows = table.rows.iter().enumerate().map(|(index, row)| {
        let style = if index == view_data.selected_row {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        Row::new(row.cells.iter().map(|cell| Cell::from(cell.as_str()))).style(style)
    });

    let widget = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(
            Block::default()
                .title(table_title(state.active_page, table))
                .borders(Borders::ALL),
        );
    frame.render_widget(widget, area);
}

fn table_title(page: PageKind, table: &TablePage) -> String {
    let window = &table.window;
    let mut parts = vec![
        page.label().to_owned(),
        format!("page {}/{}", window.page, window.total_pages.max(1)),
        format!(
            "{}-{} of {}",
            window.range_start, window.range_end, window.total_count
        ),
    ];
    if !table.keyword.is_empty() {
        parts.push(format!("search: {}", table.keyword));
    }
    parts.extend(
        table
            .filters
            .iter()
            .map(|filter| format!("{}: {}", filter.name, filter.value)),
    );
    parts.join(" | ")
}

fn with_commas(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn render_overview_text(counts: &OverviewCounts) -> String {
    [
        format!(
            "users: {} ({} active, {} premium)",
            counts.users, counts.active_users, counts.premium_users
        ),
        format!("recruiters: {}", counts.recruiters),
        format!("questions: {}", counts.questions),
        format!("companies: {}", counts.companies),
        String::new(),
        format!("revenue: {}", format_vnd(counts.revenue_vnd)),
        format!("pending payments: {}", counts.pending_payments),
        format!("reports processing: {}", counts.reports_processing),
    ]
    .join("\n")
}

fn render_monitoring_text(snapshot: &MonitoringSnapshot) -> String {
    let summary = snapshot.summary();
    let mut lines = vec![
        format!(
            "requests {} | avg latency {} | accuracy {} | cost {}",
            with_commas(summary.total_requests),
            format_latency(summary.avg_latency_ms),
            format_basis_points(summary.accuracy_bp),
            format_usd_cents(summary.cost_cents),
        ),
        String::new(),
        format!(
            "{:<16} {:>10} {:>8} {:>9} {:>10}",
            "model", "requests", "latency", "accuracy", "cost"
        ),
    ];
    lines.extend(snapshot.models.iter().map(|model| {
        format!(
            "{:<16} {:>10} {:>8} {:>9} {:>10}",
            model.name,
            with_commas(model.requests),
            format_latency(model.avg_latency_ms),
            format_basis_points(model.accuracy_bp),
            format_usd_cents(model.cost_cents),
        )
    }));

    lines.push(String::new());
    lines.push("alerts".to_owned());
    if snapshot.alerts.is_empty() {
        lines.push("  none".to_owned());
    }
    lines.extend(snapshot.alerts.iter().map(|alert| {
        format!(
            "  [{}] {}: {} ({})",
            alert.level, alert.title, alert.detail, alert.age
        )
    }));

    lines.push(String::new());
    lines.push("recent activity".to_owned());
    lines.extend(snapshot.activities.iter().map(|activity| {
        let latency = activity
            .latency_ms
            .map_or_else(|| "-".to_owned(), format_latency);
        let accuracy = activity
            .accuracy_pct
            .map_or_else(|| "-".to_owned(), |pct| format!("{pct}%"));
        format!(
            "  {:<10} {:<14} {:<36} {:<8} {:>5} {:>4}  {}",
            activity.activity_type.label(),
            activity.user,
            activity.prompt,
            activity.status.as_str(),
            latency,
            accuracy,
            activity.age,
        )
    }));
    lines.join("\n")
}

fn render_settings_text(view_data: &ViewData, active: bool) -> String {
    let settings = &view_data.settings;
    let mut lines = Vec::new();
    if settings.dirty {
        lines.push("unsaved changes (w save, u revert)".to_owned());
    }
    if let Some(message) = settings.action.message() {
        lines.push(message.to_owned());
    }
    let mut section = None;
    for (index, entry) in settings.draft.fields().iter().enumerate() {
        let current = settings_section_of(index);
        if section != Some(current) {
            section = Some(current);
            if !lines.is_empty() {
                lines.push(String::new());
            }
            lines.push(format!("[{current}]"));
        }
        let focused = active && index == view_data.settings_cursor;
        let marker = if focused { CURSOR_MARK } else { " " };
        let value = match (&view_data.field_edit, focused) {
            (Some(buffer), true) => format!("{buffer}_"),
            _ => settings.draft.field_text(index),
        };
        lines.push(format!("{marker} {}: {value}", entry.label));
    }
    lines.join("\n")
}

fn form_title(kind: RecordKind, form: Option<&FormState<FormPayload>>) -> String {
    match form.map(|form| &form.mode) {
        Some(FormMode::Edit(id)) => format!("edit {} {id}", kind.as_str()),
        _ => format!("new {}", kind.as_str()),
    }
}

fn render_form_text(view_data: &ViewData) -> String {
    let Some(form) = view_data.form.form() else {
        return String::new();
    };
    let mut lines: Vec<String> = form
        .draft
        .fields()
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let focused = index == view_data.form_cursor;
            let marker = if focused { CURSOR_MARK } else { " " };
            let value = match (&view_data.field_edit, focused) {
                (Some(buffer), true) => format!("{buffer}_"),
                _ => form.draft.field_text(index),
            };
            format!("{marker} {}: {value}", entry.label)
        })
        .collect();
    if let Some(error) = view_data.form.error() {
        lines.push(String::new());
        lines.push(format!("! {error}"));
    }
    lines.join("\n")
}

fn detail_title(kind: RecordKind, record: Option<&FormState<FormPayload>>) -> String {
    match record.and_then(|record| record.editing()) {
        Some(id) => format!("{} {id}", kind.as_str()),
        None => kind.as_str().to_owned(),
    }
}

fn render_detail_text(view_data: &ViewData) -> String {
    let Some(record) = &view_data.detail else {
        return String::new();
    };
    let fields = record.draft.fields();
    let width = fields
        .iter()
        .map(|entry| entry.label.chars().count())
        .max()
        .unwrap_or(0);
    fields
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let value = record.draft.field_text(index);
            let value = if value.trim().is_empty() {
                "-".to_owned()
            } else {
                value
            };
            format!("{:<width$}  {value}", entry.label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_delete_text(delete: &DeleteDialog) -> String {
    match delete.pending() {
        Some(confirm) => format!("delete {}?\n\ny delete | n keep", confirm.label),
        None => String::new(),
    }
}

fn render_sign_in_text(form: &SignInForm) -> String {
    let marker = |field: SignInField| if form.focus == field { CURSOR_MARK } else { " " };
    let remember = if form.credentials.remember { "x" } else { " " };
    let mut lines = vec![
        format!(
            "{} {}: {}",
            marker(SignInField::Email),
            SignInField::Email.label(),
            form.credentials.email
        ),
        format!(
            "{} {}: {}",
            marker(SignInField::Password),
            SignInField::Password.label(),
            "*".repeat(form.credentials.password.chars().count())
        ),
        format!(
            "{} [{remember}] {}",
            marker(SignInField::Remember),
            SignInField::Remember.label()
        ),
    ];
    if form.pending {
        lines.push(String::new());
        lines.push("signing in...".to_owned());
    }
    if let Some(banner) = &form.banner {
        lines.push(String::new());
        lines.push(format!("! {banner}"));
    }
    lines.join("\n")
}

fn mode_label(mode: AppMode) -> &'static str {
    match mode {
        AppMode::SignIn => "SIGN IN",
        AppMode::Nav => "NAV",
        AppMode::Search => "SEARCH",
        AppMode::Form(_) => "FORM",
        AppMode::Detail(_) => "DETAIL",
        AppMode::ConfirmDelete => "DELETE",
        AppMode::Settings => "SETTINGS",
        AppMode::Help => "HELP",
    }
}

fn key_hints(state: &AppState, view_data: &ViewData) -> String {
    match state.mode {
        AppMode::SignIn => "tab field | space remember | enter sign in | ctrl+q quit".to_owned(),
        AppMode::Search => format!("search: {}_ | enter keep | esc clear", view_data.search),
        AppMode::Form(_) if view_data.field_edit.is_some() => {
            "type value | enter set | esc discard".to_owned()
        }
        AppMode::Form(_) => {
            "up/down field | enter edit | space cycle | ctrl+s save | esc cancel".to_owned()
        }
        AppMode::Detail(_) => "e edit | esc close".to_owned(),
        AppMode::ConfirmDelete => "y delete | n keep".to_owned(),
        AppMode::Settings => {
            "up/down field | tab section | enter edit | space cycle | w save | u revert | esc done"
                .to_owned()
        }
        AppMode::Help => "esc close".to_owned(),
        AppMode::Nav => {
            let page_hints = match state.active_page {
                PageKind::Overview => "r refresh",
                PageKind::AiMonitoring => "r refresh | R range",
                PageKind::SystemSettings => "e edit",
                PageKind::Reports => {
                    "j/k row | / search | t/T filter | n/p page | v view | a add | e edit | d del | x download"
                }
                _ => "j/k row | / search | t/T filter | n/p page | v view | a add | e edit | d del",
            };
            format!("{page_hints} | f/b page | ? help | L sign out | ctrl+q")
        }
    }
}

fn status_text(state: &AppState, view_data: &ViewData) -> String {
    let mode = mode_label(state.mode);
    let hints = key_hints(state, view_data);
    match &state.status_line {
        Some(status) => format!("{mode} | {status} | {hints}"),
        None => format!("{mode} | {hints}"),
    }
}

fn help_overlay_text() -> &'static str {
    "global: ctrl+q quit\n\
nav: f/b or tab/shift+tab page | 1-9, 0 jump to page | ? help | L sign out\n\
lists: j/k row | / search | t/T cycle filters | n/p next/prev page\n\
lists: v view | a add | e or enter edit | d delete | x download report\n\
detail: e edit | esc close\n\
monitoring: r refresh | R cycle 24h/7d/30d\n\
overview: r refresh\n\
form: up/down field | enter edit text | space cycle choice | ctrl+s save | esc cancel\n\
settings: e edit | up/down field | tab next section | w save | u revert | esc done\n\
delete: y confirm | n or esc keep"
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::{
        AdminRuntime, SettingsView, SubmitOutcome, ViewData, handle_key_event, help_overlay_text,
        refresh_view_data, render, render_detail_text, render_form_text, render_monitoring_text,
        render_overview_text, render_settings_text, render_sign_in_text, status_text,
        table_title, with_commas,
    };
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use questadmin_app::{
        ActivityStatus, ActivityType, AiActivity, AlertLevel, AppMode, AppState, AuthClient,
        AuthError, ConfirmState, Credentials, FilterSlot, FormFields, FormPayload, FormState,
        ModelUsage, MonitoringSnapshot, OverviewCounts, PageKind, PageWindow, RecordId,
        RecordKind, Session, SignInForm, SystemAlert, TablePage, TableRow, TimeRange,
        ValidationError,
    };
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::mpsc;
    use time::{Date, Month};

    #[derive(Debug, Default)]
    struct TestRuntime {
        keywords: Vec<(RecordKind, String)>,
        filter_cycles: Vec<(RecordKind, usize)>,
        pages: Vec<(RecordKind, usize)>,
        submitted: Vec<FormState<FormPayload>>,
        reject_submit: bool,
        deleted: Vec<RecordId>,
        downloads: Vec<RecordId>,
        settings: SettingsView,
        settings_saves: usize,
        sign_in_calls: usize,
        sign_outs: usize,
        ranges: Vec<TimeRange>,
    }

    impl AuthClient for TestRuntime {
        fn sign_in(&mut self, credentials: &Credentials) -> Result<Session, AuthError> {
            self.sign_in_calls += 1;
            if credentials.password == "secret" {
                Ok(Session {
                    email: credentials.email.clone(),
                    remember: credentials.remember,
                })
            } else {
                Err(AuthError::BadCredentials)
            }
        }

        fn sign_out(&mut self, _session: &Session) {
            self.sign_outs += 1;
        }
    }

    impl AdminRuntime for TestRuntime {
        fn today(&self) -> Date {
            Date::from_calendar_date(2026, Month::February, 19).expect("valid date")
        }

        fn overview(&mut self) -> anyhow::Result<OverviewCounts> {
            Ok(OverviewCounts {
                users: 6,
                active_users: 4,
                premium_users: 3,
                revenue_vnd: 6_279_000,
                ..OverviewCounts::default()
            })
        }

        fn table_page(&mut self, kind: RecordKind) -> anyhow::Result<TablePage> {
            let keyword = self
                .keywords
                .iter()
                .rev()
                .find(|(candidate, _)| *candidate == kind)
                .map(|(_, keyword)| keyword.clone())
                .unwrap_or_default();
            Ok(TablePage {
                kind,
                columns: vec!["Name", "Email"],
                rows: vec![
                    TableRow {
                        id: RecordId::from("u1"),
                        cells: vec!["An".to_owned(), "an@example.com".to_owned()],
                    },
                    TableRow {
                        id: RecordId::from("u2"),
                        cells: vec!["Binh".to_owned(), "binh@example.com".to_owned()],
                    },
                ],
                window: PageWindow::new(12, 2, 1),
                keyword,
                filters: vec![FilterSlot {
                    name: "status",
                    value: "all",
                }],
            })
        }

        fn set_keyword(&mut self, kind: RecordKind, keyword: &str) -> anyhow::Result<()> {
            self.keywords.push((kind, keyword.to_owned()));
            Ok(())
        }

        fn cycle_filter(&mut self, kind: RecordKind, slot: usize) -> anyhow::Result<()> {
            self.filter_cycles.push((kind, slot));
            Ok(())
        }

        fn goto_page(&mut self, kind: RecordKind, page: usize) -> anyhow::Result<()> {
            self.pages.push((kind, page));
            Ok(())
        }

        fn blank_form(&mut self, kind: RecordKind) -> anyhow::Result<FormState<FormPayload>> {
            Ok(FormState::create(FormPayload::blank_for(kind, self.today())))
        }

        fn edit_form(
            &mut self,
            kind: RecordKind,
            id: &RecordId,
        ) -> anyhow::Result<Option<FormState<FormPayload>>> {
            let mut payload = FormPayload::blank_for(kind, self.today());
            payload.set_field_text(0, "An")?;
            Ok(Some(FormState::edit(id.clone(), payload)))
        }

        fn submit_form(
            &mut self,
            _kind: RecordKind,
            form: FormState<FormPayload>,
        ) -> anyhow::Result<SubmitOutcome> {
            if self.reject_submit {
                return Ok(SubmitOutcome::Rejected(ValidationError::Required {
                    field: "email",
                }));
            }
            self.submitted.push(form);
            Ok(SubmitOutcome::Saved(RecordId::from("u_1")))
        }

        fn delete_confirm(
            &mut self,
            _kind: RecordKind,
            id: &RecordId,
        ) -> anyhow::Result<Option<ConfirmState>> {
            Ok(Some(ConfirmState {
                id: id.clone(),
                label: format!("record {id}"),
            }))
        }

        fn confirm_delete(
            &mut self,
            _kind: RecordKind,
            confirm: &ConfirmState,
        ) -> anyhow::Result<bool> {
            self.deleted.push(confirm.id.clone());
            Ok(true)
        }

        fn download_report(&mut self, id: &RecordId) -> anyhow::Result<String> {
            self.downloads.push(id.clone());
            Ok(format!("downloaded {id}"))
        }

        fn settings(&mut self) -> anyhow::Result<SettingsView> {
            Ok(self.settings.clone())
        }

        fn edit_setting(&mut self, index: usize, value: &str) -> Result<(), ValidationError> {
            self.settings.draft.set_field_text(index, value)?;
            self.settings.dirty = true;
            Ok(())
        }

        fn cycle_setting(&mut self, index: usize) {
            self.settings.draft.cycle_field(index);
            self.settings.dirty = true;
        }

        fn save_settings(&mut self) -> Result<(), ValidationError> {
            self.settings.draft.validate()?;
            self.settings_saves += 1;
            self.settings.dirty = false;
            Ok(())
        }

        fn revert_settings(&mut self) {
            self.settings = SettingsView::default();
        }

        fn refresh_monitoring(&mut self, range: TimeRange) -> anyhow::Result<MonitoringSnapshot> {
            self.ranges.push(range);
            Ok(sample_monitoring(range))
        }
    }

    fn sample_monitoring(range: TimeRange) -> MonitoringSnapshot {
        MonitoringSnapshot {
            range,
            models: vec![ModelUsage {
                name: "GPT-4".to_owned(),
                requests: 8_234,
                avg_latency_ms: 1_100,
                accuracy_bp: 9_620,
                cost_cents: 15_640,
            }],
            alerts: vec![SystemAlert {
                level: AlertLevel::Error,
                title: "API timeout".to_owned(),
                detail: "slow responses".to_owned(),
                age: "5 minutes ago".to_owned(),
            }],
            activities: vec![AiActivity {
                activity_type: ActivityType::Practice,
                user: "Pham Thi D".to_owned(),
                prompt: "English mock interview".to_owned(),
                status: ActivityStatus::Failed,
                latency_ms: None,
                accuracy_pct: None,
                age: "1 hour ago".to_owned(),
            }],
        }
    }

    fn internal_tx() -> mpsc::Sender<super::InternalEvent> {
        let (tx, _rx) = mpsc::channel();
        tx
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn press(
        state: &mut AppState,
        runtime: &mut TestRuntime,
        view_data: &mut ViewData,
        keys: &[KeyEvent],
    ) {
        let tx = internal_tx();
        for key in keys {
            let _ = handle_key_event(state, runtime, view_data, &tx, *key);
        }
    }

    fn typed(text: &str) -> Vec<KeyEvent> {
        text.chars().map(|ch| key(KeyCode::Char(ch))).collect()
    }

    fn signed_in_at(page: PageKind) -> (AppState, TestRuntime, ViewData) {
        let mut state = AppState::starting_at(page);
        state.dispatch(questadmin_app::AppCommand::SignedIn(Session {
            email: "admin@example.com".to_owned(),
            remember: false,
        }));
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();
        refresh_view_data(&state, &mut runtime, &mut view_data).expect("refresh should work");
        (state, runtime, view_data)
    }

    #[test]
    fn ctrl_q_quits_from_any_mode() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();
        let tx = internal_tx();
        assert!(handle_key_event(
            &mut state,
            &mut runtime,
            &mut view_data,
            &tx,
            ctrl('q')
        ));
    }

    #[test]
    fn sign_in_flow_reaches_the_dashboard() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData::default();

        let mut keys = vec![key(KeyCode::Tab)];
        keys.extend(typed("wrong"));
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);
        assert_eq!(state.mode, AppMode::SignIn);
        assert_eq!(
            view_data.sign_in.banner.as_deref(),
            Some("invalid email or password")
        );
        assert!(view_data.sign_in.credentials.password.is_empty());

        let mut keys = typed("secret");
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);
        assert!(state.is_signed_in());
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(runtime.sign_in_calls, 2);
        assert_eq!(view_data.overview.users, 6);
    }

    #[test]
    fn blank_email_is_rejected_before_the_client() {
        let mut state = AppState::default();
        let mut runtime = TestRuntime::default();
        let mut view_data = ViewData {
            sign_in: SignInForm::with_email(""),
            ..ViewData::default()
        };
        let mut keys = vec![key(KeyCode::Tab)];
        keys.extend(typed("secret"));
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);
        assert_eq!(runtime.sign_in_calls, 0);
        assert!(!state.is_signed_in());
    }

    #[test]
    fn page_keys_rotate_and_load_tables() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Overview);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('f'))]);
        assert_eq!(state.active_page, PageKind::Users);
        assert_eq!(
            view_data.table.as_ref().map(|table| table.kind),
            Some(RecordKind::User)
        );

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('0'))]);
        assert_eq!(state.active_page, PageKind::SystemSettings);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('b'))]);
        assert_eq!(state.active_page, PageKind::Reports);
    }

    #[test]
    fn search_mode_pushes_keyword_per_keystroke() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        let mut keys = vec![key(KeyCode::Char('/'))];
        keys.extend(typed("an"));
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);

        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(
            runtime.keywords.last(),
            Some(&(RecordKind::User, "an".to_owned()))
        );
        assert_eq!(
            view_data.table.as_ref().map(|table| table.keyword.as_str()),
            Some("an")
        );

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('/')), key(KeyCode::Esc)],
        );
        assert_eq!(
            runtime.keywords.last(),
            Some(&(RecordKind::User, String::new()))
        );
    }

    #[test]
    fn filter_and_page_keys_reach_the_runtime() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                key(KeyCode::Char('t')),
                key(KeyCode::Char('T')),
                key(KeyCode::Char('n')),
                key(KeyCode::Char('p')),
            ],
        );
        assert_eq!(runtime.filter_cycles, vec![(RecordKind::User, 0)]);
        assert_eq!(runtime.pages, vec![(RecordKind::User, 2)]);
    }

    #[test]
    fn add_form_edits_fields_and_submits() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        let mut keys = vec![key(KeyCode::Char('a')), key(KeyCode::Enter)];
        keys.extend(typed("Test User"));
        keys.push(key(KeyCode::Enter));
        keys.push(key(KeyCode::Down));
        keys.push(key(KeyCode::Enter));
        keys.extend(typed("test@x.com"));
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);
        assert_eq!(state.mode, AppMode::Form(RecordKind::User));
        assert!(render_form_text(&view_data).contains("Full name: Test User"));

        press(&mut state, &mut runtime, &mut view_data, &[ctrl('s')]);
        assert_eq!(state.mode, AppMode::Nav);
        assert!(!view_data.form.is_open());
        let saved = &runtime.submitted[0].draft;
        assert_eq!(saved.field_text(0), "Test User");
        assert_eq!(saved.field_text(1), "test@x.com");
        assert_eq!(state.status_line.as_deref(), Some("saved user u_1"));
    }

    #[test]
    fn rejected_submit_keeps_the_form_open() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        runtime.reject_submit = true;
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('a')), ctrl('s')],
        );
        assert_eq!(state.mode, AppMode::Form(RecordKind::User));
        assert_eq!(
            view_data.form.error(),
            Some("email is required -- enter a value and retry")
        );
        assert!(render_form_text(&view_data).contains("! email is required"));

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Esc)]);
        assert_eq!(state.mode, AppMode::Nav);
        assert!(runtime.submitted.is_empty());
    }

    #[test]
    fn choice_fields_cycle_with_space() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[
                key(KeyCode::Char('a')),
                key(KeyCode::Down),
                key(KeyCode::Down),
                key(KeyCode::Char(' ')),
            ],
        );
        let form = view_data.form.form().expect("form open");
        assert_eq!(form.draft.field_text(2), "Premium");
    }

    #[test]
    fn view_shows_a_read_only_payment_detail() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Payments);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('j')), key(KeyCode::Char('v'))],
        );
        assert_eq!(state.mode, AppMode::Detail(RecordKind::Payment));
        let text = render_detail_text(&view_data);
        assert!(text.contains("Payer"));
        assert!(text.contains("An"));
        assert!(text.contains("Email"));
        assert!(text.contains("Transaction code"));
        assert!(status_text(&state, &view_data).starts_with("DETAIL"));

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('x')), key(KeyCode::Char(' ')), ctrl('s')],
        );
        assert_eq!(state.mode, AppMode::Detail(RecordKind::Payment));
        assert!(runtime.submitted.is_empty());
        assert!(runtime.downloads.is_empty());

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Esc)]);
        assert_eq!(state.mode, AppMode::Nav);
        assert!(view_data.detail.is_none());
    }

    #[test]
    fn detail_hands_off_to_the_edit_form() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Payments);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('v')), key(KeyCode::Char('e'))],
        );
        assert_eq!(state.mode, AppMode::Form(RecordKind::Payment));
        assert_eq!(
            view_data.form.form().and_then(|form| form.editing()),
            Some(&RecordId::from("u1"))
        );
        assert!(view_data.detail.is_none());
    }

    #[test]
    fn delete_requires_confirmation() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('j')), key(KeyCode::Char('d'))],
        );
        assert_eq!(state.mode, AppMode::ConfirmDelete);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('n'))]);
        assert!(runtime.deleted.is_empty());
        assert_eq!(state.status_line.as_deref(), Some("delete canceled"));

        press(
            &mut state,
            &mut runtime,
            &mut view_data,
            &[key(KeyCode::Char('d')), key(KeyCode::Char('y'))],
        );
        assert_eq!(runtime.deleted, vec![RecordId::from("u2")]);
        assert_eq!(state.mode, AppMode::Nav);
        assert_eq!(state.status_line.as_deref(), Some("deleted record u2"));
    }

    #[test]
    fn download_only_on_reports_page() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('x'))]);
        assert!(runtime.downloads.is_empty());

        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Reports);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('x'))]);
        assert_eq!(runtime.downloads, vec![RecordId::from("u1")]);
        assert_eq!(state.status_line.as_deref(), Some("downloaded u1"));
    }

    #[test]
    fn monitoring_range_cycles_and_refreshes() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::AiMonitoring);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('R'))]);
        assert_eq!(state.monitoring_range, TimeRange::Week);
        assert_eq!(runtime.ranges, vec![TimeRange::Day, TimeRange::Week]);
        assert_eq!(
            view_data.monitoring.as_ref().map(|snapshot| snapshot.range),
            Some(TimeRange::Week)
        );
    }

    #[test]
    fn settings_edit_save_and_revert() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::SystemSettings);
        let mut keys = vec![key(KeyCode::Char('e')), key(KeyCode::Enter)];
        keys.extend(std::iter::repeat_n(key(KeyCode::Backspace), 40));
        keys.push(key(KeyCode::Enter));
        press(&mut state, &mut runtime, &mut view_data, &keys);
        assert_eq!(state.mode, AppMode::Settings);
        assert!(view_data.settings.dirty);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('w'))]);
        assert_eq!(runtime.settings_saves, 0);
        assert_eq!(
            state.status_line.as_deref(),
            Some("settings not saved: system name is required -- enter a value and retry")
        );

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('u'))]);
        assert!(!view_data.settings.dirty);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('w'))]);
        assert_eq!(runtime.settings_saves, 1);

        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Tab)]);
        assert_eq!(view_data.settings_cursor, 5);
        let text = render_settings_text(&view_data, true);
        assert!(text.contains("[Security]"));
        assert!(text.contains("› Require 2FA: off"));
    }

    #[test]
    fn sign_out_returns_to_sign_in() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Users);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('L'))]);
        assert_eq!(state.mode, AppMode::SignIn);
        assert_eq!(runtime.sign_outs, 1);
        assert_eq!(view_data.sign_in.credentials.email, "admin@example.com");
    }

    #[test]
    fn help_opens_and_closes() {
        let (mut state, mut runtime, mut view_data) = signed_in_at(PageKind::Overview);
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Char('?'))]);
        assert_eq!(state.mode, AppMode::Help);
        assert!(status_text(&state, &view_data).starts_with("HELP"));
        press(&mut state, &mut runtime, &mut view_data, &[key(KeyCode::Esc)]);
        assert_eq!(state.mode, AppMode::Nav);
        assert!(help_overlay_text().contains("x download report"));
    }

    #[test]
    fn text_renderers_format_numbers() {
        assert_eq!(with_commas(12_456), "12,456");
        assert_eq!(with_commas(999), "999");

        let overview = render_overview_text(&OverviewCounts {
            users: 6,
            active_users: 4,
            premium_users: 3,
            revenue_vnd: 6_279_000,
            ..OverviewCounts::default()
        });
        assert!(overview.contains("users: 6 (4 active, 3 premium)"));
        assert!(overview.contains("revenue: 6,279,000 VND"));

        let monitoring = render_monitoring_text(&sample_monitoring(TimeRange::Day));
        assert!(monitoring.contains("requests 8,234"));
        assert!(monitoring.contains("$156.40"));
        assert!(monitoring.contains("[error] API timeout"));
        assert!(monitoring.contains("Practice"));
    }

    #[test]
    fn table_title_lists_window_and_filters() {
        let (state, mut runtime, _) = signed_in_at(PageKind::Users);
        let table = runtime
            .table_page(RecordKind::User)
            .expect("table page");
        assert_eq!(
            table_title(state.active_page, &table),
            "Users | page 1/6 | 1-2 of 12 | status: all"
        );
    }

    #[test]
    fn sign_in_text_masks_password() {
        let mut form = SignInForm::default();
        form.credentials.password = "abc".to_owned();
        let text = render_sign_in_text(&form);
        assert!(text.contains("Password: ***"));
        assert!(!text.contains("abc"));
    }

    #[test]
    fn every_page_renders_without_panicking() {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).expect("test terminal");
        for page in PageKind::ALL {
            let (state, _, view_data) = signed_in_at(page);
            terminal
                .draw(|frame| render(frame, &state, &view_data))
                .expect("draw");
        }
        let state = AppState::default();
        terminal
            .draw(|frame| render(frame, &state, &ViewData::default()))
            .expect("draw sign-in");
    }
}
