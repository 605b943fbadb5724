// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{BarChart, Block, Borders, Cell, Clear, Paragraph, Row, Table};
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use vigil_app::{
    AppCommand, AppEvent, AppState, Category, CategoryFormInput, CategoryId, ContentId,
    ContentItem, ContentPage, ListQuery, LoginFormInput, QueryCommand, QueryEvent, Route, Session,
    Severity, SeverityBand, SortDirection, SortField, Stats,
};

pub const STATS_POLL_INTERVAL: Duration = Duration::from_secs(30);
const STATUS_CLEAR_AFTER: Duration = Duration::from_secs(4);

/// Fetch failure as the views need to distinguish it: a missing resource
/// renders a dedicated message, an auth failure drops the session, and
/// everything else is surfaced as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    NotFound(String),
    Unauthorized(String),
    Other(String),
}

impl FetchError {
    pub fn message(&self) -> &str {
        match self {
            Self::NotFound(message) | Self::Unauthorized(message) | Self::Other(message) => {
                message
            }
        }
    }

    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the views need from the backend. Live implementations wrap
/// the HTTP client; tests use counting fakes. The `spawn_*` methods run
/// inline by default and are overridden to use worker threads where the
/// call would stall the UI.
pub trait AppRuntime {
    fn login(&mut self, form: &LoginFormInput) -> Result<Session, FetchError>;
    fn current_session(&mut self) -> Result<Session, FetchError>;
    fn logout(&mut self) -> Result<(), FetchError>;
    fn list_categories(&mut self) -> Result<Vec<Category>, FetchError>;
    fn create_category(&mut self, form: &CategoryFormInput) -> Result<Category, FetchError>;
    fn update_category(
        &mut self,
        id: &CategoryId,
        form: &CategoryFormInput,
    ) -> Result<Category, FetchError>;
    fn delete_category(&mut self, id: &CategoryId) -> Result<(), FetchError>;
    fn fetch_page(&mut self, query: &ListQuery) -> Result<ContentPage, FetchError>;
    fn fetch_content(&mut self, id: &ContentId) -> Result<ContentItem, FetchError>;
    fn fetch_stats(&mut self) -> Result<Stats, FetchError>;

    /// Page size for fresh list queries; live runtimes read it from
    /// configuration. The backend clamps to 1..=100 either way.
    fn page_size(&mut self) -> i64 {
        vigil_app::DEFAULT_PAGE_SIZE
    }

    fn spawn_page_fetch(
        &mut self,
        seq: u64,
        query: &ListQuery,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.fetch_page(query);
        tx.send(InternalEvent::PageLoaded { seq, result })
            .map_err(|_| anyhow::anyhow!("event channel closed"))?;
        Ok(())
    }

    fn spawn_detail_fetch(
        &mut self,
        seq: u64,
        id: &ContentId,
        tx: Sender<InternalEvent>,
    ) -> Result<()> {
        let result = self.fetch_content(id);
        tx.send(InternalEvent::DetailLoaded { seq, result })
            .map_err(|_| anyhow::anyhow!("event channel closed"))?;
        Ok(())
    }

    fn spawn_stats_fetch(&mut self, seq: u64, tx: Sender<InternalEvent>) -> Result<()> {
        let result = self.fetch_stats();
        tx.send(InternalEvent::StatsLoaded { seq, result })
            .map_err(|_| anyhow::anyhow!("event channel closed"))?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InternalEvent {
    ClearStatus {
        token: u64,
    },
    /// Emitted by the background ticker while the dashboard is open.
    StatsTick,
    PageLoaded {
        seq: u64,
        result: Result<ContentPage, FetchError>,
    },
    DetailLoaded {
        seq: u64,
        result: Result<ContentItem, FetchError>,
    },
    StatsLoaded {
        seq: u64,
        result: Result<Stats, FetchError>,
    },
}

/// Recurring 30-second tick that drives statistics refreshes. The flag is
/// checked every slice so teardown never waits out a full interval.
pub struct StatsPoller {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl StatsPoller {
    pub fn start(interval: Duration, tx: Sender<InternalEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let slice = Duration::from_millis(200).min(interval);
            let mut elapsed = Duration::ZERO;
            loop {
                if flag.load(Ordering::Relaxed) {
                    return;
                }
                thread::sleep(slice);
                elapsed += slice;
                if elapsed >= interval {
                    elapsed = Duration::ZERO;
                    if tx.send(InternalEvent::StatsTick).is_err() {
                        return;
                    }
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for StatsPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoginField {
    Username,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LoginUiState {
    form: LoginFormInput,
    field: LoginField,
    error: Option<String>,
    submitting: bool,
}

impl Default for LoginUiState {
    fn default() -> Self {
        Self {
            form: LoginFormInput::default(),
            field: LoginField::Username,
            error: None,
            submitting: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct DetailUiState {
    item: Option<ContentItem>,
    error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditorMode {
    Create,
    Edit,
}

const EDITOR_FIELD_COUNT: usize = 4;

/// Raw text buffers for the category editor; parsed and validated on
/// submit so a half-typed criticality never panics.
#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryEditorUiState {
    mode: EditorMode,
    target: Option<CategoryId>,
    name: String,
    description: String,
    criticality: String,
    color: String,
    field_index: usize,
    error: Option<String>,
    notice: Option<String>,
}

impl CategoryEditorUiState {
    fn create() -> Self {
        let defaults = CategoryFormInput::default();
        Self {
            mode: EditorMode::Create,
            target: None,
            name: String::new(),
            description: String::new(),
            criticality: defaults.default_criticality.to_string(),
            color: defaults.color,
            field_index: 0,
            error: None,
            notice: None,
        }
    }

    fn edit(category: &Category) -> Self {
        let form = CategoryFormInput::from_category(category);
        Self {
            mode: EditorMode::Edit,
            target: Some(category.id.clone()),
            name: form.name,
            description: form.description,
            criticality: form.default_criticality.to_string(),
            color: form.color,
            field_index: 0,
            error: None,
            notice: None,
        }
    }

    fn reset_fields(&mut self) {
        let defaults = CategoryFormInput::default();
        self.name.clear();
        self.description.clear();
        self.criticality = defaults.default_criticality.to_string();
        self.color = defaults.color;
        self.field_index = 0;
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.field_index {
            0 => &mut self.name,
            1 => &mut self.description,
            2 => &mut self.criticality,
            _ => &mut self.color,
        }
    }

    fn to_form(&self) -> Result<CategoryFormInput, String> {
        let criticality: i64 = self
            .criticality
            .trim()
            .parse()
            .map_err(|_| format!("default criticality must be a number, got {:?}", self.criticality))?;
        let form = CategoryFormInput {
            name: self.name.clone(),
            description: self.description.clone(),
            default_criticality: criticality,
            color: self.color.clone(),
        };
        form.validate().map_err(|error| error.to_string())?;
        Ok(form)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CategoryAdminUiState {
    selected: usize,
    editor: Option<CategoryEditorUiState>,
    confirm_delete: Option<(CategoryId, String)>,
    notice: Option<String>,
    error: Option<String>,
}

#[derive(Default)]
struct ViewData {
    login: LoginUiState,
    query: ListQuery,
    page: Option<ContentPage>,
    selected_row: usize,
    loading_list: bool,
    categories: Vec<Category>,
    stats: Option<Stats>,
    detail: DetailUiState,
    admin: CategoryAdminUiState,
    status_token: u64,
    next_seq: u64,
    page_seq: u64,
    detail_seq: u64,
    stats_seq: u64,
    poller: Option<StatsPoller>,
}

impl ViewData {
    fn next_seq(&mut self) -> u64 {
        self.next_seq = self.next_seq.wrapping_add(1);
        self.next_seq
    }
}

pub fn run_app<R: AppRuntime>(state: &mut AppState, runtime: &mut R) -> Result<()> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, terminal::EnterAlternateScreen).context("enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("create terminal")?;

    let mut view_data = ViewData::default();
    let (internal_tx, internal_rx) = mpsc::channel();

    // Session probe: an existing session skips the login view entirely.
    if let Ok(session) = runtime.current_session() {
        state.dispatch(AppCommand::SessionEstablished(session));
        navigate(state, runtime, &mut view_data, &internal_tx, Route::Dashboard);
    }

    let mut result = Ok(());
    loop {
        process_internal_events(state, runtime, &mut view_data, &internal_tx, &internal_rx);

        if let Err(error) = terminal.draw(|frame| render(frame, state, &view_data)) {
            result = Err(error).context("draw frame");
            break;
        }

        let has_event = event::poll(Duration::from_millis(120)).context("poll event")?;
        if has_event {
            match event::read().context("read event")? {
                Event::Key(key) => {
                    if handle_key_event(state, runtime, &mut view_data, &internal_tx, key) {
                        break;
                    }
                }
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
    }

    if let Some(poller) = view_data.poller.take() {
        poller.stop();
    }

    disable_raw_mode().context("disable raw mode")?;
    execute!(io::stdout(), terminal::LeaveAlternateScreen).context("leave alternate screen")?;
    result
}

fn process_internal_events<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    rx: &Receiver<InternalEvent>,
) {
    while let Ok(event) = rx.try_recv() {
        handle_internal_event(state, runtime, view_data, tx, event);
    }
}

fn handle_internal_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    event: InternalEvent,
) {
    match event {
        InternalEvent::ClearStatus { token } if token == view_data.status_token => {
            state.dispatch(AppCommand::ClearStatus);
        }
        InternalEvent::ClearStatus { .. } => {}
        InternalEvent::StatsTick => {
            if state.route == Route::Dashboard {
                issue_stats_fetch(state, runtime, view_data, tx);
            }
        }
        InternalEvent::PageLoaded { seq, result } => {
            // A slower response for an older query state must not
            // overwrite the newest one.
            if seq != view_data.page_seq {
                return;
            }
            view_data.loading_list = false;
            match result {
                Ok(page) => {
                    view_data
                        .query
                        .dispatch(QueryCommand::PageLoaded {
                            total_pages: page.total_pages,
                        });
                    view_data.selected_row = view_data
                        .selected_row
                        .min(page.items.len().saturating_sub(1));
                    view_data.page = Some(page);
                }
                Err(error) if error.is_unauthorized() => {
                    session_lost(state, view_data);
                }
                Err(error) => {
                    // Previous table stays in place; the notice is the
                    // only trace of the failure.
                    emit_status(state, view_data, tx, format!("list load failed: {error}"));
                }
            }
        }
        InternalEvent::DetailLoaded { seq, result } => {
            if seq != view_data.detail_seq {
                return;
            }
            match result {
                Ok(item) => {
                    view_data.detail.item = Some(item);
                    view_data.detail.error = None;
                }
                Err(error) if error.is_unauthorized() => {
                    session_lost(state, view_data);
                }
                Err(error) => {
                    view_data.detail.item = None;
                    view_data.detail.error = Some(if error.is_not_found() {
                        "Content not found".to_owned()
                    } else {
                        error.message().to_owned()
                    });
                }
            }
        }
        InternalEvent::StatsLoaded { seq, result } => {
            if seq != view_data.stats_seq {
                return;
            }
            match result {
                Ok(stats) => view_data.stats = Some(stats),
                // Best-effort view: keep the previous charts until the
                // next successful poll.
                Err(_) => {}
            }
        }
    }
}

fn session_lost(state: &mut AppState, view_data: &mut ViewData) {
    state.dispatch(AppCommand::SessionLost);
    view_data.login = LoginUiState::default();
    if let Some(poller) = view_data.poller.take() {
        poller.stop();
    }
}

fn schedule_status_clear(internal_tx: &Sender<InternalEvent>, token: u64) {
    let sender = internal_tx.clone();
    thread::spawn(move || {
        thread::sleep(STATUS_CLEAR_AFTER);
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
    view_data.status_token = view_data.status_token.wrapping_add(1);
    schedule_status_clear(internal_tx, view_data.status_token);
}

fn navigate<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    route: Route,
) {
    let events = state.dispatch(AppCommand::Navigate(route));
    for event in events {
        if let AppEvent::RouteChanged(entered) = event {
            on_route_entered(state, runtime, view_data, tx, entered);
        }
    }
}

fn on_route_entered<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    route: Route,
) {
    if route != Route::Dashboard
        && let Some(poller) = view_data.poller.take()
    {
        poller.stop();
    }

    match route {
        Route::Login => {
            view_data.login = LoginUiState::default();
        }
        Route::Dashboard => {
            // Query state is transient per page view; navigation resets it.
            view_data.query = ListQuery {
                page_size: runtime.page_size().clamp(1, 100),
                ..ListQuery::default()
            };
            view_data.selected_row = 0;
            view_data.page = None;
            reload_filter_categories(state, runtime, view_data, tx);
            issue_page_fetch(state, runtime, view_data, tx);
            issue_stats_fetch(state, runtime, view_data, tx);
            if view_data.poller.is_none() {
                view_data.poller = Some(StatsPoller::start(STATS_POLL_INTERVAL, tx.clone()));
            }
        }
        Route::Categories => {
            view_data.admin = CategoryAdminUiState::default();
            reload_admin_categories(state, runtime, view_data, tx);
        }
        Route::Detail(id) => {
            view_data.detail = DetailUiState::default();
            issue_detail_fetch(state, runtime, view_data, tx, &id);
        }
    }
}

fn reload_filter_categories<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    match runtime.list_categories() {
        Ok(categories) => view_data.categories = categories,
        Err(error) => {
            emit_status(state, view_data, tx, format!("categories load failed: {error}"));
        }
    }
}

fn reload_admin_categories<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    match runtime.list_categories() {
        Ok(categories) => {
            view_data.categories = categories;
            view_data.admin.selected = view_data
                .admin
                .selected
                .min(view_data.categories.len().saturating_sub(1));
        }
        Err(error) => {
            view_data.admin.error = Some(format!("failed to load categories: {error}"));
            emit_status(state, view_data, tx, "categories load failed");
        }
    }
}

fn issue_page_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let seq = view_data.next_seq();
    view_data.page_seq = seq;
    view_data.loading_list = true;
    let query = view_data.query.clone();
    if let Err(error) = runtime.spawn_page_fetch(seq, &query, tx.clone()) {
        view_data.loading_list = false;
        emit_status(state, view_data, tx, format!("list load failed: {error}"));
    }
}

fn issue_detail_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
    id: &ContentId,
) {
    let seq = view_data.next_seq();
    view_data.detail_seq = seq;
    if let Err(error) = runtime.spawn_detail_fetch(seq, id, tx.clone()) {
        view_data.detail.error = Some(error.to_string());
        emit_status(state, view_data, tx, "detail load failed");
    }
}

fn issue_stats_fetch<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    tx: &Sender<InternalEvent>,
) {
    let seq = view_data.next_seq();
    view_data.stats_seq = seq;
    if let Err(error) = runtime.spawn_stats_fetch(seq, tx.clone()) {
        // Statistics are best-effort; note it and move on.
        emit_status(state, view_data, tx, format!("stats fetch failed: {error}"));
    }
}

fn handle_key_event<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) -> bool {
    if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }

    match state.route.clone() {
        Route::Login => handle_login_key(state, runtime, view_data, internal_tx, key),
        Route::Dashboard => handle_dashboard_key(state, runtime, view_data, internal_tx, key),
        Route::Categories => handle_categories_key(state, runtime, view_data, internal_tx, key),
        Route::Detail(_) => handle_detail_key(state, runtime, view_data, internal_tx, key),
    }
    false
}

fn handle_login_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Tab | KeyCode::Down | KeyCode::Up => {
            view_data.login.field = match view_data.login.field {
                LoginField::Username => LoginField::Password,
                LoginField::Password => LoginField::Username,
            };
        }
        KeyCode::Backspace => {
            let buffer = match view_data.login.field {
                LoginField::Username => &mut view_data.login.form.username,
                LoginField::Password => &mut view_data.login.form.password,
            };
            buffer.pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let buffer = match view_data.login.field {
                LoginField::Username => &mut view_data.login.form.username,
                LoginField::Password => &mut view_data.login.form.password,
            };
            buffer.push(ch);
        }
        KeyCode::Enter => submit_login(state, runtime, view_data, internal_tx),
        _ => {}
    }
}

fn submit_login<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    view_data.login.error = None;

    if let Err(error) = view_data.login.form.validate() {
        view_data.login.error = Some(error.to_string());
        return;
    }

    view_data.login.submitting = true;
    let outcome = runtime.login(&view_data.login.form);
    // The submit control is restored on every outcome before anything
    // else happens with the result.
    view_data.login.submitting = false;

    match outcome {
        Ok(session) => {
            state.dispatch(AppCommand::SessionEstablished(session));
            navigate(state, runtime, view_data, internal_tx, Route::Dashboard);
        }
        Err(error) => {
            let message = error.message();
            view_data.login.error = Some(if message.is_empty() {
                "Invalid username or password".to_owned()
            } else {
                message.to_owned()
            });
        }
    }
}

fn handle_dashboard_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            let row_count = view_data
                .page
                .as_ref()
                .map(|page| page.items.len())
                .unwrap_or(0);
            if row_count > 0 {
                view_data.selected_row = (view_data.selected_row + 1).min(row_count - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.selected_row = view_data.selected_row.saturating_sub(1);
        }
        KeyCode::Enter => {
            let selected = view_data
                .page
                .as_ref()
                .and_then(|page| page.items.get(view_data.selected_row))
                .map(|item| item.id.clone());
            if let Some(id) = selected {
                navigate(state, runtime, view_data, internal_tx, Route::Detail(id));
            }
        }
        KeyCode::Char('1') => {
            apply_query_command(
                state,
                runtime,
                view_data,
                internal_tx,
                QueryCommand::SetSort(SortField::PublishedAt),
            );
        }
        KeyCode::Char('2') => {
            apply_query_command(
                state,
                runtime,
                view_data,
                internal_tx,
                QueryCommand::SetSort(SortField::CriticalityScore),
            );
        }
        KeyCode::Char('3') => {
            apply_query_command(
                state,
                runtime,
                view_data,
                internal_tx,
                QueryCommand::SetSort(SortField::CreatedAt),
            );
        }
        KeyCode::Char('o') => {
            let flipped = view_data.query.order.toggled();
            apply_query_command(
                state,
                runtime,
                view_data,
                internal_tx,
                QueryCommand::SetOrder(flipped),
            );
        }
        KeyCode::Char('f') => {
            let next = next_filter_option(&view_data.categories, &view_data.query.category);
            apply_query_command(
                state,
                runtime,
                view_data,
                internal_tx,
                QueryCommand::SetFilter(next),
            );
        }
        KeyCode::Char('n') | KeyCode::Right => {
            apply_query_command(state, runtime, view_data, internal_tx, QueryCommand::NextPage);
        }
        KeyCode::Char('p') | KeyCode::Left => {
            apply_query_command(state, runtime, view_data, internal_tx, QueryCommand::PrevPage);
        }
        KeyCode::Char('r') => {
            issue_page_fetch(state, runtime, view_data, internal_tx);
            issue_stats_fetch(state, runtime, view_data, internal_tx);
        }
        KeyCode::Char('c') => {
            navigate(state, runtime, view_data, internal_tx, Route::Categories);
        }
        KeyCode::Char('L') => {
            logout(state, runtime, view_data);
        }
        _ => {}
    }
}

fn apply_query_command<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    command: QueryCommand,
) {
    let events = view_data.query.dispatch(command);
    for event in &events {
        if matches!(event, QueryEvent::PageChanged(_) | QueryEvent::SortChanged(..)) {
            view_data.selected_row = 0;
        }
    }
    if events.iter().any(|event| matches!(event, QueryEvent::Refetch)) {
        issue_page_fetch(state, runtime, view_data, internal_tx);
    }
}

/// Cycles all -> first category -> ... -> last category -> all.
fn next_filter_option(categories: &[Category], current: &str) -> String {
    let mut options: Vec<&str> = vec![""];
    options.extend(categories.iter().map(|category| category.name.as_str()));

    let position = options
        .iter()
        .position(|option| *option == current)
        .unwrap_or(0);
    options[(position + 1) % options.len()].to_owned()
}

fn logout<R: AppRuntime>(state: &mut AppState, runtime: &mut R, view_data: &mut ViewData) {
    // Clearing server-side state is the backend's job; the client leaves
    // regardless of the outcome.
    let _ = runtime.logout();
    state.dispatch(AppCommand::Logout);
    view_data.login = LoginUiState::default();
    if let Some(poller) = view_data.poller.take() {
        poller.stop();
    }
}

fn handle_detail_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => {
            navigate(state, runtime, view_data, internal_tx, Route::Dashboard);
        }
        KeyCode::Char('L') => {
            logout(state, runtime, view_data);
        }
        _ => {}
    }
}

fn handle_categories_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    if view_data.admin.editor.is_some() {
        handle_editor_key(state, runtime, view_data, internal_tx, key);
        return;
    }

    if let Some((id, _)) = view_data.admin.confirm_delete.clone() {
        match key.code {
            KeyCode::Char('y') => {
                view_data.admin.confirm_delete = None;
                match runtime.delete_category(&id) {
                    Ok(()) => {
                        view_data.admin.notice = Some("category deleted".to_owned());
                        view_data.admin.error = None;
                        reload_admin_categories(state, runtime, view_data, internal_tx);
                    }
                    Err(error) => {
                        view_data.admin.error =
                            Some(format!("delete failed: {}", error.message()));
                    }
                }
            }
            _ => {
                // Anything else cancels; no request is issued.
                view_data.admin.confirm_delete = None;
            }
        }
        return;
    }

    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            if !view_data.categories.is_empty() {
                view_data.admin.selected =
                    (view_data.admin.selected + 1).min(view_data.categories.len() - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            view_data.admin.selected = view_data.admin.selected.saturating_sub(1);
        }
        KeyCode::Char('a') => {
            view_data.admin.editor = Some(CategoryEditorUiState::create());
        }
        KeyCode::Char('e') => {
            if let Some(category) = view_data.categories.get(view_data.admin.selected) {
                view_data.admin.editor = Some(CategoryEditorUiState::edit(category));
            }
        }
        KeyCode::Char('d') => {
            if let Some(category) = view_data.categories.get(view_data.admin.selected) {
                view_data.admin.confirm_delete =
                    Some((category.id.clone(), category.name.clone()));
            }
        }
        KeyCode::Char('r') => {
            reload_admin_categories(state, runtime, view_data, internal_tx);
        }
        KeyCode::Esc => {
            navigate(state, runtime, view_data, internal_tx, Route::Dashboard);
        }
        KeyCode::Char('L') => {
            logout(state, runtime, view_data);
        }
        _ => {}
    }
}

fn handle_editor_key<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
    key: KeyEvent,
) {
    let Some(editor) = view_data.admin.editor.as_mut() else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            view_data.admin.editor = None;
        }
        KeyCode::Tab | KeyCode::Down => {
            editor.field_index = (editor.field_index + 1) % EDITOR_FIELD_COUNT;
        }
        KeyCode::BackTab | KeyCode::Up => {
            editor.field_index =
                (editor.field_index + EDITOR_FIELD_COUNT - 1) % EDITOR_FIELD_COUNT;
        }
        KeyCode::Backspace => {
            editor.active_buffer().pop();
        }
        KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            editor.active_buffer().push(ch);
        }
        KeyCode::Enter => submit_editor(state, runtime, view_data, internal_tx),
        _ => {}
    }
}

fn submit_editor<R: AppRuntime>(
    state: &mut AppState,
    runtime: &mut R,
    view_data: &mut ViewData,
    internal_tx: &Sender<InternalEvent>,
) {
    let Some(editor) = view_data.admin.editor.as_mut() else {
        return;
    };
    editor.error = None;
    editor.notice = None;

    let form = match editor.to_form() {
        Ok(form) => form,
        Err(message) => {
            editor.error = Some(message);
            return;
        }
    };

    match editor.mode {
        EditorMode::Create => match runtime.create_category(&form) {
            Ok(_) => {
                // The create form stays open and clears for the next
                // entry; the table below refreshes.
                editor.reset_fields();
                editor.notice = Some("category created".to_owned());
                view_data.admin.notice = Some("category created".to_owned());
                reload_admin_categories(state, runtime, view_data, internal_tx);
            }
            Err(error) => {
                // Inputs are preserved for a retry.
                editor.error = Some(error.message().to_owned());
            }
        },
        EditorMode::Edit => {
            let Some(id) = editor.target.clone() else {
                view_data.admin.editor = None;
                return;
            };
            match runtime.update_category(&id, &form) {
                Ok(_) => {
                    view_data.admin.editor = None;
                    view_data.admin.notice = Some("category updated".to_owned());
                    reload_admin_categories(state, runtime, view_data, internal_tx);
                }
                Err(error) => {
                    editor.error = Some(error.message().to_owned());
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rendering

/// Pure row view-model for the content table.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContentRow {
    title: String,
    source: String,
    published: String,
    score: i64,
    severity: Severity,
}

fn project_row(item: &ContentItem) -> ContentRow {
    ContentRow {
        title: item.display_title().to_owned(),
        source: item.display_source().to_owned(),
        published: format_short_date(item.published_at),
        score: item.criticality_score,
        severity: item.severity(),
    }
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::DarkGray,
        Severity::Medium => Color::Blue,
        Severity::High => Color::Yellow,
        Severity::Critical => Color::Red,
    }
}

fn format_short_date(stamp: Option<OffsetDateTime>) -> String {
    let Some(stamp) = stamp else {
        return "-".to_owned();
    };
    stamp
        .format(&time::macros::format_description!(
            "[month repr:short] [day padding:none], [year]"
        ))
        .unwrap_or_else(|_| "-".to_owned())
}

fn format_long_stamp(stamp: Option<OffsetDateTime>) -> String {
    let Some(stamp) = stamp else {
        return "-".to_owned();
    };
    stamp
        .format(&time::macros::format_description!(
            "[month repr:long] [day padding:none], [year] [hour]:[minute]"
        ))
        .unwrap_or_else(|_| "-".to_owned())
}

/// HH:MM out of the statistics `last_updated` stamp; anything
/// unparseable renders as absence.
fn format_clock_time(raw: &str) -> String {
    OffsetDateTime::parse(raw, &Rfc3339)
        .ok()
        .and_then(|stamp| {
            stamp
                .format(&time::macros::format_description!("[hour]:[minute]"))
                .ok()
        })
        .unwrap_or_else(|| "-".to_owned())
}

fn parse_hex_color(value: &str) -> Option<Color> {
    let digits = value.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let red = u8::from_str_radix(&digits[0..2], 16).ok()?;
    let green = u8::from_str_radix(&digits[2..4], 16).ok()?;
    let blue = u8::from_str_radix(&digits[4..6], 16).ok()?;
    Some(Color::Rgb(red, green, blue))
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
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
        .split(vertical[1])[1]
}

fn render(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    match &state.route {
        Route::Login => render_login(frame, state, view_data),
        Route::Dashboard => render_dashboard(frame, state, view_data),
        Route::Categories => render_categories(frame, state, view_data),
        Route::Detail(_) => render_detail(frame, state, view_data),
    }
}

fn render_login(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let area = centered_rect(50, 40, frame.area());
    frame.render_widget(Clear, area);
    let login = Paragraph::new(login_text(view_data))
        .block(Block::default().title("vigil login").borders(Borders::ALL));
    frame.render_widget(login, area);

    render_status_line(frame, state, bottom_line(frame.area()));
}

fn login_text(view_data: &ViewData) -> String {
    let login = &view_data.login;
    let username_marker = if login.field == LoginField::Username {
        "> "
    } else {
        "  "
    };
    let password_marker = if login.field == LoginField::Password {
        "> "
    } else {
        "  "
    };
    let masked: String = "*".repeat(login.form.password.chars().count());

    let mut lines = vec![
        String::new(),
        format!("{username_marker}username: {}", login.form.username),
        format!("{password_marker}password: {masked}"),
        String::new(),
    ];
    if login.submitting {
        lines.push("logging in...".to_owned());
    } else if let Some(error) = &login.error {
        lines.push(format!("error: {error}"));
    } else {
        lines.push(String::new());
    }
    lines.push(String::new());
    lines.push("tab switch field | enter submit | ctrl-q quit".to_owned());
    lines.join("\n")
}

fn render_dashboard(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(8),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    render_header(frame, state, layout[0]);
    render_stats_row(frame, view_data, layout[1]);
    render_content_table(frame, view_data, layout[2]);
    render_pager_and_status(frame, state, view_data, layout[3]);
}

fn render_header(frame: &mut ratatui::Frame<'_>, state: &AppState, area: Rect) {
    let header = Paragraph::new(header_text(state))
        .block(Block::default().title("vigil").borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn header_text(state: &AppState) -> String {
    let user = state
        .session
        .as_ref()
        .map(|session| format!("{} ({})", session.username, session.role_label()))
        .unwrap_or_else(|| "not signed in".to_owned());

    let mut hints = vec![
        "j/k select",
        "enter detail",
        "1/2/3 sort",
        "o order",
        "f filter",
        "n/p page",
        "r refresh",
    ];
    if state.is_admin() {
        hints.push("c categories");
    }
    hints.push("L logout");

    format!("{user} | {}", hints.join(" | "))
}

fn render_stats_row(frame: &mut ratatui::Frame<'_>, view_data: &ViewData, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(28),
            Constraint::Percentage(36),
            Constraint::Percentage(36),
        ])
        .split(area);

    let cards = Paragraph::new(stat_cards_text(view_data.stats.as_ref()))
        .block(Block::default().title("summary").borders(Borders::ALL));
    frame.render_widget(cards, columns[0]);

    let slices = Paragraph::new(category_distribution_text(view_data.stats.as_ref()))
        .block(Block::default().title("categories").borders(Borders::ALL));
    frame.render_widget(slices, columns[1]);

    render_severity_chart(frame, view_data.stats.as_ref(), columns[2]);
}

fn stat_cards_text(stats: Option<&Stats>) -> String {
    let Some(stats) = stats else {
        return "waiting for statistics...".to_owned();
    };
    [
        format!("total items: {}", stats.total_items),
        format!("critical (9-10): {}", stats.critical_count()),
        format!("last updated: {}", format_clock_time(&stats.last_updated)),
    ]
    .join("\n")
}

/// Proportional category listing; the terminal stand-in for the pie
/// chart, one slice per line with its share of the total.
fn category_distribution_text(stats: Option<&Stats>) -> String {
    let Some(stats) = stats else {
        return String::new();
    };
    let slices = stats.category_slices();
    if slices.is_empty() {
        return "no categorized items".to_owned();
    }

    slices
        .iter()
        .map(|slice| {
            let bar_len = (slice.percent / 10.0).round() as usize;
            format!(
                "{:<14} {:>4}  {:>6}  {}",
                slice.name,
                slice.count,
                slice.percent_label(),
                "▇".repeat(bar_len),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_severity_chart(frame: &mut ratatui::Frame<'_>, stats: Option<&Stats>, area: Rect) {
    let counts = stats.map(Stats::band_counts).unwrap_or_default();
    let data: Vec<(&str, u64)> = SeverityBand::ALL
        .iter()
        .zip(counts)
        .map(|(band, count)| (band.key(), count.max(0) as u64))
        .collect();

    let chart = BarChart::default()
        .block(Block::default().title("criticality").borders(Borders::ALL))
        .data(&data)
        .bar_width(5)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    frame.render_widget(chart, area);
}

fn render_content_table(frame: &mut ratatui::Frame<'_>, view_data: &ViewData, area: Rect) {
    let title = if view_data.loading_list {
        "contents (loading...)".to_owned()
    } else {
        let filter = if view_data.query.category.is_empty() {
            "all categories".to_owned()
        } else {
            view_data.query.category.clone()
        };
        format!("contents: {filter}")
    };

    let Some(page) = &view_data.page else {
        let empty = Paragraph::new(String::new())
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    };

    if page.items.is_empty() {
        let empty = Paragraph::new("No content items found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header_cells = [
        column_label("title", None, view_data),
        column_label("source", None, view_data),
        column_label("published", Some(SortField::PublishedAt), view_data),
        column_label("crit", Some(SortField::CriticalityScore), view_data),
    ]
    .into_iter()
    .map(|label| {
        Cell::from(label).style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
    });
    let header = Row::new(header_cells);

    let rows = page.items.iter().enumerate().map(|(row_index, item)| {
        let row = project_row(item);
        let selected = row_index == view_data.selected_row;

        let base = if selected {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default()
        };
        let badge = base
            .fg(severity_color(row.severity))
            .add_modifier(Modifier::BOLD);

        Row::new(vec![
            Cell::from(row.title).style(base),
            Cell::from(row.source).style(base),
            Cell::from(row.published).style(base),
            Cell::from(format!("{} {}", row.score, row.severity.label())).style(badge),
        ])
    });

    let widths = [
        Constraint::Min(28),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn column_label(label: &str, field: Option<SortField>, view_data: &ViewData) -> String {
    let Some(field) = field else {
        return label.to_owned();
    };
    if view_data.query.sort_by != field {
        return label.to_owned();
    }
    let marker = match view_data.query.order {
        SortDirection::Asc => " ↑",
        SortDirection::Desc => " ↓",
    };
    format!("{label}{marker}")
}

fn render_pager_and_status(
    frame: &mut ratatui::Frame<'_>,
    state: &AppState,
    view_data: &ViewData,
    area: Rect,
) {
    let pager = pager_text(&view_data.query);
    let status = state.status_line.clone().unwrap_or_default();
    let line = if status.is_empty() {
        pager
    } else {
        format!("{pager} | {status}")
    };
    let widget = Paragraph::new(line)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn pager_text(query: &ListQuery) -> String {
    let prev = if query.can_prev() { "[p]rev" } else { " prev " };
    let next = if query.can_next() { "[n]ext" } else { " next " };
    format!(
        "page {}/{} {} {} | sort {} {}",
        query.page,
        query.total_pages,
        prev,
        next,
        query.sort_by.label(),
        query.order.as_str(),
    )
}

fn render_status_line(frame: &mut ratatui::Frame<'_>, state: &AppState, area: Rect) {
    let status = state.status_line.clone().unwrap_or_default();
    let widget = Paragraph::new(status).style(Style::default().fg(Color::Yellow));
    frame.render_widget(widget, area);
}

fn bottom_line(area: Rect) -> Rect {
    Rect {
        x: area.x,
        y: area.y + area.height.saturating_sub(1),
        width: area.width,
        height: 1,
    }
}

fn render_categories(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new(categories_header_text(state)).block(
        Block::default()
            .title("vigil categories")
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    render_categories_table(frame, view_data, layout[1]);

    let notice = view_data
        .admin
        .error
        .clone()
        .map(|error| (error, Color::Red))
        .or_else(|| {
            view_data
                .admin
                .notice
                .clone()
                .map(|notice| (notice, Color::Green))
        });
    let (line, color) = notice.unwrap_or_else(|| {
        (
            state.status_line.clone().unwrap_or_default(),
            Color::Yellow,
        )
    });
    let footer = Paragraph::new(line)
        .style(Style::default().fg(color))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, layout[2]);

    if let Some(editor) = &view_data.admin.editor {
        render_editor_overlay(frame, editor);
    }
    if let Some((_, name)) = &view_data.admin.confirm_delete {
        render_confirm_overlay(frame, name);
    }
}

fn categories_header_text(state: &AppState) -> String {
    let user = state
        .session
        .as_ref()
        .map(|session| format!("{} ({})", session.username, session.role_label()))
        .unwrap_or_default();
    format!("{user} | j/k select | a add | e edit | d delete | r reload | esc back")
}

fn render_categories_table(frame: &mut ratatui::Frame<'_>, view_data: &ViewData, area: Rect) {
    if view_data.categories.is_empty() {
        let empty = Paragraph::new("No categories found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().title("categories").borders(Borders::ALL));
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(
        ["name", "description", "default crit", "color"].map(|label| {
            Cell::from(label).style(
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )
        }),
    );

    let rows = view_data
        .categories
        .iter()
        .enumerate()
        .map(|(row_index, category)| {
            let selected = row_index == view_data.admin.selected;
            let base = if selected {
                Style::default().bg(Color::DarkGray)
            } else {
                Style::default()
            };
            let swatch_style = parse_hex_color(&category.color)
                .map(|color| base.fg(color))
                .unwrap_or(base);

            let description = if category.description.is_empty() {
                "-".to_owned()
            } else {
                category.description.clone()
            };

            Row::new(vec![
                Cell::from(category.name.clone()).style(base),
                Cell::from(description).style(base),
                Cell::from(category.default_criticality.to_string()).style(base),
                Cell::from(format!("■ {}", category.color)).style(swatch_style),
            ])
        });

    let widths = [
        Constraint::Length(18),
        Constraint::Min(24),
        Constraint::Length(12),
        Constraint::Length(12),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .column_spacing(1)
        .block(Block::default().title("categories").borders(Borders::ALL));
    frame.render_widget(table, area);
}

fn render_editor_overlay(frame: &mut ratatui::Frame<'_>, editor: &CategoryEditorUiState) {
    let area = centered_rect(60, 50, frame.area());
    frame.render_widget(Clear, area);
    let title = match editor.mode {
        EditorMode::Create => "new category",
        EditorMode::Edit => "edit category",
    };
    let body = Paragraph::new(editor_text(editor))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn editor_text(editor: &CategoryEditorUiState) -> String {
    let fields = [
        ("name", editor.name.as_str()),
        ("description", editor.description.as_str()),
        ("default criticality (1-10)", editor.criticality.as_str()),
        ("color (#rrggbb)", editor.color.as_str()),
    ];

    let mut lines = Vec::with_capacity(fields.len() + 4);
    for (index, (label, value)) in fields.iter().enumerate() {
        let marker = if index == editor.field_index { "> " } else { "  " };
        lines.push(format!("{marker}{label}: {value}"));
    }
    lines.push(String::new());
    if let Some(error) = &editor.error {
        lines.push(format!("error: {error}"));
    } else if let Some(notice) = &editor.notice {
        lines.push(notice.clone());
    } else {
        lines.push(String::new());
    }
    lines.push("tab next field | enter save | esc close".to_owned());
    lines.join("\n")
}

fn render_confirm_overlay(frame: &mut ratatui::Frame<'_>, name: &str) {
    let area = centered_rect(54, 24, frame.area());
    frame.render_widget(Clear, area);
    let body = Paragraph::new(format!(
        "Delete category {name:?}?\nThis cannot be undone.\n\ny delete | esc cancel",
    ))
    .style(Style::default().fg(Color::Red))
    .block(Block::default().title("confirm delete").borders(Borders::ALL));
    frame.render_widget(body, area);
}

fn render_detail(frame: &mut ratatui::Frame<'_>, state: &AppState, view_data: &ViewData) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(frame.area());

    let header = Paragraph::new("esc back | L logout").block(
        Block::default()
            .title("vigil detail")
            .borders(Borders::ALL),
    );
    frame.render_widget(header, layout[0]);

    // No partial render: the body is either the record or the error panel.
    if let Some(error) = &view_data.detail.error {
        let panel = Paragraph::new(error.clone())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("error").borders(Borders::ALL));
        frame.render_widget(panel, layout[1]);
    } else if let Some(item) = &view_data.detail.item {
        let severity = item.severity();
        let body = Paragraph::new(detail_text(item)).block(
            Block::default()
                .title(format!("{} [{}]", item.display_title(), severity.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(severity_color(severity))),
        );
        frame.render_widget(body, layout[1]);
    } else {
        let loading = Paragraph::new("loading...")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, layout[1]);
    }

    let status = state.status_line.clone().unwrap_or_default();
    let footer = Paragraph::new(status)
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, layout[2]);
}

fn detail_text(item: &ContentItem) -> String {
    let categories = if item.categories.is_empty() {
        "No categories".to_owned()
    } else {
        item.categories
            .iter()
            .map(|category| category.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let content = if item.content.is_empty() {
        "No content available"
    } else {
        &item.content
    };

    [
        format!(
            "criticality: {} ({})",
            item.criticality_score,
            item.severity().label()
        ),
        format!("source: {}", item.display_source()),
        format!(
            "url: {}",
            if item.source_url.is_empty() {
                "-"
            } else {
                &item.source_url
            }
        ),
        format!("published: {}", format_long_stamp(item.published_at)),
        format!("collected: {}", format_long_stamp(item.collected_at)),
        format!("categories: {categories}"),
        String::new(),
        content.to_owned(),
    ]
    .join("\n")
}
