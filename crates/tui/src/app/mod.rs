pub mod context;
pub mod loader;
pub mod recurring;
pub mod tracker;

use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use engine::{Currency, Period, RecurringSortKey, SortKey};
use finance_client::{Client, ClientError};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    config::AppConfig,
    error::{AppError, Result},
    local_state::LocalState,
    ui::{
        self,
        keymap::{AppAction, map_key},
    },
};

pub use context::{AppContext, Session};
pub use recurring::{RecurringCommand, RecurringField, RecurringMode, RecurringState};
pub use tracker::{
    Applied, ExpenseField, Focus, IncomeField, LoadOutcome, TrackerCommand, TrackerMode,
    TrackerState,
};

use loader::{Loaded, Loader};

const TOAST_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Expenses,
    Recurring,
}

impl Section {
    pub const ALL: [Section; 2] = [Section::Expenses, Section::Recurring];

    pub fn label(self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::Recurring => "Recurring",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Expenses => '1',
            Self::Recurring => '2',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct ToastState {
    pub message: String,
    pub level: ToastLevel,
    pub expires_at: Instant,
}

#[derive(Debug)]
pub struct AppState {
    pub section: Section,
    pub context: AppContext,
    pub tracker: TrackerState,
    pub recurring: RecurringState,
    pub reporting: Currency,
    pub rates_error: Option<String>,
    pub categories: Vec<String>,
    pub currencies: Vec<Currency>,
    pub toast: Option<ToastState>,
    pub base_url: String,
}

impl AppState {
    pub fn new(config: &AppConfig, context: AppContext, period: Period) -> Self {
        Self {
            section: Section::Expenses,
            context,
            tracker: TrackerState::new(period, config.reporting_currency),
            recurring: RecurringState::default(),
            reporting: config.reporting_currency,
            rates_error: None,
            categories: config.categories.clone(),
            currencies: config.currencies.clone(),
            toast: None,
            base_url: config.base_url.clone(),
        }
    }

    pub fn notify(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(ToastState {
            message: message.into(),
            level,
            expires_at: Instant::now() + TOAST_TTL,
        });
    }

    fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
        }
    }

    /// Whether keystrokes currently go to a form, prompt or search box.
    pub fn is_editing(&self) -> bool {
        match self.section {
            Section::Expenses => self.tracker.is_editing(),
            Section::Recurring => self.recurring.is_editing(),
        }
    }
}

pub struct App {
    config: AppConfig,
    client: Client,
    loader: Loader,
    rx: UnboundedReceiver<Loaded>,
    local: LocalState,
    pub state: AppState,
    should_quit: bool,
}

impl App {
    pub fn new(config: AppConfig, local: LocalState) -> Result<Self> {
        let client = Client::new(&config.base_url, config.token.clone())?;
        let session = if client.can_write() {
            Session::Authenticated
        } else {
            Session::ReadOnly
        };
        let context = AppContext::new(config.language, local.dark_mode, session);
        let (loader, rx) = Loader::new(client.clone());
        let state = AppState::new(&config, context, Period::current());

        Ok(Self {
            config,
            client,
            loader,
            rx,
            local,
            state,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        self.start();
        let mut terminal = ui::setup_terminal()?;
        let result = self.event_loop(&mut terminal).await;
        ui::restore_terminal(&mut terminal)?;
        result
    }

    fn start(&mut self) {
        let current = self.state.tracker.period;
        tracing::info!(%current, base_url = %self.config.base_url, "starting tracker");

        self.refresh_expenses();
        self.state.recurring.loading = true;
        self.loader.recurring();

        if self.state.context.can_write() && self.local.needs_migration(current) {
            self.loader.migrate_pending(current);
        }
    }

    async fn event_loop(&mut self, terminal: &mut ui::Terminal) -> Result<()> {
        let tick_rate = Duration::from_millis(100);

        while !self.should_quit {
            while let Ok(loaded) = self.rx.try_recv() {
                self.on_loaded(loaded);
            }
            self.state.expire_toast(Instant::now());

            terminal
                .draw(|frame| ui::render(frame, &self.state))
                .map_err(|err| AppError::Terminal(err.to_string()))?;

            if event::poll(tick_rate)?
                && let Event::Key(key) = event::read()?
                && key.kind == KeyEventKind::Press
            {
                self.handle_key(map_key(key)).await;
            }
        }

        Ok(())
    }

    fn on_loaded(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Period {
                period,
                seq,
                result,
            } => {
                let result = result.map_err(|err| describe(&err));
                match self.state.tracker.apply_loaded(period, seq, result) {
                    LoadOutcome::Applied => tracing::debug!(%period, "period loaded"),
                    LoadOutcome::Stale => tracing::debug!(%period, "discarding stale period read"),
                    LoadOutcome::Failed => {
                        let message = self.state.tracker.error.clone().unwrap_or_default();
                        tracing::warn!(%period, error = %message, "period read failed");
                        self.state.notify(ToastLevel::Error, message);
                    }
                }
            }
            Loaded::Rates(Ok(rates)) => {
                self.state.tracker.rates = rates;
                self.state.rates_error = None;
            }
            Loaded::Rates(Err(err)) => {
                tracing::warn!(
                    error = %err,
                    "exchange rates unavailable, amounts left unconverted"
                );
                let message = format!("Exchange rates unavailable: {}", describe(&err));
                self.state.rates_error = Some(message.clone());
                self.state.notify(ToastLevel::Error, message);
            }
            Loaded::Recurring(result) => {
                let result = result.map_err(|err| describe(&err));
                if let Err(message) = &result {
                    tracing::warn!(error = %message, "recurring list failed");
                    self.state.notify(ToastLevel::Error, message.clone());
                }
                self.state.recurring.apply_loaded(result);
            }
            Loaded::Migrated {
                period,
                result: Ok(()),
            } => {
                self.local.mark_migrated(period);
                self.save_local();
                if period == self.state.tracker.period {
                    self.request_period();
                }
            }
            Loaded::Migrated {
                period,
                result: Err(err),
            } => {
                tracing::warn!(%period, error = %err, "pending expense migration failed");
                self.state.notify(
                    ToastLevel::Error,
                    format!("Could not carry pending expenses: {}", describe(&err)),
                );
            }
        }
    }

    fn save_local(&self) {
        if let Err(err) = self.local.save(&self.config.state_path) {
            tracing::warn!(
                error = %err,
                path = %self.config.state_path,
                "failed to save local state"
            );
        }
    }

    fn request_period(&mut self) {
        let seq = self.state.tracker.begin_read();
        self.loader.period(self.state.tracker.period, seq);
    }

    /// Re-reads the selected period together with the rate table.
    fn refresh_expenses(&mut self) {
        self.loader.rates(self.state.reporting);
        self.request_period();
    }

    fn go_to(&mut self, period: Period) {
        self.state.tracker.select_period(period);
        self.refresh_expenses();
    }

    fn require_write(&mut self) -> bool {
        if self.state.context.can_write() {
            return true;
        }
        self.state
            .notify(ToastLevel::Error, describe(&ClientError::ReadOnly));
        false
    }

    async fn handle_key(&mut self, action: AppAction) {
        if action == AppAction::Quit {
            self.should_quit = true;
            return;
        }
        if !self.state.is_editing()
            && let AppAction::Input(ch) = action
            && self.handle_global(ch)
        {
            return;
        }
        match self.state.section {
            Section::Expenses => self.handle_tracker_key(action).await,
            Section::Recurring => self.handle_recurring_key(action).await,
        }
    }

    /// Keys shared by every screen outside of forms.
    fn handle_global(&mut self, ch: char) -> bool {
        match ch {
            'q' => self.should_quit = true,
            '1' => self.state.section = Section::Expenses,
            '2' => {
                self.state.section = Section::Recurring;
                if !self.state.recurring.loaded && !self.state.recurring.loading {
                    self.state.recurring.loading = true;
                    self.loader.recurring();
                }
            }
            'l' => {
                let language = self.state.context.cycle_language();
                tracing::debug!(?language, "language changed");
            }
            'm' => {
                let dark = !self.state.context.dark_mode();
                self.state.context.set_dark_mode(dark);
                self.local.dark_mode = dark;
                self.save_local();
            }
            'r' => match self.state.section {
                Section::Expenses => self.refresh_expenses(),
                Section::Recurring => {
                    self.state.recurring.loading = true;
                    self.loader.recurring();
                }
            },
            _ => return false,
        }
        true
    }

    async fn handle_tracker_key(&mut self, action: AppAction) {
        if self.state.tracker.is_editing() {
            let confirming = matches!(self.state.tracker.mode, TrackerMode::Confirm(_));
            match action {
                AppAction::Cancel => self.state.tracker.cancel(),
                AppAction::Input('n' | 'N') if confirming => self.state.tracker.cancel(),
                AppAction::Submit => self.submit_tracker().await,
                AppAction::Input('y' | 'Y') if confirming => self.submit_tracker().await,
                AppAction::NextField | AppAction::Down => self.state.tracker.next_field(true),
                AppAction::PrevField | AppAction::Up => self.state.tracker.next_field(false),
                AppAction::Left | AppAction::Right => self.state.tracker.cycle_choice(
                    action == AppAction::Right,
                    &self.state.categories,
                    &self.state.currencies,
                ),
                AppAction::Backspace => self.state.tracker.backspace(),
                AppAction::Input(ch) if !confirming => self.state.tracker.input(ch),
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Up => self.state.tracker.select_prev(),
            AppAction::Down => self.state.tracker.select_next(),
            AppAction::NextField | AppAction::PrevField => self.state.tracker.toggle_focus(),
            AppAction::Left => self.go_to(self.state.tracker.period.prev()),
            AppAction::Right => self.go_to(self.state.tracker.period.next()),
            AppAction::Submit => match self.state.tracker.focus {
                Focus::Groups => self.toggle_group(),
                Focus::Table => {
                    if self.require_write() {
                        self.state.tracker.open_edit();
                    }
                }
            },
            AppAction::Input(ch) => self.handle_tracker_char(ch),
            _ => {}
        }
    }

    fn handle_tracker_char(&mut self, ch: char) {
        match ch {
            '[' => self.go_to(self.state.tracker.period.prev()),
            ']' => self.go_to(self.state.tracker.period.next()),
            'f' => self.state.tracker.cycle_filter(&self.state.categories),
            'h' => self.state.tracker.show_all_groups(),
            ' ' => self.toggle_group(),
            'N' => self.state.tracker.sort_by(SortKey::Name),
            'C' => self.state.tracker.sort_by(SortKey::Category),
            'A' => self.state.tracker.sort_by(SortKey::Amount),
            'S' => self.state.tracker.sort_by(SortKey::Status),
            'a' | 'e' | 't' | 'd' | 'i' | 'c' => {
                if !self.require_write() {
                    return;
                }
                let tracker = &mut self.state.tracker;
                let opened = match ch {
                    'a' => {
                        tracker.open_add(self.state.reporting);
                        true
                    }
                    'e' => tracker.open_edit(),
                    't' => tracker.ask_toggle(),
                    'd' => tracker.ask_delete(),
                    'i' => {
                        tracker.open_income(self.state.reporting);
                        true
                    }
                    _ => tracker.ask_clear_income(),
                };
                if !opened {
                    self.state.notify(ToastLevel::Info, "Nothing selected.");
                }
            }
            _ => {}
        }
    }

    fn toggle_group(&mut self) {
        if let Some((key, hidden)) = self.state.tracker.toggle_selected_group() {
            tracing::debug!(group = %key, hidden, "group visibility toggled");
        }
    }

    async fn submit_tracker(&mut self) {
        if let Some(command) = self.state.tracker.submit() {
            self.execute_tracker(command).await;
        }
    }

    async fn execute_tracker(&mut self, command: TrackerCommand) {
        let period = self.state.tracker.period;
        let result = match command {
            TrackerCommand::Create(fields) => self
                .client
                .expense_create(period, &fields)
                .await
                .map(Applied::Created),
            TrackerCommand::Update(id, patch) => self
                .client
                .expense_update(period, &id, &patch)
                .await
                .map(|()| Applied::Patched(id, patch)),
            TrackerCommand::Delete(id) => self
                .client
                .expense_delete(period, &id)
                .await
                .map(|()| Applied::Removed(id)),
            TrackerCommand::SetIncome(income) => self
                .client
                .income_put(period, &income)
                .await
                .map(|()| Applied::IncomeSet(income)),
            TrackerCommand::ClearIncome => self
                .client
                .income_delete(period)
                .await
                .map(|()| Applied::IncomeCleared),
        };

        match result {
            Ok(applied) => {
                let message = success_message(&applied);
                if !self.state.tracker.commit(applied) {
                    self.request_period();
                }
                self.state.notify(ToastLevel::Success, message);
            }
            Err(err) => {
                tracing::warn!(%period, error = %err, "write failed, reloading period");
                self.state.notify(ToastLevel::Error, describe(&err));
                self.request_period();
            }
        }
    }

    async fn handle_recurring_key(&mut self, action: AppAction) {
        let recurring = &mut self.state.recurring;
        let searching = recurring.mode == RecurringMode::Search;
        let confirming = matches!(recurring.mode, RecurringMode::ConfirmDelete { .. });

        if searching {
            match action {
                AppAction::Cancel => {
                    recurring.clear_search();
                    recurring.cancel();
                }
                AppAction::Submit => {
                    recurring.submit();
                }
                AppAction::Backspace => recurring.backspace(),
                AppAction::Up => recurring.select_prev(),
                AppAction::Down => recurring.select_next(),
                AppAction::Input(ch) => recurring.input(ch),
                _ => {}
            }
            return;
        }

        if recurring.is_editing() {
            match action {
                AppAction::Cancel => recurring.cancel(),
                AppAction::Input('n' | 'N') if confirming => recurring.cancel(),
                AppAction::Submit => self.submit_recurring().await,
                AppAction::Input('y' | 'Y') if confirming => self.submit_recurring().await,
                AppAction::NextField | AppAction::Down => recurring.next_field(true),
                AppAction::PrevField | AppAction::Up => recurring.next_field(false),
                AppAction::Left | AppAction::Right => recurring.cycle_choice(
                    action == AppAction::Right,
                    &self.state.categories,
                    &self.state.currencies,
                ),
                AppAction::Backspace => recurring.backspace(),
                AppAction::Input(ch) if !confirming => recurring.input(ch),
                _ => {}
            }
            return;
        }

        match action {
            AppAction::Up => recurring.select_prev(),
            AppAction::Down => recurring.select_next(),
            AppAction::Submit => {
                if self.require_write() {
                    self.state.recurring.open_edit();
                }
            }
            AppAction::Input('/') => recurring.start_search(),
            AppAction::Input('x') => recurring.clear_search(),
            AppAction::Input('T') => recurring.sort_by(RecurringSortKey::Title),
            AppAction::Input('A') => recurring.sort_by(RecurringSortKey::Amount),
            AppAction::Input('C') => recurring.sort_by(RecurringSortKey::Category),
            AppAction::Input('K') => recurring.sort_by(RecurringSortKey::Currency),
            AppAction::Input(ch @ ('a' | 'e' | 'd')) => {
                if !self.require_write() {
                    return;
                }
                let recurring = &mut self.state.recurring;
                let opened = match ch {
                    'a' => {
                        recurring.open_add(self.state.reporting);
                        true
                    }
                    'e' => recurring.open_edit(),
                    _ => recurring.ask_delete(),
                };
                if !opened {
                    self.state.notify(ToastLevel::Info, "Nothing selected.");
                }
            }
            _ => {}
        }
    }

    async fn submit_recurring(&mut self) {
        if let Some(command) = self.state.recurring.submit() {
            self.execute_recurring(command).await;
        }
    }

    /// Sends a template write, then asks the backend to materialize templates
    /// and re-reads both the list and the selected period.
    async fn execute_recurring(&mut self, command: RecurringCommand) {
        let result = match &command {
            RecurringCommand::Create(fields) => self.client.recurring_create(fields).await,
            RecurringCommand::Update(id, fields) => self.client.recurring_update(id, fields).await,
            RecurringCommand::Delete(id) => self.client.recurring_delete(id).await,
        };

        match result {
            Ok(()) => {
                let message = match command {
                    RecurringCommand::Create(_) => "Recurring expense added.",
                    RecurringCommand::Update(..) => "Recurring expense updated.",
                    RecurringCommand::Delete(_) => "Recurring expense deleted.",
                };
                self.state.notify(ToastLevel::Success, message);
                if let Err(err) = self.client.migrate_recurring().await {
                    tracing::warn!(error = %err, "materializing recurring expenses failed");
                    self.state.notify(ToastLevel::Error, describe(&err));
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "recurring write failed");
                self.state.notify(ToastLevel::Error, describe(&err));
            }
        }

        self.state.recurring.loading = true;
        self.loader.recurring();
        self.request_period();
    }
}

fn success_message(applied: &Applied) -> &'static str {
    match applied {
        Applied::Created(_) => "Expense added.",
        Applied::Patched(_, patch) if patch.name.is_none() => "Status updated.",
        Applied::Patched(..) => "Expense updated.",
        Applied::Removed(_) => "Expense deleted.",
        Applied::IncomeSet(_) => "Income saved.",
        Applied::IncomeCleared => "Income removed.",
    }
}

/// User-facing text for a failed request.
pub fn describe(err: &ClientError) -> String {
    match err {
        ClientError::Unauthorized => "Not authorized: check the token.".to_string(),
        ClientError::Forbidden => "This token may not change that resource.".to_string(),
        ClientError::NotFound => "Not found.".to_string(),
        ClientError::Conflict(message) => format!("Conflict: {message}"),
        ClientError::Validation(message) => format!("Validation error: {message}"),
        ClientError::Server(message) => format!("Server error: {message}"),
        ClientError::ReadOnly => "Read-only session: configure a token to edit.".to_string(),
        ClientError::Transport(err) => format!("Server unreachable: {err}"),
        ClientError::Decode(err) => format!("Unexpected response: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{ExpensePatch, ExpenseStatus, Language};

    fn state() -> AppState {
        let config = AppConfig::default();
        let context = AppContext::new(Language::It, true, Session::ReadOnly);
        AppState::new(&config, context, Period::new(1, 2025).unwrap())
    }

    #[test]
    fn toasts_expire() {
        let mut state = state();
        state.notify(ToastLevel::Info, "hello");
        let toast_deadline = state.toast.as_ref().unwrap().expires_at;
        state.expire_toast(toast_deadline - Duration::from_millis(1));
        assert!(state.toast.is_some());
        state.expire_toast(toast_deadline);
        assert!(state.toast.is_none());
    }

    #[test]
    fn state_starts_on_expenses() {
        let state = state();
        assert_eq!(state.section, Section::Expenses);
        assert_eq!(state.categories.len(), 8);
        assert!(!state.is_editing());
    }

    #[test]
    fn errors_read_as_sentences() {
        assert_eq!(
            describe(&ClientError::Validation("amount".to_string())),
            "Validation error: amount"
        );
        assert!(describe(&ClientError::ReadOnly).starts_with("Read-only"));
    }

    #[tokio::test]
    async fn changing_period_reloads_rates_too() {
        let config = AppConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            ..AppConfig::default()
        };
        let mut app = App::new(config, LocalState::default()).unwrap();
        let next = app.state.tracker.period.next();
        app.go_to(next);
        assert!(app.state.tracker.loading);

        let mut saw_period = false;
        let mut saw_rates = false;
        for _ in 0..2 {
            match app.rx.recv().await {
                Some(Loaded::Period { period, .. }) => {
                    assert_eq!(period, next);
                    saw_period = true;
                }
                Some(Loaded::Rates(_)) => saw_rates = true,
                other => panic!("unexpected load: {other:?}"),
            }
        }
        assert!(saw_period && saw_rates);
    }

    #[test]
    fn status_patch_has_its_own_message() {
        let toggle = Applied::Patched(
            engine::ExpenseId::new("1"),
            ExpensePatch::status(ExpenseStatus::Paid),
        );
        assert_eq!(success_message(&toggle), "Status updated.");
    }
}
