//! State of the expense tracker screen.
//!
//! Pure state transitions: the app executes the returned commands against
//! the backend and feeds confirmed results back through [`TrackerState::commit`].

use engine::{
    CategoryFilter, Currency, ExchangeRates, Expense, ExpenseDraft, ExpenseFields, ExpenseId,
    ExpensePatch, ExpenseStatus, GroupKey, HiddenGroups, Income, IncomeDraft, Period, PeriodBook,
    SortConfig, SortKey, Summary, project,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Groups,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpenseField {
    Name,
    Category,
    Amount,
    Currency,
}

impl ExpenseField {
    pub const ALL: [ExpenseField; 4] = [
        ExpenseField::Name,
        ExpenseField::Category,
        ExpenseField::Amount,
        ExpenseField::Currency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::Category => "Category",
            Self::Amount => "Amount",
            Self::Currency => "Currency",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    /// `None` when adding.
    pub editing: Option<ExpenseId>,
    pub draft: ExpenseDraft,
    pub field: ExpenseField,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeField {
    Amount,
    Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeForm {
    pub draft: IncomeDraft,
    pub field: IncomeField,
    pub error: Option<String>,
}

/// A destructive action waiting for a yes/no answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Confirm {
    Toggle {
        id: ExpenseId,
        name: String,
        to: ExpenseStatus,
    },
    Delete {
        id: ExpenseId,
        name: String,
    },
    ClearIncome,
}

impl Confirm {
    pub fn prompt(&self) -> String {
        match self {
            Self::Toggle { name, to, .. } => format!("Mark \"{name}\" as {}?", to.as_str()),
            Self::Delete { name, .. } => format!("Delete \"{name}\"?"),
            Self::ClearIncome => "Remove the income of this month?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TrackerMode {
    List,
    Expense(ExpenseForm),
    Income(IncomeForm),
    Confirm(Confirm),
}

/// A write the app must send for the current period.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerCommand {
    Create(ExpenseFields),
    Update(ExpenseId, ExpensePatch),
    Delete(ExpenseId),
    SetIncome(Income),
    ClearIncome,
}

/// A write the backend confirmed, ready to patch the local book.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    Created(Expense),
    Patched(ExpenseId, ExpensePatch),
    Removed(ExpenseId),
    IncomeSet(Income),
    IncomeCleared,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer read or a local write has superseded the result.
    Stale,
    Failed,
}

#[derive(Debug)]
pub struct TrackerState {
    pub period: Period,
    /// Last snapshot that loaded successfully, possibly of another period.
    pub book: Option<PeriodBook>,
    /// Bumped by every issued read and every committed write. Only the read
    /// carrying the current value may replace `book`.
    generation: u64,
    pub rates: ExchangeRates,
    pub loading: bool,
    pub error: Option<String>,
    pub filter: CategoryFilter,
    pub sort: SortConfig<SortKey>,
    pub hidden: HiddenGroups,
    pub focus: Focus,
    pub selected: usize,
    pub group_selected: usize,
    pub mode: TrackerMode,
}

impl TrackerState {
    pub fn new(period: Period, reporting: Currency) -> Self {
        Self {
            period,
            book: None,
            generation: 0,
            rates: ExchangeRates::new(reporting),
            loading: false,
            error: None,
            filter: CategoryFilter::All,
            sort: SortConfig::default(),
            hidden: HiddenGroups::new(),
            focus: Focus::Table,
            selected: 0,
            group_selected: 0,
            mode: TrackerMode::List,
        }
    }

    /// The snapshot of the selected period, if it has been loaded.
    pub fn current_book(&self) -> Option<&PeriodBook> {
        self.book.as_ref().filter(|book| book.period() == self.period)
    }

    pub fn is_editing(&self) -> bool {
        !matches!(self.mode, TrackerMode::List)
    }

    /// Switches to `period` and marks it as loading.
    pub fn select_period(&mut self, period: Period) {
        self.period = period;
        self.loading = true;
        self.error = None;
        self.selected = 0;
        self.group_selected = 0;
        self.mode = TrackerMode::List;
    }

    /// Starts a read of the selected period and returns its sequence number.
    pub fn begin_read(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.generation
    }

    /// Accepts a period read unless the user has moved on, a newer read was
    /// issued, or a write was committed since it started.
    pub fn apply_loaded(
        &mut self,
        period: Period,
        seq: u64,
        result: std::result::Result<PeriodBook, String>,
    ) -> LoadOutcome {
        if period != self.period || seq != self.generation {
            return LoadOutcome::Stale;
        }
        self.loading = false;
        match result {
            Ok(book) => {
                self.book = Some(book);
                self.error = None;
                self.clamp_selection();
                LoadOutcome::Applied
            }
            Err(message) => {
                self.error = Some(message);
                LoadOutcome::Failed
            }
        }
    }

    pub fn summary(&self) -> Option<Summary> {
        self.current_book().map(|book| book.summarize(&self.rates))
    }

    pub fn rows(&self) -> Vec<&Expense> {
        match self.current_book() {
            Some(book) => project(book.expenses(), &self.filter, &self.sort),
            None => Vec::new(),
        }
    }

    pub fn selected_expense(&self) -> Option<&Expense> {
        self.rows().get(self.selected).copied()
    }

    fn group_keys(&self) -> Vec<GroupKey> {
        self.summary()
            .map(|summary| summary.aggregation.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn clamp_selection(&mut self) {
        let rows = self.rows().len();
        self.selected = self.selected.min(rows.saturating_sub(1));
        let groups = self.group_keys().len();
        self.group_selected = self.group_selected.min(groups.saturating_sub(1));
    }

    pub fn select_next(&mut self) {
        match self.focus {
            Focus::Table => {
                let len = self.rows().len();
                if len > 0 {
                    self.selected = (self.selected + 1).min(len - 1);
                }
            }
            Focus::Groups => {
                let len = self.group_keys().len();
                if len > 0 {
                    self.group_selected = (self.group_selected + 1).min(len - 1);
                }
            }
        }
    }

    pub fn select_prev(&mut self) {
        match self.focus {
            Focus::Table => self.selected = self.selected.saturating_sub(1),
            Focus::Groups => self.group_selected = self.group_selected.saturating_sub(1),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Table => Focus::Groups,
            Focus::Groups => Focus::Table,
        };
    }

    /// Hides or shows the highlighted group. Returns the key and whether it
    /// is now hidden.
    pub fn toggle_selected_group(&mut self) -> Option<(GroupKey, bool)> {
        let key = self.group_keys().into_iter().nth(self.group_selected)?;
        let hidden = self.hidden.toggle(&key);
        Some((key, hidden))
    }

    pub fn show_all_groups(&mut self) {
        self.hidden.clear();
    }

    pub fn cycle_filter(&mut self, categories: &[String]) {
        self.filter = self.filter.cycle(categories);
        self.selected = 0;
    }

    pub fn sort_by(&mut self, key: SortKey) {
        self.sort.select(key);
    }

    pub fn open_add(&mut self, reporting: Currency) {
        self.mode = TrackerMode::Expense(ExpenseForm {
            editing: None,
            draft: ExpenseDraft {
                currency: Some(reporting),
                ..ExpenseDraft::default()
            },
            field: ExpenseField::Name,
            error: None,
        });
    }

    pub fn open_edit(&mut self) -> bool {
        let Some(expense) = self.selected_expense() else {
            return false;
        };
        let form = ExpenseForm {
            editing: Some(expense.id.clone()),
            draft: ExpenseDraft::from_expense(expense),
            field: ExpenseField::Name,
            error: None,
        };
        self.mode = TrackerMode::Expense(form);
        true
    }

    pub fn open_income(&mut self, reporting: Currency) {
        let mut draft = IncomeDraft::from_income(self.current_book().and_then(PeriodBook::income));
        if draft.currency.is_none() {
            draft.currency = Some(reporting);
        }
        self.mode = TrackerMode::Income(IncomeForm {
            draft,
            field: IncomeField::Amount,
            error: None,
        });
    }

    pub fn ask_toggle(&mut self) -> bool {
        let Some(expense) = self.selected_expense() else {
            return false;
        };
        let confirm = Confirm::Toggle {
            id: expense.id.clone(),
            name: expense.name.clone(),
            to: expense.status.toggled(),
        };
        self.mode = TrackerMode::Confirm(confirm);
        true
    }

    pub fn ask_delete(&mut self) -> bool {
        let Some(expense) = self.selected_expense() else {
            return false;
        };
        let confirm = Confirm::Delete {
            id: expense.id.clone(),
            name: expense.name.clone(),
        };
        self.mode = TrackerMode::Confirm(confirm);
        true
    }

    pub fn ask_clear_income(&mut self) -> bool {
        if self.current_book().and_then(PeriodBook::income).is_none() {
            return false;
        }
        self.mode = TrackerMode::Confirm(Confirm::ClearIncome);
        true
    }

    pub fn cancel(&mut self) {
        self.mode = TrackerMode::List;
    }

    pub fn input(&mut self, ch: char) {
        match &mut self.mode {
            TrackerMode::Expense(form) => match form.field {
                ExpenseField::Name => form.draft.name.push(ch),
                ExpenseField::Amount if ch.is_ascii_digit() => form.draft.amount.push(ch),
                _ => {}
            },
            TrackerMode::Income(form) => {
                if form.field == IncomeField::Amount && ch.is_ascii_digit() {
                    form.draft.amount.push(ch);
                }
            }
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match &mut self.mode {
            TrackerMode::Expense(form) => match form.field {
                ExpenseField::Name => {
                    form.draft.name.pop();
                }
                ExpenseField::Amount => {
                    form.draft.amount.pop();
                }
                _ => {}
            },
            TrackerMode::Income(form) if form.field == IncomeField::Amount => {
                form.draft.amount.pop();
            }
            _ => {}
        }
    }

    pub fn next_field(&mut self, forward: bool) {
        match &mut self.mode {
            TrackerMode::Expense(form) => {
                form.field = if forward {
                    form.field.next()
                } else {
                    form.field.prev()
                };
            }
            TrackerMode::Income(form) => {
                form.field = match form.field {
                    IncomeField::Amount => IncomeField::Currency,
                    IncomeField::Currency => IncomeField::Amount,
                };
            }
            _ => {}
        }
    }

    /// Steps the choice under the cursor through `categories` or `currencies`.
    pub fn cycle_choice(&mut self, forward: bool, categories: &[String], currencies: &[Currency]) {
        match &mut self.mode {
            TrackerMode::Expense(form) => match form.field {
                ExpenseField::Category => {
                    let current = Some(&form.draft.category).filter(|c| !c.is_empty());
                    if let Some(next) = step(current, categories, forward) {
                        form.draft.category = next;
                    }
                }
                ExpenseField::Currency => {
                    form.draft.currency = step(form.draft.currency.as_ref(), currencies, forward);
                }
                _ => {}
            },
            TrackerMode::Income(form) if form.field == IncomeField::Currency => {
                form.draft.currency = step(form.draft.currency.as_ref(), currencies, forward);
            }
            _ => {}
        }
    }

    /// Validates the open form or takes the confirmed action. Invalid forms
    /// stay open with their error set.
    pub fn submit(&mut self) -> Option<TrackerCommand> {
        let command = match &mut self.mode {
            TrackerMode::List => return None,
            TrackerMode::Expense(form) => match form.draft.validate() {
                Ok(fields) => match &form.editing {
                    Some(id) => TrackerCommand::Update(id.clone(), ExpensePatch::edit(fields)),
                    None => TrackerCommand::Create(fields),
                },
                Err(err) => {
                    form.error = Some(err.to_string());
                    return None;
                }
            },
            TrackerMode::Income(form) => match form.draft.validate() {
                Ok(income) => TrackerCommand::SetIncome(income),
                Err(err) => {
                    form.error = Some(err.to_string());
                    return None;
                }
            },
            TrackerMode::Confirm(Confirm::Toggle { id, to, .. }) => {
                TrackerCommand::Update(id.clone(), ExpensePatch::status(*to))
            }
            TrackerMode::Confirm(Confirm::Delete { id, .. }) => TrackerCommand::Delete(id.clone()),
            TrackerMode::Confirm(Confirm::ClearIncome) => TrackerCommand::ClearIncome,
        };
        self.mode = TrackerMode::List;
        Some(command)
    }

    /// Patches the snapshot with a write the backend accepted. Returns
    /// `false` when the selected period has no snapshot to patch.
    pub fn commit(&mut self, applied: Applied) -> bool {
        let period = self.period;
        let Some(book) = self.book.as_mut().filter(|book| book.period() == period) else {
            return false;
        };
        match applied {
            Applied::Created(expense) => book.insert(expense),
            Applied::Patched(id, patch) => {
                book.patch(&id, &patch);
            }
            Applied::Removed(id) => {
                book.remove(&id);
            }
            Applied::IncomeSet(income) => book.set_income(income),
            Applied::IncomeCleared => book.clear_income(),
        }
        self.generation += 1;
        self.loading = false;
        self.clamp_selection();
        true
    }
}

/// Next or previous entry of `options` after `current`, wrapping around.
/// An unknown or missing `current` starts from the first entry.
pub(crate) fn step<T: Clone + PartialEq>(
    current: Option<&T>,
    options: &[T],
    forward: bool,
) -> Option<T> {
    if options.is_empty() {
        return current.cloned();
    }
    let len = options.len();
    let idx = match current.and_then(|c| options.iter().position(|o| o == c)) {
        Some(idx) if forward => (idx + 1) % len,
        Some(idx) => (idx + len - 1) % len,
        None => 0,
    };
    options.get(idx).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(id: &str, name: &str, category: &str, amount: f64, currency: Currency) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            amount,
            currency,
            status: ExpenseStatus::Pending,
        }
    }

    fn march() -> Period {
        Period::new(3, 2025).unwrap()
    }

    fn loaded() -> TrackerState {
        let mut state = TrackerState::new(march(), Currency::Eur);
        state.rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
        state.select_period(march());
        let seq = state.begin_read();
        let book = PeriodBook::new(
            march(),
            Some(Income {
                amount: 1000.0,
                currency: Currency::Eur,
            }),
            vec![
                expense("1", "Pane", "Alimentazione", 20.0, Currency::Eur),
                expense("2", "Affitto", "Affitto", 4000.0, Currency::Mxn),
                expense("3", "Bus", "Trasporto", 30.0, Currency::Eur),
            ],
        );
        assert_eq!(state.apply_loaded(march(), seq, Ok(book)), LoadOutcome::Applied);
        state
    }

    fn categories() -> Vec<String> {
        ["Alimentazione", "Affitto", "Trasporto"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut state = loaded();
        let old_seq = state.begin_read();
        state.select_period(march().next());
        let seq = state.begin_read();
        let old = PeriodBook::empty(march());
        assert_eq!(state.apply_loaded(march(), old_seq, Ok(old)), LoadOutcome::Stale);
        assert!(state.loading);
        assert!(state.current_book().is_none());

        let april = PeriodBook::empty(march().next());
        assert_eq!(
            state.apply_loaded(march().next(), seq, Ok(april)),
            LoadOutcome::Applied
        );
        assert!(!state.loading);
        assert!(state.current_book().is_some());
    }

    #[test]
    fn failed_load_keeps_last_snapshot() {
        let mut state = loaded();
        state.select_period(march());
        let seq = state.begin_read();
        let outcome = state.apply_loaded(march(), seq, Err("server down".to_string()));
        assert_eq!(outcome, LoadOutcome::Failed);
        assert_eq!(state.error.as_deref(), Some("server down"));
        assert_eq!(state.current_book().unwrap().expenses().len(), 3);
    }

    #[test]
    fn add_form_validates_before_sending() {
        let mut state = loaded();
        state.open_add(Currency::Eur);
        for ch in "Cinema".chars() {
            state.input(ch);
        }
        assert!(state.submit().is_none());
        let TrackerMode::Expense(form) = &state.mode else {
            panic!("form closed");
        };
        assert!(form.error.is_some());

        state.next_field(true);
        state.cycle_choice(true, &categories(), &Currency::ALL);
        state.next_field(true);
        for ch in "1x5".chars() {
            state.input(ch);
        }
        let command = state.submit().unwrap();
        let TrackerCommand::Create(fields) = command else {
            panic!("expected create");
        };
        assert_eq!(fields.name, "Cinema");
        assert_eq!(fields.category, "Alimentazione");
        assert_eq!(fields.amount, 15.0);
        assert_eq!(state.mode, TrackerMode::List);
    }

    #[test]
    fn edit_resubmits_as_pending() {
        let mut state = loaded();
        state.select_next();
        assert!(state.open_edit());
        let Some(TrackerCommand::Update(id, patch)) = state.submit() else {
            panic!("expected update");
        };
        assert_eq!(id, ExpenseId::new("2"));
        assert_eq!(patch.status, Some(ExpenseStatus::Pending));
        assert_eq!(patch.amount, Some(4000.0));
    }

    #[test]
    fn toggle_goes_through_confirmation() {
        let mut state = loaded();
        assert!(state.ask_toggle());
        let TrackerMode::Confirm(confirm) = &state.mode else {
            panic!("no confirmation");
        };
        assert_eq!(confirm.prompt(), "Mark \"Pane\" as paid?");

        let command = state.submit().unwrap();
        assert_eq!(
            command,
            TrackerCommand::Update(ExpenseId::new("1"), ExpensePatch::status(ExpenseStatus::Paid))
        );
        assert!(state.commit(Applied::Patched(
            ExpenseId::new("1"),
            ExpensePatch::status(ExpenseStatus::Paid),
        )));
        assert_eq!(state.rows()[0].status, ExpenseStatus::Paid);
    }

    #[test]
    fn commits_patch_the_book() {
        let mut state = loaded();
        state.commit(Applied::Created(expense(
            "9",
            "Cena",
            "Alimentazione",
            50.0,
            Currency::Eur,
        )));
        state.commit(Applied::Removed(ExpenseId::new("3")));
        state.commit(Applied::IncomeCleared);

        let summary = state.summary().unwrap();
        assert_eq!(summary.aggregation.grand_total, 270.0);
        assert_eq!(summary.totals.remaining, -270.0);
        assert!(summary.totals.is_over_budget());
    }

    #[test]
    fn older_read_of_same_period_is_superseded() {
        let mut state = loaded();
        let first = state.begin_read();
        let second = state.begin_read();
        let newer = PeriodBook::new(march(), None, Vec::new());
        assert_eq!(state.apply_loaded(march(), second, Ok(newer)), LoadOutcome::Applied);

        let older = PeriodBook::empty(march());
        assert_eq!(state.apply_loaded(march(), first, Ok(older)), LoadOutcome::Stale);
        assert!(state.current_book().unwrap().income().is_none());
        assert!(!state.loading);
    }

    #[test]
    fn read_in_flight_cannot_undo_a_commit() {
        let mut state = loaded();
        let seq = state.begin_read();
        assert!(state.commit(Applied::Created(expense(
            "9",
            "Cena",
            "Alimentazione",
            50.0,
            Currency::Eur,
        ))));
        assert!(!state.loading);

        let before_write = PeriodBook::empty(march());
        assert_eq!(
            state.apply_loaded(march(), seq, Ok(before_write)),
            LoadOutcome::Stale
        );
        assert_eq!(state.rows().len(), 4);

        let fresh = state.begin_read();
        let after_write = PeriodBook::empty(march());
        assert_eq!(
            state.apply_loaded(march(), fresh, Ok(after_write)),
            LoadOutcome::Applied
        );
        assert!(state.rows().is_empty());
    }

    #[test]
    fn commit_without_snapshot_is_refused() {
        let mut state = loaded();
        state.select_period(march().prev());
        assert!(!state.commit(Applied::IncomeCleared));
        assert!(state.book.as_ref().unwrap().income().is_some());
    }

    #[test]
    fn hiding_groups_and_filters_leave_totals() {
        let mut state = loaded();
        state.toggle_focus();
        state.select_next();
        let (key, hidden) = state.toggle_selected_group().unwrap();
        assert_eq!(key, GroupKey::new("Affitto", Currency::Mxn));
        assert!(hidden);

        state.cycle_filter(&categories());
        assert_eq!(state.rows().len(), 1);
        assert_eq!(state.summary().unwrap().aggregation.grand_total, 250.0);

        state.show_all_groups();
        assert!(state.hidden.is_empty());
    }

    #[test]
    fn sort_keys_toggle_direction() {
        let mut state = loaded();
        state.sort_by(SortKey::Amount);
        let names: Vec<&str> = state.rows().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Pane", "Bus", "Affitto"]);
        state.sort_by(SortKey::Amount);
        let names: Vec<&str> = state.rows().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Affitto", "Bus", "Pane"]);
    }

    #[test]
    fn income_form_accepts_zero() {
        let mut state = loaded();
        state.open_income(Currency::Eur);
        let TrackerMode::Income(form) = &state.mode else {
            panic!("no income form");
        };
        assert_eq!(form.draft.amount, "1000");
        for _ in 0..4 {
            state.backspace();
        }
        state.input('0');
        assert_eq!(
            state.submit(),
            Some(TrackerCommand::SetIncome(Income {
                amount: 0.0,
                currency: Currency::Eur,
            }))
        );
    }

    #[test]
    fn step_wraps_both_ways() {
        let options = [Currency::Eur, Currency::Usd, Currency::Mxn];
        assert_eq!(step(Some(&Currency::Mxn), &options, true), Some(Currency::Eur));
        assert_eq!(step(Some(&Currency::Eur), &options, false), Some(Currency::Mxn));
        assert_eq!(step(None, &options, false), Some(Currency::Eur));
    }
}
