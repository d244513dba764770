//! State of the recurring templates screen.

use engine::{
    Currency, ExpenseId, RecurringDraft, RecurringExpense, RecurringFields, RecurringSortKey,
    SortConfig, project_templates,
};

use super::tracker::step;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecurringField {
    Title,
    Amount,
    Category,
    Currency,
}

impl RecurringField {
    pub const ALL: [RecurringField; 4] = [
        RecurringField::Title,
        RecurringField::Amount,
        RecurringField::Category,
        RecurringField::Currency,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::Amount => "Amount",
            Self::Category => "Category",
            Self::Currency => "Currency",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecurringForm {
    /// Template being edited, with its schedule kept as is.
    pub editing: Option<RecurringExpense>,
    pub draft: RecurringDraft,
    pub field: RecurringField,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecurringMode {
    List,
    Search,
    Form(RecurringForm),
    ConfirmDelete { id: ExpenseId, title: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecurringCommand {
    Create(RecurringFields),
    Update(ExpenseId, RecurringFields),
    Delete(ExpenseId),
}

#[derive(Debug)]
pub struct RecurringState {
    pub templates: Vec<RecurringExpense>,
    pub loaded: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub needle: String,
    pub sort: SortConfig<RecurringSortKey>,
    pub selected: usize,
    pub mode: RecurringMode,
}

impl Default for RecurringState {
    fn default() -> Self {
        Self {
            templates: Vec::new(),
            loaded: false,
            loading: false,
            error: None,
            needle: String::new(),
            sort: SortConfig::default(),
            selected: 0,
            mode: RecurringMode::List,
        }
    }
}

impl RecurringState {
    pub fn is_editing(&self) -> bool {
        !matches!(self.mode, RecurringMode::List)
    }

    pub fn apply_loaded(&mut self, result: std::result::Result<Vec<RecurringExpense>, String>) {
        self.loading = false;
        match result {
            Ok(templates) => {
                self.templates = templates;
                self.loaded = true;
                self.error = None;
                let len = self.rows().len();
                self.selected = self.selected.min(len.saturating_sub(1));
            }
            Err(message) => self.error = Some(message),
        }
    }

    pub fn rows(&self) -> Vec<&RecurringExpense> {
        project_templates(&self.templates, &self.needle, &self.sort)
    }

    pub fn selected_template(&self) -> Option<&RecurringExpense> {
        self.rows().get(self.selected).copied()
    }

    pub fn select_next(&mut self) {
        let len = self.rows().len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn sort_by(&mut self, key: RecurringSortKey) {
        self.sort.select(key);
    }

    pub fn start_search(&mut self) {
        self.mode = RecurringMode::Search;
    }

    pub fn clear_search(&mut self) {
        self.needle.clear();
        self.selected = 0;
    }

    pub fn open_add(&mut self, reporting: Currency) {
        self.mode = RecurringMode::Form(RecurringForm {
            editing: None,
            draft: RecurringDraft {
                currency: Some(reporting),
                ..RecurringDraft::default()
            },
            field: RecurringField::Title,
            issues: Vec::new(),
        });
    }

    pub fn open_edit(&mut self) -> bool {
        let Some(template) = self.selected_template().cloned() else {
            return false;
        };
        self.mode = RecurringMode::Form(RecurringForm {
            draft: RecurringDraft::from_template(&template),
            editing: Some(template),
            field: RecurringField::Title,
            issues: Vec::new(),
        });
        true
    }

    pub fn ask_delete(&mut self) -> bool {
        let Some(template) = self.selected_template() else {
            return false;
        };
        self.mode = RecurringMode::ConfirmDelete {
            id: template.id.clone(),
            title: template.title.clone(),
        };
        true
    }

    pub fn cancel(&mut self) {
        self.mode = RecurringMode::List;
    }

    pub fn input(&mut self, ch: char) {
        match &mut self.mode {
            RecurringMode::Search => {
                self.needle.push(ch);
                self.selected = 0;
            }
            RecurringMode::Form(form) => match form.field {
                RecurringField::Title => form.draft.title.push(ch),
                RecurringField::Amount if ch.is_ascii_digit() => form.draft.amount.push(ch),
                _ => {}
            },
            _ => {}
        }
    }

    pub fn backspace(&mut self) {
        match &mut self.mode {
            RecurringMode::Search => {
                self.needle.pop();
                self.selected = 0;
            }
            RecurringMode::Form(form) => match form.field {
                RecurringField::Title => {
                    form.draft.title.pop();
                }
                RecurringField::Amount => {
                    form.draft.amount.pop();
                }
                _ => {}
            },
            _ => {}
        }
    }

    pub fn next_field(&mut self, forward: bool) {
        if let RecurringMode::Form(form) = &mut self.mode {
            form.field = step(Some(&form.field), &RecurringField::ALL, forward)
                .unwrap_or(RecurringField::Title);
        }
    }

    pub fn cycle_choice(&mut self, forward: bool, categories: &[String], currencies: &[Currency]) {
        let RecurringMode::Form(form) = &mut self.mode else {
            return;
        };
        match form.field {
            RecurringField::Category => {
                let current = Some(&form.draft.category).filter(|c| !c.is_empty());
                if let Some(next) = step(current, categories, forward) {
                    form.draft.category = next;
                }
            }
            RecurringField::Currency => {
                form.draft.currency = step(form.draft.currency.as_ref(), currencies, forward);
            }
            _ => {}
        }
    }

    /// Validates the form or takes the confirmed delete. The search prompt
    /// simply closes.
    pub fn submit(&mut self) -> Option<RecurringCommand> {
        if self.mode == RecurringMode::Search {
            self.mode = RecurringMode::List;
            return None;
        }
        let command = match &mut self.mode {
            RecurringMode::List | RecurringMode::Search => return None,
            RecurringMode::Form(form) => match form.draft.validate() {
                Ok(mut fields) => match &form.editing {
                    Some(template) => {
                        fields.due_day = template.due_day;
                        fields.active = template.active;
                        RecurringCommand::Update(template.id.clone(), fields)
                    }
                    None => RecurringCommand::Create(fields),
                },
                Err(engine::EngineError::Invalid(issues)) => {
                    form.issues = issues;
                    return None;
                }
                Err(err) => {
                    form.issues = vec![err.to_string()];
                    return None;
                }
            },
            RecurringMode::ConfirmDelete { id, .. } => RecurringCommand::Delete(id.clone()),
        };
        self.mode = RecurringMode::List;
        Some(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: &str, title: &str, category: &str, amount: f64) -> RecurringExpense {
        RecurringExpense {
            id: ExpenseId::new(id),
            title: title.to_string(),
            amount,
            category: category.to_string(),
            currency: Currency::Eur,
            due_day: 5,
            active: false,
        }
    }

    fn loaded() -> RecurringState {
        let mut state = RecurringState::default();
        state.apply_loaded(Ok(vec![
            template("1", "Netflix", "Intrattenimento", 13.0),
            template("2", "Palestra", "Salute", 40.0),
            template("3", "Assicurazione auto", "Trasporto", 60.0),
        ]));
        state
    }

    #[test]
    fn search_matches_title_or_category() {
        let mut state = loaded();
        state.start_search();
        for ch in "SALU".chars() {
            state.input(ch);
        }
        let titles: Vec<&str> = state.rows().iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["Palestra"]);

        assert!(state.submit().is_none());
        assert_eq!(state.mode, RecurringMode::List);
        state.clear_search();
        assert_eq!(state.rows().len(), 3);
    }

    #[test]
    fn empty_form_reports_every_issue() {
        let mut state = loaded();
        state.open_add(Currency::Eur);
        if let RecurringMode::Form(form) = &mut state.mode {
            form.draft.currency = None;
        }
        assert!(state.submit().is_none());
        let RecurringMode::Form(form) = &state.mode else {
            panic!("form closed");
        };
        assert_eq!(form.issues.len(), 4);
    }

    #[test]
    fn edit_keeps_schedule() {
        let mut state = loaded();
        state.sort_by(RecurringSortKey::Amount);
        state.select_next();
        assert!(state.open_edit());
        state.next_field(true);
        state.backspace();
        state.backspace();
        state.input('4');
        state.input('5');

        let Some(RecurringCommand::Update(id, fields)) = state.submit() else {
            panic!("expected update");
        };
        assert_eq!(id, ExpenseId::new("2"));
        assert_eq!(fields.amount, 45.0);
        assert_eq!(fields.due_day, 5);
        assert!(!fields.active);
    }

    #[test]
    fn new_templates_use_default_schedule() {
        let mut state = RecurringState::default();
        state.open_add(Currency::Usd);
        for ch in "Spotify".chars() {
            state.input(ch);
        }
        state.next_field(true);
        state.input('9');
        state.next_field(true);
        state.cycle_choice(false, &["Altro".to_string()], &Currency::ALL);

        let Some(RecurringCommand::Create(fields)) = state.submit() else {
            panic!("expected create");
        };
        assert_eq!(fields.category, "Altro");
        assert_eq!(fields.currency, Currency::Usd);
        assert_eq!(fields.due_day, engine::DEFAULT_DUE_DAY);
        assert!(fields.active);
    }

    #[test]
    fn delete_needs_confirmation() {
        let mut state = loaded();
        assert!(state.ask_delete());
        assert_eq!(
            state.submit(),
            Some(RecurringCommand::Delete(ExpenseId::new("1")))
        );
        state.apply_loaded(Err("offline".to_string()));
        assert_eq!(state.templates.len(), 3);
        assert_eq!(state.error.as_deref(), Some("offline"));
    }
}
