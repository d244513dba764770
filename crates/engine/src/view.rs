//! Filtered and sorted projections for tabular display.

use std::cmp::Ordering;

use crate::{Expense, collate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Orients an ascending comparison.
    #[must_use]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    #[must_use]
    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// Current sort column and direction of a table.
///
/// `key == None` means "keep input order".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortConfig<K> {
    pub key: Option<K>,
    pub direction: SortDirection,
}

impl<K> Default for SortConfig<K> {
    fn default() -> Self {
        Self {
            key: None,
            direction: SortDirection::Asc,
        }
    }
}

impl<K: Copy + PartialEq> SortConfig<K> {
    /// Column header click: the same key flips the direction, another key
    /// starts again ascending.
    pub fn select(&mut self, key: K) {
        if self.key == Some(key) {
            self.direction = self.direction.flipped();
        } else {
            self.key = Some(key);
            self.direction = SortDirection::Asc;
        }
    }

    /// Returns the direction shown next to `key`, if it is the active column.
    #[must_use]
    pub fn direction_of(&self, key: K) -> Option<SortDirection> {
        (self.key == Some(key)).then_some(self.direction)
    }
}

/// Sortable expense columns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SortKey {
    Name,
    Category,
    Amount,
    Status,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Name,
        SortKey::Category,
        SortKey::Amount,
        SortKey::Status,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Status => "status",
        }
    }

    /// Ascending comparison of two expenses on this column.
    #[must_use]
    pub fn compare(self, a: &Expense, b: &Expense) -> Ordering {
        match self {
            Self::Name => collate::compare(&a.name, &b.name),
            Self::Category => collate::compare(&a.category, &b.category),
            Self::Amount => a.amount.total_cmp(&b.amount),
            Self::Status => collate::compare(a.status.as_str(), b.status.as_str()),
        }
    }
}

impl core::str::FromStr for SortKey {
    type Err = crate::EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| crate::EngineError::UnknownSortKey(s.trim().to_string()))
    }
}

/// Category restriction of the expense table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    #[must_use]
    pub fn matches(&self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => expense.category == *category,
        }
    }

    /// Moves to the next option of `All, categories[0], categories[1], ...`,
    /// wrapping back to `All`.
    #[must_use]
    pub fn cycle(&self, categories: &[String]) -> Self {
        let next = match self {
            Self::All => 0,
            Self::Only(current) => match categories.iter().position(|c| c == current) {
                Some(idx) => idx + 1,
                None => categories.len(),
            },
        };
        categories
            .get(next)
            .map_or(Self::All, |category| Self::Only(category.clone()))
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Only(category) => category,
        }
    }
}

/// Filters by category, then sorts stably by `sort`.
///
/// Ties keep their input order in both directions, and with no sort key the
/// input order is returned unchanged.
#[must_use]
pub fn project<'a>(
    records: &'a [Expense],
    filter: &CategoryFilter,
    sort: &SortConfig<SortKey>,
) -> Vec<&'a Expense> {
    let mut rows: Vec<&Expense> = records.iter().filter(|e| filter.matches(e)).collect();
    if let Some(key) = sort.key {
        rows.sort_by(|a, b| sort.direction.apply(key.compare(a, b)));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Currency, ExpenseId, ExpenseStatus};

    fn expense(id: &str, name: &str, category: &str, amount: f64) -> Expense {
        Expense {
            id: ExpenseId::new(id),
            name: name.to_string(),
            category: category.to_string(),
            amount,
            currency: Currency::Eur,
            status: ExpenseStatus::Pending,
        }
    }

    fn ids(rows: &[&Expense]) -> Vec<String> {
        rows.iter().map(|e| e.id.to_string()).collect()
    }

    #[test]
    fn select_flips_same_key_and_resets_on_new_key() {
        let mut sort = SortConfig::default();
        sort.select(SortKey::Amount);
        assert_eq!(sort.direction_of(SortKey::Amount), Some(SortDirection::Asc));
        sort.select(SortKey::Amount);
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.select(SortKey::Name);
        assert_eq!(sort.key, Some(SortKey::Name));
        assert_eq!(sort.direction, SortDirection::Asc);
        assert_eq!(sort.direction_of(SortKey::Amount), None);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let records = [
            expense("a", "x", "Altro", 10.0),
            expense("b", "y", "Altro", 5.0),
            expense("c", "z", "Altro", 10.0),
        ];
        let mut sort = SortConfig::default();
        sort.select(SortKey::Amount);
        assert_eq!(ids(&project(&records, &CategoryFilter::All, &sort)), ["b", "a", "c"]);
        sort.select(SortKey::Amount);
        assert_eq!(ids(&project(&records, &CategoryFilter::All, &sort)), ["a", "c", "b"]);
    }

    #[test]
    fn category_filter_is_exact() {
        let records = [
            expense("a", "x", "Salute", 1.0),
            expense("b", "y", "salute", 1.0),
            expense("c", "z", "Salute", 1.0),
        ];
        let rows = project(
            &records,
            &CategoryFilter::Only("Salute".to_string()),
            &SortConfig::default(),
        );
        assert_eq!(ids(&rows), ["a", "c"]);
    }

    #[test]
    fn names_sort_locale_aware() {
        let records = [
            expense("1", "Zucchero", "Altro", 1.0),
            expense("2", "ápice", "Altro", 1.0),
            expense("3", "banana", "Altro", 1.0),
        ];
        let mut sort = SortConfig::default();
        sort.select(SortKey::Name);
        assert_eq!(ids(&project(&records, &CategoryFilter::All, &sort)), ["2", "3", "1"]);
    }

    #[test]
    fn status_sorts_by_label() {
        let mut paid = expense("p", "x", "Altro", 1.0);
        paid.status = ExpenseStatus::Paid;
        let records = [expense("q", "y", "Altro", 1.0), paid];
        let mut sort = SortConfig::default();
        sort.select(SortKey::Status);
        assert_eq!(ids(&project(&records, &CategoryFilter::All, &sort)), ["p", "q"]);
    }

    #[test]
    fn filter_cycles_through_categories() {
        let categories = vec!["Affitto".to_string(), "Salute".to_string()];
        let first = CategoryFilter::All.cycle(&categories);
        assert_eq!(first, CategoryFilter::Only("Affitto".to_string()));
        let second = first.cycle(&categories);
        assert_eq!(second.cycle(&categories), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::Only("Gone".to_string()).cycle(&categories),
            CategoryFilter::All
        );
    }

    #[test]
    fn sort_key_parses_labels() {
        assert_eq!("Amount".parse::<SortKey>().unwrap(), SortKey::Amount);
        assert!("date".parse::<SortKey>().is_err());
    }
}
