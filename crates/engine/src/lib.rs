//! Expense reporting engine.
//!
//! Pure computations over a period's expenses, its income and an exchange
//! rate table:
//!
//! - [`ExchangeRates::normalize`] converts amounts into the reporting currency;
//! - [`aggregate`] groups expenses by (category, currency) and sums them;
//! - [`apply_visibility`] drops hidden groups from the displayed totals;
//! - [`project`] filters and sorts expenses for a table.
//!
//! Nothing here performs I/O or keeps state between calls: every function
//! returns new values from the snapshot it is handed. [`PeriodBook`] is the
//! snapshot callers keep and patch between backend reads.
//!
//! ```rust
//! use engine::{Currency, ExchangeRates, Expense, ExpenseId, ExpenseStatus, aggregate};
//!
//! let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
//! let rent = Expense {
//!     id: ExpenseId::new("1"),
//!     name: "Rent".to_string(),
//!     category: "Rent".to_string(),
//!     amount: 1000.0,
//!     currency: Currency::Mxn,
//!     status: ExpenseStatus::Pending,
//! };
//! let result = aggregate(&[rent], &rates);
//! assert_eq!(result.grand_total, 50.0);
//! assert_eq!(result.groups[0].key.to_string(), "Rent_MXN");
//! ```

pub use aggregate::{
    Aggregation, GroupKey, GroupTotal, PeriodTotals, aggregate, normalized_income, remaining,
};
pub use book::{PeriodBook, Summary};
pub use currency::Currency;
pub use error::EngineError;
pub use expense::{
    Expense, ExpenseDraft, ExpenseFields, ExpenseId, ExpensePatch, ExpenseStatus, Income,
    IncomeDraft,
};
pub use money::{format_amount, format_rounded, parse_whole_amount, round_half_up};
pub use period::{Language, Period, parse_month};
pub use rates::{ExchangeRates, normalize};
pub use recurring::{
    DEFAULT_DUE_DAY, RecurringDraft, RecurringExpense, RecurringFields, RecurringSortKey,
    project_templates,
};
pub use view::{CategoryFilter, SortConfig, SortDirection, SortKey, project};
pub use visibility::{HiddenGroups, VisibleSummary, apply_visibility};

pub mod collate;

mod aggregate;
mod book;
mod currency;
mod error;
mod expense;
mod money;
mod period;
mod rates;
mod recurring;
mod view;
mod visibility;

pub type ResultEngine<T> = Result<T, EngineError>;
