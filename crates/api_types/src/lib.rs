//! JSON shapes exchanged with the finance backend.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Mxn,
}

/// Error body returned by the backend on non-success responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Lenient decoders for values the backend does not type consistently.
pub mod lenient {
    use serde::{Deserialize, Deserializer, de::Error};

    use super::Currency;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Int(i64),
        Uint(u64),
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum AmountRepr {
        Number(f64),
        Text(String),
    }

    /// Identifier sent either as a JSON string or a JSON integer.
    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match IdRepr::deserialize(deserializer)? {
            IdRepr::Text(text) => text,
            IdRepr::Int(value) => value.to_string(),
            IdRepr::Uint(value) => value.to_string(),
        })
    }

    /// Currency that may be missing or `null`; both mean EUR.
    pub fn currency<'de, D>(deserializer: D) -> Result<Currency, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Currency>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// Amount sent either as a JSON number or a numeric string.
    pub fn amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match AmountRepr::deserialize(deserializer)? {
            AmountRepr::Number(value) => Ok(value),
            AmountRepr::Text(text) if text.trim().is_empty() => Ok(0.0),
            AmountRepr::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| D::Error::custom(format!("invalid amount: {text}"))),
        }
    }
}

pub mod finance {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum ExpenseStatus {
        #[default]
        Pending,
        Paid,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        pub name: String,
        pub category: String,
        #[serde(deserialize_with = "lenient::amount")]
        pub amount: f64,
        /// Older records were stored without a currency; they are in EUR.
        #[serde(default, deserialize_with = "lenient::currency")]
        pub currency: Currency,
        #[serde(default)]
        pub status: ExpenseStatus,
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct IncomeView {
        #[serde(deserialize_with = "lenient::amount", default)]
        pub amount: f64,
        #[serde(default, deserialize_with = "lenient::currency")]
        pub currency: Currency,
    }

    /// Body of `GET finance/{MM}/{YYYY}`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct PeriodFinance {
        #[serde(default)]
        pub income: Option<IncomeView>,
        #[serde(default)]
        pub expenses: Vec<ExpenseView>,
    }

    /// Body of `POST finance/{MM}/{YYYY}/expenses`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub name: String,
        pub category: String,
        pub amount: f64,
        pub currency: Currency,
        pub status: ExpenseStatus,
    }

    /// Response of `POST finance/{MM}/{YYYY}/expenses`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseCreated {
        #[serde(rename = "newExpense")]
        pub new_expense: ExpenseView,
    }

    /// Body of `PUT finance/{MM}/{YYYY}/expenses/{id}`; absent fields are kept.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub name: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub amount: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub currency: Option<Currency>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub status: Option<ExpenseStatus>,
    }

    /// Body of `PUT finance/{MM}/{YYYY}/income`.
    #[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
    pub struct IncomeUpdate {
        pub amount: f64,
        pub currency: Currency,
    }
}

pub mod rates {
    use std::collections::HashMap;

    use super::*;

    /// Body of `GET exchange-rates`.
    ///
    /// Each value is quoted as foreign units per one unit of `base`.
    #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
    pub struct ExchangeRatesResponse {
        #[serde(default)]
        pub base: Option<String>,
        #[serde(default)]
        pub rates: HashMap<String, f64>,
    }
}

pub mod recurring {
    use super::*;

    fn default_due_day() -> u8 {
        1
    }

    fn default_active() -> bool {
        true
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RecurringExpenseView {
        #[serde(deserialize_with = "lenient::id")]
        pub id: String,
        pub title: String,
        #[serde(deserialize_with = "lenient::amount")]
        pub amount: f64,
        pub category: String,
        #[serde(default, deserialize_with = "lenient::currency")]
        pub currency: Currency,
        #[serde(default = "default_due_day")]
        pub due_day: u8,
        #[serde(default = "default_active")]
        pub active: bool,
    }

    /// Body of create and update requests on `api/recurring-expenses`.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct RecurringExpenseUpsert {
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub currency: Currency,
        pub due_day: u8,
        pub active: bool,
    }
}

#[cfg(test)]
mod tests {
    use super::{finance::*, rates::*, recurring::*};

    #[test]
    fn period_accepts_numeric_ids_and_string_amounts() {
        let body = r#"{
            "income": { "amount": "1500", "currency": "EUR" },
            "expenses": [
                { "id": 42, "name": "Affitto", "category": "Affitto", "amount": 700, "currency": "MXN", "status": "paid" },
                { "id": "a1", "name": "Pane", "category": "Alimentazione", "amount": "3.5" }
            ]
        }"#;
        let period: PeriodFinance = serde_json::from_str(body).unwrap();
        assert_eq!(period.income.unwrap().amount, 1500.0);
        assert_eq!(period.expenses[0].id, "42");
        assert_eq!(period.expenses[0].status, ExpenseStatus::Paid);
        assert_eq!(period.expenses[1].amount, 3.5);
        assert_eq!(period.expenses[1].currency, super::Currency::Eur);
        assert_eq!(period.expenses[1].status, ExpenseStatus::Pending);
    }

    #[test]
    fn null_currency_reads_as_eur() {
        let body = r#"{
            "income": { "amount": 900, "currency": null },
            "expenses": [
                { "id": 1, "name": "Pane", "category": "Alimentazione", "amount": 2, "currency": null }
            ]
        }"#;
        let period: PeriodFinance = serde_json::from_str(body).unwrap();
        assert_eq!(period.expenses[0].currency, super::Currency::Eur);
        assert_eq!(period.income.unwrap().currency, super::Currency::Eur);

        let template: RecurringExpenseView = serde_json::from_str(
            r#"{ "id": 2, "title": "Netflix", "amount": 13, "category": "Altro", "currency": null }"#,
        )
        .unwrap();
        assert_eq!(template.currency, super::Currency::Eur);
    }

    #[test]
    fn period_tolerates_null_income() {
        let period: PeriodFinance =
            serde_json::from_str(r#"{ "income": null, "expenses": [] }"#).unwrap();
        assert!(period.income.is_none());
        let period: PeriodFinance = serde_json::from_str("{}").unwrap();
        assert!(period.expenses.is_empty());
    }

    #[test]
    fn update_skips_absent_fields() {
        let body = serde_json::to_string(&ExpenseUpdate {
            status: Some(ExpenseStatus::Paid),
            ..ExpenseUpdate::default()
        })
        .unwrap();
        assert_eq!(body, r#"{"status":"paid"}"#);
    }

    #[test]
    fn created_expense_uses_camel_case_envelope() {
        let body = r#"{ "newExpense": { "id": 3, "name": "Bus", "category": "Trasporto", "amount": 2, "currency": "EUR", "status": "pending" } }"#;
        let created: ExpenseCreated = serde_json::from_str(body).unwrap();
        assert_eq!(created.new_expense.id, "3");
    }

    #[test]
    fn rates_and_recurring_defaults() {
        let rates: ExchangeRatesResponse =
            serde_json::from_str(r#"{ "base": "EUR", "rates": { "MXN": 21.5, "USD": 1.08 } }"#)
                .unwrap();
        assert_eq!(rates.rates["MXN"], 21.5);

        let template: RecurringExpenseView = serde_json::from_str(
            r#"{ "id": 9, "title": "Netflix", "amount": "13", "category": "Intrattenimento" }"#,
        )
        .unwrap();
        assert_eq!(template.due_day, 1);
        assert!(template.active);
        assert_eq!(template.amount, 13.0);
    }

    #[test]
    fn bad_amount_is_rejected() {
        let err = serde_json::from_str::<IncomeView>(r#"{ "amount": "lots" }"#);
        assert!(err.is_err());
    }
}
