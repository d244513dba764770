//! Exchange rate table and the currency normalizer.

use std::collections::HashMap;

use crate::Currency;

/// Conversion factors into the reporting currency.
///
/// A factor is expressed as "reporting units per 1 unit of the source
/// currency". The reporting currency always converts with factor exactly 1,
/// whatever the table contains.
///
/// ```rust
/// use engine::{Currency, ExchangeRates};
///
/// let rates = ExchangeRates::new(Currency::Eur).with_factor(Currency::Mxn, 0.05);
/// assert_eq!(rates.normalize(1000.0, Currency::Mxn), 50.0);
/// // Missing from the table: treated as already in the reporting currency.
/// assert_eq!(rates.normalize(10.0, Currency::Usd), 10.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ExchangeRates {
    reporting: Currency,
    factors: HashMap<Currency, f64>,
}

impl ExchangeRates {
    /// Creates an empty table for `reporting`.
    #[must_use]
    pub fn new(reporting: Currency) -> Self {
        Self {
            reporting,
            factors: HashMap::new(),
        }
    }

    /// Builds a table from upstream quotes.
    ///
    /// Upstream quotes "how many foreign units buy one reporting unit" (for a
    /// EUR report, `USD: 1.08`), so each quote is inverted. Codes outside the
    /// supported set are skipped, as are zero, negative and non-finite quotes:
    /// those currencies fall back to factor 1 in [`ExchangeRates::factor`].
    #[must_use]
    pub fn from_quoted<'a, I>(reporting: Currency, quotes: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut table = Self::new(reporting);
        for (code, quoted) in quotes {
            let Ok(currency) = Currency::try_from(code) else {
                continue;
            };
            if currency == reporting || !quoted.is_finite() || quoted <= 0.0 {
                continue;
            }
            table.factors.insert(currency, 1.0 / quoted);
        }
        table
    }

    /// Sets a factor, returning the updated table.
    #[must_use]
    pub fn with_factor(mut self, currency: Currency, factor: f64) -> Self {
        self.factors.insert(currency, factor);
        self
    }

    /// The currency every amount is normalized into.
    #[must_use]
    pub fn reporting(&self) -> Currency {
        self.reporting
    }

    /// Conversion factor for `currency`; 1 when unknown.
    #[must_use]
    pub fn factor(&self, currency: Currency) -> f64 {
        if currency == self.reporting {
            return 1.0;
        }
        self.factors.get(&currency).copied().unwrap_or(1.0)
    }

    /// Returns `true` when the table holds an explicit factor for `currency`.
    #[must_use]
    pub fn knows(&self, currency: Currency) -> bool {
        currency == self.reporting || self.factors.contains_key(&currency)
    }

    /// Converts `amount` of `currency` into the reporting currency.
    #[must_use]
    pub fn normalize(&self, amount: f64, currency: Currency) -> f64 {
        amount * self.factor(currency)
    }
}

impl Default for ExchangeRates {
    fn default() -> Self {
        Self::new(Currency::default())
    }
}

/// Free-function form of [`ExchangeRates::normalize`].
#[must_use]
pub fn normalize(amount: f64, currency: Currency, rates: &ExchangeRates) -> f64 {
    rates.normalize(amount, currency)
}
